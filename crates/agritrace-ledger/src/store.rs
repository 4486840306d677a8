//! # Ledger Store — Repository Seam
//!
//! The [`LedgerStore`] trait is the injected persistence boundary for the
//! lifecycle core. The core holds no process-wide state; every service
//! operates on a store handed to it, which keeps the whole stack
//! unit-testable against [`MemoryLedger`].
//!
//! The store owns the four logical tables named by the persisted-state
//! layout: products, shipments, the entity index (id kinds + tracking
//! uniqueness), and the per-entity audit trail. It performs no
//! authorization of its own; the services guard, the store records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use agritrace_core::{ContentDigest, EntityId, EntityKind, StakeholderId, Timestamp, TrackingNumber};

use crate::index::{EntityIndex, IndexError};
use crate::product::Product;
use crate::shipment::Shipment;

/// An appended audit note on a Product or Shipment.
///
/// Purely additive; never validated against prior notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The audited entity.
    pub entity: EntityId,
    /// The stakeholder that performed the audit.
    pub actor: StakeholderId,
    /// Free-form audit note.
    pub note: String,
    /// Canonical digest of the note, for tamper evidence.
    pub note_digest: ContentDigest,
    /// When the audit was recorded.
    pub recorded_at: Timestamp,
}

/// The injected persistence boundary of the lifecycle core.
///
/// Mutations are applied one at a time by the surrounding environment;
/// implementations need no internal locking. Insertions claim identity
/// through the entity index, so uniqueness violations surface here and
/// nothing is written on failure.
pub trait LedgerStore {
    /// The id the next successful insertion will receive. Pure peek.
    fn next_entity_id(&self) -> EntityId;

    /// Insert a new product, registering its id with the index.
    fn insert_product(&mut self, product: Product) -> Result<(), IndexError>;

    /// The product with this id, if any.
    fn product(&self, id: EntityId) -> Option<&Product>;

    /// Mutable access to the product with this id, if any.
    fn product_mut(&mut self, id: EntityId) -> Option<&mut Product>;

    /// All product ids in insertion order.
    fn product_ids(&self) -> Vec<EntityId>;

    /// Insert a new shipment, registering its id and claiming its
    /// tracking number. On error nothing is written.
    fn insert_shipment(&mut self, shipment: Shipment) -> Result<(), IndexError>;

    /// The shipment with this id, if any.
    fn shipment(&self, id: EntityId) -> Option<&Shipment>;

    /// Mutable access to the shipment with this id, if any.
    fn shipment_mut(&mut self, id: EntityId) -> Option<&mut Shipment>;

    /// The shipment holding a tracking number, if any.
    fn shipment_by_tracking(&self, tracking: &TrackingNumber) -> Option<EntityId>;

    /// Ids of all shipments referencing a product, in creation order.
    fn shipments_for_product(&self, product: EntityId) -> Vec<EntityId>;

    /// The kind of a registered entity, if any.
    fn entity_kind(&self, id: EntityId) -> Option<EntityKind>;

    /// Append an audit record to its entity's trail.
    fn append_audit(&mut self, record: AuditRecord);

    /// The audit trail for an entity, oldest first.
    fn audit_trail(&self, entity: EntityId) -> &[AuditRecord];
}

/// In-memory ledger store backing the CLI and the test suites.
///
/// Serializable as a whole, so the CLI can persist the entire ledger as
/// one JSON document and reload it unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLedger {
    index: EntityIndex,
    products: BTreeMap<EntityId, Product>,
    shipments: BTreeMap<EntityId, Shipment>,
    product_shipments: BTreeMap<EntityId, Vec<EntityId>>,
    audits: BTreeMap<EntityId, Vec<AuditRecord>>,
}

impl MemoryLedger {
    /// Create an empty in-memory ledger.
    pub fn new() -> Self {
        Self {
            index: EntityIndex::new(),
            products: BTreeMap::new(),
            shipments: BTreeMap::new(),
            product_shipments: BTreeMap::new(),
            audits: BTreeMap::new(),
        }
    }

    /// Number of products held.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Number of shipments held.
    pub fn shipment_count(&self) -> usize {
        self.shipments.len()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryLedger {
    fn next_entity_id(&self) -> EntityId {
        self.index.next_id()
    }

    fn insert_product(&mut self, product: Product) -> Result<(), IndexError> {
        let id = self.index.register(EntityKind::Product)?;
        debug_assert_eq!(id, product.id);
        self.products.insert(id, product);
        Ok(())
    }

    fn product(&self, id: EntityId) -> Option<&Product> {
        self.products.get(&id)
    }

    fn product_mut(&mut self, id: EntityId) -> Option<&mut Product> {
        self.products.get_mut(&id)
    }

    fn product_ids(&self) -> Vec<EntityId> {
        self.products.keys().copied().collect()
    }

    fn insert_shipment(&mut self, shipment: Shipment) -> Result<(), IndexError> {
        // Tracking is checked before the id is registered so that a
        // duplicate claim leaves the index untouched.
        if let Some(holder) = self.index.tracking_lookup(&shipment.tracking_number) {
            return Err(IndexError::DuplicateTrackingNumber {
                tracking: shipment.tracking_number.clone(),
                holder,
            });
        }
        let id = self.index.register(EntityKind::Shipment)?;
        debug_assert_eq!(id, shipment.id);
        self.index
            .claim_tracking(shipment.tracking_number.clone(), id)?;
        self.product_shipments
            .entry(shipment.product)
            .or_default()
            .push(id);
        self.shipments.insert(id, shipment);
        Ok(())
    }

    fn shipment(&self, id: EntityId) -> Option<&Shipment> {
        self.shipments.get(&id)
    }

    fn shipment_mut(&mut self, id: EntityId) -> Option<&mut Shipment> {
        self.shipments.get_mut(&id)
    }

    fn shipment_by_tracking(&self, tracking: &TrackingNumber) -> Option<EntityId> {
        self.index.tracking_lookup(tracking)
    }

    fn shipments_for_product(&self, product: EntityId) -> Vec<EntityId> {
        self.product_shipments
            .get(&product)
            .cloned()
            .unwrap_or_default()
    }

    fn entity_kind(&self, id: EntityId) -> Option<EntityKind> {
        self.index.kind_of(id)
    }

    fn append_audit(&mut self, record: AuditRecord) {
        self.audits.entry(record.entity).or_default().push(record);
    }

    fn audit_trail(&self, entity: EntityId) -> &[AuditRecord] {
        self.audits.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agritrace_core::{sha256_digest, CanonicalBytes};

    #[test]
    fn test_empty_ledger() {
        let ledger = MemoryLedger::new();
        assert_eq!(ledger.product_count(), 0);
        assert_eq!(ledger.shipment_count(), 0);
        assert_eq!(ledger.next_entity_id().raw(), 1);
        assert!(ledger.audit_trail(EntityId::new(1).unwrap()).is_empty());
    }

    #[test]
    fn test_audit_trail_appends_in_order() {
        let mut ledger = MemoryLedger::new();
        let entity = EntityId::new(1).unwrap();
        let actor = StakeholderId::new("auditor-1").unwrap();
        for text in ["first pass", "second pass"] {
            let digest = sha256_digest(&CanonicalBytes::new(&text).unwrap());
            ledger.append_audit(AuditRecord {
                entity,
                actor: actor.clone(),
                note: text.into(),
                note_digest: digest,
                recorded_at: Timestamp::now(),
            });
        }
        let trail = ledger.audit_trail(entity);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].note, "first pass");
        assert_eq!(trail[1].note, "second pass");
    }

    #[test]
    fn test_serde_roundtrip_preserves_tables() {
        let ledger = MemoryLedger::new();
        let json = serde_json::to_string(&ledger).unwrap();
        let parsed: MemoryLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.next_entity_id().raw(), 1);
    }
}
