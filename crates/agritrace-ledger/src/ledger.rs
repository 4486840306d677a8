//! # Ledger Service
//!
//! Coordinates the pieces the individual state machines cannot see on
//! their own: id allocation through the entity index, tracking-number
//! uniqueness, the cross-entity shipment creation guards, and the
//! receiver-registration configuration switch.
//!
//! The service is generic over [`LedgerStore`] and holds a read-only
//! borrow of the stakeholder directory only for the duration of each
//! call — it caches nothing about identities between calls.

use serde::{Deserialize, Serialize};

use agritrace_core::{EntityId, Role, StakeholderId};
use agritrace_registry::StakeholderDirectory;

use crate::product::{Product, ProductDraft, ProductError, ProductStage, StagePayload};
use crate::shipment::{Shipment, ShipmentDraft, ShipmentError, ShipmentStatus, StatusNote};
use crate::store::{LedgerStore, MemoryLedger};

/// Ledger behavior switches.
///
/// Whether shipment creation requires a pre-registered receiver is
/// inconsistently enforced across deployments of this design, so it is
/// an explicit flag rather than an assumption. The default is the
/// stricter reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Reject shipment creation when the receiver is not a registered
    /// stakeholder. Default true.
    pub require_registered_receiver: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            require_registered_receiver: true,
        }
    }
}

/// The lifecycle service over an injected store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger<S = MemoryLedger> {
    store: S,
    config: LedgerConfig,
}

impl Ledger<MemoryLedger> {
    /// Create a ledger over a fresh in-memory store.
    pub fn in_memory(config: LedgerConfig) -> Self {
        Self::new(MemoryLedger::new(), config)
    }
}

impl<S: LedgerStore> Ledger<S> {
    /// Create a ledger over an existing store.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store, for append-only layers
    /// built on top of the ledger (audit trails).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ── Products ─────────────────────────────────────────────────────

    /// Create a product at the Farm stage. Farmer-only.
    ///
    /// Returns the allocated entity id.
    pub fn create_product(
        &mut self,
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        draft: ProductDraft,
    ) -> Result<EntityId, ProductError> {
        let id = self.store.next_entity_id();
        let product = Product::create(directory, caller, id, draft)?;
        self.store.insert_product(product)?;
        Ok(id)
    }

    /// Advance a product to the given target stage.
    pub fn advance_product(
        &mut self,
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        id: EntityId,
        target: ProductStage,
        payload: StagePayload,
    ) -> Result<ProductStage, ProductError> {
        let product = self
            .store
            .product_mut(id)
            .ok_or(ProductError::NotFound { id })?;
        product.advance_to(directory, caller, target, payload)
    }

    /// The product with this id, if any.
    pub fn product(&self, id: EntityId) -> Option<&Product> {
        self.store.product(id)
    }

    // ── Shipments ────────────────────────────────────────────────────

    /// Create a shipment for a product. The caller becomes the sender.
    ///
    /// # Errors
    ///
    /// - `NotDistributor` — caller is not an active Distributor.
    /// - `ProductNotFound` — unknown product reference.
    /// - `ProductNotShippable` — product has not left the Farm stage.
    /// - `UnknownReceiver` — receiver unregistered while
    ///   `require_registered_receiver` is set.
    /// - `DuplicateTrackingNumber` — tracking number already claimed.
    pub fn create_shipment(
        &mut self,
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        draft: ShipmentDraft,
    ) -> Result<EntityId, ShipmentError> {
        if !directory.has_role(caller, Role::Distributor) {
            return Err(ShipmentError::NotDistributor {
                caller: caller.clone(),
            });
        }
        let product = self
            .store
            .product(draft.product)
            .ok_or(ShipmentError::ProductNotFound { id: draft.product })?;
        if product.current_stage < ProductStage::Processing {
            return Err(ShipmentError::ProductNotShippable {
                product: draft.product,
                stage: product.current_stage,
            });
        }
        if self.config.require_registered_receiver && !directory.is_registered(&draft.receiver) {
            return Err(ShipmentError::UnknownReceiver {
                identity: draft.receiver,
            });
        }
        if let Some(holder) = self.store.shipment_by_tracking(&draft.tracking_number) {
            return Err(ShipmentError::DuplicateTrackingNumber {
                tracking: draft.tracking_number,
                holder,
            });
        }

        let id = self.store.next_entity_id();
        let shipment = Shipment::new(id, caller.clone(), draft)?;
        self.store.insert_shipment(shipment)?;
        Ok(id)
    }

    /// Transition a shipment to a new status. Sender-only.
    pub fn update_shipment_status(
        &mut self,
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        id: EntityId,
        target: ShipmentStatus,
        note: StatusNote,
    ) -> Result<ShipmentStatus, ShipmentError> {
        let shipment = self
            .store
            .shipment_mut(id)
            .ok_or(ShipmentError::NotFound { id })?;
        shipment.update_status(directory, caller, target, note)
    }

    /// Cancel a shipment with a mandatory reason.
    pub fn cancel_shipment(
        &mut self,
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        id: EntityId,
        reason: &str,
        location: &str,
    ) -> Result<(), ShipmentError> {
        let shipment = self
            .store
            .shipment_mut(id)
            .ok_or(ShipmentError::NotFound { id })?;
        shipment.cancel(directory, caller, reason, location)
    }

    /// The shipment with this id, if any.
    pub fn shipment(&self, id: EntityId) -> Option<&Shipment> {
        self.store.shipment(id)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use agritrace_core::{LicenseNumber, TrackingNumber};
    use agritrace_registry::{NewStakeholder, StakeholderRegistry};

    use crate::product::BatchInfo;
    use crate::shipment::TransportMode;

    fn id(s: &str) -> StakeholderId {
        StakeholderId::new(s).unwrap()
    }

    fn make_directory() -> StakeholderRegistry {
        let admin = id("admin-1");
        let mut registry = StakeholderRegistry::bootstrap(
            admin.clone(),
            "AgriTrace Authority",
            LicenseNumber::new("ADMIN-1").unwrap(),
            "Sacramento, CA",
        )
        .unwrap();
        for (identity, role, lic) in [
            ("farm-1", Role::Farmer, "FARM-1"),
            ("proc-1", Role::Processor, "PROC-1"),
            ("dist-1", Role::Distributor, "DIST-1"),
            ("retail-1", Role::Retailer, "RETAIL-1"),
        ] {
            registry
                .register(
                    &admin,
                    NewStakeholder {
                        identity: id(identity),
                        role,
                        business_name: format!("{identity} co"),
                        license: LicenseNumber::new(lic).unwrap(),
                        location: "CA".into(),
                        certifications: vec![],
                    },
                )
                .unwrap();
        }
        registry
    }

    fn product_draft() -> ProductDraft {
        ProductDraft {
            name: "Heirloom Tomatoes".into(),
            description: "Vine-ripened batch".into(),
            batch: BatchInfo {
                batch_code: "Batch-1".into(),
                origin_farm: "Verde Farms".into(),
            },
            payload: StagePayload {
                location: "Fresno, CA".into(),
                details: "harvested".into(),
            },
        }
    }

    fn shipment_draft(product: EntityId, tracking: &str) -> ShipmentDraft {
        ShipmentDraft {
            product,
            receiver: id("retail-1"),
            tracking_number: TrackingNumber::new(tracking).unwrap(),
            transport_mode: TransportMode::Truck,
            note: StatusNote {
                note: "created".into(),
                location: "depot".into(),
            },
        }
    }

    /// Product created and advanced to Processing, ready to ship.
    fn make_shippable(
        ledger: &mut Ledger,
        directory: &StakeholderRegistry,
    ) -> EntityId {
        let pid = ledger
            .create_product(directory, &id("farm-1"), product_draft())
            .unwrap();
        ledger
            .advance_product(
                directory,
                &id("proc-1"),
                pid,
                ProductStage::Processing,
                StagePayload {
                    location: "plant 2".into(),
                    details: "washed".into(),
                },
            )
            .unwrap();
        pid
    }

    #[test]
    fn test_create_product_allocates_sequential_ids() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let a = ledger
            .create_product(&directory, &id("farm-1"), product_draft())
            .unwrap();
        let b = ledger
            .create_product(&directory, &id("farm-1"), product_draft())
            .unwrap();
        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
        assert!(ledger.product(a).is_some());
    }

    #[test]
    fn test_failed_create_allocates_nothing() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let result = ledger.create_product(&directory, &id("proc-1"), product_draft());
        assert!(result.is_err());
        assert_eq!(ledger.store().next_entity_id().raw(), 1);
    }

    #[test]
    fn test_advance_unknown_product() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let result = ledger.advance_product(
            &directory,
            &id("proc-1"),
            EntityId::new(9).unwrap(),
            ProductStage::Processing,
            StagePayload {
                location: "x".into(),
                details: "y".into(),
            },
        );
        assert!(matches!(result, Err(ProductError::NotFound { .. })));
    }

    #[test]
    fn test_create_shipment_happy_path() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let pid = make_shippable(&mut ledger, &directory);
        let sid = ledger
            .create_shipment(&directory, &id("dist-1"), shipment_draft(pid, "T-1"))
            .unwrap();
        let shipment = ledger.shipment(sid).unwrap();
        assert_eq!(shipment.sender, id("dist-1"));
        assert_eq!(shipment.status, ShipmentStatus::NotShipped);
        assert_eq!(
            ledger
                .store()
                .shipment_by_tracking(&TrackingNumber::new("T-1").unwrap()),
            Some(sid)
        );
        assert_eq!(ledger.store().shipments_for_product(pid), vec![sid]);
    }

    #[test]
    fn test_create_shipment_requires_distributor() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let pid = make_shippable(&mut ledger, &directory);
        let result = ledger.create_shipment(&directory, &id("farm-1"), shipment_draft(pid, "T-1"));
        assert!(matches!(result, Err(ShipmentError::NotDistributor { .. })));
    }

    #[test]
    fn test_farm_stage_product_not_shippable() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let pid = ledger
            .create_product(&directory, &id("farm-1"), product_draft())
            .unwrap();
        let result = ledger.create_shipment(&directory, &id("dist-1"), shipment_draft(pid, "T-1"));
        assert!(matches!(
            result,
            Err(ShipmentError::ProductNotShippable {
                stage: ProductStage::Farm,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_receiver_rejected_by_default() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let pid = make_shippable(&mut ledger, &directory);
        let mut draft = shipment_draft(pid, "T-1");
        draft.receiver = id("stranger");
        let result = ledger.create_shipment(&directory, &id("dist-1"), draft);
        assert!(matches!(result, Err(ShipmentError::UnknownReceiver { .. })));
    }

    #[test]
    fn test_unknown_receiver_allowed_when_configured() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig {
            require_registered_receiver: false,
        });
        let pid = make_shippable(&mut ledger, &directory);
        let mut draft = shipment_draft(pid, "T-1");
        draft.receiver = id("stranger");
        assert!(ledger.create_shipment(&directory, &id("dist-1"), draft).is_ok());
    }

    #[test]
    fn test_duplicate_tracking_rejected_across_shipments() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let pid = make_shippable(&mut ledger, &directory);
        ledger
            .create_shipment(&directory, &id("dist-1"), shipment_draft(pid, "T-1"))
            .unwrap();
        let result = ledger.create_shipment(&directory, &id("dist-1"), shipment_draft(pid, "T-1"));
        assert!(matches!(
            result,
            Err(ShipmentError::DuplicateTrackingNumber { .. })
        ));
        assert_eq!(ledger.store().shipment_count(), 1);
    }

    #[test]
    fn test_update_and_cancel_through_service() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let pid = make_shippable(&mut ledger, &directory);
        let sid = ledger
            .create_shipment(&directory, &id("dist-1"), shipment_draft(pid, "T-1"))
            .unwrap();

        ledger
            .update_shipment_status(
                &directory,
                &id("dist-1"),
                sid,
                ShipmentStatus::Shipped,
                StatusNote::default(),
            )
            .unwrap();
        ledger
            .cancel_shipment(&directory, &id("dist-1"), sid, "recalled batch", "I-5")
            .unwrap();
        assert_eq!(
            ledger.shipment(sid).unwrap().status,
            ShipmentStatus::Cancelled
        );
    }

    #[test]
    fn test_update_unknown_shipment() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let result = ledger.update_shipment_status(
            &directory,
            &id("dist-1"),
            EntityId::new(5).unwrap(),
            ShipmentStatus::Shipped,
            StatusNote::default(),
        );
        assert!(matches!(result, Err(ShipmentError::NotFound { .. })));
    }

    #[test]
    fn test_ledger_serde_roundtrip() {
        let directory = make_directory();
        let mut ledger = Ledger::in_memory(LedgerConfig::default());
        let pid = make_shippable(&mut ledger, &directory);
        let json = serde_json::to_string(&ledger).unwrap();
        let parsed: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.product(pid).unwrap().current_stage,
            ProductStage::Processing
        );
        assert!(parsed.config().require_registered_receiver);
    }
}
