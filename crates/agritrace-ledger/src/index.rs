//! # Central Entity Index
//!
//! Assigns identity to Products and Shipments and enforces the two
//! uniqueness invariants that span them: entity ids are allocated once
//! from a single monotonic counter, and tracking numbers map to exactly
//! one shipment.
//!
//! The index records the kind of every entity it has ever issued, which
//! lets the verification layer answer "does entity X exist, and what is
//! it" without consulting both tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use agritrace_core::{EntityId, EntityKind, TrackingNumber};

/// Errors raised by the entity index.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// An entity id was registered twice. Ids are allocated internally,
    /// so this indicates a store implementation defect.
    #[error("entity {id} is already registered as {kind}")]
    DuplicateEntity {
        /// The colliding id.
        id: EntityId,
        /// The kind already recorded for it.
        kind: EntityKind,
    },

    /// The tracking number is already claimed by another shipment.
    #[error("tracking number {tracking} is already claimed by {holder}")]
    DuplicateTrackingNumber {
        /// The colliding tracking number.
        tracking: TrackingNumber,
        /// The shipment that already holds it.
        holder: EntityId,
    },
}

/// The central entity index: one id space for Products and Shipments,
/// one uniqueness map for tracking numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIndex {
    next_raw: u64,
    kinds: BTreeMap<EntityId, EntityKind>,
    tracking: BTreeMap<TrackingNumber, EntityId>,
}

impl EntityIndex {
    /// Create an empty index. The first allocated id is 1.
    pub fn new() -> Self {
        Self {
            next_raw: EntityId::FIRST.raw(),
            kinds: BTreeMap::new(),
            tracking: BTreeMap::new(),
        }
    }

    /// The id the next successful registration will receive.
    ///
    /// Pure peek; nothing is reserved until [`EntityIndex::register`].
    pub fn next_id(&self) -> EntityId {
        // next_raw starts at 1 and only grows, so the constructor
        // invariant of EntityId holds without re-validation.
        EntityId::new(self.next_raw).unwrap_or(EntityId::FIRST)
    }

    /// Register the next entity id with its kind and return it.
    pub fn register(&mut self, kind: EntityKind) -> Result<EntityId, IndexError> {
        let id = self.next_id();
        if let Some(existing) = self.kinds.get(&id) {
            return Err(IndexError::DuplicateEntity {
                id,
                kind: *existing,
            });
        }
        self.kinds.insert(id, kind);
        self.next_raw += 1;
        Ok(id)
    }

    /// The kind of a registered entity, if any.
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.kinds.get(&id).copied()
    }

    /// Claim a tracking number for a shipment.
    pub fn claim_tracking(
        &mut self,
        tracking: TrackingNumber,
        shipment: EntityId,
    ) -> Result<(), IndexError> {
        if let Some(holder) = self.tracking.get(&tracking) {
            return Err(IndexError::DuplicateTrackingNumber {
                tracking,
                holder: *holder,
            });
        }
        self.tracking.insert(tracking, shipment);
        Ok(())
    }

    /// Look up the shipment holding a tracking number.
    pub fn tracking_lookup(&self, tracking: &TrackingNumber) -> Option<EntityId> {
        self.tracking.get(tracking).copied()
    }

    /// Number of entities ever registered.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the index has registered no entities.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for EntityIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking(s: &str) -> TrackingNumber {
        TrackingNumber::new(s).unwrap()
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let mut index = EntityIndex::new();
        let a = index.register(EntityKind::Product).unwrap();
        let b = index.register(EntityKind::Shipment).unwrap();
        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
        assert_eq!(index.next_id().raw(), 3);
    }

    #[test]
    fn test_kind_is_recorded() {
        let mut index = EntityIndex::new();
        let p = index.register(EntityKind::Product).unwrap();
        let s = index.register(EntityKind::Shipment).unwrap();
        assert_eq!(index.kind_of(p), Some(EntityKind::Product));
        assert_eq!(index.kind_of(s), Some(EntityKind::Shipment));
        assert_eq!(index.kind_of(EntityId::new(99).unwrap()), None);
    }

    #[test]
    fn test_next_id_is_a_pure_peek() {
        let index = EntityIndex::new();
        assert_eq!(index.next_id(), index.next_id());
        assert!(index.is_empty());
    }

    #[test]
    fn test_tracking_uniqueness() {
        let mut index = EntityIndex::new();
        let s1 = index.register(EntityKind::Shipment).unwrap();
        let s2 = index.register(EntityKind::Shipment).unwrap();

        index.claim_tracking(tracking("T-1"), s1).unwrap();
        let result = index.claim_tracking(tracking("T-1"), s2);
        match result.unwrap_err() {
            IndexError::DuplicateTrackingNumber { holder, .. } => assert_eq!(holder, s1),
            other => panic!("expected DuplicateTrackingNumber, got: {other:?}"),
        }
        // First claim unaffected.
        assert_eq!(index.tracking_lookup(&tracking("T-1")), Some(s1));
    }

    #[test]
    fn test_serde_roundtrip_preserves_counter() {
        let mut index = EntityIndex::new();
        index.register(EntityKind::Product).unwrap();
        let json = serde_json::to_string(&index).unwrap();
        let mut parsed: EntityIndex = serde_json::from_str(&json).unwrap();
        let next = parsed.register(EntityKind::Product).unwrap();
        assert_eq!(next.raw(), 2);
    }
}
