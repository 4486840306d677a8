//! # Verification Engine
//!
//! Borrows a directory and a store snapshot for the duration of a
//! query batch. Construction is free; callers build one per query if
//! they like.

use thiserror::Error;

use agritrace_core::{EntityId, StakeholderId};
use agritrace_ledger::{LedgerStore, Product, Shipment};
use agritrace_registry::StakeholderDirectory;

/// Errors from verification queries.
///
/// Guard failures (inactive actors, tampered payloads, terminated
/// shipments) are *verdicts*, not errors; only a missing product or an
/// internal re-digest failure surfaces here.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The queried product does not exist.
    #[error("product {id} not found")]
    ProductNotFound {
        /// The unknown product reference.
        id: EntityId,
    },

    /// A stage payload could not be re-canonicalized for digest
    /// comparison.
    #[error("payload canonicalization failed: {0}")]
    Canonicalization(#[from] agritrace_core::CanonicalizationError),
}

/// Read-only verification queries over a registry and a ledger store.
///
/// Callable by any party; no role is required to verify or to read a
/// report.
pub struct VerificationEngine<'a, S: LedgerStore> {
    pub(crate) directory: &'a dyn StakeholderDirectory,
    pub(crate) store: &'a S,
}

impl<'a, S: LedgerStore> VerificationEngine<'a, S> {
    /// Create an engine over the given directory and store.
    pub fn new(directory: &'a dyn StakeholderDirectory, store: &'a S) -> Self {
        Self { directory, store }
    }

    pub(crate) fn product(&self, id: EntityId) -> Result<&'a Product, VerifyError> {
        self.store
            .product(id)
            .ok_or(VerifyError::ProductNotFound { id })
    }

    /// The shipment that governs this product's composite verdict.
    ///
    /// With multiple referencing shipments the most recently created one
    /// governs; the store returns them in creation order.
    pub(crate) fn governing_shipment(&self, product: EntityId) -> Option<&'a Shipment> {
        self.store
            .shipments_for_product(product)
            .last()
            .and_then(|id| self.store.shipment(*id))
    }

    pub(crate) fn stakeholder_known(&self, identity: &StakeholderId) -> bool {
        self.directory.is_registered(identity)
    }
}
