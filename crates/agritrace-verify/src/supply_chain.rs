//! # Composite Supply-Chain Verdict
//!
//! Combines product authenticity with the status of the shipment that
//! references the product. A terminated shipment (Cancelled or
//! UnableToDeliver) flips the composite invalid even when every actor
//! is still active; a product with no shipment is valid on
//! authenticity alone.

use serde::{Deserialize, Serialize};

use agritrace_core::EntityId;
use agritrace_ledger::{LedgerStore, ShipmentStatus};

use crate::authenticity::AuthenticityVerdict;
use crate::engine::{VerificationEngine, VerifyError};

/// The outcome of a whole-chain check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyChainVerdict {
    /// Whether the chain as a whole holds up.
    pub valid: bool,
    /// The product-level verdict.
    pub authenticity: AuthenticityVerdict,
    /// Status of the governing shipment; `None` when the product has
    /// never been shipped.
    pub shipment_status: Option<ShipmentStatus>,
    /// `"valid"`, or the first failure encountered.
    pub reason: String,
}

impl<S: LedgerStore> VerificationEngine<'_, S> {
    /// Verify the complete chain for a product.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown product reference.
    pub fn verify_complete_supply_chain(
        &self,
        product: EntityId,
    ) -> Result<SupplyChainVerdict, VerifyError> {
        let authenticity = self.verify_product_authenticity(product)?;
        let shipment_status = self.governing_shipment(product).map(|s| s.status);

        if !authenticity.authentic {
            let reason = authenticity.reason.clone();
            return Ok(SupplyChainVerdict {
                valid: false,
                authenticity,
                shipment_status,
                reason,
            });
        }
        if let Some(status) = shipment_status {
            if status.is_terminal() {
                return Ok(SupplyChainVerdict {
                    valid: false,
                    authenticity,
                    shipment_status,
                    reason: format!("shipment terminated at {status}"),
                });
            }
        }
        Ok(SupplyChainVerdict {
            valid: true,
            authenticity,
            shipment_status,
            reason: "valid".to_string(),
        })
    }
}
