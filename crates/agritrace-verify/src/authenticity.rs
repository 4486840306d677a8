//! # Product Authenticity
//!
//! A product is authentic iff every stakeholder recorded at every stage
//! it has reached is *currently* active, and every stage payload still
//! matches the digest recorded when the stage was entered.
//!
//! Both checks run against live state. There is no cached verdict to
//! invalidate: deactivate the farmer and every product they harvested
//! verifies false on the next query; reactivate them and it verifies
//! true again.

use serde::{Deserialize, Serialize};

use agritrace_core::{sha256_digest, CanonicalBytes, EntityId};
use agritrace_ledger::{LedgerStore, Product};

use crate::engine::{VerificationEngine, VerifyError};

/// The outcome of an authenticity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticityVerdict {
    /// Whether every reached stage passed both checks.
    pub authentic: bool,
    /// `"authentic"`, or the role and identity of the first failing
    /// actor (or the first tampered stage).
    pub reason: String,
}

impl AuthenticityVerdict {
    fn authentic() -> Self {
        Self {
            authentic: true,
            reason: "authentic".to_string(),
        }
    }

    fn failed(reason: String) -> Self {
        Self {
            authentic: false,
            reason,
        }
    }
}

impl<S: LedgerStore> VerificationEngine<'_, S> {
    /// Verify a product's authenticity against current registry state.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown product reference.
    pub fn verify_product_authenticity(
        &self,
        product: EntityId,
    ) -> Result<AuthenticityVerdict, VerifyError> {
        let product = self.product(product)?;
        self.check_stages(product)
    }

    pub(crate) fn check_stages(&self, product: &Product) -> Result<AuthenticityVerdict, VerifyError> {
        for record in &product.stages {
            if !self.directory.is_active(&record.actor) {
                return Ok(AuthenticityVerdict::failed(format!(
                    "{} {} recorded at stage {} is not currently active",
                    record.stage.required_role(),
                    record.actor,
                    record.stage,
                )));
            }
            let expected = sha256_digest(&CanonicalBytes::new(&record.payload)?);
            if expected != record.payload_digest {
                return Ok(AuthenticityVerdict::failed(format!(
                    "stage {} payload does not match its recorded digest",
                    record.stage,
                )));
            }
        }
        Ok(AuthenticityVerdict::authentic())
    }
}
