//! # Product Lifecycle State Machine
//!
//! Models the life of a product moving through the supply chain.
//!
//! ## Stages
//!
//! ```text
//! Farm ──▶ Processing ──▶ Distribution ──▶ Retail ──▶ Consumed (terminal)
//! ```
//!
//! Linear, forward-only, no skips. Each transition requires the caller to
//! hold the role matching the *target* stage and to be currently active
//! in the registry. The stage→role table is an exhaustive `match`, so
//! adding a stage forces the table to be extended at compile time.
//!
//! ## Provenance
//!
//! Each reached stage appends an immutable [`StageRecord`]: the acting
//! identity, the moment, the payload, and a canonical digest of the
//! payload. Stage data is never rewritten; reaching Consumed retires the
//! product logically without removing anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use agritrace_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest, EntityId, Role,
    StakeholderId, Timestamp,
};
use agritrace_registry::StakeholderDirectory;

// ─── Stages ──────────────────────────────────────────────────────────

/// The five ordered stages of a product's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProductStage {
    /// Product created at origin.
    Farm = 1,
    /// Raw product transformed by a processor.
    Processing = 2,
    /// Product in distribution between parties.
    Distribution = 3,
    /// Product on sale at a retailer.
    Retail = 4,
    /// Product sold to the end consumer (terminal).
    Consumed = 5,
}

impl ProductStage {
    /// The numeric stage order (1-5).
    pub fn order(&self) -> u8 {
        *self as u8
    }

    /// The next stage in the lifecycle, if any.
    pub fn next(&self) -> Option<ProductStage> {
        match self {
            Self::Farm => Some(Self::Processing),
            Self::Processing => Some(Self::Distribution),
            Self::Distribution => Some(Self::Retail),
            Self::Retail => Some(Self::Consumed),
            Self::Consumed => None,
        }
    }

    /// The role a caller must hold to move a product *into* this stage.
    ///
    /// There is no Consumer role; the retailer records the final sale.
    pub fn required_role(&self) -> Role {
        match self {
            Self::Farm => Role::Farmer,
            Self::Processing => Role::Processor,
            Self::Distribution => Role::Distributor,
            Self::Retail => Role::Retailer,
            Self::Consumed => Role::Retailer,
        }
    }

    /// Whether this is the terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Consumed)
    }

    /// All five stages in lifecycle order.
    pub fn all_stages() -> &'static [ProductStage] {
        &[
            Self::Farm,
            Self::Processing,
            Self::Distribution,
            Self::Retail,
            Self::Consumed,
        ]
    }

    /// Total number of stages.
    pub const STAGE_COUNT: u8 = 5;
}

impl std::fmt::Display for ProductStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Farm => "FARM",
            Self::Processing => "PROCESSING",
            Self::Distribution => "DISTRIBUTION",
            Self::Retail => "RETAIL",
            Self::Consumed => "CONSUMED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ProductStage {
    type Err = agritrace_core::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farm" => Ok(Self::Farm),
            "processing" => Ok(Self::Processing),
            "distribution" => Ok(Self::Distribution),
            "retail" => Ok(Self::Retail),
            "consumed" => Ok(Self::Consumed),
            other => Err(agritrace_core::CoreError::InvalidValue {
                what: "product stage",
                value: other.to_string(),
            }),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors that can occur during product lifecycle operations.
#[derive(Error, Debug)]
pub enum ProductError {
    /// The caller does not currently hold the role the target stage
    /// requires (wrong role, unregistered, or inactive).
    #[error("caller {caller} does not hold active role {required} required for stage {stage}")]
    NotAuthorized {
        /// The identity that attempted the transition.
        caller: StakeholderId,
        /// The role the target stage requires.
        required: Role,
        /// The attempted target stage.
        stage: ProductStage,
    },

    /// Attempted transition is not the single next stage (skip-ahead,
    /// regression, or repeat).
    #[error("invalid stage transition: {from} -> {to}")]
    InvalidStageTransition {
        /// Current stage.
        from: ProductStage,
        /// Attempted target stage.
        to: ProductStage,
    },

    /// The product has been retired at Consumed.
    #[error("product {id} is inactive")]
    ProductInactive {
        /// The product identifier.
        id: EntityId,
    },

    /// No product exists with this id.
    #[error("product {id} not found")]
    NotFound {
        /// The unknown identifier.
        id: EntityId,
    },

    /// A required field was empty.
    #[error("required field {field:?} is empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Stage payload could not be canonicalized for digesting.
    #[error("stage payload canonicalization failed: {0}")]
    Payload(#[from] CanonicalizationError),

    /// The entity index rejected the insertion.
    #[error("entity index error: {0}")]
    Index(#[from] crate::index::IndexError),
}

// ─── Stage Data ──────────────────────────────────────────────────────

/// Immutable per-stage provenance payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePayload {
    /// Where the stage action took place.
    pub location: String,
    /// Free-form stage details (harvest notes, process parameters, ...).
    pub details: String,
}

/// Batch/farm data fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInfo {
    /// Producer-assigned batch code.
    pub batch_code: String,
    /// The farm of origin.
    pub origin_farm: String,
}

/// Record of one reached stage: who, when, and what was recorded.
///
/// Append-only. The digest is computed over the payload at write time
/// and re-verified by the verification engine at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// The stage this record belongs to.
    pub stage: ProductStage,
    /// The identity that performed the transition.
    pub actor: StakeholderId,
    /// When the stage was recorded.
    pub recorded_at: Timestamp,
    /// The stage payload.
    pub payload: StagePayload,
    /// Canonical digest of the payload, for tamper evidence.
    pub payload_digest: ContentDigest,
}

/// Input for creating a new product.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    /// Product name (required, non-empty).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Batch code (required, non-empty) and origin farm.
    pub batch: BatchInfo,
    /// Payload for the Farm stage record.
    pub payload: StagePayload,
}

// ─── Product ─────────────────────────────────────────────────────────

/// A product with its lifecycle state and per-stage provenance records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Ledger-wide entity identifier.
    pub id: EntityId,
    /// Product name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Batch/farm data fixed at creation.
    pub batch: BatchInfo,
    /// Current lifecycle stage.
    pub current_stage: ProductStage,
    /// Insertion-ordered records of every reached stage.
    pub stages: Vec<StageRecord>,
    /// When the product was created.
    pub created_at: Timestamp,
    /// False once the product is retired at Consumed.
    pub is_active: bool,
}

impl Product {
    /// Create a new product at the Farm stage. Farmer-only.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` — caller is not an active Farmer.
    /// - `EmptyField` — name or batch code is blank.
    pub fn create(
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        id: EntityId,
        draft: ProductDraft,
    ) -> Result<Self, ProductError> {
        if !directory.has_role(caller, Role::Farmer) {
            return Err(ProductError::NotAuthorized {
                caller: caller.clone(),
                required: Role::Farmer,
                stage: ProductStage::Farm,
            });
        }
        require_nonempty(&draft.name, "name")?;
        require_nonempty(&draft.batch.batch_code, "batch code")?;

        let record = make_stage_record(ProductStage::Farm, caller, draft.payload)?;
        Ok(Self {
            id,
            name: draft.name,
            description: draft.description,
            batch: draft.batch,
            current_stage: ProductStage::Farm,
            stages: vec![record],
            created_at: Timestamp::now(),
            is_active: true,
        })
    }

    /// Advance the product to the given target stage.
    ///
    /// The target must be exactly the next stage in order, and the caller
    /// must currently hold the role the target stage requires.
    ///
    /// # Errors
    ///
    /// - `ProductInactive` — product already retired at Consumed.
    /// - `InvalidStageTransition` — skip-ahead, regression, or repeat.
    /// - `NotAuthorized` — caller lacks the active target-stage role.
    pub fn advance_to(
        &mut self,
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        target: ProductStage,
        payload: StagePayload,
    ) -> Result<ProductStage, ProductError> {
        if !self.is_active {
            return Err(ProductError::ProductInactive { id: self.id });
        }
        if self.current_stage.next() != Some(target) {
            return Err(ProductError::InvalidStageTransition {
                from: self.current_stage,
                to: target,
            });
        }
        let required = target.required_role();
        if !directory.has_role(caller, required) {
            return Err(ProductError::NotAuthorized {
                caller: caller.clone(),
                required,
                stage: target,
            });
        }

        let record = make_stage_record(target, caller, payload)?;
        self.stages.push(record);
        self.current_stage = target;
        if target.is_terminal() {
            // Logical retirement; the record itself is never removed.
            self.is_active = false;
        }
        Ok(target)
    }

    /// The record for a reached stage, if any.
    pub fn stage_record(&self, stage: ProductStage) -> Option<&StageRecord> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    /// Whether the product has been retired at Consumed.
    pub fn is_consumed(&self) -> bool {
        self.current_stage.is_terminal()
    }
}

fn make_stage_record(
    stage: ProductStage,
    actor: &StakeholderId,
    payload: StagePayload,
) -> Result<StageRecord, ProductError> {
    let digest = sha256_digest(&CanonicalBytes::new(&payload)?);
    Ok(StageRecord {
        stage,
        actor: actor.clone(),
        recorded_at: Timestamp::now(),
        payload,
        payload_digest: digest,
    })
}

fn require_nonempty(value: &str, field: &'static str) -> Result<(), ProductError> {
    if value.trim().is_empty() {
        return Err(ProductError::EmptyField { field });
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────
