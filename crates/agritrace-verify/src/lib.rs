//! # agritrace-verify — Verification & Traceability Engine
//!
//! Stateless query layer over the registry and the ledger. Every
//! verdict is re-derived live at query time from current registry and
//! ledger state; nothing here caches a result or writes one back.
//!
//! Deactivating a stakeholder therefore retroactively invalidates every
//! product they touched, without any write to those products, and
//! reactivating them restores the verdicts.
//!
//! The one mutating operation is [`perform_audit`], which appends an
//! audit note to an entity's trail; it never alters lifecycle state.

pub mod audit;
#[cfg(test)]
pub(crate) mod testutil;
pub mod authenticity;
pub mod engine;
pub mod report;
pub mod supply_chain;

pub use audit::{perform_audit, AuditError};
pub use authenticity::AuthenticityVerdict;
pub use engine::{VerificationEngine, VerifyError};
pub use report::{CompleteTraceabilityReport, StageSlot, StageTrace, TraceabilityReport};
pub use supply_chain::SupplyChainVerdict;
