//! # Traceability Reports
//!
//! Reconstructed views of every actor and data point across a
//! product's lifecycle. A report always carries one slot per stage in
//! lifecycle order; unreached stages have empty slots.
//!
//! `is_fully_traced` quantifies over the stages *reached so far*: every
//! reached stage must have a recorded actor known to the registry. A
//! product that has only reached Farm is fully traced for that stage.
//! Trust accrues progressively as the product moves.

use serde::{Deserialize, Serialize};

use agritrace_core::{EntityId, StakeholderId, Timestamp};
use agritrace_ledger::{BatchInfo, LedgerStore, ProductStage, Shipment, StagePayload};
use agritrace_registry::Stakeholder;

use crate::engine::{VerificationEngine, VerifyError};

/// One reached stage: who acted, their current registry snapshot, and
/// what was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTrace {
    /// The identity recorded at the stage.
    pub actor: StakeholderId,
    /// Current registry snapshot for the actor; `None` if the identity
    /// is no longer known to the registry.
    pub stakeholder: Option<Stakeholder>,
    /// The payload recorded at the stage.
    pub payload: StagePayload,
    /// When the stage was entered.
    pub recorded_at: Timestamp,
}

/// One slot in the five-stage report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSlot {
    /// The lifecycle stage this slot describes.
    pub stage: ProductStage,
    /// The trace, if the product has reached the stage.
    pub trace: Option<StageTrace>,
}

/// Per-stage traceability view of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceabilityReport {
    /// The product.
    pub product: EntityId,
    /// Product name.
    pub name: String,
    /// Batch/farm data fixed at creation.
    pub batch: BatchInfo,
    /// Current lifecycle stage.
    pub current_stage: ProductStage,
    /// One slot per stage, lifecycle order.
    pub stages: Vec<StageSlot>,
    /// True iff every reached stage has an actor known to the registry.
    pub is_fully_traced: bool,
}

/// Traceability report plus the governing shipment's full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteTraceabilityReport {
    /// The per-stage product view.
    pub report: TraceabilityReport,
    /// The governing shipment, history included; `None` when the
    /// product has never been shipped.
    pub shipment: Option<Shipment>,
}

impl<S: LedgerStore> VerificationEngine<'_, S> {
    /// Assemble the per-stage traceability report for a product.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown product reference.
    pub fn traceability_report(
        &self,
        product: EntityId,
    ) -> Result<TraceabilityReport, VerifyError> {
        let record = self.product(product)?;

        let mut fully_traced = true;
        let stages = ProductStage::all_stages()
            .iter()
            .map(|&stage| {
                let trace = record.stage_record(stage).map(|r| {
                    if !self.stakeholder_known(&r.actor) {
                        fully_traced = false;
                    }
                    StageTrace {
                        actor: r.actor.clone(),
                        stakeholder: self.directory.get(&r.actor).cloned(),
                        payload: r.payload.clone(),
                        recorded_at: r.recorded_at,
                    }
                });
                StageSlot { stage, trace }
            })
            .collect();

        Ok(TraceabilityReport {
            product,
            name: record.name.clone(),
            batch: record.batch.clone(),
            current_stage: record.current_stage,
            stages,
            is_fully_traced: fully_traced,
        })
    }

    /// The traceability report plus the governing shipment history.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown product reference.
    pub fn complete_traceability_report(
        &self,
        product: EntityId,
    ) -> Result<CompleteTraceabilityReport, VerifyError> {
        let report = self.traceability_report(product)?;
        let shipment = self.governing_shipment(product).cloned();
        Ok(CompleteTraceabilityReport { report, shipment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ids, make_directory, make_ledger_with_product, make_shipment};

    #[test]
    fn test_farm_only_product_is_fully_traced() {
        let directory = make_directory();
        let (ledger, pid) = make_ledger_with_product(&directory, ProductStage::Farm);
        let engine = VerificationEngine::new(&directory, ledger.store());
        let report = engine.traceability_report(pid).unwrap();

        assert!(report.is_fully_traced);
        assert_eq!(report.current_stage, ProductStage::Farm);
        assert_eq!(report.stages.len(), 5);
        assert!(report.stages[0].trace.is_some());
        for slot in &report.stages[1..] {
            assert!(slot.trace.is_none());
        }
    }

    #[test]
    fn test_slots_follow_lifecycle_order() {
        let directory = make_directory();
        let (ledger, pid) = make_ledger_with_product(&directory, ProductStage::Distribution);
        let engine = VerificationEngine::new(&directory, ledger.store());
        let report = engine.traceability_report(pid).unwrap();

        let order: Vec<_> = report.stages.iter().map(|s| s.stage).collect();
        assert_eq!(order, ProductStage::all_stages().to_vec());
        assert_eq!(
            report.stages[1].trace.as_ref().unwrap().actor,
            ids::processor()
        );
        assert!(report.stages[3].trace.is_none());
    }

    #[test]
    fn test_deactivated_actor_still_traced_with_snapshot() {
        // Full tracing asks whether the actor is *known*, not active;
        // authenticity is the check that cares about active status.
        let mut directory = make_directory();
        let (ledger, pid) = make_ledger_with_product(&directory, ProductStage::Processing);
        directory.deactivate(&ids::admin(), &ids::farmer()).unwrap();

        let engine = VerificationEngine::new(&directory, ledger.store());
        let report = engine.traceability_report(pid).unwrap();
        assert!(report.is_fully_traced);
        let farm = report.stages[0].trace.as_ref().unwrap();
        assert!(!farm.stakeholder.as_ref().unwrap().active);
    }

    #[test]
    fn test_complete_report_includes_shipment_history() {
        let directory = make_directory();
        let (mut ledger, pid) = make_ledger_with_product(&directory, ProductStage::Processing);
        make_shipment(&mut ledger, &directory, pid, "T-1");

        let engine = VerificationEngine::new(&directory, ledger.store());
        let complete = engine.complete_traceability_report(pid).unwrap();
        let shipment = complete.shipment.unwrap();
        assert_eq!(shipment.history.len(), 1);
        assert_eq!(shipment.sender, ids::distributor());
    }

    #[test]
    fn test_complete_report_without_shipment() {
        let directory = make_directory();
        let (ledger, pid) = make_ledger_with_product(&directory, ProductStage::Farm);
        let engine = VerificationEngine::new(&directory, ledger.store());
        let complete = engine.complete_traceability_report(pid).unwrap();
        assert!(complete.shipment.is_none());
    }
}
