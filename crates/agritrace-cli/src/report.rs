//! # Report Subcommand
//!
//! Traceability reports, plain or with the governing shipment history.
//! Pure reads; never saves state.

use anyhow::Result;
use clap::Args;

use agritrace_core::EntityId;
use agritrace_verify::{TraceabilityReport, VerificationEngine};

use crate::state::LedgerState;

/// Arguments for the report subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Product entity id.
    #[arg(long)]
    pub product: u64,
    /// Include the governing shipment's full history.
    #[arg(long)]
    pub complete: bool,
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// Assemble and print a traceability report.
pub fn run(args: ReportArgs, state: &LedgerState) -> Result<()> {
    let engine = VerificationEngine::new(&state.registry, state.ledger.store());
    let product = EntityId::new(args.product)?;

    if args.complete {
        let complete = engine.complete_traceability_report(product)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&complete)?);
        } else {
            print_report(&complete.report);
            match complete.shipment {
                Some(shipment) => {
                    println!(
                        "shipment {}  tracking {}  [{}]",
                        shipment.id, shipment.tracking_number, shipment.status
                    );
                    for entry in &shipment.history {
                        println!("  {}  {}  {}", entry.timestamp, entry.status, entry.note);
                    }
                }
                None => println!("no shipment"),
            }
        }
    } else {
        let report = engine.traceability_report(product)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
    }
    Ok(())
}

fn print_report(report: &TraceabilityReport) {
    println!(
        "{}  {}  batch {}  stage {}  fully traced: {}",
        report.product,
        report.name,
        report.batch.batch_code,
        report.current_stage,
        report.is_fully_traced
    );
    for slot in &report.stages {
        match &slot.trace {
            Some(trace) => {
                let known = match &trace.stakeholder {
                    Some(s) if s.active => "active",
                    Some(_) => "inactive",
                    None => "unknown",
                };
                println!(
                    "  {:<12} {}  [{}]  {}  {}",
                    slot.stage.to_string(),
                    trace.actor,
                    known,
                    trace.recorded_at,
                    trace.payload.location
                );
            }
            None => println!("  {:<12} -", slot.stage.to_string()),
        }
    }
}
