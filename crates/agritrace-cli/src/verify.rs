//! # Verify Subcommand
//!
//! Live verification queries: product authenticity and the composite
//! supply-chain verdict. Pure reads; never saves state.

use anyhow::Result;
use clap::{Args, Subcommand};

use agritrace_core::EntityId;
use agritrace_verify::VerificationEngine;

use crate::state::LedgerState;

/// Arguments for the verify subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Verification query to run.
    #[command(subcommand)]
    pub command: VerifyCommand,
}

#[derive(Subcommand, Debug)]
pub enum VerifyCommand {
    /// Verify a product's authenticity against current registry state.
    Authenticity {
        /// Product entity id.
        #[arg(long)]
        product: u64,
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
    /// Verify the complete supply chain, shipment included.
    Chain {
        /// Product entity id.
        #[arg(long)]
        product: u64,
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Dispatch a verification query.
pub fn run(args: VerifyArgs, state: &LedgerState) -> Result<()> {
    let engine = VerificationEngine::new(&state.registry, state.ledger.store());
    match args.command {
        VerifyCommand::Authenticity { product, json } => {
            let verdict = engine.verify_product_authenticity(EntityId::new(product)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!(
                    "{}: {}",
                    if verdict.authentic { "AUTHENTIC" } else { "NOT AUTHENTIC" },
                    verdict.reason
                );
            }
        }
        VerifyCommand::Chain { product, json } => {
            let verdict = engine.verify_complete_supply_chain(EntityId::new(product)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                let status = verdict
                    .shipment_status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "no shipment".to_string());
                println!(
                    "{}: {} (shipment: {})",
                    if verdict.valid { "VALID" } else { "INVALID" },
                    verdict.reason,
                    status
                );
            }
        }
    }
    Ok(())
}
