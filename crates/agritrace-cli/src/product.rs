//! # Product Subcommand
//!
//! Product lifecycle: create at Farm, advance stage by stage, show.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use agritrace_core::{EntityId, StakeholderId};
use agritrace_ledger::{BatchInfo, ProductDraft, ProductStage, StagePayload};

use crate::state::LedgerState;

/// Arguments for the product subcommand.
#[derive(Args, Debug)]
pub struct ProductArgs {
    /// Product operation to perform.
    #[command(subcommand)]
    pub command: ProductCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    /// Create a product at the Farm stage (farmer-only).
    Create {
        /// Acting farmer identity.
        #[arg(long)]
        caller: String,
        /// Product name.
        #[arg(long)]
        name: String,
        /// Free-form description.
        #[arg(long, default_value = "")]
        description: String,
        /// Producer-assigned batch code.
        #[arg(long)]
        batch_code: String,
        /// Farm of origin.
        #[arg(long)]
        origin_farm: String,
        /// Where the harvest was recorded.
        #[arg(long)]
        location: String,
        /// Harvest details for the Farm stage record.
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Advance a product to its next stage (role-gated by target).
    Advance {
        /// Acting stakeholder identity.
        #[arg(long)]
        caller: String,
        /// Product entity id.
        #[arg(long)]
        id: u64,
        /// Target stage: processing, distribution, retail, consumed.
        #[arg(long)]
        stage: String,
        /// Where the stage action took place.
        #[arg(long)]
        location: String,
        /// Stage details for the record.
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Show a product record.
    Show {
        /// Product entity id.
        #[arg(long)]
        id: u64,
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Dispatch a product operation. Returns true if state was mutated.
pub fn run(args: ProductArgs, state: &mut LedgerState) -> Result<bool> {
    match args.command {
        ProductCommand::Create {
            caller,
            name,
            description,
            batch_code,
            origin_farm,
            location,
            details,
        } => {
            let caller = StakeholderId::new(caller)?;
            let id = state.ledger.create_product(
                &state.registry,
                &caller,
                ProductDraft {
                    name,
                    description,
                    batch: BatchInfo {
                        batch_code,
                        origin_farm,
                    },
                    payload: StagePayload { location, details },
                },
            )?;
            state.registry.record_activity(&caller);
            tracing::info!(%id, "product created");
            println!("created {id}");
            Ok(true)
        }
        ProductCommand::Advance {
            caller,
            id,
            stage,
            location,
            details,
        } => {
            let caller = StakeholderId::new(caller)?;
            let id = EntityId::new(id)?;
            let target: ProductStage = stage.parse()?;
            let reached = state.ledger.advance_product(
                &state.registry,
                &caller,
                id,
                target,
                StagePayload { location, details },
            )?;
            state.registry.record_activity(&caller);
            tracing::info!(%id, stage = %reached, "product advanced");
            println!("{id} now at {reached}");
            Ok(true)
        }
        ProductCommand::Show { id, json } => {
            let id = EntityId::new(id)?;
            let Some(product) = state.ledger.product(id) else {
                bail!("product {id} not found");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(product)?);
            } else {
                let retired = if product.is_consumed() { "  [retired]" } else { "" };
                println!(
                    "{}  {}  batch {}  stage {}  {} stage record(s){}",
                    product.id,
                    product.name,
                    product.batch.batch_code,
                    product.current_stage,
                    product.stages.len(),
                    retired
                );
            }
            Ok(false)
        }
    }
}
