//! # Audit Subcommand
//!
//! Append audit notes to products or shipments, and read an entity's
//! audit trail.

use anyhow::Result;
use clap::{Args, Subcommand};

use agritrace_core::{EntityId, StakeholderId};
use agritrace_verify::perform_audit;

use crate::state::LedgerState;

/// Arguments for the audit subcommand.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Audit operation to perform.
    #[command(subcommand)]
    pub command: AuditCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuditCommand {
    /// Append an audit note to a product or shipment.
    Add {
        /// Acting stakeholder identity (any active, registered party).
        #[arg(long)]
        caller: String,
        /// Entity id of the product or shipment.
        #[arg(long)]
        entity: u64,
        /// The audit note (required, non-blank).
        #[arg(long)]
        note: String,
    },
    /// Print an entity's audit trail, oldest first.
    Trail {
        /// Entity id of the product or shipment.
        #[arg(long)]
        entity: u64,
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Dispatch an audit operation. Returns true if state was mutated.
pub fn run(args: AuditArgs, state: &mut LedgerState) -> Result<bool> {
    match args.command {
        AuditCommand::Add {
            caller,
            entity,
            note,
        } => {
            let caller = StakeholderId::new(caller)?;
            let entity = EntityId::new(entity)?;
            perform_audit(
                &state.registry,
                state.ledger.store_mut(),
                &caller,
                entity,
                &note,
            )?;
            state.registry.record_activity(&caller);
            tracing::info!(%entity, "audit note appended");
            Ok(true)
        }
        AuditCommand::Trail { entity, json } => {
            use agritrace_ledger::LedgerStore;
            let entity = EntityId::new(entity)?;
            let trail = state.ledger.store().audit_trail(entity);
            if json {
                println!("{}", serde_json::to_string_pretty(trail)?);
            } else {
                for record in trail {
                    println!("{}  {}  {}", record.recorded_at, record.actor, record.note);
                }
            }
            Ok(false)
        }
    }
}
