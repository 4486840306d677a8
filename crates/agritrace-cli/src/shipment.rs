//! # Shipment Subcommand
//!
//! Shipment lifecycle: create, update status, cancel, show.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use agritrace_core::{EntityId, StakeholderId, TrackingNumber};
use agritrace_ledger::{ShipmentDraft, ShipmentStatus, StatusNote, TransportMode};

use crate::state::LedgerState;

/// Arguments for the shipment subcommand.
#[derive(Args, Debug)]
pub struct ShipmentArgs {
    /// Shipment operation to perform.
    #[command(subcommand)]
    pub command: ShipmentCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShipmentCommand {
    /// Create a shipment for a product (distributor-only).
    Create {
        /// Acting distributor identity; becomes the sender.
        #[arg(long)]
        caller: String,
        /// Product entity id to ship.
        #[arg(long)]
        product: u64,
        /// Receiving stakeholder identity.
        #[arg(long)]
        receiver: String,
        /// Globally unique tracking number.
        #[arg(long)]
        tracking: String,
        /// Transport mode: truck, rail, sea, air.
        #[arg(long, default_value = "truck")]
        mode: String,
        /// Note for the creation history entry.
        #[arg(long, default_value = "")]
        note: String,
        /// Where the shipment was created.
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Transition a shipment to a new status (sender-only).
    Update {
        /// Acting sender identity.
        #[arg(long)]
        caller: String,
        /// Shipment entity id.
        #[arg(long)]
        id: u64,
        /// Target status: preparing, shipped, delivered, verified,
        /// cancelled, unable_to_deliver.
        #[arg(long)]
        status: String,
        /// Note for the history entry.
        #[arg(long, default_value = "")]
        note: String,
        /// Where the update was recorded.
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Cancel a shipment with a mandatory reason (sender-only).
    Cancel {
        /// Acting sender identity.
        #[arg(long)]
        caller: String,
        /// Shipment entity id.
        #[arg(long)]
        id: u64,
        /// Reason for the cancellation (required, non-blank).
        #[arg(long)]
        reason: String,
        /// Where the cancellation was recorded.
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Show a shipment record with its history.
    Show {
        /// Shipment entity id.
        #[arg(long)]
        id: u64,
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Dispatch a shipment operation. Returns true if state was mutated.
pub fn run(args: ShipmentArgs, state: &mut LedgerState) -> Result<bool> {
    match args.command {
        ShipmentCommand::Create {
            caller,
            product,
            receiver,
            tracking,
            mode,
            note,
            location,
        } => {
            let caller = StakeholderId::new(caller)?;
            let mode: TransportMode = mode.parse()?;
            let id = state.ledger.create_shipment(
                &state.registry,
                &caller,
                ShipmentDraft {
                    product: EntityId::new(product)?,
                    receiver: StakeholderId::new(receiver)?,
                    tracking_number: TrackingNumber::new(tracking)?,
                    transport_mode: mode,
                    note: StatusNote { note, location },
                },
            )?;
            state.registry.record_activity(&caller);
            tracing::info!(%id, "shipment created");
            println!("created {id}");
            Ok(true)
        }
        ShipmentCommand::Update {
            caller,
            id,
            status,
            note,
            location,
        } => {
            let caller = StakeholderId::new(caller)?;
            let id = EntityId::new(id)?;
            let target: ShipmentStatus = status.parse()?;
            let reached = state.ledger.update_shipment_status(
                &state.registry,
                &caller,
                id,
                target,
                StatusNote { note, location },
            )?;
            state.registry.record_activity(&caller);
            tracing::info!(%id, status = %reached, "shipment updated");
            println!("{id} now {reached}");
            Ok(true)
        }
        ShipmentCommand::Cancel {
            caller,
            id,
            reason,
            location,
        } => {
            let caller = StakeholderId::new(caller)?;
            let id = EntityId::new(id)?;
            state
                .ledger
                .cancel_shipment(&state.registry, &caller, id, &reason, &location)?;
            state.registry.record_activity(&caller);
            tracing::info!(%id, "shipment cancelled");
            println!("{id} cancelled");
            Ok(true)
        }
        ShipmentCommand::Show { id, json } => {
            let id = EntityId::new(id)?;
            let Some(shipment) = state.ledger.shipment(id) else {
                bail!("shipment {id} not found");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(shipment)?);
            } else {
                println!(
                    "{}  {} -> {}  tracking {}  {}  [{}]",
                    shipment.id,
                    shipment.sender,
                    shipment.receiver,
                    shipment.tracking_number,
                    shipment.transport_mode,
                    shipment.status
                );
                for entry in &shipment.history {
                    println!("  {}  {}  {}", entry.timestamp, entry.status, entry.note);
                }
            }
            Ok(false)
        }
    }
}
