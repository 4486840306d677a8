//! # Stakeholder Subcommand
//!
//! Registry administration: register, deactivate, reactivate, update,
//! list. All mutations are admin-gated by the registry itself; the CLI
//! only parses and forwards.

use anyhow::Result;
use clap::{Args, Subcommand};

use agritrace_core::{LicenseNumber, Role, StakeholderId};
use agritrace_registry::{NewStakeholder, StakeholderUpdate};

use crate::state::LedgerState;

/// Arguments for the stakeholder subcommand.
#[derive(Args, Debug)]
pub struct StakeholderArgs {
    /// Stakeholder operation to perform.
    #[command(subcommand)]
    pub command: StakeholderCommand,
}

#[derive(Subcommand, Debug)]
pub enum StakeholderCommand {
    /// Register a new stakeholder (admin-only).
    Register {
        /// Acting admin identity.
        #[arg(long)]
        caller: String,
        /// Identity to register.
        #[arg(long)]
        identity: String,
        /// Role: farmer, processor, distributor, retailer, admin.
        #[arg(long)]
        role: String,
        /// Business name.
        #[arg(long)]
        name: String,
        /// Business license number (globally unique).
        #[arg(long)]
        license: String,
        /// Business location.
        #[arg(long)]
        location: String,
        /// Certification held (repeatable).
        #[arg(long = "certification")]
        certifications: Vec<String>,
    },
    /// Deactivate a stakeholder (admin-only).
    Deactivate {
        /// Acting admin identity.
        #[arg(long)]
        caller: String,
        /// Identity to deactivate.
        #[arg(long)]
        identity: String,
    },
    /// Reactivate a deactivated stakeholder (admin-only).
    Reactivate {
        /// Acting admin identity.
        #[arg(long)]
        caller: String,
        /// Identity to reactivate.
        #[arg(long)]
        identity: String,
    },
    /// Update business name, location, and certifications (admin-only).
    Update {
        /// Acting admin identity.
        #[arg(long)]
        caller: String,
        /// Identity to update.
        #[arg(long)]
        identity: String,
        /// New business name.
        #[arg(long)]
        name: String,
        /// New location.
        #[arg(long)]
        location: String,
        /// Replacement certification (repeatable).
        #[arg(long = "certification")]
        certifications: Vec<String>,
    },
    /// List all stakeholders.
    List {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Dispatch a stakeholder operation. Returns true if state was mutated.
pub fn run(args: StakeholderArgs, state: &mut LedgerState) -> Result<bool> {
    match args.command {
        StakeholderCommand::Register {
            caller,
            identity,
            role,
            name,
            license,
            location,
            certifications,
        } => {
            let caller = StakeholderId::new(caller)?;
            let role: Role = role.parse()?;
            state.registry.register(
                &caller,
                NewStakeholder {
                    identity: StakeholderId::new(identity)?,
                    role,
                    business_name: name,
                    license: LicenseNumber::new(license)?,
                    location,
                    certifications,
                },
            )?;
            tracing::info!(%role, "stakeholder registered");
            Ok(true)
        }
        StakeholderCommand::Deactivate { caller, identity } => {
            let caller = StakeholderId::new(caller)?;
            let identity = StakeholderId::new(identity)?;
            state.registry.deactivate(&caller, &identity)?;
            tracing::info!(%identity, "stakeholder deactivated");
            Ok(true)
        }
        StakeholderCommand::Reactivate { caller, identity } => {
            let caller = StakeholderId::new(caller)?;
            let identity = StakeholderId::new(identity)?;
            state.registry.reactivate(&caller, &identity)?;
            tracing::info!(%identity, "stakeholder reactivated");
            Ok(true)
        }
        StakeholderCommand::Update {
            caller,
            identity,
            name,
            location,
            certifications,
        } => {
            let caller = StakeholderId::new(caller)?;
            let identity = StakeholderId::new(identity)?;
            state.registry.update_info(
                &caller,
                &identity,
                StakeholderUpdate {
                    business_name: name,
                    location,
                    certifications,
                },
            )?;
            Ok(true)
        }
        StakeholderCommand::List { json } => {
            if json {
                let all: Vec<_> = state.registry.iter().collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for s in state.registry.iter() {
                    let status = if s.active { "active" } else { "inactive" };
                    println!(
                        "{}  {}  {}  {}  [{}]",
                        s.identity, s.role, s.business_name, s.license, status
                    );
                }
            }
            Ok(false)
        }
    }
}
