//! # agritrace CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules. The state
//! file is loaded before dispatch and saved only when a handler reports
//! a successful mutation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use agritrace_cli::state::LedgerState;
use agritrace_core::{LicenseNumber, StakeholderId};
use agritrace_ledger::LedgerConfig;

/// AgriTrace Provenance Stack CLI.
///
/// Administers the stakeholder registry, moves products and shipments
/// through their lifecycles, and runs live verification and
/// traceability queries over a JSON state file.
#[derive(Parser, Debug)]
#[command(name = "agritrace", version, about)]
struct Cli {
    /// Path to the JSON state file.
    #[arg(long, global = true, default_value = "agritrace.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Create a state file seeded with the root admin.
    Init {
        /// Root admin identity.
        #[arg(long)]
        admin: String,
        /// Admin business name.
        #[arg(long)]
        name: String,
        /// Admin license number.
        #[arg(long)]
        license: String,
        /// Admin location.
        #[arg(long)]
        location: String,
        /// Allow shipments to unregistered receivers.
        #[arg(long)]
        allow_unregistered_receivers: bool,
    },
    /// Registry administration.
    Stakeholder(agritrace_cli::stakeholder::StakeholderArgs),
    /// Product lifecycle operations.
    Product(agritrace_cli::product::ProductArgs),
    /// Shipment lifecycle operations.
    Shipment(agritrace_cli::shipment::ShipmentArgs),
    /// Live verification queries.
    Verify(agritrace_cli::verify::VerifyArgs),
    /// Traceability reports.
    Report(agritrace_cli::report::ReportArgs),
    /// Audit trail operations.
    Audit(agritrace_cli::audit::AuditArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            admin,
            name,
            license,
            location,
            allow_unregistered_receivers,
        } => {
            if cli.state.exists() {
                bail!("state file {} already exists", cli.state.display());
            }
            let state = LedgerState::bootstrap(
                StakeholderId::new(admin)?,
                &name,
                LicenseNumber::new(license)?,
                &location,
                LedgerConfig {
                    require_registered_receiver: !allow_unregistered_receivers,
                },
            )?;
            state.save(&cli.state)?;
            println!("initialized {}", cli.state.display());
            Ok(())
        }
        command => {
            let mut state = LedgerState::load(&cli.state)
                .with_context(|| "run `agritrace init` to create a state file")?;

            let mutated = match command {
                Commands::Init { .. } => false,
                Commands::Stakeholder(args) => agritrace_cli::stakeholder::run(args, &mut state)?,
                Commands::Product(args) => agritrace_cli::product::run(args, &mut state)?,
                Commands::Shipment(args) => agritrace_cli::shipment::run(args, &mut state)?,
                Commands::Verify(args) => {
                    agritrace_cli::verify::run(args, &state)?;
                    false
                }
                Commands::Report(args) => {
                    agritrace_cli::report::run(args, &state)?;
                    false
                }
                Commands::Audit(args) => agritrace_cli::audit::run(args, &mut state)?,
            };

            if mutated {
                state.save(&cli.state)?;
            }
            Ok(())
        }
    }
}
