//! # agritrace-cli — AgriTrace Command-Line Interface
//!
//! Structured clap-based CLI over the registry, ledger, and
//! verification engine.
//!
//! ## Subcommands
//!
//! - `init` — Create a state file seeded with the root admin
//! - `stakeholder` — Register, deactivate, reactivate, update, list
//! - `product` — Create and advance products through their stages
//! - `shipment` — Create, update, and cancel shipments
//! - `verify` — Authenticity and supply-chain verdicts
//! - `report` — Traceability reports
//! - `audit` — Append audit notes
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates — no business logic here.
//! - State is one JSON document, loaded at startup and saved only after
//!   the mutation succeeds; this supplies the atomic, totally-ordered
//!   mutation application the domain crates assume.

pub mod audit;
pub mod product;
pub mod report;
pub mod shipment;
pub mod stakeholder;
pub mod state;
pub mod verify;
