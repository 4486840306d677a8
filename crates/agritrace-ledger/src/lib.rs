//! # agritrace-ledger — Lifecycle Core
//!
//! Implements the entity index and the two role-gated state machines of
//! the AgriTrace Stack, plus the repository seam they are persisted
//! through.
//!
//! ## State Machines
//!
//! - **Product** (`product.rs`): linear stages
//!   Farm → Processing → Distribution → Retail → Consumed. No branches,
//!   no reverse edges, no skips. Each transition requires the role
//!   matching the *target* stage.
//!
//! - **Shipment** (`shipment.rs`): custody movement between two
//!   stakeholders with a fixed transition graph, absorbing terminal
//!   states, and an append-only status history.
//!
//! ## Storage
//!
//! The core never owns a process-wide store. [`Ledger`] is generic over
//! the [`LedgerStore`] repository trait; [`MemoryLedger`] is the
//! in-memory implementation used by the CLI and by tests. The
//! environment applying mutations guarantees atomic, totally-ordered
//! application, so the store needs no internal locking.
//!
//! ## Guard Ordering
//!
//! Every mutation runs all of its guards before its first write. A
//! failed call leaves the store byte-identical to before the call.

pub mod index;
pub mod ledger;
pub mod product;
pub mod shipment;
pub mod store;

// ─── Index re-exports ───────────────────────────────────────────────

pub use index::{EntityIndex, IndexError};

// ─── Product re-exports ─────────────────────────────────────────────

pub use product::{
    BatchInfo, Product, ProductDraft, ProductError, ProductStage, StagePayload, StageRecord,
};

// ─── Shipment re-exports ────────────────────────────────────────────

pub use shipment::{
    Shipment, ShipmentDraft, ShipmentError, ShipmentStatus, StatusEntry, StatusNote, TransportMode,
};

// ─── Store and service re-exports ───────────────────────────────────

pub use ledger::{Ledger, LedgerConfig};
pub use store::{AuditRecord, LedgerStore, MemoryLedger};
