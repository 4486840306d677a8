//! # agritrace-core — Foundational Types for the AgriTrace Provenance Stack
//!
//! This crate is the bedrock of the AgriTrace Stack. It defines the core
//! type-system primitives the rest of the workspace builds on. Every other
//! crate in the workspace depends on `agritrace-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `StakeholderId`,
//!    `EntityId`, `TrackingNumber`, `LicenseNumber` — all newtypes with
//!    validated constructors. No bare strings for identifiers.
//!
//! 2. **Single `Role` enum.** One definition, five variants, exhaustive
//!    `match` everywhere. Adding a role forces every consumer to handle it.
//!
//! 3. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!    This prevents canonicalization-split defects by construction.
//!
//! 4. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision.
//!
//! 5. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that all digest paths flow through canonicalization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `agritrace-*` crates (this is the leaf of
//!   the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod role;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{EntityId, EntityKind, LicenseNumber, StakeholderId, TrackingNumber};
pub use role::{Role, ROLE_COUNT};
pub use temporal::Timestamp;
