//! # agritrace-registry — Identity & Role Registry
//!
//! The permissioned identity layer of the AgriTrace Stack. Stakeholders
//! (farmers, processors, distributors, retailers, admins) are registered
//! here, and every lifecycle transition elsewhere in the stack re-checks
//! this registry before mutating anything.
//!
//! ## Invariants
//!
//! - One record per identity; one identity per license (globally unique).
//! - Role is immutable post-registration.
//! - Only an active Admin may register, deactivate, reactivate, or edit.
//! - Records are never deleted — deactivation is reversible, not
//!   destructive.
//! - `has_role` is activity-gated: an inactive stakeholder holds no role,
//!   even though the stored role is unchanged.
//!
//! ## Seams
//!
//! Downstream crates depend on the read-only [`StakeholderDirectory`]
//! trait, not on `StakeholderRegistry` directly. The lifecycle machines
//! take `&dyn StakeholderDirectory`, which keeps them unit-testable with
//! a fixture directory and keeps all registry writes in one place.

pub mod directory;
pub mod stakeholder;

pub use directory::StakeholderDirectory;
pub use stakeholder::{
    NewStakeholder, RegistryError, Stakeholder, StakeholderRegistry, StakeholderUpdate,
};
