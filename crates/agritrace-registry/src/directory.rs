//! # Stakeholder Directory — Read-Only Lookup Seam
//!
//! The trait through which the lifecycle machines and the verification
//! engine consult the identity registry. Implementations must answer from
//! current state on every call; callers never cache the answers.

use agritrace_core::{Role, StakeholderId};

use crate::stakeholder::Stakeholder;

/// Read-only stakeholder lookup.
///
/// [`crate::StakeholderRegistry`] is the production implementation; tests
/// may substitute a fixture. All default methods derive from `get` so an
/// implementation cannot give inconsistent answers.
pub trait StakeholderDirectory {
    /// The current record for an identity, if registered.
    fn get(&self, identity: &StakeholderId) -> Option<&Stakeholder>;

    /// Whether the identity has ever been registered (active or not).
    fn is_registered(&self, identity: &StakeholderId) -> bool {
        self.get(identity).is_some()
    }

    /// Whether the identity is registered and currently active.
    fn is_active(&self, identity: &StakeholderId) -> bool {
        self.get(identity).map(|s| s.active).unwrap_or(false)
    }

    /// Whether the identity currently holds the given role.
    ///
    /// Activity-gated: returns false for inactive stakeholders even when
    /// the stored role matches.
    fn has_role(&self, identity: &StakeholderId, role: Role) -> bool {
        self.get(identity)
            .map(|s| s.active && s.role == role)
            .unwrap_or(false)
    }
}
