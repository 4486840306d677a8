//! # Stakeholder Registry
//!
//! Registration, activation state, and info management for supply-chain
//! participants, plus the license uniqueness index.
//!
//! ## Design
//!
//! The registry owns two maps:
//!
//! - `stakeholders`: identity → record (the table of record).
//! - `license_index`: license → identity (the uniqueness index).
//!
//! Both are written only by the admin-gated mutators in this module, and
//! every guard runs before any write — a failed call leaves both maps
//! untouched. Records are never removed from either map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use agritrace_core::{LicenseNumber, Role, StakeholderId, Timestamp};

use crate::directory::StakeholderDirectory;

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors that can occur during registry operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The caller is not an active Admin.
    #[error("caller {caller} is not an active admin")]
    NotAuthorized {
        /// The identity that attempted the operation.
        caller: StakeholderId,
    },

    /// The identity is already registered.
    #[error("identity {identity} is already registered")]
    DuplicateIdentity {
        /// The colliding identity.
        identity: StakeholderId,
    },

    /// The license is already bound to another identity.
    #[error("license {license} is already bound to {holder}")]
    DuplicateLicense {
        /// The colliding license.
        license: LicenseNumber,
        /// The identity that already holds it.
        holder: StakeholderId,
    },

    /// The identity has never been registered.
    #[error("stakeholder {identity} is not registered")]
    UnknownStakeholder {
        /// The unknown identity.
        identity: StakeholderId,
    },

    /// Reactivation target is already active.
    #[error("stakeholder {identity} is already active")]
    AlreadyActive {
        /// The target identity.
        identity: StakeholderId,
    },

    /// Deactivation or edit target is not active.
    #[error("stakeholder {identity} is not active")]
    NotActive {
        /// The target identity.
        identity: StakeholderId,
    },

    /// A required field was empty.
    #[error("required field {field:?} is empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
}

// ─── Records ─────────────────────────────────────────────────────────

/// A registered supply-chain participant.
///
/// Created once by [`StakeholderRegistry::register`]; mutated by info
/// edits, activity touches, and activation toggles; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakeholder {
    /// Globally unique identity.
    pub identity: StakeholderId,
    /// Role, immutable post-registration.
    pub role: Role,
    /// Registered business name.
    pub business_name: String,
    /// Globally unique business license.
    pub license: LicenseNumber,
    /// Business location.
    pub location: String,
    /// Certifications held (e.g., organic, fair-trade).
    pub certifications: Vec<String>,
    /// Whether the stakeholder is currently active.
    pub active: bool,
    /// When the stakeholder was registered.
    pub registered_at: Timestamp,
    /// When the stakeholder last acted or was last administered.
    pub last_activity: Timestamp,
}

/// Input for registering a new stakeholder.
#[derive(Debug, Clone)]
pub struct NewStakeholder {
    /// Identity to register.
    pub identity: StakeholderId,
    /// Role, fixed for the lifetime of the record.
    pub role: Role,
    /// Business name (required, non-empty).
    pub business_name: String,
    /// Business license (globally unique).
    pub license: LicenseNumber,
    /// Business location (required, non-empty).
    pub location: String,
    /// Certifications held.
    pub certifications: Vec<String>,
}

/// Editable stakeholder fields. Role and license are immutable.
#[derive(Debug, Clone)]
pub struct StakeholderUpdate {
    /// New business name (required, non-empty).
    pub business_name: String,
    /// New location (required, non-empty).
    pub location: String,
    /// Replacement certification list.
    pub certifications: Vec<String>,
}

// ─── Registry ────────────────────────────────────────────────────────

/// The identity and role registry.
///
/// Constructed via [`StakeholderRegistry::bootstrap`], which seeds the
/// root Admin — there is no path to an admin-less registry, and no path
/// to admin rights other than registration by an existing admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholderRegistry {
    stakeholders: BTreeMap<StakeholderId, Stakeholder>,
    license_index: BTreeMap<LicenseNumber, StakeholderId>,
}

impl StakeholderRegistry {
    /// Create a registry seeded with its root Admin record.
    pub fn bootstrap(
        identity: StakeholderId,
        business_name: impl Into<String>,
        license: LicenseNumber,
        location: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let business_name = business_name.into();
        let location = location.into();
        require_nonempty(&business_name, "business name")?;
        require_nonempty(&location, "location")?;

        let now = Timestamp::now();
        let admin = Stakeholder {
            identity: identity.clone(),
            role: Role::Admin,
            business_name,
            license: license.clone(),
            location,
            certifications: Vec::new(),
            active: true,
            registered_at: now,
            last_activity: now,
        };

        let mut stakeholders = BTreeMap::new();
        stakeholders.insert(identity.clone(), admin);
        let mut license_index = BTreeMap::new();
        license_index.insert(license, identity);

        Ok(Self {
            stakeholders,
            license_index,
        })
    }

    /// Register a new stakeholder. Admin-only.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` — caller is not an active Admin.
    /// - `DuplicateIdentity` — identity already registered (active or not).
    /// - `DuplicateLicense` — license already bound to another identity.
    /// - `EmptyField` — business name or location is blank.
    pub fn register(
        &mut self,
        caller: &StakeholderId,
        new: NewStakeholder,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        require_nonempty(&new.business_name, "business name")?;
        require_nonempty(&new.location, "location")?;

        if self.stakeholders.contains_key(&new.identity) {
            return Err(RegistryError::DuplicateIdentity {
                identity: new.identity,
            });
        }
        if let Some(holder) = self.license_index.get(&new.license) {
            return Err(RegistryError::DuplicateLicense {
                license: new.license,
                holder: holder.clone(),
            });
        }

        let now = Timestamp::now();
        let record = Stakeholder {
            identity: new.identity.clone(),
            role: new.role,
            business_name: new.business_name,
            license: new.license.clone(),
            location: new.location,
            certifications: new.certifications,
            active: true,
            registered_at: now,
            last_activity: now,
        };
        self.license_index.insert(new.license, new.identity.clone());
        self.stakeholders.insert(new.identity, record);
        self.touch(caller);
        Ok(())
    }

    /// Deactivate a stakeholder. Admin-only; reversible.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` — caller is not an active Admin.
    /// - `UnknownStakeholder` — target was never registered.
    /// - `NotActive` — target is already inactive.
    pub fn deactivate(
        &mut self,
        caller: &StakeholderId,
        target: &StakeholderId,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        let record = self.require_record_mut(target)?;
        if !record.active {
            return Err(RegistryError::NotActive {
                identity: target.clone(),
            });
        }
        record.active = false;
        record.last_activity = Timestamp::now();
        self.touch(caller);
        Ok(())
    }

    /// Reactivate a previously deactivated stakeholder. Admin-only.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` — caller is not an active Admin.
    /// - `UnknownStakeholder` — target was never registered.
    /// - `AlreadyActive` — target is already active.
    pub fn reactivate(
        &mut self,
        caller: &StakeholderId,
        target: &StakeholderId,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        let record = self.require_record_mut(target)?;
        if record.active {
            return Err(RegistryError::AlreadyActive {
                identity: target.clone(),
            });
        }
        record.active = true;
        record.last_activity = Timestamp::now();
        self.touch(caller);
        Ok(())
    }

    /// Edit a stakeholder's business info. Admin-only; the target must be
    /// active. Role and license cannot be changed.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` — caller is not an active Admin.
    /// - `UnknownStakeholder` — target was never registered.
    /// - `NotActive` — target is inactive.
    /// - `EmptyField` — business name or location is blank.
    pub fn update_info(
        &mut self,
        caller: &StakeholderId,
        target: &StakeholderId,
        update: StakeholderUpdate,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        require_nonempty(&update.business_name, "business name")?;
        require_nonempty(&update.location, "location")?;

        let record = self.require_record_mut(target)?;
        if !record.active {
            return Err(RegistryError::NotActive {
                identity: target.clone(),
            });
        }
        record.business_name = update.business_name;
        record.location = update.location;
        record.certifications = update.certifications;
        record.last_activity = Timestamp::now();
        self.touch(caller);
        Ok(())
    }

    /// Stamp `last_activity` on an identity after it performs a lifecycle
    /// operation elsewhere in the stack. No-op for unknown identities.
    pub fn record_activity(&mut self, identity: &StakeholderId) {
        self.touch(identity);
    }

    /// Iterate all records in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &Stakeholder> {
        self.stakeholders.values()
    }

    /// Number of registered stakeholders (active and inactive).
    pub fn len(&self) -> usize {
        self.stakeholders.len()
    }

    /// Whether the registry holds no records. Unreachable in practice —
    /// bootstrap always seeds the root Admin.
    pub fn is_empty(&self) -> bool {
        self.stakeholders.is_empty()
    }

    /// Validate that the caller is an active Admin.
    fn require_admin(&self, caller: &StakeholderId) -> Result<(), RegistryError> {
        if !self.has_role(caller, Role::Admin) {
            return Err(RegistryError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn require_record_mut(
        &mut self,
        identity: &StakeholderId,
    ) -> Result<&mut Stakeholder, RegistryError> {
        self.stakeholders
            .get_mut(identity)
            .ok_or_else(|| RegistryError::UnknownStakeholder {
                identity: identity.clone(),
            })
    }

    fn touch(&mut self, identity: &StakeholderId) {
        if let Some(record) = self.stakeholders.get_mut(identity) {
            record.last_activity = Timestamp::now();
        }
    }
}

impl StakeholderDirectory for StakeholderRegistry {
    fn get(&self, identity: &StakeholderId) -> Option<&Stakeholder> {
        self.stakeholders.get(identity)
    }
}

fn require_nonempty(value: &str, field: &'static str) -> Result<(), RegistryError> {
    if value.trim().is_empty() {
        return Err(RegistryError::EmptyField { field });
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────
