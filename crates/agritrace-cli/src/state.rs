//! # State File
//!
//! The whole deployment is one JSON document: the stakeholder registry
//! plus the ledger. Each invocation loads it, applies at most one
//! mutation, and writes it back only if the mutation succeeded, so the
//! file never holds a partially-applied operation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use agritrace_core::{LicenseNumber, StakeholderId};
use agritrace_ledger::{Ledger, LedgerConfig};
use agritrace_registry::StakeholderRegistry;

/// The persisted deployment state.
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerState {
    /// Identity and role registry.
    pub registry: StakeholderRegistry,
    /// Entity ledger and configuration.
    pub ledger: Ledger,
}

impl LedgerState {
    /// Bootstrap a fresh state with its root admin.
    pub fn bootstrap(
        admin: StakeholderId,
        business_name: &str,
        license: LicenseNumber,
        location: &str,
        config: LedgerConfig,
    ) -> Result<Self> {
        let registry = StakeholderRegistry::bootstrap(admin, business_name, license, location)
            .context("bootstrapping registry")?;
        Ok(Self {
            registry,
            ledger: Ledger::in_memory(config),
        })
    }

    /// Load state from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading state file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing state file {}", path.display()))
    }

    /// Write state back as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("serializing state")?;
        fs::write(path, raw)
            .with_context(|| format!("writing state file {}", path.display()))?;
        Ok(())
    }
}
