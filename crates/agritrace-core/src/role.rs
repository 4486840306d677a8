//! # Stakeholder Role — Single Source of Truth
//!
//! Defines the `Role` enum with all five participant roles. This is the
//! ONE definition used across the entire stack. Every `match` on `Role`
//! must be exhaustive — adding a role forces every consumer to handle it
//! at compile time.
//!
//! ## Security Invariant
//!
//! A closed enum makes an out-of-range role unrepresentable inside the
//! core. "Invalid role" can only exist at the parse boundary, where it is
//! a structured error, never a silently-defaulted value.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// All participant roles in the AgriTrace Stack.
///
/// The four supply-chain roles correspond one-to-one with the stages a
/// Product passes through; `Admin` administers the identity registry and
/// holds no stage of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Grows and creates products (Farm stage).
    Farmer,
    /// Transforms raw products (Processing stage).
    Processor,
    /// Moves products between parties (Distribution stage, shipment sender).
    Distributor,
    /// Sells products to consumers (Retail stage).
    Retailer,
    /// Administers the identity registry; cannot author stages.
    Admin,
}

/// Total number of roles. Used for compile-time assertions.
pub const ROLE_COUNT: usize = 5;

impl Role {
    /// Returns all five roles in canonical order.
    pub fn all_roles() -> &'static [Role] {
        &[
            Self::Farmer,
            Self::Processor,
            Self::Distributor,
            Self::Retailer,
            Self::Admin,
        ]
    }

    /// The canonical lowercase token for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Processor => "processor",
            Self::Distributor => "distributor",
            Self::Retailer => "retailer",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farmer" => Ok(Self::Farmer),
            "processor" => Ok(Self::Processor),
            "distributor" => Ok(Self::Distributor),
            "retailer" => Ok(Self::Retailer),
            "admin" => Ok(Self::Admin),
            other => Err(CoreError::InvalidValue {
                what: "role",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_roles_count_matches_constant() {
        assert_eq!(Role::all_roles().len(), ROLE_COUNT);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Farmer.to_string(), "farmer");
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_role_from_str_roundtrip() {
        for role in Role::all_roles() {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, *role);
        }
    }

    #[test]
    fn test_role_from_str_case_insensitive() {
        let parsed: Role = "Distributor".parse().unwrap();
        assert_eq!(parsed, Role::Distributor);
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        assert!("consumer".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&Role::Distributor).unwrap();
        assert_eq!(json, "\"distributor\"");
        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::Distributor);
    }
}
