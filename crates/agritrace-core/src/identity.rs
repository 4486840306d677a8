//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the AgriTrace Stack.
//! These prevent accidental identifier confusion — you cannot pass a
//! `TrackingNumber` where a `LicenseNumber` is expected.
//!
//! ## Security Invariant
//!
//! Type-level distinction between identifier namespaces prevents
//! cross-namespace confusion where one kind of identifier is substituted
//! for another. String-backed identifiers reject empty input at
//! construction, so a blank identity cannot enter the ledger.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Unique identifier for a registered stakeholder (farmer, processor,
/// distributor, retailer, or admin).
///
/// Supplied by the surrounding environment (an account address, a DID, an
/// organization handle). The registry only requires that it is non-empty
/// and globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StakeholderId(String);

/// Unique identifier for a ledger entity (Product or Shipment).
///
/// Allocated sequentially by the central entity index, starting at 1.
/// Products and Shipments share one identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

/// Globally unique shipment tracking number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackingNumber(String);

/// Globally unique business license number bound to exactly one
/// stakeholder identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LicenseNumber(String);

/// The kind of entity an `EntityId` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A product moving through the supply chain.
    Product,
    /// A custody movement between two stakeholders.
    Shipment,
}

impl StakeholderId {
    /// Construct a stakeholder identity, rejecting empty input.
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(CoreError::EmptyField {
                field: "stakeholder identity",
            });
        }
        Ok(Self(s))
    }

    /// Access the inner identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EntityId {
    /// Construct an entity identifier from its raw value.
    ///
    /// Zero is not a valid entity reference — the index allocates from 1.
    pub fn new(raw: u64) -> Result<Self, CoreError> {
        if raw == 0 {
            return Err(CoreError::InvalidValue {
                what: "entity id",
                value: raw.to_string(),
            });
        }
        Ok(Self(raw))
    }

    /// The raw numeric value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The next identifier in allocation order.
    pub fn successor(&self) -> EntityId {
        EntityId(self.0 + 1)
    }

    /// The first allocatable identifier.
    pub const FIRST: EntityId = EntityId(1);
}

impl TrackingNumber {
    /// Construct a tracking number, rejecting empty input.
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(CoreError::EmptyField {
                field: "tracking number",
            });
        }
        Ok(Self(s))
    }

    /// Access the inner tracking string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl LicenseNumber {
    /// Construct a license number, rejecting empty input.
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(CoreError::EmptyField { field: "license" });
        }
        Ok(Self(s))
    }

    /// Access the inner license string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StakeholderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for LicenseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product => f.write_str("PRODUCT"),
            Self::Shipment => f.write_str("SHIPMENT"),
        }
    }
}
