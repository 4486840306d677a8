//! # Shipment Lifecycle State Machine
//!
//! Models a custody movement of a product between two stakeholders.
//!
//! ## Statuses
//!
//! ```text
//! NotShipped ──▶ Preparing ──▶ Shipped ──▶ Delivered ──▶ Verified
//!      │             │           │  │
//!      └─────────────┼──▶ Shipped│  └──▶ UnableToDeliver (terminal)
//!                    │           │
//!                    └──▶ Cancelled ◀──┘ (terminal)
//! ```
//!
//! Allowed edges:
//! - NotShipped → {Preparing, Shipped}
//! - Preparing  → {Shipped, Cancelled}
//! - Shipped    → {Delivered, UnableToDeliver, Cancelled}
//! - Delivered  → {Verified}
//!
//! Cancelled and UnableToDeliver are absorbing terminals; any further call
//! fails with `ShipmentTerminal` before the edge check. Verified has no
//! outgoing edges. Only the original sender may update status, and every
//! accepted transition appends to the immutable status history.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use agritrace_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest, CoreError, EntityId,
    StakeholderId, Timestamp, TrackingNumber,
};
use agritrace_registry::StakeholderDirectory;

// ─── Status ──────────────────────────────────────────────────────────

/// The lifecycle status of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    /// Created, not yet moving.
    NotShipped,
    /// Being prepared for dispatch.
    Preparing,
    /// In transit.
    Shipped,
    /// Arrived at the receiver.
    Delivered,
    /// Receipt confirmed after delivery.
    Verified,
    /// Abandoned before or during transit (terminal).
    Cancelled,
    /// Could not be delivered (terminal).
    UnableToDeliver,
}

impl ShipmentStatus {
    /// The statuses reachable from this one.
    pub fn allowed_targets(&self) -> &'static [ShipmentStatus] {
        match self {
            Self::NotShipped => &[Self::Preparing, Self::Shipped],
            Self::Preparing => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered, Self::UnableToDeliver, Self::Cancelled],
            Self::Delivered => &[Self::Verified],
            Self::Verified | Self::Cancelled | Self::UnableToDeliver => &[],
        }
    }

    /// Whether the target is reachable in one transition.
    pub fn can_transition(&self, to: ShipmentStatus) -> bool {
        self.allowed_targets().contains(&to)
    }

    /// Whether this status is an absorbing terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::UnableToDeliver)
    }

    /// Whether any further transition is possible.
    pub fn is_final(&self) -> bool {
        self.allowed_targets().is_empty()
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotShipped => "NOT_SHIPPED",
            Self::Preparing => "PREPARING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Verified => "VERIFIED",
            Self::Cancelled => "CANCELLED",
            Self::UnableToDeliver => "UNABLE_TO_DELIVER",
        };
        f.write_str(s)
    }
}

impl FromStr for ShipmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_shipped" => Ok(Self::NotShipped),
            "preparing" => Ok(Self::Preparing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "verified" => Ok(Self::Verified),
            "cancelled" => Ok(Self::Cancelled),
            "unable_to_deliver" => Ok(Self::UnableToDeliver),
            other => Err(CoreError::InvalidValue {
                what: "shipment status",
                value: other.to_string(),
            }),
        }
    }
}

/// The mode of transport for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Road freight.
    Truck,
    /// Rail freight.
    Rail,
    /// Sea freight.
    Sea,
    /// Air freight.
    Air,
}

impl TransportMode {
    /// The canonical lowercase token for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truck => "truck",
            Self::Rail => "rail",
            Self::Sea => "sea",
            Self::Air => "air",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truck" => Ok(Self::Truck),
            "rail" => Ok(Self::Rail),
            "sea" => Ok(Self::Sea),
            "air" => Ok(Self::Air),
            other => Err(CoreError::InvalidValue {
                what: "transport mode",
                value: other.to_string(),
            }),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors that can occur during shipment lifecycle operations.
#[derive(Error, Debug)]
pub enum ShipmentError {
    /// Only the original sender may update a shipment.
    #[error("caller {caller} is not the sender of shipment {id}")]
    NotAuthorized {
        /// The identity that attempted the update.
        caller: StakeholderId,
        /// The shipment identifier.
        id: EntityId,
    },

    /// The sender is no longer active in the registry.
    #[error("sender {identity} is not currently active")]
    SenderInactive {
        /// The inactive sender.
        identity: StakeholderId,
    },

    /// Shipment creation requires an active Distributor sender.
    #[error("caller {caller} is not an active distributor")]
    NotDistributor {
        /// The identity that attempted the creation.
        caller: StakeholderId,
    },

    /// Attempted transition is not on the allowed edge set.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: ShipmentStatus,
        /// Attempted target status.
        to: ShipmentStatus,
    },

    /// The shipment is in an absorbing terminal status.
    #[error("shipment is terminal at {status}")]
    ShipmentTerminal {
        /// The terminal status.
        status: ShipmentStatus,
    },

    /// The referenced product has not left the Farm stage.
    #[error("product {product} at stage {stage} is not shippable")]
    ProductNotShippable {
        /// The referenced product.
        product: EntityId,
        /// Its current stage.
        stage: crate::product::ProductStage,
    },

    /// The referenced product does not exist.
    #[error("product {id} not found")]
    ProductNotFound {
        /// The unknown product reference.
        id: EntityId,
    },

    /// The receiver is not a registered stakeholder.
    #[error("receiver {identity} is not a registered stakeholder")]
    UnknownReceiver {
        /// The unknown receiver identity.
        identity: StakeholderId,
    },

    /// The tracking number is already claimed.
    #[error("tracking number {tracking} is already claimed by {holder}")]
    DuplicateTrackingNumber {
        /// The colliding tracking number.
        tracking: TrackingNumber,
        /// The shipment that already holds it.
        holder: EntityId,
    },

    /// No shipment exists with this id.
    #[error("shipment {id} not found")]
    NotFound {
        /// The unknown identifier.
        id: EntityId,
    },

    /// A required field was empty.
    #[error("required field {field:?} is empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Status note could not be canonicalized for digesting.
    #[error("status note canonicalization failed: {0}")]
    Payload(#[from] CanonicalizationError),

    /// The entity index rejected the insertion.
    #[error("entity index error: {0}")]
    Index(crate::index::IndexError),
}

impl From<crate::index::IndexError> for ShipmentError {
    fn from(err: crate::index::IndexError) -> Self {
        match err {
            crate::index::IndexError::DuplicateTrackingNumber { tracking, holder } => {
                Self::DuplicateTrackingNumber { tracking, holder }
            }
            other => Self::Index(other),
        }
    }
}

// ─── History ─────────────────────────────────────────────────────────

/// Input note accompanying a status update.
#[derive(Debug, Clone, Default)]
pub struct StatusNote {
    /// Free-form note.
    pub note: String,
    /// Where the update was recorded.
    pub location: String,
}

/// One entry in a shipment's append-only status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// The status entered.
    pub status: ShipmentStatus,
    /// Free-form note.
    pub note: String,
    /// Where the update was recorded.
    pub location: String,
    /// When the update was recorded.
    pub timestamp: Timestamp,
    /// The identity that recorded the update.
    pub actor: StakeholderId,
    /// Canonical digest of (status, note, location), for tamper evidence.
    pub note_digest: ContentDigest,
}

/// Input for creating a new shipment.
#[derive(Debug, Clone)]
pub struct ShipmentDraft {
    /// The product being moved.
    pub product: EntityId,
    /// The receiving stakeholder.
    pub receiver: StakeholderId,
    /// Globally unique tracking number.
    pub tracking_number: TrackingNumber,
    /// Mode of transport.
    pub transport_mode: TransportMode,
    /// Note for the creation history entry.
    pub note: StatusNote,
}

// ─── Shipment ────────────────────────────────────────────────────────

/// A custody movement between a sender and a receiver.
///
/// Constructed by the [`crate::Ledger`] service, which enforces the
/// cross-entity creation guards (shippable product, known receiver,
/// tracking uniqueness). The struct itself owns the status machine and
/// the sender-only update discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Ledger-wide entity identifier.
    pub id: EntityId,
    /// The product being moved.
    pub product: EntityId,
    /// The stakeholder that created the shipment; sole authorized updater.
    pub sender: StakeholderId,
    /// The receiving stakeholder.
    pub receiver: StakeholderId,
    /// Globally unique tracking number.
    pub tracking_number: TrackingNumber,
    /// Mode of transport.
    pub transport_mode: TransportMode,
    /// Current status.
    pub status: ShipmentStatus,
    /// Append-only status history, oldest first.
    pub history: Vec<StatusEntry>,
    /// When the shipment was created.
    pub created_at: Timestamp,
    /// False once no further transition is possible.
    pub is_active: bool,
}

impl Shipment {
    /// Build a new shipment at NotShipped with its creation history entry.
    ///
    /// Crate-internal: the [`crate::Ledger`] service runs the creation
    /// guards before calling this.
    pub(crate) fn new(
        id: EntityId,
        sender: StakeholderId,
        draft: ShipmentDraft,
    ) -> Result<Self, ShipmentError> {
        let entry = make_entry(ShipmentStatus::NotShipped, &sender, draft.note)?;
        Ok(Self {
            id,
            product: draft.product,
            sender,
            receiver: draft.receiver,
            tracking_number: draft.tracking_number,
            transport_mode: draft.transport_mode,
            status: ShipmentStatus::NotShipped,
            history: vec![entry],
            created_at: Timestamp::now(),
            is_active: true,
        })
    }

    /// Transition the shipment to a new status. Sender-only.
    ///
    /// # Errors
    ///
    /// - `ShipmentTerminal` — shipment is at Cancelled/UnableToDeliver.
    /// - `NotAuthorized` — caller is not the original sender.
    /// - `SenderInactive` — sender has been deactivated.
    /// - `InvalidStatusTransition` — target not on the edge set.
    pub fn update_status(
        &mut self,
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        target: ShipmentStatus,
        note: StatusNote,
    ) -> Result<ShipmentStatus, ShipmentError> {
        if self.status.is_terminal() {
            return Err(ShipmentError::ShipmentTerminal {
                status: self.status,
            });
        }
        if caller != &self.sender {
            return Err(ShipmentError::NotAuthorized {
                caller: caller.clone(),
                id: self.id,
            });
        }
        if !directory.is_active(caller) {
            return Err(ShipmentError::SenderInactive {
                identity: caller.clone(),
            });
        }
        if !self.status.can_transition(target) {
            return Err(ShipmentError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }

        let entry = make_entry(target, caller, note)?;
        self.history.push(entry);
        self.status = target;
        if target.is_final() {
            self.is_active = false;
        }
        Ok(target)
    }

    /// Cancel the shipment with a mandatory reason.
    ///
    /// Sugar for a Preparing/Shipped → Cancelled transition; the reason is
    /// appended to history as the entry note.
    ///
    /// # Errors
    ///
    /// `EmptyField` for a blank reason, otherwise as
    /// [`Shipment::update_status`].
    pub fn cancel(
        &mut self,
        directory: &dyn StakeholderDirectory,
        caller: &StakeholderId,
        reason: &str,
        location: &str,
    ) -> Result<(), ShipmentError> {
        if reason.trim().is_empty() {
            return Err(ShipmentError::EmptyField { field: "reason" });
        }
        self.update_status(
            directory,
            caller,
            ShipmentStatus::Cancelled,
            StatusNote {
                note: reason.to_string(),
                location: location.to_string(),
            },
        )?;
        Ok(())
    }

    /// The most recent history entry.
    pub fn latest_entry(&self) -> Option<&StatusEntry> {
        self.history.last()
    }
}

fn make_entry(
    status: ShipmentStatus,
    actor: &StakeholderId,
    note: StatusNote,
) -> Result<StatusEntry, ShipmentError> {
    #[derive(Serialize)]
    struct NotePayload<'a> {
        status: &'a ShipmentStatus,
        note: &'a str,
        location: &'a str,
    }
    let digest = sha256_digest(&CanonicalBytes::new(&NotePayload {
        status: &status,
        note: &note.note,
        location: &note.location,
    })?);
    Ok(StatusEntry {
        status,
        note: note.note,
        location: note.location,
        timestamp: Timestamp::now(),
        actor: actor.clone(),
        note_digest: digest,
    })
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use agritrace_core::LicenseNumber;
    use agritrace_registry::{NewStakeholder, StakeholderRegistry};
    use agritrace_core::Role;

    fn id(s: &str) -> StakeholderId {
        StakeholderId::new(s).unwrap()
    }

    fn entity(raw: u64) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    fn note(text: &str) -> StatusNote {
        StatusNote {
            note: text.into(),
            location: "I-5 corridor".into(),
        }
    }

    fn make_directory() -> StakeholderRegistry {
        let admin = id("admin-1");
        let mut registry = StakeholderRegistry::bootstrap(
            admin.clone(),
            "AgriTrace Authority",
            LicenseNumber::new("ADMIN-1").unwrap(),
            "Sacramento, CA",
        )
        .unwrap();
        for (identity, role, lic) in [
            ("dist-1", Role::Distributor, "DIST-1"),
            ("retail-1", Role::Retailer, "RETAIL-1"),
        ] {
            registry
                .register(
                    &admin,
                    NewStakeholder {
                        identity: id(identity),
                        role,
                        business_name: format!("{identity} co"),
                        license: LicenseNumber::new(lic).unwrap(),
                        location: "CA".into(),
                        certifications: vec![],
                    },
                )
                .unwrap();
        }
        registry
    }

    fn make_shipment() -> Shipment {
        Shipment::new(
            entity(2),
            id("dist-1"),
            ShipmentDraft {
                product: entity(1),
                receiver: id("retail-1"),
                tracking_number: TrackingNumber::new("T-1").unwrap(),
                transport_mode: TransportMode::Truck,
                note: note("created"),
            },
        )
        .unwrap()
    }

    // ── Edge set ─────────────────────────────────────────────────────

    #[test]
    fn test_allowed_edges() {
        use ShipmentStatus::*;
        assert!(NotShipped.can_transition(Preparing));
        assert!(NotShipped.can_transition(Shipped));
        assert!(Preparing.can_transition(Shipped));
        assert!(Preparing.can_transition(Cancelled));
        assert!(Shipped.can_transition(Delivered));
        assert!(Shipped.can_transition(UnableToDeliver));
        assert!(Shipped.can_transition(Cancelled));
        assert!(Delivered.can_transition(Verified));
    }

    #[test]
    fn test_disallowed_edges() {
        use ShipmentStatus::*;
        assert!(!NotShipped.can_transition(Delivered));
        assert!(!NotShipped.can_transition(Cancelled));
        assert!(!Preparing.can_transition(Verified));
        assert!(!Delivered.can_transition(Cancelled));
        assert!(!Verified.can_transition(Delivered));
        assert!(Verified.allowed_targets().is_empty());
    }

    #[test]
    fn test_terminal_flags() {
        assert!(ShipmentStatus::Cancelled.is_terminal());
        assert!(ShipmentStatus::UnableToDeliver.is_terminal());
        assert!(!ShipmentStatus::Verified.is_terminal());
        assert!(ShipmentStatus::Verified.is_final());
        assert!(!ShipmentStatus::Delivered.is_final());
    }

    // ── Happy path ───────────────────────────────────────────────────

    #[test]
    fn test_new_shipment_starts_not_shipped() {
        let shipment = make_shipment();
        assert_eq!(shipment.status, ShipmentStatus::NotShipped);
        assert!(shipment.is_active);
        assert_eq!(shipment.history.len(), 1);
        assert_eq!(shipment.history[0].actor, id("dist-1"));
    }

    #[test]
    fn test_ship_deliver_verify() {
        let directory = make_directory();
        let mut shipment = make_shipment();
        let sender = id("dist-1");

        shipment
            .update_status(&directory, &sender, ShipmentStatus::Shipped, note("left depot"))
            .unwrap();
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Delivered, note("arrived"))
            .unwrap();
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Verified, note("receipt signed"))
            .unwrap();

        assert_eq!(shipment.status, ShipmentStatus::Verified);
        assert!(!shipment.is_active);
        assert_eq!(shipment.history.len(), 4);
    }

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let directory = make_directory();
        let mut shipment = make_shipment();
        let sender = id("dist-1");
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Preparing, note("packing"))
            .unwrap();
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Shipped, note("loaded"))
            .unwrap();

        let statuses: Vec<_> = shipment.history.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                ShipmentStatus::NotShipped,
                ShipmentStatus::Preparing,
                ShipmentStatus::Shipped,
            ]
        );
        assert_eq!(shipment.latest_entry().unwrap().note, "loaded");
    }

    // ── Guards ───────────────────────────────────────────────────────

    #[test]
    fn test_only_sender_may_update() {
        let directory = make_directory();
        let mut shipment = make_shipment();
        let result = shipment.update_status(
            &directory,
            &id("retail-1"),
            ShipmentStatus::Shipped,
            note("not mine"),
        );
        assert!(matches!(result, Err(ShipmentError::NotAuthorized { .. })));
    }

    #[test]
    fn test_inactive_sender_rejected() {
        let mut directory = make_directory();
        let mut shipment = make_shipment();
        directory.deactivate(&id("admin-1"), &id("dist-1")).unwrap();
        let result = shipment.update_status(
            &directory,
            &id("dist-1"),
            ShipmentStatus::Shipped,
            note("inactive"),
        );
        assert!(matches!(result, Err(ShipmentError::SenderInactive { .. })));
    }

    #[test]
    fn test_off_graph_transition_rejected() {
        let directory = make_directory();
        let mut shipment = make_shipment();
        let sender = id("dist-1");
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Preparing, note("packing"))
            .unwrap();
        // Preparing -> Verified is off-graph.
        let result =
            shipment.update_status(&directory, &sender, ShipmentStatus::Verified, note("skip"));
        assert!(matches!(
            result,
            Err(ShipmentError::InvalidStatusTransition {
                from: ShipmentStatus::Preparing,
                to: ShipmentStatus::Verified,
            })
        ));
    }

    #[test]
    fn test_terminal_is_absorbing() {
        let directory = make_directory();
        let mut shipment = make_shipment();
        let sender = id("dist-1");
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Preparing, note("packing"))
            .unwrap();
        shipment.cancel(&directory, &sender, "order withdrawn", "depot").unwrap();

        let result =
            shipment.update_status(&directory, &sender, ShipmentStatus::Shipped, note("retry"));
        assert!(matches!(
            result,
            Err(ShipmentError::ShipmentTerminal {
                status: ShipmentStatus::Cancelled,
            })
        ));
    }

    #[test]
    fn test_cancel_after_delivery_rejected() {
        let directory = make_directory();
        let mut shipment = make_shipment();
        let sender = id("dist-1");
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Shipped, note("left"))
            .unwrap();
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Delivered, note("arrived"))
            .unwrap();
        let result = shipment.cancel(&directory, &sender, "too late", "dock");
        assert!(matches!(
            result,
            Err(ShipmentError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_cancel_requires_reason() {
        let directory = make_directory();
        let mut shipment = make_shipment();
        let result = shipment.cancel(&directory, &id("dist-1"), "  ", "depot");
        assert!(matches!(
            result,
            Err(ShipmentError::EmptyField { field: "reason" })
        ));
    }

    #[test]
    fn test_cancel_appends_reason_to_history() {
        let directory = make_directory();
        let mut shipment = make_shipment();
        let sender = id("dist-1");
        shipment
            .update_status(&directory, &sender, ShipmentStatus::Shipped, note("left"))
            .unwrap();
        shipment
            .cancel(&directory, &sender, "customs rejection", "border")
            .unwrap();

        let last = shipment.latest_entry().unwrap();
        assert_eq!(last.status, ShipmentStatus::Cancelled);
        assert_eq!(last.note, "customs rejection");
        assert!(!shipment.is_active);
    }

    // ── Misc ─────────────────────────────────────────────────────────

    #[test]
    fn test_transport_mode_parse() {
        assert_eq!("truck".parse::<TransportMode>().unwrap(), TransportMode::Truck);
        assert_eq!("Sea".parse::<TransportMode>().unwrap(), TransportMode::Sea);
        assert!("teleport".parse::<TransportMode>().is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ShipmentStatus::NotShipped.to_string(), "NOT_SHIPPED");
        assert_eq!(ShipmentStatus::UnableToDeliver.to_string(), "UNABLE_TO_DELIVER");
    }

    #[test]
    fn test_shipment_serde_roundtrip() {
        let shipment = make_shipment();
        let json = serde_json::to_string(&shipment).unwrap();
        let parsed: Shipment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, shipment.status);
        assert_eq!(parsed.tracking_number, shipment.tracking_number);
        assert_eq!(parsed.history.len(), 1);
    }
}
