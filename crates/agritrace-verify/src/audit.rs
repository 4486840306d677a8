//! # Audit Trail
//!
//! Any active, registered stakeholder may append an audit note to any
//! product or shipment, not only the actors that touched it. Notes are
//! purely additive and never validated against prior notes; each one is
//! digested for tamper evidence at append time.

use serde::Serialize;
use thiserror::Error;

use agritrace_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest, EntityId, StakeholderId,
    Timestamp,
};
use agritrace_ledger::{AuditRecord, LedgerStore};
use agritrace_registry::StakeholderDirectory;

/// Errors from [`perform_audit`].
#[derive(Error, Debug)]
pub enum AuditError {
    /// The caller is unknown to the registry or not currently active.
    #[error("caller {caller} is not an active registered stakeholder")]
    NotAuthorized {
        /// The identity that attempted the audit.
        caller: StakeholderId,
    },

    /// No entity exists with this id.
    #[error("entity {id} not found")]
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

    /// The note could not be canonicalized for digesting.
    #[error("audit note canonicalization failed: {0}")]
    Note(#[from] CanonicalizationError),
}

/// Append an audit note to a product or shipment.
///
/// # Errors
///
/// - `NotAuthorized` — caller unknown or inactive.
/// - `NotFound` — no entity with this id.
/// - `EmptyField` — blank note.
pub fn perform_audit<S: LedgerStore>(
    directory: &dyn StakeholderDirectory,
    store: &mut S,
    caller: &StakeholderId,
    entity: EntityId,
    note: &str,
) -> Result<(), AuditError> {
    if !directory.is_active(caller) {
        return Err(AuditError::NotAuthorized {
            caller: caller.clone(),
        });
    }
    if store.entity_kind(entity).is_none() {
        return Err(AuditError::NotFound { id: entity });
    }
    if note.trim().is_empty() {
        return Err(AuditError::EmptyField { field: "note" });
    }

    let digest = note_digest(entity, note)?;
    store.append_audit(AuditRecord {
        entity,
        actor: caller.clone(),
        note: note.to_string(),
        note_digest: digest,
        recorded_at: Timestamp::now(),
    });
    Ok(())
}

fn note_digest(entity: EntityId, note: &str) -> Result<ContentDigest, CanonicalizationError> {
    #[derive(Serialize)]
    struct NotePayload<'a> {
        entity: EntityId,
        note: &'a str,
    }
    Ok(sha256_digest(&CanonicalBytes::new(&NotePayload {
        entity,
        note,
    })?))
}
