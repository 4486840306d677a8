//! # Error Types — Core Validation and Canonicalization Failures
//!
//! Defines the error types shared across the AgriTrace Stack core. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Validation errors name the offending field and value; no silent
//!   defaulting anywhere in the stack.
//! - Canonicalization errors fail loudly — a digest over non-canonical
//!   bytes must be impossible, not merely unlikely.

use thiserror::Error;

/// Errors raised by the core primitive types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A required field was empty or whitespace-only.
    #[error("required field {field:?} is empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// An identifier or enum token failed to parse.
    #[error("invalid {what}: {value:?}")]
    InvalidValue {
        /// What was being parsed (e.g., "role", "timestamp").
        what: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Quantities must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
