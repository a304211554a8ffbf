//! Core error types for the planner.
//!
//! This module defines transport-agnostic error types. Remote-specific errors
//! (HTTP, JSON decoding, etc.) are converted to these types by the remote layer.

use thiserror::Error;

use crate::intents::IntentDispatchError;
use crate::plan::EntityKind;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the planner.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Intent dispatch failed: {0}")]
    Intent(#[from] IntentDispatchError),

    #[error("Persistence call failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Failure reported by the remote persistence collaborator.
///
/// `detail` carries the response body (or the transport error message) so the
/// caller can surface what the server actually said.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} on '{resource}' failed{}: {detail}", status_suffix(.status))]
pub struct PersistenceError {
    pub resource: String,
    pub operation: String,
    pub status: Option<u16>,
    pub detail: String,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl PersistenceError {
    pub fn new(
        resource: impl Into<String>,
        operation: impl Into<String>,
        status: Option<u16>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
            status,
            detail: detail.into(),
        }
    }
}

/// Rejected plan data or projection settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// An entity magnitude that is negative or not finite.
    #[error("{entity} '{name}' has invalid amount {amount}")]
    InvalidAmount {
        entity: EntityKind,
        name: String,
        amount: f64,
    },

    /// A projection setting outside its accepted range.
    #[error("{field} {constraint}, got {value}")]
    InvalidSetting {
        field: &'static str,
        constraint: String,
        value: String,
    },

    /// A body that could not be decoded.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
