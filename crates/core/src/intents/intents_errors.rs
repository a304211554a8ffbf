//! Intent dispatch error types.

use thiserror::Error;

use super::intents_model::IntentVerb;
use crate::plan::EntityKind;

/// Errors that abort a dispatch. Any of them leaves the local plan untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntentDispatchError {
    #[error("No plan loaded")]
    NoPlanLoaded,

    #[error("Could not find {entity} matching \"{target}\"")]
    TargetNotFound { entity: EntityKind, target: String },

    #[error("Action '{verb}' on {entity} requires an amount")]
    MissingAmount { verb: IntentVerb, entity: EntityKind },

    #[error("Action '{verb}' on {entity} has invalid amount {amount}")]
    InvalidAmount {
        verb: IntentVerb,
        entity: EntityKind,
        amount: f64,
    },

    #[error("Unsupported action '{verb}' on '{entity}'")]
    Unsupported { verb: String, entity: String },

    #[error("Another dispatch is already in progress")]
    DispatchInProgress,
}
