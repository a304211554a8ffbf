//! Intents module - resolving and applying structured intent actions.

mod action_applier;
mod dispatch_service;
mod entity_resolver;
mod intents_errors;
mod intents_model;
mod intents_traits;

pub use action_applier::{apply_action, resolve_id};
pub use dispatch_service::IntentDispatchService;
pub use entity_resolver::{derive_entity_name, normalize, resolve, resolve_index};
pub use intents_errors::IntentDispatchError;
pub use intents_model::*;
pub use intents_traits::{IntentAuditSink, IntentDispatchServiceTrait, NoOpIntentAuditSink};
