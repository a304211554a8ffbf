use async_trait::async_trait;

use super::intents_model::{DispatchOutcome, IntentAction, IntentAuditEvent};
use crate::errors::Result;

/// Receives one audit event per dispatched action.
///
/// Failures are logged by the caller and never undo a dispatch.
#[async_trait]
pub trait IntentAuditSink: Send + Sync {
    async fn record(&self, event: &IntentAuditEvent) -> Result<()>;
}

/// Audit sink that discards events.
#[derive(Clone, Default)]
pub struct NoOpIntentAuditSink;

#[async_trait]
impl IntentAuditSink for NoOpIntentAuditSink {
    async fn record(&self, _event: &IntentAuditEvent) -> Result<()> {
        Ok(())
    }
}

/// Trait for intent dispatch operations
#[async_trait]
pub trait IntentDispatchServiceTrait: Send + Sync {
    /// Applies `actions` as one atomic batch.
    async fn dispatch(&self, intent_id: &str, actions: &[IntentAction]) -> Result<DispatchOutcome>;
}
