//! Intent dispatch orchestrator.
//!
//! A dispatch is a two-phase commit over a cloned plan:
//!
//! 1. Every action is applied, strictly in order, to a scratch copy of the
//!    local plan and the matching remote call (`create`/`update`/`delete`) is
//!    issued. Each action resolves its target against the scratch copy, so it
//!    sees the effects of earlier actions in the same batch.
//! 2. Only when every action and every remote call succeeded is the scratch
//!    copy committed to the plan store, which recomputes the summary and the
//!    timeline.
//!
//! Any failure in phase 1 drops the scratch copy; the local plan and timeline
//! stay exactly as they were. Remote writes already made by earlier actions
//! of the failed batch are not compensated. After a commit, audit events are
//! sent on detached tasks and a reconciliation refresh is attempted; both are
//! best-effort and only logged on failure.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::action_applier::apply_action;
use super::intents_errors::IntentDispatchError;
use super::intents_model::{AppliedChange, DispatchOutcome, IntentAction, IntentAuditEvent};
use super::intents_traits::{IntentAuditSink, IntentDispatchServiceTrait};
use crate::errors::Result;
use crate::plan::{Plan, PlanRepositoryTrait};
use crate::store::PlanStore;

/// Service applying intent action batches to the local and remote plan.
pub struct IntentDispatchService {
    store: Arc<PlanStore>,
    repository: Arc<dyn PlanRepositoryTrait>,
    audit_sink: Arc<dyn IntentAuditSink>,
    chat_id: Option<String>,
    in_flight: Mutex<()>,
}

impl IntentDispatchService {
    /// Creates a new IntentDispatchService instance
    pub fn new(
        store: Arc<PlanStore>,
        repository: Arc<dyn PlanRepositoryTrait>,
        audit_sink: Arc<dyn IntentAuditSink>,
    ) -> Self {
        Self {
            store,
            repository,
            audit_sink,
            chat_id: None,
            in_flight: Mutex::new(()),
        }
    }

    /// Tags audit events with the chat the intents came from.
    pub fn with_chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    /// Issues the remote call for one applied change.
    ///
    /// A created record may come back with a server-assigned id; the scratch
    /// plan adopts it so later actions and the refresh address the same record.
    async fn persist_change(
        &self,
        working: &mut Plan,
        change: AppliedChange,
    ) -> Result<AppliedChange> {
        match change {
            AppliedChange::Created { mut record } => {
                let remote = self.repository.create(&record).await?;
                if remote.id() != record.id() {
                    debug!(
                        "Adopting server id {} for {} created locally as {}",
                        remote.id(),
                        record.kind(),
                        record.id()
                    );
                    working.reassign_id(record.kind(), record.id(), remote.id());
                    if let Some(adopted) = working.find(record.kind(), remote.id()) {
                        record = adopted;
                    }
                }
                Ok(AppliedChange::Created { record })
            }
            AppliedChange::Updated { record } => {
                self.repository.update(&record).await?;
                Ok(AppliedChange::Updated { record })
            }
            AppliedChange::Removed { entity, id, label } => {
                self.repository.delete(entity, &id).await?;
                Ok(AppliedChange::Removed { entity, id, label })
            }
        }
    }

    /// Phase 1: apply and persist every action against a scratch copy.
    async fn stage(
        &self,
        intent_id: &str,
        source: &Plan,
        actions: &[IntentAction],
    ) -> Result<(Plan, Vec<AppliedChange>)> {
        let mut working = source.clone();
        let mut applied = Vec::with_capacity(actions.len());

        for (index, action) in actions.iter().enumerate() {
            debug!(
                "Intent {} action {}/{}: {} {} '{}' amount={:?}",
                intent_id,
                index + 1,
                actions.len(),
                action.verb,
                action.entity,
                action.target,
                action.amount
            );
            let change = apply_action(&mut working, action, Utc::now())?;
            let change = self.persist_change(&mut working, change).await?;
            applied.push(change);
        }

        Ok((working, applied))
    }

    /// Sends one audit event per action without waiting for delivery.
    fn emit_audit_events(&self, intent_id: &str, actions: &[IntentAction]) {
        let applied_at = Utc::now();
        for action in actions {
            let event = IntentAuditEvent {
                intent_id: intent_id.to_string(),
                chat_id: self.chat_id.clone(),
                action: action.clone(),
                applied_at,
            };
            let sink = Arc::clone(&self.audit_sink);
            tokio::spawn(async move {
                if let Err(e) = sink.record(&event).await {
                    warn!(
                        "Failed to record audit event for intent {} action {}: {}",
                        event.intent_id, event.action.id, e
                    );
                }
            });
        }
    }

    /// Reloads the plan from the remote copy. Returns whether it succeeded.
    async fn refresh(&self, intent_id: &str) -> bool {
        let refreshed = match self.repository.load_plan().await {
            Ok(plan) => self.store.load(plan),
            Err(e) => Err(e),
        };
        match refreshed {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Plan refresh after intent {} failed, keeping local state: {}",
                    intent_id, e
                );
                false
            }
        }
    }
}

#[async_trait]
impl IntentDispatchServiceTrait for IntentDispatchService {
    async fn dispatch(&self, intent_id: &str, actions: &[IntentAction]) -> Result<DispatchOutcome> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| IntentDispatchError::DispatchInProgress)?;

        let source = self.store.plan().ok_or(IntentDispatchError::NoPlanLoaded)?;

        if actions.is_empty() {
            debug!("Intent {} has no actions; nothing to dispatch", intent_id);
            return Ok(DispatchOutcome {
                intent_id: intent_id.to_string(),
                applied: Vec::new(),
                refreshed: false,
            });
        }

        let (working, applied) = match self.stage(intent_id, &source, actions).await {
            Ok(staged) => staged,
            Err(e) => {
                error!("Intent {} aborted, local plan left unchanged: {}", intent_id, e);
                return Err(e);
            }
        };

        self.store.commit(working);
        info!("Intent {} committed {} action(s)", intent_id, applied.len());

        self.emit_audit_events(intent_id, actions);
        let refreshed = self.refresh(intent_id).await;

        Ok(DispatchOutcome {
            intent_id: intent_id.to_string(),
            applied,
            refreshed,
        })
    }
}
