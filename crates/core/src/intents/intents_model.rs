//! Intent action models.
//!
//! Intent actions are produced upstream from free text; the planner only
//! consumes them. Verb and entity spellings that are not recognised are kept
//! as `Unsupported` so the batch fails with a typed error instead of a parse
//! failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::plan::{EntityKind, PlanRecord};

/// What an intent action does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntentVerb {
    AddItem,
    Update,
    RemoveItem,
    Unsupported(String),
}

impl IntentVerb {
    pub fn as_str(&self) -> &str {
        match self {
            IntentVerb::AddItem => "add-item",
            IntentVerb::Update => "update",
            IntentVerb::RemoveItem => "remove-item",
            IntentVerb::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for IntentVerb {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "add-item" | "add" => IntentVerb::AddItem,
            "update" | "set" => IntentVerb::Update,
            "remove-item" | "remove" | "delete" => IntentVerb::RemoveItem,
            _ => IntentVerb::Unsupported(value),
        }
    }
}

impl From<IntentVerb> for String {
    fn from(verb: IntentVerb) -> Self {
        verb.as_str().to_string()
    }
}

impl fmt::Display for IntentVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which collection an intent action targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntentEntity {
    Asset,
    Liability,
    Income,
    Expense,
    Unsupported(String),
}

impl IntentEntity {
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            IntentEntity::Asset => Some(EntityKind::Asset),
            IntentEntity::Liability => Some(EntityKind::Liability),
            IntentEntity::Income => Some(EntityKind::Income),
            IntentEntity::Expense => Some(EntityKind::Expense),
            IntentEntity::Unsupported(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IntentEntity::Asset => "asset",
            IntentEntity::Liability => "liability",
            IntentEntity::Income => "income",
            IntentEntity::Expense => "expense",
            IntentEntity::Unsupported(raw) => raw,
        }
    }
}

impl From<EntityKind> for IntentEntity {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Asset => IntentEntity::Asset,
            EntityKind::Liability => IntentEntity::Liability,
            EntityKind::Income => IntentEntity::Income,
            EntityKind::Expense => IntentEntity::Expense,
        }
    }
}

impl From<String> for IntentEntity {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "asset" | "assets" => IntentEntity::Asset,
            "liability" | "liabilities" => IntentEntity::Liability,
            "income" | "incomes" => IntentEntity::Income,
            "expense" | "expenses" => IntentEntity::Expense,
            _ => IntentEntity::Unsupported(value),
        }
    }
}

impl From<IntentEntity> for String {
    fn from(entity: IntentEntity) -> Self {
        entity.as_str().to_string()
    }
}

impl fmt::Display for IntentEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured edit request derived from natural language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntentAction {
    #[serde(default)]
    pub id: String,
    pub verb: IntentVerb,
    pub entity: IntentEntity,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub amount: Option<f64>,
    /// Informational only; amounts are never converted.
    #[serde(default)]
    pub currency: Option<String>,
    /// The source phrase the action was extracted from.
    #[serde(default)]
    pub raw: String,
}

impl IntentAction {
    pub fn new(
        verb: IntentVerb,
        entity: IntentEntity,
        target: impl Into<String>,
        amount: Option<f64>,
    ) -> Self {
        let target = target.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            raw: format!("{} {} {}", verb, entity, target),
            verb,
            entity,
            target,
            amount,
            currency: None,
        }
    }
}

/// What applying one action changed in the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum AppliedChange {
    Created { record: PlanRecord },
    Updated { record: PlanRecord },
    Removed {
        entity: EntityKind,
        id: String,
        label: String,
    },
}

impl AppliedChange {
    pub fn kind(&self) -> EntityKind {
        match self {
            AppliedChange::Created { record } | AppliedChange::Updated { record } => record.kind(),
            AppliedChange::Removed { entity, .. } => *entity,
        }
    }

    pub fn record_id(&self) -> &str {
        match self {
            AppliedChange::Created { record } | AppliedChange::Updated { record } => record.id(),
            AppliedChange::Removed { id, .. } => id,
        }
    }
}

/// Best-effort audit record, one per dispatched action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntentAuditEvent {
    pub intent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    pub action: IntentAction,
    pub applied_at: DateTime<Utc>,
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub intent_id: String,
    pub applied: Vec<AppliedChange>,
    /// Whether the post-commit remote refresh succeeded.
    pub refreshed: bool,
}
