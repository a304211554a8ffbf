//! Applies a single intent action to a plan.
//!
//! The applier is the only code path that edits plan collections on behalf of
//! an intent. After every successful edit the summary is recomputed from the
//! four collections, and the cashflow breakdown as well for income/expense
//! edits.

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use super::entity_resolver::{derive_entity_name, resolve, resolve_index};
use super::intents_errors::IntentDispatchError;
use super::intents_model::{AppliedChange, IntentAction, IntentVerb};
use crate::constants::DEFAULT_CATEGORY;
use crate::plan::{
    Asset, EntityKind, Expense, Frequency, Income, Liability, Plan, PlanEntity, PlanRecord,
};

/// Applies `action` to `plan` in place.
///
/// On error the plan is left exactly as it was.
pub fn apply_action(
    plan: &mut Plan,
    action: &IntentAction,
    now: DateTime<Utc>,
) -> Result<AppliedChange, IntentDispatchError> {
    let unsupported = || IntentDispatchError::Unsupported {
        verb: action.verb.to_string(),
        entity: action.entity.to_string(),
    };
    let kind = action.entity.kind().ok_or_else(unsupported)?;

    let change = match &action.verb {
        IntentVerb::AddItem => {
            let amount = required_amount(action, kind)?;
            let name = derive_entity_name(&action.target, kind.fallback_name());
            let record = new_record(kind, name, amount, now);
            plan.insert(record.clone());
            AppliedChange::Created { record }
        }
        IntentVerb::Update => {
            let amount = required_amount(action, kind)?;
            let record = match kind {
                EntityKind::Asset => {
                    set_amount(&mut plan.assets, &action.target, amount, now).map(PlanRecord::Asset)
                }
                EntityKind::Liability => {
                    set_amount(&mut plan.liabilities, &action.target, amount, now)
                        .map(PlanRecord::Liability)
                }
                EntityKind::Income => set_amount(&mut plan.incomes, &action.target, amount, now)
                    .map(PlanRecord::Income),
                EntityKind::Expense => set_amount(&mut plan.expenses, &action.target, amount, now)
                    .map(PlanRecord::Expense),
            }
            .ok_or_else(|| not_found(kind, action))?;
            AppliedChange::Updated { record }
        }
        IntentVerb::RemoveItem => {
            let id = resolve_id(plan, kind, &action.target).ok_or_else(|| not_found(kind, action))?;
            let removed = plan
                .remove(kind, &id)
                .ok_or_else(|| not_found(kind, action))?;
            AppliedChange::Removed {
                entity: kind,
                id,
                label: removed.display_name().to_string(),
            }
        }
        IntentVerb::Unsupported(_) => return Err(unsupported()),
    };

    plan.recompute_summary();
    if kind.is_cashflow() {
        plan.recompute_cashflow();
    }

    debug!(
        "Applied '{}' on {} '{}' (id {})",
        action.verb,
        kind,
        action.target,
        change.record_id()
    );

    Ok(change)
}

/// Resolves `target` against the collection for `kind` and returns the entity id.
pub fn resolve_id(plan: &Plan, kind: EntityKind, target: &str) -> Option<String> {
    match kind {
        EntityKind::Asset => resolve(&plan.assets, target).map(|a| a.id.clone()),
        EntityKind::Liability => resolve(&plan.liabilities, target).map(|l| l.id.clone()),
        EntityKind::Income => resolve(&plan.incomes, target).map(|i| i.id.clone()),
        EntityKind::Expense => resolve(&plan.expenses, target).map(|e| e.id.clone()),
    }
}

fn not_found(kind: EntityKind, action: &IntentAction) -> IntentDispatchError {
    IntentDispatchError::TargetNotFound {
        entity: kind,
        target: action.target.clone(),
    }
}

/// The action's amount, validated and clamped to be non-negative.
fn required_amount(action: &IntentAction, kind: EntityKind) -> Result<f64, IntentDispatchError> {
    match action.amount {
        None => Err(IntentDispatchError::MissingAmount {
            verb: action.verb.clone(),
            entity: kind,
        }),
        Some(amount) if !amount.is_finite() => Err(IntentDispatchError::InvalidAmount {
            verb: action.verb.clone(),
            entity: kind,
            amount,
        }),
        Some(amount) => Ok(amount.max(0.0)),
    }
}

fn set_amount<T: PlanEntity + Clone>(
    items: &mut [T],
    target: &str,
    amount: f64,
    now: DateTime<Utc>,
) -> Option<T> {
    let idx = resolve_index(items, target)?;
    items[idx].set_primary_amount(amount, now);
    Some(items[idx].clone())
}

fn new_record(kind: EntityKind, name: String, amount: f64, now: DateTime<Utc>) -> PlanRecord {
    let id = Uuid::new_v4().to_string();
    let category = DEFAULT_CATEGORY.to_string();
    match kind {
        EntityKind::Asset => PlanRecord::Asset(Asset {
            id,
            name,
            category,
            current_value: amount,
            annual_growth_rate: None,
            notes: None,
            updated_at: now,
        }),
        EntityKind::Liability => PlanRecord::Liability(Liability {
            id,
            name,
            category,
            current_balance: amount,
            interest_rate_apr: 0.0,
            minimum_payment: 0.0,
            notes: None,
            updated_at: now,
        }),
        EntityKind::Income => PlanRecord::Income(Income {
            id,
            source: name,
            amount,
            frequency: Frequency::Monthly,
            start_date: now.date_naive(),
            category,
            notes: None,
            updated_at: now,
        }),
        EntityKind::Expense => PlanRecord::Expense(Expense {
            id,
            payee: name,
            amount,
            frequency: Frequency::Monthly,
            category,
            notes: None,
            updated_at: now,
        }),
    }
}
