//! Plan domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::plan_summary::{compute_cashflow, compute_summary};
use crate::constants::MONTHS_PER_YEAR;
use crate::errors::{Result, ValidationError};

/// How often a recurring income or expense occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Multiplier converting one occurrence into a monthly equivalent.
    pub fn monthly_factor(self) -> f64 {
        match self {
            Frequency::Weekly => 52.0 / MONTHS_PER_YEAR,
            Frequency::Biweekly => 26.0 / MONTHS_PER_YEAR,
            Frequency::Monthly => 1.0,
            Frequency::Quarterly => 1.0 / 3.0,
            Frequency::Yearly => 1.0 / MONTHS_PER_YEAR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

/// The four entity collections of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Asset,
    Liability,
    Income,
    Expense,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Asset,
        EntityKind::Liability,
        EntityKind::Income,
        EntityKind::Expense,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Asset => "asset",
            EntityKind::Liability => "liability",
            EntityKind::Income => "income",
            EntityKind::Expense => "expense",
        }
    }

    /// Generic display name used when nothing usable can be derived from a target.
    pub fn fallback_name(self) -> &'static str {
        match self {
            EntityKind::Asset => "New Asset",
            EntityKind::Liability => "New Liability",
            EntityKind::Income => "New Income",
            EntityKind::Expense => "New Expense",
        }
    }

    /// Incomes and expenses feed the cashflow breakdown.
    pub fn is_cashflow(self) -> bool {
        matches!(self, EntityKind::Income | EntityKind::Expense)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common view over plan entities used by lookup and mutation code.
pub trait PlanEntity {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Human-facing lookup key (name, source or payee).
    fn display_name(&self) -> &str;

    /// The primary magnitude (value, balance or amount).
    fn primary_amount(&self) -> f64;

    fn set_primary_amount(&mut self, amount: f64, at: DateTime<Utc>);
}

/// Something the user owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: String,
    pub current_value: f64,
    /// Expected annual growth; `None` falls back to the projection default.
    #[serde(default)]
    pub annual_growth_rate: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Something the user owes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    pub id: String,
    pub name: String,
    pub category: String,
    pub current_balance: f64,
    #[serde(default)]
    pub interest_rate_apr: f64,
    #[serde(default)]
    pub minimum_payment: f64,
    #[serde(default)]
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A recurring inflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub source: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Income {
    pub fn monthly_amount(&self) -> f64 {
        self.amount * self.frequency.monthly_factor()
    }
}

/// A recurring outflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub payee: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    pub category: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn monthly_amount(&self) -> f64 {
        self.amount * self.frequency.monthly_factor()
    }
}

impl PlanEntity for Asset {
    const KIND: EntityKind = EntityKind::Asset;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn primary_amount(&self) -> f64 {
        self.current_value
    }

    fn set_primary_amount(&mut self, amount: f64, at: DateTime<Utc>) {
        self.current_value = amount;
        self.updated_at = at;
    }
}

impl PlanEntity for Liability {
    const KIND: EntityKind = EntityKind::Liability;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn primary_amount(&self) -> f64 {
        self.current_balance
    }

    fn set_primary_amount(&mut self, amount: f64, at: DateTime<Utc>) {
        self.current_balance = amount;
        self.updated_at = at;
    }
}

impl PlanEntity for Income {
    const KIND: EntityKind = EntityKind::Income;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.source
    }

    fn primary_amount(&self) -> f64 {
        self.amount
    }

    fn set_primary_amount(&mut self, amount: f64, at: DateTime<Utc>) {
        self.amount = amount;
        self.updated_at = at;
    }
}

impl PlanEntity for Expense {
    const KIND: EntityKind = EntityKind::Expense;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.payee
    }

    fn primary_amount(&self) -> f64 {
        self.amount
    }

    fn set_primary_amount(&mut self, amount: f64, at: DateTime<Utc>) {
        self.amount = amount;
        self.updated_at = at;
    }
}

/// Derived totals. Never edited by hand; always recomputed from the collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_assets: f64,
    pub total_liabilities: f64,
    /// Always `total_assets - total_liabilities`
    pub net_worth: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_savings: f64,
    /// `monthly_savings / monthly_income`, or 0 without income
    pub savings_rate: f64,
}

/// Monthly cash-flow aggregation over incomes and expenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CashflowBreakdown {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub net_monthly: f64,
}

/// The plan aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub liabilities: Vec<Liability>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub cashflow: CashflowBreakdown,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Plan {
    /// Builds a plan from its collections with derived fields computed.
    pub fn new(
        assets: Vec<Asset>,
        liabilities: Vec<Liability>,
        incomes: Vec<Income>,
        expenses: Vec<Expense>,
    ) -> Self {
        let mut plan = Self {
            assets,
            liabilities,
            incomes,
            expenses,
            ..Self::default()
        };
        plan.recompute_summary();
        plan.recompute_cashflow();
        plan
    }

    /// Assembles a plan from a flat list of records, in list order.
    pub fn from_records(records: impl IntoIterator<Item = PlanRecord>) -> Self {
        let mut plan = Self::default();
        for record in records {
            plan.insert(record);
        }
        plan.recompute_summary();
        plan.recompute_cashflow();
        plan
    }

    /// Recomputes the summary from all four collections.
    pub fn recompute_summary(&mut self) {
        self.summary = compute_summary(
            &self.assets,
            &self.liabilities,
            &self.incomes,
            &self.expenses,
        );
    }

    /// Recomputes the cashflow breakdown from incomes and expenses.
    pub fn recompute_cashflow(&mut self) {
        self.cashflow = compute_cashflow(&self.incomes, &self.expenses);
    }

    /// Appends a record to its collection. Derived fields are not touched.
    pub fn insert(&mut self, record: PlanRecord) {
        match record {
            PlanRecord::Asset(a) => self.assets.push(a),
            PlanRecord::Liability(l) => self.liabilities.push(l),
            PlanRecord::Income(i) => self.incomes.push(i),
            PlanRecord::Expense(e) => self.expenses.push(e),
        }
    }

    /// Removes the entity with `id` from the collection of `kind`.
    pub fn remove(&mut self, kind: EntityKind, id: &str) -> Option<PlanRecord> {
        fn take<T: PlanEntity>(items: &mut Vec<T>, id: &str) -> Option<T> {
            let pos = items.iter().position(|item| item.id() == id)?;
            Some(items.remove(pos))
        }
        match kind {
            EntityKind::Asset => take(&mut self.assets, id).map(PlanRecord::Asset),
            EntityKind::Liability => take(&mut self.liabilities, id).map(PlanRecord::Liability),
            EntityKind::Income => take(&mut self.incomes, id).map(PlanRecord::Income),
            EntityKind::Expense => take(&mut self.expenses, id).map(PlanRecord::Expense),
        }
    }

    /// Looks up an entity by identity.
    pub fn find(&self, kind: EntityKind, id: &str) -> Option<PlanRecord> {
        match kind {
            EntityKind::Asset => self
                .assets
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .map(PlanRecord::Asset),
            EntityKind::Liability => self
                .liabilities
                .iter()
                .find(|l| l.id == id)
                .cloned()
                .map(PlanRecord::Liability),
            EntityKind::Income => self
                .incomes
                .iter()
                .find(|i| i.id == id)
                .cloned()
                .map(PlanRecord::Income),
            EntityKind::Expense => self
                .expenses
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .map(PlanRecord::Expense),
        }
    }

    /// Changes an entity's identity, e.g. to adopt a server-assigned id.
    pub fn reassign_id(&mut self, kind: EntityKind, old_id: &str, new_id: &str) -> bool {
        let slot = match kind {
            EntityKind::Asset => self
                .assets
                .iter_mut()
                .find(|a| a.id == old_id)
                .map(|a| &mut a.id),
            EntityKind::Liability => self
                .liabilities
                .iter_mut()
                .find(|l| l.id == old_id)
                .map(|l| &mut l.id),
            EntityKind::Income => self
                .incomes
                .iter_mut()
                .find(|i| i.id == old_id)
                .map(|i| &mut i.id),
            EntityKind::Expense => self
                .expenses
                .iter_mut()
                .find(|e| e.id == old_id)
                .map(|e| &mut e.id),
        };
        match slot {
            Some(id) => {
                *id = new_id.to_string();
                true
            }
            None => false,
        }
    }

    /// Checks that every magnitude is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        fn check(entity: EntityKind, name: &str, amount: f64) -> Result<()> {
            if amount.is_finite() && amount >= 0.0 {
                Ok(())
            } else {
                Err(ValidationError::InvalidAmount {
                    entity,
                    name: name.to_string(),
                    amount,
                }
                .into())
            }
        }
        for a in &self.assets {
            check(EntityKind::Asset, &a.name, a.current_value)?;
        }
        for l in &self.liabilities {
            check(EntityKind::Liability, &l.name, l.current_balance)?;
            check(EntityKind::Liability, &l.name, l.minimum_payment)?;
        }
        for i in &self.incomes {
            check(EntityKind::Income, &i.source, i.amount)?;
        }
        for e in &self.expenses {
            check(EntityKind::Expense, &e.payee, e.amount)?;
        }
        Ok(())
    }
}

/// One entity of any kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "entity", rename_all = "lowercase")]
pub enum PlanRecord {
    Asset(Asset),
    Liability(Liability),
    Income(Income),
    Expense(Expense),
}

impl PlanRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            PlanRecord::Asset(_) => EntityKind::Asset,
            PlanRecord::Liability(_) => EntityKind::Liability,
            PlanRecord::Income(_) => EntityKind::Income,
            PlanRecord::Expense(_) => EntityKind::Expense,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            PlanRecord::Asset(a) => a.id(),
            PlanRecord::Liability(l) => l.id(),
            PlanRecord::Income(i) => i.id(),
            PlanRecord::Expense(e) => e.id(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            PlanRecord::Asset(a) => a.display_name(),
            PlanRecord::Liability(l) => l.display_name(),
            PlanRecord::Income(i) => i.display_name(),
            PlanRecord::Expense(e) => e.display_name(),
        }
    }

    pub fn primary_amount(&self) -> f64 {
        match self {
            PlanRecord::Asset(a) => a.primary_amount(),
            PlanRecord::Liability(l) => l.primary_amount(),
            PlanRecord::Income(i) => i.primary_amount(),
            PlanRecord::Expense(e) => e.primary_amount(),
        }
    }

    /// Serializes the inner entity without the `entity` tag, as the
    /// per-resource endpoints expect.
    pub fn to_entity_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            PlanRecord::Asset(a) => serde_json::to_value(a),
            PlanRecord::Liability(l) => serde_json::to_value(l),
            PlanRecord::Income(i) => serde_json::to_value(i),
            PlanRecord::Expense(e) => serde_json::to_value(e),
        }
    }

    /// Parses an untagged entity body of the given kind.
    pub fn from_entity_json(
        kind: EntityKind,
        value: serde_json::Value,
    ) -> serde_json::Result<Self> {
        Ok(match kind {
            EntityKind::Asset => PlanRecord::Asset(serde_json::from_value(value)?),
            EntityKind::Liability => PlanRecord::Liability(serde_json::from_value(value)?),
            EntityKind::Income => PlanRecord::Income(serde_json::from_value(value)?),
            EntityKind::Expense => PlanRecord::Expense(serde_json::from_value(value)?),
        })
    }
}
