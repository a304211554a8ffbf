//! Plan module - the aggregate root and its derived summary.

mod plan_model;
mod plan_summary;
mod plan_traits;

pub use plan_model::*;
pub use plan_summary::{
    compute_cashflow, compute_summary, monthly_expense_total, monthly_income_total,
};
pub use plan_traits::PlanRepositoryTrait;

#[cfg(test)]
mod plan_model_tests;

#[cfg(test)]
pub(crate) mod plan_fixtures;
