//! Summary and cashflow aggregation.
//!
//! Both are pure functions of the entity collections. Totals are rounded to
//! cents; `net_worth` is derived from the rounded totals with no further
//! rounding so `net_worth == total_assets - total_liabilities` holds exactly.

use super::plan_model::{Asset, CashflowBreakdown, Expense, Income, Liability, Summary};
use crate::utils::money::{round_cents, safe_ratio};

/// Sum of all incomes normalised to a monthly amount.
pub fn monthly_income_total(incomes: &[Income]) -> f64 {
    round_cents(incomes.iter().map(Income::monthly_amount).sum())
}

/// Sum of all expenses normalised to a monthly amount.
pub fn monthly_expense_total(expenses: &[Expense]) -> f64 {
    round_cents(expenses.iter().map(Expense::monthly_amount).sum())
}

pub fn compute_cashflow(incomes: &[Income], expenses: &[Expense]) -> CashflowBreakdown {
    let monthly_income = monthly_income_total(incomes);
    let monthly_expenses = monthly_expense_total(expenses);
    CashflowBreakdown {
        monthly_income,
        monthly_expenses,
        net_monthly: round_cents(monthly_income - monthly_expenses),
    }
}

pub fn compute_summary(
    assets: &[Asset],
    liabilities: &[Liability],
    incomes: &[Income],
    expenses: &[Expense],
) -> Summary {
    let total_assets = round_cents(assets.iter().map(|a| a.current_value).sum());
    let total_liabilities = round_cents(liabilities.iter().map(|l| l.current_balance).sum());
    let cashflow = compute_cashflow(incomes, expenses);

    Summary {
        total_assets,
        total_liabilities,
        net_worth: total_assets - total_liabilities,
        monthly_income: cashflow.monthly_income,
        monthly_expenses: cashflow.monthly_expenses,
        monthly_savings: cashflow.net_monthly,
        savings_rate: safe_ratio(cashflow.net_monthly, cashflow.monthly_income),
    }
}
