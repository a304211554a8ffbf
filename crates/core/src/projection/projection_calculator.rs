//! Multi-year net-worth projection.
//!
//! Each asset becomes a growth bucket and each liability an amortization
//! bucket. Every projected year the yearly savings are reallocated across the
//! growth buckets, buckets grow or amortize, cash flow is inflated, and a
//! timeline point is emitted. Intermediate bucket values are never rounded;
//! only emitted figures are rounded to whole units.

use chrono::{Datelike, Utc};
use log::debug;

use super::projection_model::{ProjectionAssumptions, ProjectionSettings, Timeline, TimelinePoint};
use crate::constants::{MAX_PROJECTION_YEARS, MONTHS_PER_YEAR};
use crate::plan::{monthly_expense_total, monthly_income_total, Asset, Liability, Plan};
use crate::utils::money::{round_cents, round_whole};

#[derive(Debug, Clone, Copy, PartialEq)]
struct GrowthBucket {
    value: f64,
    rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AmortizationBucket {
    balance: f64,
    rate: f64,
    minimum_payment: f64,
}

impl AmortizationBucket {
    fn amortize_year(&mut self) {
        if self.balance <= 0.0 {
            self.balance = 0.0;
            return;
        }
        let interest = self.balance * self.rate;
        let yearly_payment = round_cents(self.minimum_payment * MONTHS_PER_YEAR);
        self.balance = (self.balance + interest - yearly_payment).max(0.0);
    }
}

/// Number of yearly iterations, excluding the year-0 point.
///
/// With a retirement age this is `min(max_years, max(1, retirement_age - current_age))`;
/// without one the full `max_years` horizon is used.
pub fn projection_horizon(current_age: u32, retirement_age: Option<u32>, max_years: u32) -> u32 {
    let max_years = max_years.min(MAX_PROJECTION_YEARS);
    match retirement_age {
        Some(retirement_age) => max_years.min(retirement_age.saturating_sub(current_age).max(1)),
        None => max_years,
    }
}

/// Projects net worth forward one point per year.
///
/// Returns `projection_horizon(..) + 1` points ordered by ascending age and year,
/// starting with the unmodified current totals.
#[allow(clippy::too_many_arguments)]
pub fn project(
    assets: &[Asset],
    liabilities: &[Liability],
    monthly_income: f64,
    monthly_expenses: f64,
    current_age: u32,
    retirement_age: Option<u32>,
    start_year: Option<i32>,
    assumptions: Option<&ProjectionAssumptions>,
) -> Timeline {
    let assumptions = assumptions.copied().unwrap_or_default();
    let start_year = start_year.unwrap_or_else(|| Utc::now().year());
    let horizon = projection_horizon(current_age, retirement_age, assumptions.max_projection_years);

    let mut growth = growth_buckets(assets, assumptions.default_growth_rate);
    let mut debts = amortization_buckets(liabilities, assumptions.liability_rate_floor);
    let mut income = monthly_income;
    let mut expenses = monthly_expenses;

    debug!(
        "Projecting {} years from age {} ({} growth buckets, {} liabilities)",
        horizon,
        current_age,
        growth.len(),
        debts.len()
    );

    let mut timeline = Vec::with_capacity(horizon as usize + 1);
    timeline.push(emit_point(current_age, start_year, &growth, &debts, income, expenses));

    for offset in 1..=horizon {
        let yearly_savings = round_cents((income - expenses) * MONTHS_PER_YEAR);
        reallocate(&mut growth, yearly_savings);

        for bucket in growth.iter_mut() {
            bucket.value *= 1.0 + bucket.rate;
        }
        for bucket in debts.iter_mut() {
            bucket.amortize_year();
        }

        income = round_cents(income * (1.0 + assumptions.inflation_rate));
        expenses = round_cents(expenses * (1.0 + assumptions.inflation_rate));

        timeline.push(emit_point(
            current_age.saturating_add(offset),
            start_year.saturating_add(offset as i32),
            &growth,
            &debts,
            income,
            expenses,
        ));
    }

    timeline
}

/// Projects a plan under the given settings.
pub fn project_plan(
    plan: &Plan,
    settings: &ProjectionSettings,
    start_year: Option<i32>,
) -> Timeline {
    let assumptions = settings.assumptions();
    project(
        &plan.assets,
        &plan.liabilities,
        monthly_income_total(&plan.incomes),
        monthly_expense_total(&plan.expenses),
        settings.current_age,
        Some(settings.retirement_age),
        start_year,
        Some(&assumptions),
    )
}

fn growth_buckets(assets: &[Asset], default_rate: f64) -> Vec<GrowthBucket> {
    if assets.is_empty() {
        // Synthetic destination for savings when the plan holds no assets
        return vec![GrowthBucket {
            value: 0.0,
            rate: default_rate,
        }];
    }
    assets
        .iter()
        .map(|asset| GrowthBucket {
            value: asset.current_value,
            rate: asset
                .annual_growth_rate
                .filter(|rate| rate.is_finite())
                .unwrap_or(default_rate),
        })
        .collect()
}

fn amortization_buckets(liabilities: &[Liability], rate_floor: f64) -> Vec<AmortizationBucket> {
    liabilities
        .iter()
        .map(|liability| {
            let rate = liability.interest_rate_apr;
            AmortizationBucket {
                balance: liability.current_balance.max(0.0),
                rate: if rate.is_finite() && rate >= rate_floor {
                    rate
                } else {
                    rate_floor
                },
                minimum_payment: liability.minimum_payment.max(0.0),
            }
        })
        .collect()
}

/// Spreads a year's savings (or shortfall) across the growth buckets.
///
/// Positive amounts are split proportionally to each positive bucket's value,
/// or go entirely to the first bucket when none is positive. Negative amounts
/// are withdrawn from the largest bucket downward; whatever cannot be covered
/// is taken from the first bucket, which may go negative.
fn reallocate(buckets: &mut [GrowthBucket], amount: f64) {
    if buckets.is_empty() || amount == 0.0 || !amount.is_finite() {
        return;
    }

    if amount > 0.0 {
        let positive_total: f64 = buckets
            .iter()
            .filter(|b| b.value > 0.0)
            .map(|b| b.value)
            .sum();
        if positive_total <= 0.0 {
            buckets[0].value += amount;
            return;
        }
        for bucket in buckets.iter_mut().filter(|b| b.value > 0.0) {
            bucket.value += amount * (bucket.value / positive_total);
        }
        return;
    }

    let mut remaining = -amount;
    let mut order: Vec<usize> = (0..buckets.len()).collect();
    order.sort_by(|&a, &b| buckets[b].value.total_cmp(&buckets[a].value));

    for idx in order {
        if remaining <= 0.0 {
            break;
        }
        let available = buckets[idx].value;
        if available <= 0.0 {
            continue;
        }
        let taken = available.min(remaining);
        buckets[idx].value -= taken;
        remaining -= taken;
    }

    if remaining > 0.0 {
        buckets[0].value -= remaining;
    }
}

fn emit_point(
    age: u32,
    year: i32,
    growth: &[GrowthBucket],
    debts: &[AmortizationBucket],
    monthly_income: f64,
    monthly_expenses: f64,
) -> TimelinePoint {
    let total_assets = round_whole(growth.iter().map(|b| b.value).sum());
    let total_liabilities = round_whole(debts.iter().map(|b| b.balance).sum());
    TimelinePoint {
        age,
        year,
        total_assets,
        total_liabilities,
        net_worth: total_assets - total_liabilities,
        monthly_income: round_whole(monthly_income),
        monthly_expenses: round_whole(monthly_expenses),
        monthly_savings: round_whole(monthly_income - monthly_expenses),
    }
}

#[cfg(test)]
mod reallocation_tests {
    use super::*;

    fn buckets(values: &[f64]) -> Vec<GrowthBucket> {
        values
            .iter()
            .map(|&value| GrowthBucket { value, rate: 0.0 })
            .collect()
    }

    fn values(buckets: &[GrowthBucket]) -> Vec<f64> {
        buckets.iter().map(|b| b.value).collect()
    }

    #[test]
    fn test_positive_savings_split_proportionally() {
        let mut b = buckets(&[3_000.0, 1_000.0, 0.0]);
        reallocate(&mut b, 400.0);
        assert_eq!(values(&b), vec![3_300.0, 1_100.0, 0.0]);
    }

    #[test]
    fn test_positive_savings_without_positive_bucket_go_to_first() {
        let mut b = buckets(&[0.0, -50.0]);
        reallocate(&mut b, 400.0);
        assert_eq!(values(&b), vec![400.0, -50.0]);
    }

    #[test]
    fn test_shortfall_withdraws_from_largest_first() {
        let mut b = buckets(&[1_000.0, 5_000.0, 2_000.0]);
        reallocate(&mut b, -6_000.0);
        assert_eq!(values(&b), vec![1_000.0, 0.0, 1_000.0]);
    }

    #[test]
    fn test_uncovered_shortfall_drives_first_bucket_negative() {
        let mut b = buckets(&[1_000.0, 500.0]);
        reallocate(&mut b, -2_000.0);
        assert_eq!(values(&b), vec![-500.0, 0.0]);
    }

    #[test]
    fn test_liability_amortization_stops_at_zero() {
        let mut bucket = AmortizationBucket {
            balance: 1_000.0,
            rate: 0.10,
            minimum_payment: 500.0,
        };
        bucket.amortize_year();
        assert_eq!(bucket.balance, 0.0);
        bucket.amortize_year();
        assert_eq!(bucket.balance, 0.0);
    }
}
