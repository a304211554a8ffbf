//! Property-based integration tests for the plan model, projection and intents.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use wealthplan_core::intents::{
    apply_action, normalize, resolve_index, IntentAction, IntentEntity, IntentVerb,
};
use wealthplan_core::{
    project, projection_horizon, Asset, Expense, Frequency, Income, Liability, Plan,
    ProjectionAssumptions,
};

// =============================================================================
// Generators
// =============================================================================

fn arb_frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Weekly),
        Just(Frequency::Biweekly),
        Just(Frequency::Monthly),
        Just(Frequency::Quarterly),
        Just(Frequency::Yearly),
    ]
}

/// Money amounts in cents, so generated values are exact to two decimals.
fn arb_money() -> impl Strategy<Value = f64> {
    (0u64..100_000_000).prop_map(|cents| cents as f64 / 100.0)
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-m]{3,10}( [a-m]{3,10})?"
}

fn arb_asset() -> impl Strategy<Value = Asset> {
    (
        "[a-f0-9]{8}",
        arb_name(),
        arb_money(),
        proptest::option::of(-0.05f64..0.15),
    )
        .prop_map(|(id, name, value, rate)| Asset {
            id,
            name,
            category: "investments".to_string(),
            current_value: value,
            annual_growth_rate: rate,
            notes: None,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        })
}

fn arb_liability() -> impl Strategy<Value = Liability> {
    ("[a-f0-9]{8}", arb_name(), arb_money(), 0.0f64..0.25, 0u32..5_000).prop_map(
        |(id, name, balance, apr, payment)| Liability {
            id,
            name,
            category: "loan".to_string(),
            current_balance: balance,
            interest_rate_apr: apr,
            minimum_payment: payment as f64,
            notes: None,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        },
    )
}

fn arb_income() -> impl Strategy<Value = Income> {
    ("[a-f0-9]{8}", arb_name(), 1u32..20_000, arb_frequency()).prop_map(
        |(id, source, amount, frequency)| Income {
            id,
            source,
            amount: amount as f64,
            frequency,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: "salary".to_string(),
            notes: None,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        },
    )
}

fn arb_expense() -> impl Strategy<Value = Expense> {
    ("[a-f0-9]{8}", arb_name(), 1u32..20_000, arb_frequency()).prop_map(
        |(id, payee, amount, frequency)| Expense {
            id,
            payee,
            amount: amount as f64,
            frequency,
            category: "living".to_string(),
            notes: None,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        },
    )
}

fn arb_plan() -> impl Strategy<Value = Plan> {
    (
        prop::collection::vec(arb_asset(), 0..6),
        prop::collection::vec(arb_liability(), 0..4),
        prop::collection::vec(arb_income(), 0..3),
        prop::collection::vec(arb_expense(), 0..5),
    )
        .prop_map(|(assets, liabilities, incomes, expenses)| {
            Plan::new(assets, liabilities, incomes, expenses)
        })
}

// =============================================================================
// Plan summary properties
// =============================================================================

proptest! {
    #[test]
    fn prop_net_worth_is_assets_minus_liabilities(plan in arb_plan()) {
        prop_assert_eq!(
            plan.summary.net_worth,
            plan.summary.total_assets - plan.summary.total_liabilities
        );
    }

    #[test]
    fn prop_savings_rate_is_zero_without_income(
        expenses in prop::collection::vec(arb_expense(), 0..5)
    ) {
        let plan = Plan::new(vec![], vec![], vec![], expenses);
        prop_assert_eq!(plan.summary.savings_rate, 0.0);
        prop_assert!(plan.summary.savings_rate.is_finite());
    }

    #[test]
    fn prop_cashflow_matches_summary(plan in arb_plan()) {
        prop_assert_eq!(plan.cashflow.monthly_income, plan.summary.monthly_income);
        prop_assert_eq!(plan.cashflow.monthly_expenses, plan.summary.monthly_expenses);
    }
}

// =============================================================================
// Projection properties
// =============================================================================

proptest! {
    #[test]
    fn prop_timeline_length_and_order(
        plan in arb_plan(),
        current_age in 18u32..90,
        gap in 0u32..60,
    ) {
        let retirement_age = current_age + gap;
        let assumptions = ProjectionAssumptions::default();
        let timeline = project(
            &plan.assets,
            &plan.liabilities,
            plan.summary.monthly_income,
            plan.summary.monthly_expenses,
            current_age,
            Some(retirement_age),
            Some(2024),
            Some(&assumptions),
        );

        let horizon = projection_horizon(
            current_age,
            Some(retirement_age),
            assumptions.max_projection_years,
        );
        prop_assert!(horizon >= 1);
        prop_assert_eq!(timeline.len(), horizon as usize + 1);
        for (i, point) in timeline.iter().enumerate() {
            prop_assert_eq!(point.age, current_age + i as u32);
            prop_assert_eq!(point.year, 2024 + i as i32);
            prop_assert!(point.total_liabilities >= 0.0);
            prop_assert!(point.net_worth.is_finite());
        }
    }

    #[test]
    fn prop_first_point_reflects_current_totals(plan in arb_plan()) {
        let timeline = project(
            &plan.assets,
            &plan.liabilities,
            plan.summary.monthly_income,
            plan.summary.monthly_expenses,
            40,
            Some(41),
            Some(2024),
            None,
        );
        let (start, summary) = (&timeline[0], &plan.summary);
        prop_assert!((start.total_assets - summary.total_assets).abs() <= 0.5 + 1e-6);
        prop_assert!((start.total_liabilities - summary.total_liabilities).abs() <= 0.5 + 1e-6);
        prop_assert_eq!(timeline[0].total_assets.fract(), 0.0);
    }
}

// =============================================================================
// Intent properties
// =============================================================================

proptest! {
    #[test]
    fn prop_resolving_an_existing_name_finds_a_matching_entity(
        assets in prop::collection::vec(arb_asset(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = assets[pick.index(assets.len())].name.clone();
        let idx = resolve_index(&assets, &target);
        prop_assert!(idx.is_some());
        let idx = idx.unwrap();
        prop_assert_eq!(normalize(&assets[idx].name), normalize(&target));
        // Exact matches win, so the first entity with that name is chosen.
        prop_assert!(assets[..idx].iter().all(|a| normalize(&a.name) != normalize(&target)));
    }

    #[test]
    fn prop_failed_action_leaves_plan_untouched(plan in arb_plan(), amount in arb_money()) {
        let mut working = plan.clone();
        // Generated names only use a-m, so this never matches.
        let action =
            IntentAction::new(IntentVerb::Update, IntentEntity::Asset, "zzz", Some(amount));
        prop_assert!(apply_action(&mut working, &action, Utc::now()).is_err());
        prop_assert_eq!(working, plan);
    }

    #[test]
    fn prop_update_sets_amount_and_keeps_net_worth_consistent(
        assets in prop::collection::vec(arb_asset(), 1..6),
        pick in any::<prop::sample::Index>(),
        amount in arb_money(),
    ) {
        let mut plan = Plan::new(assets, vec![], vec![], vec![]);
        let target = plan.assets[pick.index(plan.assets.len())].name.clone();
        let idx = resolve_index(&plan.assets, &target).unwrap();

        let action =
            IntentAction::new(IntentVerb::Update, IntentEntity::Asset, target, Some(amount));
        apply_action(&mut plan, &action, Utc::now()).unwrap();

        prop_assert_eq!(plan.assets[idx].current_value, amount);
        prop_assert_eq!(
            plan.summary.net_worth,
            plan.summary.total_assets - plan.summary.total_liabilities
        );
    }
}
