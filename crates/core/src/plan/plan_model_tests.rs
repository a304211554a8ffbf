//! Tests for plan models and summary aggregation.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, ValidationError};
    use crate::plan::plan_fixtures::{asset, expense, income, liability};
    use crate::plan::{compute_summary, EntityKind, Frequency, Plan, PlanRecord};

    // ==================== Frequency ====================

    #[test]
    fn test_frequency_monthly_factor() {
        assert_eq!(Frequency::Monthly.monthly_factor(), 1.0);
        assert!((Frequency::Weekly.monthly_factor() - 52.0 / 12.0).abs() < 1e-12);
        assert!((Frequency::Biweekly.monthly_factor() - 26.0 / 12.0).abs() < 1e-12);
        assert!((Frequency::Quarterly.monthly_factor() - 1.0 / 3.0).abs() < 1e-12);
        assert!((Frequency::Yearly.monthly_factor() - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_serialization() {
        assert_eq!(
            serde_json::to_string(&Frequency::Biweekly).unwrap(),
            "\"biweekly\""
        );
        assert_eq!(
            serde_json::from_str::<Frequency>("\"yearly\"").unwrap(),
            Frequency::Yearly
        );
    }

    // ==================== Summary ====================

    #[test]
    fn test_summary_totals_and_net_worth() {
        let plan = Plan::new(
            vec![asset("a1", "Savings", 12_000.0), asset("a2", "Brokerage", 30_000.5)],
            vec![liability("l1", "Car Loan", 8_000.25, 0.06, 300.0)],
            vec![income("i1", "Salary", 6_000.0, Frequency::Monthly)],
            vec![expense("e1", "Rent", 2_000.0, Frequency::Monthly)],
        );

        assert_eq!(plan.summary.total_assets, 42_000.5);
        assert_eq!(plan.summary.total_liabilities, 8_000.25);
        assert_eq!(
            plan.summary.net_worth,
            plan.summary.total_assets - plan.summary.total_liabilities
        );
        assert_eq!(plan.summary.monthly_income, 6_000.0);
        assert_eq!(plan.summary.monthly_expenses, 2_000.0);
        assert_eq!(plan.summary.monthly_savings, 4_000.0);
        assert!((plan.summary.savings_rate - 4_000.0 / 6_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_normalises_frequencies() {
        let summary = compute_summary(
            &[],
            &[],
            &[
                income("i1", "Paycheck", 2_000.0, Frequency::Biweekly),
                income("i2", "Bonus", 12_000.0, Frequency::Yearly),
            ],
            &[expense("e1", "Insurance", 300.0, Frequency::Quarterly)],
        );

        // 2000 * 26 / 12 = 4333.33..., plus 1000
        assert_eq!(summary.monthly_income, 5_333.33);
        assert_eq!(summary.monthly_expenses, 100.0);
        assert_eq!(summary.monthly_savings, 5_233.33);
    }

    #[test]
    fn test_zero_income_savings_rate_is_zero() {
        let summary = compute_summary(
            &[],
            &[],
            &[],
            &[expense("e1", "Rent", 1_500.0, Frequency::Monthly)],
        );

        assert_eq!(summary.monthly_income, 0.0);
        assert_eq!(summary.monthly_savings, -1_500.0);
        assert_eq!(summary.savings_rate, 0.0);
        assert!(summary.savings_rate.is_finite());
    }

    #[test]
    fn test_cashflow_breakdown_matches_summary() {
        let plan = Plan::new(
            vec![],
            vec![],
            vec![income("i1", "Salary", 8_000.0, Frequency::Monthly)],
            vec![
                expense("e1", "Mortgage", 2_500.0, Frequency::Monthly),
                expense("e2", "Utilities", 500.0, Frequency::Monthly),
            ],
        );

        assert_eq!(plan.cashflow.monthly_income, 8_000.0);
        assert_eq!(plan.cashflow.monthly_expenses, 3_000.0);
        assert_eq!(plan.cashflow.net_monthly, 5_000.0);
        assert_eq!(plan.summary.monthly_savings, plan.cashflow.net_monthly);
    }

    // ==================== Collection helpers ====================

    #[test]
    fn test_from_records_keeps_order_and_computes_summary() {
        let plan = Plan::from_records(vec![
            PlanRecord::Asset(asset("a1", "Checking", 1_000.0)),
            PlanRecord::Liability(liability("l1", "Card", 250.0, 0.2, 25.0)),
            PlanRecord::Asset(asset("a2", "Savings", 2_000.0)),
        ]);

        assert_eq!(plan.assets.len(), 2);
        assert_eq!(plan.assets[0].name, "Checking");
        assert_eq!(plan.assets[1].name, "Savings");
        assert_eq!(plan.summary.net_worth, 2_750.0);
    }

    #[test]
    fn test_remove_and_find() {
        let mut plan = Plan::new(
            vec![asset("a1", "Checking", 1_000.0)],
            vec![],
            vec![],
            vec![expense("e1", "Gym", 50.0, Frequency::Monthly)],
        );

        assert!(plan.find(EntityKind::Expense, "e1").is_some());
        let removed = plan.remove(EntityKind::Expense, "e1").unwrap();
        assert_eq!(removed.display_name(), "Gym");
        assert!(plan.find(EntityKind::Expense, "e1").is_none());
        assert!(plan.remove(EntityKind::Expense, "e1").is_none());
        assert!(plan.remove(EntityKind::Asset, "missing").is_none());
    }

    #[test]
    fn test_reassign_id() {
        let mut plan = Plan::new(vec![asset("local-1", "Stocks", 10.0)], vec![], vec![], vec![]);

        assert!(plan.reassign_id(EntityKind::Asset, "local-1", "srv-9"));
        assert_eq!(plan.assets[0].id, "srv-9");
        assert!(!plan.reassign_id(EntityKind::Asset, "local-1", "srv-10"));
    }

    #[test]
    fn test_validate_rejects_negative_and_non_finite() {
        let mut plan = Plan::new(vec![asset("a1", "Cash", 10.0)], vec![], vec![], vec![]);
        assert!(plan.validate().is_ok());

        plan.assets[0].current_value = -1.0;
        match plan.validate() {
            Err(Error::Validation(ValidationError::InvalidAmount {
                entity,
                name,
                amount,
            })) => {
                assert_eq!(entity, EntityKind::Asset);
                assert_eq!(name, "Cash");
                assert_eq!(amount, -1.0);
            }
            other => panic!("expected InvalidAmount, got {other:?}"),
        }

        plan.assets[0].current_value = f64::NAN;
        assert!(plan.validate().is_err());
    }

    // ==================== Serialization ====================

    #[test]
    fn test_plan_serializes_camel_case() {
        let plan = Plan::new(vec![asset("a1", "Cash", 10.0)], vec![], vec![], vec![]);
        let json = serde_json::to_value(&plan).unwrap();

        assert!(json["assets"][0].get("currentValue").is_some());
        assert!(json["summary"].get("netWorth").is_some());
        assert!(json["cashflow"].get("netMonthly").is_some());
        assert!(json.get("lastUpdated").is_some());
    }

    #[test]
    fn test_record_entity_json_is_untagged() {
        let record = PlanRecord::Liability(liability("l1", "Mortgage", 200_000.0, 0.035, 1_800.0));
        let body = record.to_entity_json().unwrap();

        assert!(body.get("entity").is_none());
        assert_eq!(body["currentBalance"], 200_000.0);

        let parsed = PlanRecord::from_entity_json(EntityKind::Liability, body).unwrap();
        assert_eq!(parsed, record);
    }
}
