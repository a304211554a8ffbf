//! Builders shared by unit tests across the crate.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::plan_model::{Asset, Expense, Frequency, Income, Liability};

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

pub fn asset(id: &str, name: &str, value: f64) -> Asset {
    Asset {
        id: id.to_string(),
        name: name.to_string(),
        category: "investments".to_string(),
        current_value: value,
        annual_growth_rate: None,
        notes: None,
        updated_at: fixed_time(),
    }
}

pub fn liability(id: &str, name: &str, balance: f64, apr: f64, minimum_payment: f64) -> Liability {
    Liability {
        id: id.to_string(),
        name: name.to_string(),
        category: "loan".to_string(),
        current_balance: balance,
        interest_rate_apr: apr,
        minimum_payment,
        notes: None,
        updated_at: fixed_time(),
    }
}

pub fn income(id: &str, source: &str, amount: f64, frequency: Frequency) -> Income {
    Income {
        id: id.to_string(),
        source: source.to_string(),
        amount,
        frequency,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        category: "salary".to_string(),
        notes: None,
        updated_at: fixed_time(),
    }
}

pub fn expense(id: &str, payee: &str, amount: f64, frequency: Frequency) -> Expense {
    Expense {
        id: id.to_string(),
        payee: payee.to_string(),
        amount,
        frequency,
        category: "housing".to_string(),
        notes: None,
        updated_at: fixed_time(),
    }
}
