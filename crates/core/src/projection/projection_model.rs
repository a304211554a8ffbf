//! Projection domain models.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GROWTH_RATE, DEFAULT_INFLATION_RATE, DEFAULT_PROJECTION_YEARS, LIABILITY_RATE_FLOOR,
    MAX_AGE, MAX_PROJECTION_YEARS,
};
use crate::errors::{Error, Result, ValidationError};

/// User-tunable projection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSettings {
    pub current_age: u32,
    pub retirement_age: u32,
    pub projection_years: u32,
    pub inflation_rate: f64,
    /// Growth applied to assets that carry no explicit rate.
    pub average_return_rate: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            current_age: 30,
            retirement_age: 65,
            projection_years: DEFAULT_PROJECTION_YEARS,
            inflation_rate: DEFAULT_INFLATION_RATE,
            average_return_rate: DEFAULT_GROWTH_RATE,
        }
    }
}

impl ProjectionSettings {
    /// Validates the settings.
    pub fn validate(&self) -> Result<()> {
        for (field, age) in [
            ("currentAge", self.current_age),
            ("retirementAge", self.retirement_age),
        ] {
            if age > MAX_AGE {
                return Err(invalid(field, format!("must not exceed {}", MAX_AGE), age));
            }
        }
        if self.projection_years == 0 {
            return Err(invalid("projectionYears", "must be at least 1".to_string(), 0));
        }
        if self.projection_years > MAX_PROJECTION_YEARS {
            return Err(invalid(
                "projectionYears",
                format!("must not exceed {}", MAX_PROJECTION_YEARS),
                self.projection_years,
            ));
        }
        for (field, rate) in [
            ("inflationRate", self.inflation_rate),
            ("averageReturnRate", self.average_return_rate),
        ] {
            if !rate.is_finite() || rate <= -1.0 {
                return Err(invalid(field, "must be a finite rate above -1".to_string(), rate));
            }
        }
        Ok(())
    }

    /// Builds the engine assumptions these settings imply.
    pub fn assumptions(&self) -> ProjectionAssumptions {
        ProjectionAssumptions {
            default_growth_rate: self.average_return_rate,
            inflation_rate: self.inflation_rate,
            liability_rate_floor: LIABILITY_RATE_FLOOR,
            max_projection_years: self.projection_years.min(MAX_PROJECTION_YEARS),
        }
    }
}

fn invalid(field: &'static str, constraint: String, value: impl ToString) -> Error {
    ValidationError::InvalidSetting {
        field,
        constraint,
        value: value.to_string(),
    }
    .into()
}

/// Numeric assumptions consumed by the projection engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionAssumptions {
    pub default_growth_rate: f64,
    pub inflation_rate: f64,
    /// Lowest APR a liability may carry; missing or invalid rates use it.
    pub liability_rate_floor: f64,
    pub max_projection_years: u32,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        ProjectionSettings::default().assumptions()
    }
}

/// One projected year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub age: u32,
    pub year: i32,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_savings: f64,
}

/// Ordered yearly points, ascending by age and year.
pub type Timeline = Vec<TimelinePoint>;
