/// Decimal places kept on currency figures crossing a sub-calculation boundary
pub const CURRENCY_PRECISION: i32 = 2;

/// Months per year, used for monthly/yearly cash-flow aggregation
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Category assigned to entities synthesized from an intent action
pub const DEFAULT_CATEGORY: &str = "other";

/// Default annual growth rate for assets without an explicit rate
pub const DEFAULT_GROWTH_RATE: f64 = 0.05;

/// Default annual inflation applied to income and expenses
pub const DEFAULT_INFLATION_RATE: f64 = 0.02;

/// Lowest APR a liability bucket may carry during projection
pub const LIABILITY_RATE_FLOOR: f64 = 0.0;

/// Hard cap on the number of projected years
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Default number of projected years
pub const DEFAULT_PROJECTION_YEARS: u32 = 50;

/// Upper bound accepted for current and retirement ages
pub const MAX_AGE: u32 = 150;
