//! Generator contract: a parameter tuple in, a full [`HrDataset`] out.

mod rng;
mod synthetic;

pub use synthetic::SyntheticHrGenerator;

use crate::dataset::HrDataset;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const EMPLOYEE_COUNT_RANGE: RangeInclusive<usize> = 10..=10_000;
pub const ATTRITION_RATE_RANGE: RangeInclusive<f64> = 0.0..=0.3;
pub const NOISE_STD_RANGE: RangeInclusive<f64> = 0.0..=0.5;
pub const GROWTH_RATE_RANGE: RangeInclusive<f64> = 0.0..=0.15;
pub const BACKFILL_RATE_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Everything that determines a generated dataset; doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub n_employees: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    pub include_attrition: bool,
    pub attrition_rate: f64,
    pub noise_std: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub include_hiring: bool,
    pub growth_rate: f64,
    pub backfill_rate: f64,
}

impl GenerationParams {
    /// Dashboard defaults: 100 employees over five years of history ending `today`.
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            n_employees: 100,
            seed: None,
            include_attrition: true,
            attrition_rate: 0.12,
            noise_std: 0.2,
            start_date: history_start(today, 5),
            end_date: today,
            include_hiring: false,
            growth_rate: 0.05,
            backfill_rate: 0.85,
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn end_year(&self) -> i32 {
        self.end_date.year()
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !EMPLOYEE_COUNT_RANGE.contains(&self.n_employees) {
            return Err(GeneratorError::InvalidParameter {
                name: "n_employees",
                detail: format!(
                    "{} is outside {}..={}",
                    self.n_employees,
                    EMPLOYEE_COUNT_RANGE.start(),
                    EMPLOYEE_COUNT_RANGE.end()
                ),
            });
        }

        check_rate("attrition_rate", self.attrition_rate, ATTRITION_RATE_RANGE)?;
        check_rate("noise_std", self.noise_std, NOISE_STD_RANGE)?;
        check_rate("growth_rate", self.growth_rate, GROWTH_RATE_RANGE)?;
        check_rate("backfill_rate", self.backfill_rate, BACKFILL_RATE_RANGE)?;

        if self.start_date > self.end_date {
            return Err(GeneratorError::InvalidParameter {
                name: "start_date",
                detail: format!("{} is after end_date {}", self.start_date, self.end_date),
            });
        }

        Ok(())
    }
}

/// January 1st, `years` years before `today`.
pub fn history_start(today: NaiveDate, years: u32) -> NaiveDate {
    let year = today.year() - years as i32;
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today)
}

fn check_rate(
    name: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), GeneratorError> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(GeneratorError::InvalidParameter {
            name,
            detail: format!("{value} is outside {}..={}", range.start(), range.end()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("invalid generation parameter `{name}`: {detail}")]
    InvalidParameter { name: &'static str, detail: String },
    #[error("unable to obtain a random seed: {0}")]
    Entropy(String),
}

/// Seam for whatever produces the workforce tables.
pub trait HrDataGenerator: Send + Sync {
    fn generate(&self, params: &GenerationParams) -> Result<HrDataset, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    #[test]
    fn defaults_cover_five_calendar_years() {
        let params = GenerationParams::with_defaults(today());
        assert_eq!(
            params.start_date,
            NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date")
        );
        assert_eq!(params.end_year(), 2025);
        params.validate().expect("defaults are valid");
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let mut params = GenerationParams::with_defaults(today());
        params.attrition_rate = 0.45;
        let err = params.validate().expect_err("attrition above 30% rejected");
        assert!(err.to_string().contains("attrition_rate"));

        let mut params = GenerationParams::with_defaults(today());
        params.n_employees = 5;
        assert!(params.validate().is_err());

        let mut params = GenerationParams::with_defaults(today());
        params.start_date = params.end_date + chrono::Duration::days(1);
        assert!(params.validate().is_err());

        let mut params = GenerationParams::with_defaults(today());
        params.noise_std = f64::NAN;
        assert!(params.validate().is_err());
    }
}
