//! Sanity checks over a generated workforce history.
//!
//! Every check produces a [`HealthCheck`] verdict. Verdicts are advisory: a
//! failing check is reported alongside the data, it never prevents the data
//! from being used.

use super::enrich::index_by;
use super::metrics::{new_hire_seniority, terminations_in_year, year_end_headcount};
use super::resolve::resolve_current;
use crate::dataset::{Employee, HrDataset, SeniorityLevel};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Pass,
    Warning,
    Fail,
}

impl HealthStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warning => "warning",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Limits the checks compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub max_attrition_rate: f64,
    pub min_attrition_rate: f64,
    pub min_business_unit_share: f64,
    pub new_hire_tenure_years: f64,
    pub tenured_years: f64,
    pub min_junior_hire_share: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            max_attrition_rate: 0.30,
            min_attrition_rate: 0.05,
            min_business_unit_share: 0.05,
            new_hire_tenure_years: 2.0,
            tenured_years: 5.0,
            min_junior_hire_share: 0.5,
        }
    }
}

/// Scope of one health run.
#[derive(Debug, Clone)]
pub struct HealthContext {
    pub start_year: i32,
    pub end_year: i32,
    pub include_hiring: bool,
    /// Reporting date that tenure is measured against.
    pub today: NaiveDate,
    pub thresholds: HealthThresholds,
}

impl HealthContext {
    pub fn new(start_year: i32, end_year: i32, include_hiring: bool, today: NaiveDate) -> Self {
        Self {
            start_year,
            end_year,
            include_hiring,
            today,
            thresholds: HealthThresholds::default(),
        }
    }
}

pub fn run_health_checks(dataset: &HrDataset, context: &HealthContext) -> Vec<HealthCheck> {
    if dataset.employee.is_empty() {
        return vec![HealthCheck::new(
            "Data Available",
            HealthStatus::Fail,
            "No employee data found",
        )];
    }

    let thresholds = &context.thresholds;
    let mut checks = vec![
        check_headcount_trend(&dataset.employee, context.start_year, context.end_year),
        check_attrition_rate(
            &dataset.employee,
            context.start_year,
            context.end_year,
            thresholds,
        ),
        check_business_unit_distribution(dataset, thresholds),
        check_seniority_pyramid(dataset),
        check_tenure_mix(&dataset.employee, context.today, thresholds),
    ];

    if context.include_hiring {
        checks.push(check_new_hire_seniority(
            dataset,
            context.start_year,
            thresholds,
        ));
    }

    tracing::debug!(
        checks = checks.len(),
        failing = checks
            .iter()
            .filter(|check| check.status == HealthStatus::Fail)
            .count(),
        "health checks evaluated"
    );
    checks
}

pub fn check_headcount_trend(employees: &[Employee], start_year: i32, end_year: i32) -> HealthCheck {
    const NAME: &str = "Headcount Trend";

    for year in start_year..=end_year {
        let headcount = year_end_headcount(employees, year);
        if headcount < 0 {
            return HealthCheck::new(NAME, HealthStatus::Fail, format!("Negative headcount in {year}"))
                .with_details(format!("Headcount: {headcount}"));
        }
        if headcount == 0 {
            return HealthCheck::new(NAME, HealthStatus::Warning, format!("Zero headcount in {year}"))
                .with_details("All employees terminated before this date");
        }
    }

    HealthCheck::new(NAME, HealthStatus::Pass, "Headcount positive throughout")
}

pub fn check_attrition_rate(
    employees: &[Employee],
    start_year: i32,
    end_year: i32,
    thresholds: &HealthThresholds,
) -> HealthCheck {
    const NAME: &str = "Attrition Rate";

    if employees
        .iter()
        .all(|employee| employee.termination_date.is_none())
    {
        return HealthCheck::new(NAME, HealthStatus::Pass, "No attrition recorded");
    }

    let mut rates: Vec<(i32, f64)> = Vec::new();
    for year in start_year..=end_year {
        let Some(year_start) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            continue;
        };
        let active_at_start = employees
            .iter()
            .filter(|employee| {
                employee.hire_date < year_start
                    && employee
                        .termination_date
                        .map_or(true, |term| term >= year_start)
            })
            .count();
        if active_at_start == 0 {
            continue;
        }
        let rate = terminations_in_year(employees, year) as f64 / active_at_start as f64;
        rates.push((year, rate));
    }

    if rates.is_empty() {
        return HealthCheck::new(NAME, HealthStatus::Pass, "No attrition data available");
    }

    let high: Vec<i32> = rates
        .iter()
        .filter(|(_, rate)| *rate > thresholds.max_attrition_rate)
        .map(|(year, _)| *year)
        .collect();
    if !high.is_empty() {
        return HealthCheck::new(
            NAME,
            HealthStatus::Warning,
            format!("High attrition in {} year(s)", high.len()),
        )
        .with_details(format!(
            "Years above {}: {}",
            percent(thresholds.max_attrition_rate, 0),
            join_years(&high)
        ));
    }

    let low: Vec<i32> = rates
        .iter()
        .filter(|(_, rate)| *rate > 0.0 && *rate < thresholds.min_attrition_rate)
        .map(|(year, _)| *year)
        .collect();
    if !low.is_empty() {
        return HealthCheck::new(
            NAME,
            HealthStatus::Warning,
            format!("Low attrition in {} year(s)", low.len()),
        )
        .with_details(format!(
            "Years below {}: {}",
            percent(thresholds.min_attrition_rate, 0),
            join_years(&low)
        ));
    }

    let average = rates.iter().map(|(_, rate)| rate).sum::<f64>() / rates.len() as f64;
    HealthCheck::new(
        NAME,
        HealthStatus::Pass,
        format!("Avg rate: {}", percent(average, 1)),
    )
}

pub fn check_business_unit_distribution(
    dataset: &HrDataset,
    thresholds: &HealthThresholds,
) -> HealthCheck {
    const NAME: &str = "BU Distribution";

    if dataset.employee_org_assignment.is_empty() {
        return HealthCheck::new(NAME, HealthStatus::Warning, "Org data not available");
    }

    let units = index_by(&dataset.organization_unit, |unit| &unit.org_id);
    let current = resolve_current(&dataset.employee_org_assignment);
    let total = current.len();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for assignment in current.rows() {
        let business_unit = assignment.business_unit.as_deref().or_else(|| {
            units
                .get(&assignment.org_id)
                .and_then(|unit| unit.business_unit.as_deref())
        });
        if let Some(unit) = business_unit {
            *counts.entry(unit).or_default() += 1;
        }
    }

    let under_represented: Vec<&str> = counts
        .iter()
        .filter(|(_, count)| (**count as f64 / total as f64) < thresholds.min_business_unit_share)
        .map(|(unit, _)| *unit)
        .collect();

    if under_represented.is_empty() {
        HealthCheck::new(
            NAME,
            HealthStatus::Pass,
            format!("{} BUs well distributed", counts.len()),
        )
    } else {
        HealthCheck::new(
            NAME,
            HealthStatus::Warning,
            format!(
                "{} BU(s) below {}",
                under_represented.len(),
                percent(thresholds.min_business_unit_share, 0)
            ),
        )
        .with_details(format!("Low BUs: {}", under_represented.join(", ")))
    }
}

pub fn check_seniority_pyramid(dataset: &HrDataset) -> HealthCheck {
    const NAME: &str = "Seniority Pyramid";

    if dataset.employee_job_assignment.is_empty() || dataset.job_role.is_empty() {
        return HealthCheck::new(NAME, HealthStatus::Warning, "Job data not available");
    }

    let roles = index_by(&dataset.job_role, |role| &role.job_id);
    let current = resolve_current(&dataset.employee_job_assignment);
    let levels = current
        .rows()
        .filter_map(|job| roles.get(&job.job_id).map(|role| role.seniority_level));

    let (mut junior, mut senior) = (0usize, 0usize);
    for level in levels {
        if level.is_junior() {
            junior += 1;
        } else if level.is_senior() {
            senior += 1;
        }
    }

    if junior < senior {
        HealthCheck::new(NAME, HealthStatus::Warning, "Inverted pyramid")
            .with_details(format!("Junior (L1-L2): {junior}, Senior (L4-L5): {senior}"))
    } else {
        HealthCheck::new(
            NAME,
            HealthStatus::Pass,
            format!("Junior: {junior}, Senior: {senior}"),
        )
    }
}

pub fn check_tenure_mix(
    employees: &[Employee],
    today: NaiveDate,
    thresholds: &HealthThresholds,
) -> HealthCheck {
    const NAME: &str = "Tenure Mix";

    if employees.is_empty() {
        return HealthCheck::new(NAME, HealthStatus::Warning, "No employees");
    }

    let tenures = employees
        .iter()
        .map(|employee| (today - employee.hire_date).num_days() as f64 / 365.25);
    let (mut recent, mut tenured) = (0usize, 0usize);
    for tenure in tenures {
        if tenure < thresholds.new_hire_tenure_years {
            recent += 1;
        }
        if tenure > thresholds.tenured_years {
            tenured += 1;
        }
    }

    if recent == 0 {
        return HealthCheck::new(
            NAME,
            HealthStatus::Warning,
            format!("No recent hires (<{} years)", thresholds.new_hire_tenure_years),
        )
        .with_details("Consider enabling hiring simulation");
    }
    if tenured == 0 {
        return HealthCheck::new(
            NAME,
            HealthStatus::Warning,
            format!("No tenured employees (>{} years)", thresholds.tenured_years),
        )
        .with_details("Consider increasing years of history");
    }

    let total = employees.len() as f64;
    HealthCheck::new(
        NAME,
        HealthStatus::Pass,
        format!(
            "New: {}, Tenured: {}",
            percent(recent as f64 / total, 0),
            percent(tenured as f64 / total, 0)
        ),
    )
}

pub fn check_new_hire_seniority(
    dataset: &HrDataset,
    start_year: i32,
    thresholds: &HealthThresholds,
) -> HealthCheck {
    const NAME: &str = "New Hire Seniority";

    if dataset.employee_job_assignment.is_empty() {
        return HealthCheck::new(NAME, HealthStatus::Warning, "Data not available");
    }
    if !dataset
        .employee
        .iter()
        .any(|employee| employee.hire_date.year() >= start_year)
    {
        return HealthCheck::new(NAME, HealthStatus::Pass, "No new hires to check");
    }

    let levels = new_hire_seniority(dataset, start_year);
    if levels.is_empty() {
        return HealthCheck::new(NAME, HealthStatus::Warning, "No job data for new hires");
    }

    let junior = levels
        .iter()
        .filter(|level| level.is_some_and(SeniorityLevel::is_junior))
        .count();
    let share = junior as f64 / levels.len() as f64;

    if share < thresholds.min_junior_hire_share {
        HealthCheck::new(
            NAME,
            HealthStatus::Warning,
            format!("Only {} junior hires", percent(share, 0)),
        )
        .with_details(format!(
            "Expected >{} to be L1-L2",
            percent(thresholds.min_junior_hire_share, 0)
        ))
    } else {
        HealthCheck::new(
            NAME,
            HealthStatus::Pass,
            format!("{} junior hires (L1-L2)", percent(share, 0)),
        )
    }
}

fn percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

fn join_years(years: &[i32]) -> String {
    years
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
