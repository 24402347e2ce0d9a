use super::enrich::{enrich_employees, index_by, EnrichedEmployee};
use super::resolve::resolve_current;
use crate::dataset::{EmployeeId, HrDataset, SeniorityLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    /// A range from optional bounds; one missing side is left open.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (min, max) => Some(Self {
                min: min.unwrap_or(0.0),
                max: max.unwrap_or(f64::INFINITY),
            }),
        }
    }

    pub fn contains(&self, salary: f64) -> bool {
        salary >= self.min && salary <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (None, None) => None,
            (start, end) => Some(Self {
                start: start.unwrap_or(NaiveDate::MIN),
                end: end.unwrap_or(NaiveDate::MAX),
            }),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Per-field predicates. An empty list leaves that field unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub business_units: Vec<String>,
    #[serde(default)]
    pub seniority_levels: Vec<SeniorityLevel>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
    #[serde(default)]
    pub hire_date_range: Option<DateRange>,
}

impl FilterCriteria {
    /// Every discovered option selected, the dashboard's starting state.
    pub fn select_all(options: &FilterOptions) -> Self {
        Self {
            business_units: options.business_units.clone(),
            seniority_levels: options.seniority_levels.clone(),
            countries: options.countries.clone(),
            salary_range: options.salary_bounds,
            hire_date_range: None,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.business_units.is_empty()
            && self.seniority_levels.is_empty()
            && self.countries.is_empty()
            && self.salary_range.is_none()
            && self.hire_date_range.is_none()
    }

    /// Missing business unit or country passes; missing seniority or salary does not.
    ///
    /// `business_unit` comes from the organization unit join alone, matching the
    /// values `FilterOptions` offers.
    fn keeps(
        &self,
        employee: &EnrichedEmployee,
        business_unit: Option<&str>,
        salary_applies: bool,
    ) -> bool {
        if !self.business_units.is_empty() {
            if let Some(unit) = business_unit {
                if !self.business_units.iter().any(|selected| selected == unit) {
                    return false;
                }
            }
        }

        if !self.seniority_levels.is_empty() {
            match employee.seniority_level {
                Some(level) if self.seniority_levels.contains(&level) => {}
                _ => return false,
            }
        }

        if !self.countries.is_empty() {
            if let Some(country) = &employee.country {
                if !self.countries.contains(country) {
                    return false;
                }
            }
        }

        if salary_applies {
            if let Some(range) = &self.salary_range {
                match employee.base_salary {
                    Some(salary) if range.contains(salary) => {}
                    _ => return false,
                }
            }
        }

        if let Some(range) = &self.hire_date_range {
            if !range.contains(employee.hire_date) {
                return false;
            }
        }

        true
    }
}

/// Restrict every employee-scoped table to the employees passing `criteria`.
///
/// Reference tables (job roles, organization units, locations) pass through
/// untouched. The salary predicate only applies when compensation history is
/// present.
pub fn filter_dataset(dataset: &HrDataset, criteria: &FilterCriteria) -> HrDataset {
    if criteria.is_unrestricted() {
        return dataset.clone();
    }

    let salary_applies = dataset.employee_compensation.is_some();
    let enriched = enrich_employees(dataset);
    let unit_business_units = org_unit_business_units(dataset);
    let keep: HashSet<&EmployeeId> = enriched
        .iter()
        .filter(|employee| {
            let business_unit = unit_business_units
                .get(&employee.employee_id)
                .copied();
            criteria.keeps(employee, business_unit, salary_applies)
        })
        .map(|employee| &employee.employee_id)
        .collect();

    debug!(
        kept = keep.len(),
        total = dataset.employee.len(),
        "applied workforce filters"
    );

    HrDataset {
        employee: retain(&dataset.employee, &keep, |row| &row.employee_id),
        employee_job_assignment: retain(&dataset.employee_job_assignment, &keep, |row| {
            &row.employee_id
        }),
        employee_org_assignment: retain(&dataset.employee_org_assignment, &keep, |row| {
            &row.employee_id
        }),
        employee_compensation: dataset
            .employee_compensation
            .as_ref()
            .map(|rows| retain(rows, &keep, |row| &row.employee_id)),
        employee_performance: dataset
            .employee_performance
            .as_ref()
            .map(|rows| retain(rows, &keep, |row| &row.employee_id)),
        job_role: dataset.job_role.clone(),
        organization_unit: dataset.organization_unit.clone(),
        location: dataset.location.clone(),
    }
}

/// Current business unit per employee via the organization unit table. An
/// assignment pointing at an unknown unit has none, so it passes unit filters.
fn org_unit_business_units(dataset: &HrDataset) -> HashMap<&EmployeeId, &str> {
    let units = index_by(&dataset.organization_unit, |unit| &unit.org_id);
    let current = resolve_current(&dataset.employee_org_assignment);
    let by_employee = current
        .rows()
        .filter_map(|row| {
            let unit = units.get(&row.org_id).copied()?;
            Some((&row.employee_id, unit.business_unit.as_deref()?))
        })
        .collect();
    by_employee
}

fn retain<T, F>(rows: &[T], keep: &HashSet<&EmployeeId>, employee_id: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &EmployeeId,
{
    rows.iter()
        .filter(|row| keep.contains(employee_id(row)))
        .cloned()
        .collect()
}

/// Selectable values discovered from the reference tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub business_units: Vec<String>,
    pub countries: Vec<String>,
    pub seniority_levels: Vec<SeniorityLevel>,
    pub salary_bounds: Option<SalaryRange>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &HrDataset) -> Self {
        let business_units: BTreeSet<String> = dataset
            .organization_unit
            .iter()
            .filter_map(|unit| unit.business_unit.clone())
            .collect();
        let countries: BTreeSet<String> = dataset
            .location
            .iter()
            .map(|location| location.country.clone())
            .collect();
        let seniority_levels: BTreeSet<SeniorityLevel> = dataset
            .job_role
            .iter()
            .map(|role| role.seniority_level)
            .collect();

        let salary_bounds = dataset.employee_compensation.as_ref().and_then(|rows| {
            rows.iter().map(|row| row.base_salary).fold(None::<SalaryRange>, |bounds, salary| {
                Some(match bounds {
                    None => SalaryRange {
                        min: salary,
                        max: salary,
                    },
                    Some(range) => SalaryRange {
                        min: range.min.min(salary),
                        max: range.max.max(salary),
                    },
                })
            })
        });

        Self {
            business_units: business_units.into_iter().collect(),
            countries: countries.into_iter().collect(),
            seniority_levels: seniority_levels.into_iter().collect(),
            salary_bounds,
        }
    }
}
