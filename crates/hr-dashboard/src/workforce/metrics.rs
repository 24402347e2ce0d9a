use super::enrich::{index_by, EnrichedEmployee};
use super::resolve::{resolve_current, resolve_first};
use crate::dataset::{Employee, EmployeeId, HrDataset, SeniorityLevel};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyWorkforceMetrics {
    pub year: i32,
    pub hires: usize,
    pub attrition: usize,
    pub net_change: i64,
    pub headcount: i64,
    pub growth_rate: f64,
}

/// Headcount at Dec 31 of `year`: everyone hired by then minus everyone who
/// left by then. Inconsistent histories (terminated before hired) can drive
/// this below zero, which the health checks report.
pub fn year_end_headcount(employees: &[Employee], year: i32) -> i64 {
    let Some(year_end) = NaiveDate::from_ymd_opt(year, 12, 31) else {
        return 0;
    };
    let hired = employees
        .iter()
        .filter(|employee| employee.hire_date <= year_end)
        .count() as i64;
    let departed = employees
        .iter()
        .filter(|employee| employee.termination_date.is_some_and(|term| term <= year_end))
        .count() as i64;
    hired - departed
}

pub fn hires_in_year(employees: &[Employee], year: i32) -> usize {
    employees
        .iter()
        .filter(|employee| employee.hire_date.year() == year)
        .count()
}

pub fn terminations_in_year(employees: &[Employee], year: i32) -> usize {
    employees
        .iter()
        .filter(|employee| {
            employee
                .termination_date
                .is_some_and(|term| term.year() == year)
        })
        .count()
}

/// Hires, attrition, and year-end headcount for each year in the inclusive range.
pub fn yearly_workforce_metrics(
    employees: &[Employee],
    start_year: i32,
    end_year: i32,
) -> Vec<YearlyWorkforceMetrics> {
    let mut rows: Vec<YearlyWorkforceMetrics> = Vec::new();

    for year in start_year..=end_year {
        let hires = hires_in_year(employees, year);
        let attrition = terminations_in_year(employees, year);
        let headcount = year_end_headcount(employees, year);
        let growth_rate = match rows.last() {
            Some(previous) if previous.headcount != 0 => {
                (headcount - previous.headcount) as f64 / previous.headcount as f64
            }
            _ => 0.0,
        };

        rows.push(YearlyWorkforceMetrics {
            year,
            hires,
            attrition,
            net_change: hires as i64 - attrition as i64,
            headcount,
            growth_rate,
        });
    }

    rows
}

/// Sidebar-style overview of a (possibly filtered) dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_employees: usize,
    pub active_employees: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_salary: Option<f64>,
    pub gender_counts: BTreeMap<String, usize>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &HrDataset) -> Self {
        let mut gender_counts = BTreeMap::new();
        for employee in &dataset.employee {
            *gender_counts.entry(employee.gender.clone()).or_insert(0) += 1;
        }

        let average_salary = dataset.employee_compensation.as_deref().and_then(|rows| {
            let current = resolve_current(rows);
            if current.is_empty() {
                return None;
            }
            let total: f64 = current.rows().map(|row| row.base_salary).sum();
            Some(total / current.len() as f64)
        });

        Self {
            total_employees: dataset.employee.len(),
            active_employees: dataset
                .employee
                .iter()
                .filter(|employee| employee.termination_date.is_none())
                .count(),
            average_salary,
            gender_counts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessUnitAttrition {
    pub business_unit: String,
    pub employees: usize,
    pub terminated: usize,
    pub attrition_rate: f64,
}

pub fn attrition_by_business_unit(employees: &[EnrichedEmployee]) -> Vec<BusinessUnitAttrition> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for employee in employees {
        let key = employee.business_unit.as_deref().unwrap_or(UNASSIGNED);
        let entry = groups.entry(key).or_default();
        entry.0 += 1;
        if employee.is_terminated() {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(unit, (total, terminated))| BusinessUnitAttrition {
            business_unit: unit.to_string(),
            employees: total,
            terminated,
            attrition_rate: terminated as f64 / total as f64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadcountEntry {
    pub key: String,
    pub headcount: usize,
}

/// Active employees per business unit, largest first.
pub fn headcount_by_business_unit(employees: &[EnrichedEmployee]) -> Vec<HeadcountEntry> {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for employee in employees.iter().filter(|employee| !employee.is_terminated()) {
        *groups
            .entry(employee.business_unit.as_deref().unwrap_or(UNASSIGNED))
            .or_default() += 1;
    }

    let mut entries: Vec<HeadcountEntry> = groups
        .into_iter()
        .map(|(key, headcount)| HeadcountEntry {
            key: key.to_string(),
            headcount,
        })
        .collect();
    entries.sort_by(|a, b| b.headcount.cmp(&a.headcount));
    entries
}

/// Active employees per seniority level in ladder order; levels without anyone are omitted.
pub fn headcount_by_seniority(employees: &[EnrichedEmployee]) -> Vec<HeadcountEntry> {
    let mut counts: BTreeMap<SeniorityLevel, usize> = BTreeMap::new();
    for employee in employees.iter().filter(|employee| !employee.is_terminated()) {
        if let Some(level) = employee.seniority_level {
            *counts.entry(level).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(level, headcount)| HeadcountEntry {
            key: level.label().to_string(),
            headcount,
        })
        .collect()
}

/// Seniority of the first job held by each employee hired in or after `from_year`.
///
/// Entries are `None` when the first job is not found in the job role table.
pub fn new_hire_seniority(dataset: &HrDataset, from_year: i32) -> Vec<Option<SeniorityLevel>> {
    let new_hires: HashSet<&EmployeeId> = dataset
        .employee
        .iter()
        .filter(|employee| employee.hire_date.year() >= from_year)
        .map(|employee| &employee.employee_id)
        .collect();
    if new_hires.is_empty() {
        return Vec::new();
    }

    let roles = index_by(&dataset.job_role, |role| &role.job_id);
    let first_jobs = resolve_first(&dataset.employee_job_assignment);

    first_jobs
        .iter()
        .filter(|(employee_id, _)| new_hires.contains(**employee_id))
        .map(|(_, job)| roles.get(&job.job_id).map(|role| role.seniority_level))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LocationId;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn employee(id: &str, hired: NaiveDate, left: Option<NaiveDate>) -> Employee {
        Employee {
            employee_id: EmployeeId::from(id),
            first_name: id.into(),
            last_name: "Doe".into(),
            gender: if id.ends_with('1') { "Male" } else { "Female" }.into(),
            hire_date: hired,
            termination_date: left,
            termination_reason: left.map(|_| "Resignation".to_string()),
            location_id: LocationId::from("L1"),
            employment_type: "Full-time".into(),
            manager_id: None,
        }
    }

    #[test]
    fn yearly_metrics_track_hires_departures_and_growth() {
        let employees = vec![
            employee("E1", date(2019, 5, 1), None),
            employee("E2", date(2019, 7, 1), Some(date(2021, 3, 1))),
            employee("E3", date(2020, 2, 1), None),
            employee("E4", date(2021, 8, 1), None),
        ];

        let metrics = yearly_workforce_metrics(&employees, 2020, 2021);

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].year, 2020);
        assert_eq!(metrics[0].hires, 1);
        assert_eq!(metrics[0].attrition, 0);
        assert_eq!(metrics[0].headcount, 3);
        assert_eq!(metrics[0].growth_rate, 0.0);

        assert_eq!(metrics[1].hires, 1);
        assert_eq!(metrics[1].attrition, 1);
        assert_eq!(metrics[1].net_change, 0);
        assert_eq!(metrics[1].headcount, 3);
        assert_eq!(metrics[1].growth_rate, 0.0);
    }

    #[test]
    fn inconsistent_history_can_push_headcount_negative() {
        let employees = vec![employee("E1", date(2024, 6, 1), Some(date(2020, 1, 15)))];
        assert_eq!(year_end_headcount(&employees, 2021), -1);
        assert_eq!(year_end_headcount(&employees, 2024), 0);
    }

    #[test]
    fn summary_counts_genders_and_averages_current_salary() {
        let mut dataset = HrDataset {
            employee: vec![
                employee("E1", date(2020, 1, 1), None),
                employee("E2", date(2020, 1, 1), Some(date(2022, 1, 1))),
            ],
            ..HrDataset::default()
        };
        assert_eq!(DatasetSummary::from_dataset(&dataset).average_salary, None);

        dataset.employee_compensation = Some(vec![
            crate::dataset::Compensation {
                employee_id: EmployeeId::from("E1"),
                base_salary: 50_000.0,
                currency: "USD".into(),
                start_date: date(2020, 1, 1),
                change_reason: None,
            },
            crate::dataset::Compensation {
                employee_id: EmployeeId::from("E1"),
                base_salary: 70_000.0,
                currency: "USD".into(),
                start_date: date(2021, 4, 1),
                change_reason: Some("Merit Increase".into()),
            },
            crate::dataset::Compensation {
                employee_id: EmployeeId::from("E2"),
                base_salary: 90_000.0,
                currency: "USD".into(),
                start_date: date(2020, 1, 1),
                change_reason: None,
            },
        ]);

        let summary = DatasetSummary::from_dataset(&dataset);
        assert_eq!(summary.total_employees, 2);
        assert_eq!(summary.active_employees, 1);
        assert_eq!(summary.average_salary, Some(80_000.0));
        assert_eq!(summary.gender_counts.get("Male"), Some(&1));
        assert_eq!(summary.gender_counts.get("Female"), Some(&1));
    }
}
