//! Point-in-time resolution over append-only assignment histories.
//!
//! Each history table holds one row per change. The "current" value for an
//! employee is the row with the greatest effective date; when two rows share
//! that date the one appearing first in the table wins, which matches a stable
//! descending sort followed by keep-first de-duplication.

use crate::dataset::{Compensation, EmployeeId, JobAssignment, OrgAssignment, PerformanceReview};
use chrono::NaiveDate;
use std::collections::btree_map::{self, BTreeMap};

/// A history row that takes effect for one employee on one date.
pub trait EffectiveDated {
    fn employee_id(&self) -> &EmployeeId;
    fn effective_date(&self) -> NaiveDate;
}

impl EffectiveDated for JobAssignment {
    fn employee_id(&self) -> &EmployeeId {
        &self.employee_id
    }

    fn effective_date(&self) -> NaiveDate {
        self.start_date
    }
}

impl EffectiveDated for OrgAssignment {
    fn employee_id(&self) -> &EmployeeId {
        &self.employee_id
    }

    fn effective_date(&self) -> NaiveDate {
        self.start_date
    }
}

impl EffectiveDated for Compensation {
    fn employee_id(&self) -> &EmployeeId {
        &self.employee_id
    }

    fn effective_date(&self) -> NaiveDate {
        self.start_date
    }
}

impl EffectiveDated for PerformanceReview {
    fn employee_id(&self) -> &EmployeeId {
        &self.employee_id
    }

    /// Reviews close out their year.
    fn effective_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.review_year, 12, 31).unwrap_or(NaiveDate::MIN)
    }
}

/// At most one resolved row per employee, borrowed from the history table.
#[derive(Debug)]
pub struct ResolvedRecords<'a, T> {
    by_employee: BTreeMap<&'a EmployeeId, &'a T>,
}

impl<'a, T> ResolvedRecords<'a, T> {
    pub fn get(&self, employee_id: &EmployeeId) -> Option<&'a T> {
        self.by_employee.get(employee_id).copied()
    }

    pub fn contains(&self, employee_id: &EmployeeId) -> bool {
        self.by_employee.contains_key(employee_id)
    }

    pub fn len(&self) -> usize {
        self.by_employee.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_employee.is_empty()
    }

    /// Resolved rows in employee id order.
    pub fn rows(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.by_employee.values().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, &'a EmployeeId, &'a T> {
        self.by_employee.iter()
    }
}

/// Latest row per employee.
pub fn resolve_current<T: EffectiveDated>(rows: &[T]) -> ResolvedRecords<'_, T> {
    resolve_with(rows, |_| true, |candidate, held| candidate > held)
}

/// Latest row per employee among those already in effect on `as_of`.
pub fn resolve_as_of<T: EffectiveDated>(rows: &[T], as_of: NaiveDate) -> ResolvedRecords<'_, T> {
    resolve_with(
        rows,
        |row| row.effective_date() <= as_of,
        |candidate, held| candidate > held,
    )
}

/// Earliest row per employee, e.g. the job someone was hired into.
pub fn resolve_first<T: EffectiveDated>(rows: &[T]) -> ResolvedRecords<'_, T> {
    resolve_with(rows, |_| true, |candidate, held| candidate < held)
}

fn resolve_with<'a, T, F, P>(rows: &'a [T], include: F, replaces: P) -> ResolvedRecords<'a, T>
where
    T: EffectiveDated,
    F: Fn(&T) -> bool,
    P: Fn(NaiveDate, NaiveDate) -> bool,
{
    let mut by_employee: BTreeMap<&'a EmployeeId, &'a T> = BTreeMap::new();

    for row in rows.iter().filter(|row| include(row)) {
        match by_employee.entry(row.employee_id()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(row);
            }
            // Strict comparison keeps the earlier table row on ties.
            btree_map::Entry::Occupied(mut slot) => {
                if replaces(row.effective_date(), slot.get().effective_date()) {
                    slot.insert(row);
                }
            }
        }
    }

    ResolvedRecords { by_employee }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::JobId;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn job(employee: &str, job: &str, start: NaiveDate) -> JobAssignment {
        JobAssignment {
            employee_id: EmployeeId::from(employee),
            job_id: JobId::from(job),
            start_date: start,
            end_date: None,
        }
    }

    #[test]
    fn picks_latest_start_date_regardless_of_row_order() {
        let rows = vec![
            job("E1", "J-late", date(2023, 4, 1)),
            job("E1", "J-early", date(2019, 1, 1)),
            job("E2", "J-only", date(2021, 6, 1)),
        ];

        let current = resolve_current(&rows);

        assert_eq!(current.len(), 2);
        let e1 = current.get(&EmployeeId::from("E1")).expect("E1 resolved");
        assert_eq!(e1.job_id.as_str(), "J-late");
    }

    #[test]
    fn ties_keep_the_first_row_in_table_order() {
        let rows = vec![
            job("E1", "J-first", date(2022, 1, 1)),
            job("E1", "J-second", date(2022, 1, 1)),
        ];

        let current = resolve_current(&rows);
        let first = resolve_first(&rows);

        assert_eq!(
            current.get(&EmployeeId::from("E1")).map(|row| row.job_id.as_str()),
            Some("J-first")
        );
        assert_eq!(
            first.get(&EmployeeId::from("E1")).map(|row| row.job_id.as_str()),
            Some("J-first")
        );
    }

    #[test]
    fn as_of_ignores_future_rows() {
        let rows = vec![
            job("E1", "J-2019", date(2019, 1, 1)),
            job("E1", "J-2023", date(2023, 1, 1)),
            job("E2", "J-2024", date(2024, 1, 1)),
        ];

        let snapshot = resolve_as_of(&rows, date(2021, 12, 31));

        assert_eq!(
            snapshot.get(&EmployeeId::from("E1")).map(|row| row.job_id.as_str()),
            Some("J-2019")
        );
        assert!(!snapshot.contains(&EmployeeId::from("E2")));
    }

    #[test]
    fn first_resolution_returns_hiring_row() {
        let rows = vec![
            job("E1", "J-promoted", date(2022, 4, 1)),
            job("E1", "J-hired", date(2020, 2, 3)),
        ];

        let first = resolve_first(&rows);
        assert_eq!(
            first.get(&EmployeeId::from("E1")).map(|row| row.job_id.as_str()),
            Some("J-hired")
        );
    }

    #[test]
    fn latest_review_year_wins() {
        let reviews = vec![
            PerformanceReview {
                employee_id: EmployeeId::from("E1"),
                review_year: 2024,
                rating: 2,
            },
            PerformanceReview {
                employee_id: EmployeeId::from("E1"),
                review_year: 2023,
                rating: 5,
            },
        ];

        let latest = resolve_current(&reviews);
        assert_eq!(latest.get(&EmployeeId::from("E1")).map(|row| row.rating), Some(2));
    }
}
