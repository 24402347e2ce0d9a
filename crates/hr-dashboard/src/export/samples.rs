//! Fixed rows that describe each table's columns for schema tracing.
//!
//! Each record yields two rows, one with every optional column set and one
//! with every optional column empty, so the traced schema is the same no
//! matter what (or how little) data a table holds.

use crate::dataset::{
    Compensation, Employee, EmployeeId, JobAssignment, JobId, JobRole, Location, LocationId,
    OrgAssignment, OrgId, OrganizationUnit, PerformanceReview, SeniorityLevel,
};
use chrono::NaiveDate;
use serde::Serialize;

#[cfg_attr(not(feature = "columnar"), allow(dead_code))]
pub(crate) trait SchemaSamples: Serialize + Sized {
    fn schema_samples() -> [Self; 2];
}

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

impl SchemaSamples for Employee {
    fn schema_samples() -> [Self; 2] {
        let filled = Employee {
            employee_id: EmployeeId::default(),
            first_name: String::new(),
            last_name: String::new(),
            gender: String::new(),
            hire_date: epoch(),
            termination_date: Some(epoch()),
            termination_reason: Some(String::new()),
            location_id: LocationId::default(),
            employment_type: String::new(),
            manager_id: Some(EmployeeId::default()),
        };
        let empty = Employee {
            termination_date: None,
            termination_reason: None,
            manager_id: None,
            ..filled.clone()
        };
        [filled, empty]
    }
}

impl SchemaSamples for JobAssignment {
    fn schema_samples() -> [Self; 2] {
        let filled = JobAssignment {
            employee_id: EmployeeId::default(),
            job_id: JobId::default(),
            start_date: epoch(),
            end_date: Some(epoch()),
        };
        let empty = JobAssignment {
            end_date: None,
            ..filled.clone()
        };
        [filled, empty]
    }
}

impl SchemaSamples for OrgAssignment {
    fn schema_samples() -> [Self; 2] {
        let filled = OrgAssignment {
            employee_id: EmployeeId::default(),
            org_id: OrgId::default(),
            business_unit: Some(String::new()),
            start_date: epoch(),
            end_date: Some(epoch()),
        };
        let empty = OrgAssignment {
            business_unit: None,
            end_date: None,
            ..filled.clone()
        };
        [filled, empty]
    }
}

impl SchemaSamples for Compensation {
    fn schema_samples() -> [Self; 2] {
        let filled = Compensation {
            employee_id: EmployeeId::default(),
            base_salary: 0.0,
            currency: String::new(),
            start_date: epoch(),
            change_reason: Some(String::new()),
        };
        let empty = Compensation {
            change_reason: None,
            ..filled.clone()
        };
        [filled, empty]
    }
}

impl SchemaSamples for PerformanceReview {
    fn schema_samples() -> [Self; 2] {
        let row = PerformanceReview {
            employee_id: EmployeeId::default(),
            review_year: 0,
            rating: 1,
        };
        [row.clone(), row]
    }
}

impl SchemaSamples for JobRole {
    fn schema_samples() -> [Self; 2] {
        let row = JobRole {
            job_id: JobId::default(),
            job_title: String::new(),
            job_family: String::new(),
            job_level: String::new(),
            seniority_level: SeniorityLevel::Entry,
        };
        [row.clone(), row]
    }
}

impl SchemaSamples for OrganizationUnit {
    fn schema_samples() -> [Self; 2] {
        let filled = OrganizationUnit {
            org_id: OrgId::default(),
            org_name: String::new(),
            business_unit: Some(String::new()),
            parent_org_id: Some(OrgId::default()),
        };
        let empty = OrganizationUnit {
            business_unit: None,
            parent_org_id: None,
            ..filled.clone()
        };
        [filled, empty]
    }
}

impl SchemaSamples for Location {
    fn schema_samples() -> [Self; 2] {
        let row = Location {
            location_id: LocationId::default(),
            city: String::new(),
            country: String::new(),
            region: String::new(),
            latitude: 0.0,
            longitude: 0.0,
        };
        [row.clone(), row]
    }
}
