//! Tabular output contract shared by the generator, the CSV loader, and every
//! downstream view of the workforce.

mod loader;
pub mod schema;

pub use loader::{load_dataset_dir, parse_table};
pub use schema::{
    Compensation, Employee, EmployeeId, JobAssignment, JobId, JobRole, Location, LocationId,
    OrgAssignment, OrgId, OrganizationUnit, PerformanceReview, SeniorityLevel,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names of the tables a generator produces, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Employee,
    EmployeeJobAssignment,
    EmployeeOrgAssignment,
    EmployeeCompensation,
    EmployeePerformance,
    JobRole,
    OrganizationUnit,
    Location,
}

impl TableName {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Employee,
            Self::EmployeeJobAssignment,
            Self::EmployeeOrgAssignment,
            Self::EmployeeCompensation,
            Self::EmployeePerformance,
            Self::JobRole,
            Self::OrganizationUnit,
            Self::Location,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::EmployeeJobAssignment => "employee_job_assignment",
            Self::EmployeeOrgAssignment => "employee_org_assignment",
            Self::EmployeeCompensation => "employee_compensation",
            Self::EmployeePerformance => "employee_performance",
            Self::JobRole => "job_role",
            Self::OrganizationUnit => "organization_unit",
            Self::Location => "location",
        }
    }

    /// Compensation and performance history may be missing from a dataset.
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::EmployeeCompensation | Self::EmployeePerformance)
    }

    /// Reference tables are never narrowed by employee filters.
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::JobRole | Self::OrganizationUnit | Self::Location)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = DatasetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|table| table.as_str() == needle)
            .ok_or_else(|| DatasetError::UnknownTable(value.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("required table '{0}' is missing")]
    MissingTable(TableName),
    #[error("failed to read table '{table}': {source}")]
    Io {
        table: TableName,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data in table '{table}': {source}")]
    Csv {
        table: TableName,
        #[source]
        source: csv::Error,
    },
}

/// The full set of related tables describing one generated workforce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HrDataset {
    pub employee: Vec<Employee>,
    pub employee_job_assignment: Vec<JobAssignment>,
    pub employee_org_assignment: Vec<OrgAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_compensation: Option<Vec<Compensation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_performance: Option<Vec<PerformanceReview>>,
    pub job_role: Vec<JobRole>,
    pub organization_unit: Vec<OrganizationUnit>,
    pub location: Vec<Location>,
}

impl HrDataset {
    pub fn has_table(&self, table: TableName) -> bool {
        match table {
            TableName::EmployeeCompensation => self.employee_compensation.is_some(),
            TableName::EmployeePerformance => self.employee_performance.is_some(),
            _ => true,
        }
    }

    /// Tables present in this dataset, in listing order.
    pub fn tables(&self) -> Vec<TableName> {
        TableName::ordered()
            .into_iter()
            .filter(|table| self.has_table(*table))
            .collect()
    }

    pub fn row_count(&self, table: TableName) -> Option<usize> {
        let count = match table {
            TableName::Employee => self.employee.len(),
            TableName::EmployeeJobAssignment => self.employee_job_assignment.len(),
            TableName::EmployeeOrgAssignment => self.employee_org_assignment.len(),
            TableName::EmployeeCompensation => self.employee_compensation.as_ref()?.len(),
            TableName::EmployeePerformance => self.employee_performance.as_ref()?.len(),
            TableName::JobRole => self.job_role.len(),
            TableName::OrganizationUnit => self.organization_unit.len(),
            TableName::Location => self.location.len(),
        };
        Some(count)
    }

    pub fn table_stats(&self) -> Vec<TableStats> {
        self.tables()
            .into_iter()
            .map(|table| TableStats {
                table,
                rows: self.row_count(table).unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub table: TableName,
    pub rows: usize,
}
