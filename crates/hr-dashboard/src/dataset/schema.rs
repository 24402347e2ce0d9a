use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

surrogate_id!(
    /// Surrogate key shared by every employee-scoped table.
    EmployeeId
);
surrogate_id!(JobId);
surrogate_id!(OrgId);
surrogate_id!(LocationId);

/// Job seniority ladder, stored as the integers 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SeniorityLevel {
    Entry = 1,
    Junior = 2,
    Mid = 3,
    Senior = 4,
    Executive = 5,
}

impl SeniorityLevel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Entry,
            Self::Junior,
            Self::Mid,
            Self::Senior,
            Self::Executive,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry => "1 - Entry",
            Self::Junior => "2 - Junior",
            Self::Mid => "3 - Mid",
            Self::Senior => "4 - Senior",
            Self::Executive => "5 - Executive",
        }
    }

    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// L1 and L2 form the base of the pyramid.
    pub const fn is_junior(self) -> bool {
        matches!(self, Self::Entry | Self::Junior)
    }

    pub const fn is_senior(self) -> bool {
        matches!(self, Self::Senior | Self::Executive)
    }
}

impl TryFrom<u8> for SeniorityLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Entry),
            2 => Ok(Self::Junior),
            3 => Ok(Self::Mid),
            4 => Ok(Self::Senior),
            5 => Ok(Self::Executive),
            other => Err(format!("seniority level must be between 1 and 5, got {other}")),
        }
    }
}

impl From<SeniorityLevel> for u8 {
    fn from(value: SeniorityLevel) -> Self {
        value.rank()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
    #[serde(default)]
    pub termination_reason: Option<String>,
    pub location_id: LocationId,
    pub employment_type: String,
    #[serde(default)]
    pub manager_id: Option<EmployeeId>,
}

impl Employee {
    /// Employed at the end of `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.hire_date <= date && self.termination_date.map_or(true, |term| term > date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAssignment {
    pub employee_id: EmployeeId,
    pub job_id: JobId,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgAssignment {
    pub employee_id: EmployeeId,
    pub org_id: OrgId,
    #[serde(default)]
    pub business_unit: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub employee_id: EmployeeId,
    pub base_salary: f64,
    pub currency: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub change_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReview {
    pub employee_id: EmployeeId,
    pub review_year: i32,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRole {
    pub job_id: JobId,
    pub job_title: String,
    pub job_family: String,
    pub job_level: String,
    pub seniority_level: SeniorityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUnit {
    pub org_id: OrgId,
    pub org_name: String,
    #[serde(default)]
    pub business_unit: Option<String>,
    #[serde(default)]
    pub parent_org_id: Option<OrgId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: LocationId,
    pub city: String,
    pub country: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
}
