use super::resolve::{resolve_current, ResolvedRecords};
use crate::dataset::{
    Compensation, Employee, EmployeeId, HrDataset, JobAssignment, JobId, JobRole, Location,
    LocationId, OrgAssignment, OrgId, OrganizationUnit, SeniorityLevel,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// One employee with their current job, org, location, and pay joined on.
///
/// Every joined column is optional: an employee without a matching history row
/// or reference record simply carries `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedEmployee {
    pub employee_id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub hire_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub termination_reason: Option<String>,
    pub employment_type: String,
    pub manager_id: Option<EmployeeId>,
    pub location_id: LocationId,
    pub job_id: Option<JobId>,
    pub job_title: Option<String>,
    pub job_family: Option<String>,
    pub job_level: Option<String>,
    pub seniority_level: Option<SeniorityLevel>,
    pub org_id: Option<OrgId>,
    pub org_name: Option<String>,
    pub business_unit: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub base_salary: Option<f64>,
    pub currency: Option<String>,
}

impl EnrichedEmployee {
    pub fn is_terminated(&self) -> bool {
        self.termination_date.is_some()
    }

    /// Years between hire and `as_of`, using 365.25-day years.
    pub fn tenure_years(&self, as_of: NaiveDate) -> f64 {
        (as_of - self.hire_date).num_days() as f64 / 365.25
    }
}

/// Left-join current assignments and reference tables onto every employee,
/// preserving the employee table's order.
pub fn enrich_employees(dataset: &HrDataset) -> Vec<EnrichedEmployee> {
    let lookups = Lookups::new(dataset);
    dataset
        .employee
        .iter()
        .map(|employee| lookups.enrich(employee))
        .collect()
}

struct Lookups<'a> {
    current_jobs: ResolvedRecords<'a, JobAssignment>,
    current_orgs: ResolvedRecords<'a, OrgAssignment>,
    current_pay: Option<ResolvedRecords<'a, Compensation>>,
    job_roles: HashMap<&'a JobId, &'a JobRole>,
    org_units: HashMap<&'a OrgId, &'a OrganizationUnit>,
    locations: HashMap<&'a LocationId, &'a Location>,
}

impl<'a> Lookups<'a> {
    fn new(dataset: &'a HrDataset) -> Self {
        Self {
            current_jobs: resolve_current(&dataset.employee_job_assignment),
            current_orgs: resolve_current(&dataset.employee_org_assignment),
            current_pay: dataset
                .employee_compensation
                .as_deref()
                .map(resolve_current),
            job_roles: index_by(&dataset.job_role, |role| &role.job_id),
            org_units: index_by(&dataset.organization_unit, |unit| &unit.org_id),
            locations: index_by(&dataset.location, |location| &location.location_id),
        }
    }

    fn enrich(&self, employee: &Employee) -> EnrichedEmployee {
        let job = self.current_jobs.get(&employee.employee_id);
        let role = job.and_then(|job| self.job_roles.get(&job.job_id).copied());
        let org = self.current_orgs.get(&employee.employee_id);
        let unit = org.and_then(|org| self.org_units.get(&org.org_id).copied());
        let location = self.locations.get(&employee.location_id).copied();
        let pay = self
            .current_pay
            .as_ref()
            .and_then(|pay| pay.get(&employee.employee_id));

        let business_unit = unit
            .and_then(|unit| unit.business_unit.clone())
            .or_else(|| org.and_then(|org| org.business_unit.clone()));

        EnrichedEmployee {
            employee_id: employee.employee_id.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            gender: employee.gender.clone(),
            hire_date: employee.hire_date,
            termination_date: employee.termination_date,
            termination_reason: employee.termination_reason.clone(),
            employment_type: employee.employment_type.clone(),
            manager_id: employee.manager_id.clone(),
            location_id: employee.location_id.clone(),
            job_id: job.map(|job| job.job_id.clone()),
            job_title: role.map(|role| role.job_title.clone()),
            job_family: role.map(|role| role.job_family.clone()),
            job_level: role.map(|role| role.job_level.clone()),
            seniority_level: role.map(|role| role.seniority_level),
            org_id: org.map(|org| org.org_id.clone()),
            org_name: unit.map(|unit| unit.org_name.clone()),
            business_unit,
            city: location.map(|location| location.city.clone()),
            country: location.map(|location| location.country.clone()),
            region: location.map(|location| location.region.clone()),
            latitude: location.map(|location| location.latitude),
            longitude: location.map(|location| location.longitude),
            base_salary: pay.map(|pay| pay.base_salary),
            currency: pay.map(|pay| pay.currency.clone()),
        }
    }
}

pub(crate) fn index_by<'a, T, K, F>(rows: &'a [T], key: F) -> HashMap<&'a K, &'a T>
where
    K: std::hash::Hash + Eq + 'a,
    F: Fn(&'a T) -> &'a K,
{
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        // First occurrence wins, mirroring a left join on a de-duplicated key.
        index.entry(key(row)).or_insert(row);
    }
    index
}
