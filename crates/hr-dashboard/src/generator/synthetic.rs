use super::rng::SeededRng;
use super::{GenerationParams, GeneratorError, HrDataGenerator};
use crate::dataset::{
    Compensation, Employee, EmployeeId, HrDataset, JobAssignment, JobId, JobRole, Location,
    LocationId, OrgAssignment, OrgId, OrganizationUnit, PerformanceReview, SeniorityLevel,
};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, info};

struct BusinessUnitProfile {
    name: &'static str,
    weight: u32,
    teams: &'static [&'static str],
    job_family: &'static str,
    role_noun: &'static str,
    pay_factor: f64,
}

const BUSINESS_UNITS: &[BusinessUnitProfile] = &[
    BusinessUnitProfile {
        name: "Engineering",
        weight: 30,
        teams: &["Platform", "Product", "Data"],
        job_family: "Software Engineering",
        role_noun: "Engineer",
        pay_factor: 1.15,
    },
    BusinessUnitProfile {
        name: "Sales",
        weight: 22,
        teams: &["Enterprise", "Mid-Market"],
        job_family: "Sales",
        role_noun: "Account Executive",
        pay_factor: 1.0,
    },
    BusinessUnitProfile {
        name: "Marketing",
        weight: 12,
        teams: &["Brand", "Growth"],
        job_family: "Marketing",
        role_noun: "Marketing Specialist",
        pay_factor: 0.95,
    },
    BusinessUnitProfile {
        name: "Finance",
        weight: 12,
        teams: &["Accounting", "FP&A"],
        job_family: "Finance",
        role_noun: "Financial Analyst",
        pay_factor: 1.05,
    },
    BusinessUnitProfile {
        name: "Human Resources",
        weight: 8,
        teams: &["Talent", "People Operations"],
        job_family: "Human Resources",
        role_noun: "HR Partner",
        pay_factor: 0.9,
    },
    BusinessUnitProfile {
        name: "Operations",
        weight: 16,
        teams: &["Facilities", "Supply Chain"],
        job_family: "Operations",
        role_noun: "Operations Analyst",
        pay_factor: 0.9,
    },
];

struct LocationProfile {
    city: &'static str,
    country: &'static str,
    region: &'static str,
    latitude: f64,
    longitude: f64,
    weight: u32,
    pay_factor: f64,
}

const LOCATIONS: &[LocationProfile] = &[
    LocationProfile {
        city: "Sydney",
        country: "Australia",
        region: "APAC",
        latitude: -33.8688,
        longitude: 151.2093,
        weight: 18,
        pay_factor: 1.0,
    },
    LocationProfile {
        city: "Melbourne",
        country: "Australia",
        region: "APAC",
        latitude: -37.8136,
        longitude: 144.9631,
        weight: 12,
        pay_factor: 0.97,
    },
    LocationProfile {
        city: "Tokyo",
        country: "Japan",
        region: "APAC",
        latitude: 35.6762,
        longitude: 139.6503,
        weight: 10,
        pay_factor: 0.9,
    },
    LocationProfile {
        city: "Singapore",
        country: "Singapore",
        region: "APAC",
        latitude: 1.3521,
        longitude: 103.8198,
        weight: 10,
        pay_factor: 0.95,
    },
    LocationProfile {
        city: "London",
        country: "United Kingdom",
        region: "EMEA",
        latitude: 51.5074,
        longitude: -0.1278,
        weight: 14,
        pay_factor: 1.0,
    },
    LocationProfile {
        city: "Berlin",
        country: "Germany",
        region: "EMEA",
        latitude: 52.52,
        longitude: 13.405,
        weight: 10,
        pay_factor: 0.95,
    },
    LocationProfile {
        city: "New York",
        country: "United States",
        region: "Americas",
        latitude: 40.7128,
        longitude: -74.006,
        weight: 14,
        pay_factor: 1.2,
    },
    LocationProfile {
        city: "San Francisco",
        country: "United States",
        region: "Americas",
        latitude: 37.7749,
        longitude: -122.4194,
        weight: 12,
        pay_factor: 1.25,
    },
];

const FIRST_NAMES_FEMALE: &[&str] = &[
    "Olivia", "Amelia", "Isla", "Mia", "Grace", "Chloe", "Sophie", "Hana", "Yuki", "Priya",
    "Leah", "Zara", "Emma", "Lena", "Maya", "Aiko", "Freya", "Nora", "Ruby", "Elena",
];
const FIRST_NAMES_MALE: &[&str] = &[
    "Oliver", "Noah", "Jack", "William", "Leo", "Lucas", "Henry", "Kenji", "Arjun", "Mateo",
    "Ethan", "Samuel", "Felix", "Hugo", "Ravi", "Daniel", "Max", "Theo", "Omar", "Kai",
];
const FIRST_NAMES_NEUTRAL: &[&str] = &["Alex", "Jordan", "Riley", "Sam", "Quinn", "Avery"];
const LAST_NAMES: &[&str] = &[
    "Smith", "Nguyen", "Williams", "Brown", "Tanaka", "Patel", "Jones", "Wilson", "Taylor",
    "Chen", "Müller", "Garcia", "Martin", "Kim", "Singh", "Anderson", "Thomas", "Lee", "White",
    "Harris", "Clark", "Lewis", "Walker", "Suzuki", "Schmidt", "Rossi", "Young", "King",
    "Wright", "Scott",
];

const GENDERS: &[&str] = &["Female", "Male", "Non-binary"];
const GENDER_WEIGHTS: &[u32] = &[48, 48, 4];
const EMPLOYMENT_TYPES: &[&str] = &["Full-time", "Part-time", "Contractor"];
const EMPLOYMENT_TYPE_WEIGHTS: &[u32] = &[85, 10, 5];
const TERMINATION_REASONS: &[&str] = &["Resignation", "Involuntary", "Retirement", "Relocation"];
const TERMINATION_REASON_WEIGHTS: &[u32] = &[60, 20, 10, 10];

/// Pyramid for the opening workforce and the junior-heavy mix used for new hires.
const WORKFORCE_SENIORITY_WEIGHTS: &[u32] = &[35, 30, 20, 10, 5];
const NEW_HIRE_SENIORITY_WEIGHTS: &[u32] = &[45, 30, 15, 7, 3];
const BASE_SALARY_BY_SENIORITY: [f64; 5] = [55_000.0, 70_000.0, 90_000.0, 120_000.0, 170_000.0];
const MAX_INITIAL_TENURE_DAYS: usize = 10 * 365;
const PROMOTION_PROBABILITY: f64 = 0.25;
const TRANSFER_PROBABILITY: f64 = 0.03;

/// Seeded reference generator honouring the tabular output contract.
///
/// It produces a plausible opening workforce and then steps through each year of
/// history applying reviews, merit raises, promotions, attrition, and hiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticHrGenerator;

impl HrDataGenerator for SyntheticHrGenerator {
    fn generate(&self, params: &GenerationParams) -> Result<HrDataset, GeneratorError> {
        params.validate()?;

        let rng = match params.seed {
            Some(seed) => SeededRng::new(seed),
            None => SeededRng::from_entropy()?,
        };

        let dataset = Simulation::new(params, rng).run();
        info!(
            employees = dataset.employee.len(),
            seed = ?params.seed,
            start = %params.start_date,
            end = %params.end_date,
            "generated synthetic HR dataset"
        );
        Ok(dataset)
    }
}

struct SimEmployee {
    business_unit: usize,
    seniority: SeniorityLevel,
    talent: f64,
    salary: f64,
    hire_date: NaiveDate,
    termination_date: Option<NaiveDate>,
    job_row: usize,
    org_row: usize,
}

impl SimEmployee {
    fn active_on(&self, date: NaiveDate) -> bool {
        self.hire_date <= date && self.termination_date.map_or(true, |term| term > date)
    }
}

struct Simulation<'a> {
    params: &'a GenerationParams,
    rng: SeededRng,
    org_ids: Vec<Vec<OrgId>>,
    workforce: Vec<SimEmployee>,
    dataset: HrDataset,
}

impl<'a> Simulation<'a> {
    fn new(params: &'a GenerationParams, rng: SeededRng) -> Self {
        let (organization_unit, org_ids) = organization_units();
        let dataset = HrDataset {
            employee_compensation: Some(Vec::new()),
            employee_performance: Some(Vec::new()),
            job_role: job_roles(),
            organization_unit,
            location: locations(),
            ..HrDataset::default()
        };

        Self {
            params,
            rng,
            org_ids,
            workforce: Vec::with_capacity(params.n_employees),
            dataset,
        }
    }

    fn run(mut self) -> HrDataset {
        let start = self.params.start_date;
        for _ in 0..self.params.n_employees {
            let tenure = self.rng.below(MAX_INITIAL_TENURE_DAYS) as i64 + 1;
            let hire_date = start - Duration::days(tenure);
            self.hire(hire_date, WORKFORCE_SENIORITY_WEIGHTS);
        }

        for year in self.params.start_year()..=self.params.end_year() {
            self.simulate_year(year);
        }

        self.assign_managers();
        self.dataset
    }

    fn year_window(&self, year: i32) -> Option<(NaiveDate, NaiveDate)> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?.max(self.params.start_date);
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?.min(self.params.end_date);
        (first <= last).then_some((first, last))
    }

    fn simulate_year(&mut self, year: i32) {
        let Some((year_start, year_end)) = self.year_window(year) else {
            return;
        };

        let active_at_start: Vec<usize> = (0..self.workforce.len())
            .filter(|&index| self.workforce[index].active_on(year_start))
            .collect();

        let mut ratings = BTreeMap::new();
        for &index in &active_at_start {
            let rating = self.review(index, year);
            ratings.insert(index, rating);
        }

        if let Some(review_date) = NaiveDate::from_ymd_opt(year, 4, 1) {
            if review_date >= year_start && review_date <= year_end {
                for (&index, &rating) in &ratings {
                    if self.workforce[index].active_on(review_date) {
                        self.annual_review(index, rating, review_date);
                    }
                }
            }
        }

        let mut departures = 0usize;
        if self.params.include_attrition {
            for (&index, &rating) in &ratings {
                if self.maybe_terminate(index, rating, year_start, year_end) {
                    departures += 1;
                }
            }
        }

        if self.params.include_hiring {
            let growth = active_at_start.len() as f64 * self.params.growth_rate;
            let backfill = departures as f64 * self.params.backfill_rate;
            let hires = (growth + backfill).round() as usize;
            for _ in 0..hires {
                let hire_date = self.random_date(year_start, year_end);
                self.hire(hire_date, NEW_HIRE_SENIORITY_WEIGHTS);
            }
            debug!(year, hires, departures, "simulated hiring");
        }
    }

    fn hire(&mut self, hire_date: NaiveDate, seniority_weights: &[u32]) {
        let number = self.workforce.len() + 1;
        let employee_id = EmployeeId(format!("E{number:06}"));

        let gender_index = self.rng.weighted(GENDER_WEIGHTS);
        let first_name = match gender_index {
            0 => *self.rng.pick(FIRST_NAMES_FEMALE),
            1 => *self.rng.pick(FIRST_NAMES_MALE),
            _ => *self.rng.pick(FIRST_NAMES_NEUTRAL),
        };
        let last_name = *self.rng.pick(LAST_NAMES);
        let location = self.rng.weighted(&location_weights());
        let employment_type = EMPLOYMENT_TYPES[self.rng.weighted(EMPLOYMENT_TYPE_WEIGHTS)];
        let business_unit = self.rng.weighted(&business_unit_weights());
        let seniority = SeniorityLevel::ordered()[self.rng.weighted(seniority_weights)];
        let talent = self.rng.gaussian() * 0.8;
        let salary = self.starting_salary(business_unit, location, seniority);
        let org_id = self.rng.pick(&self.org_ids[business_unit][1..]).clone();

        self.dataset.employee.push(Employee {
            employee_id: employee_id.clone(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            gender: GENDERS[gender_index].to_string(),
            hire_date,
            termination_date: None,
            termination_reason: None,
            location_id: location_id(location),
            employment_type: employment_type.to_string(),
            manager_id: None,
        });

        let job_row = self.dataset.employee_job_assignment.len();
        self.dataset.employee_job_assignment.push(JobAssignment {
            employee_id: employee_id.clone(),
            job_id: job_id(business_unit, seniority),
            start_date: hire_date,
            end_date: None,
        });

        let org_row = self.dataset.employee_org_assignment.len();
        self.dataset.employee_org_assignment.push(OrgAssignment {
            employee_id: employee_id.clone(),
            org_id,
            business_unit: Some(BUSINESS_UNITS[business_unit].name.to_string()),
            start_date: hire_date,
            end_date: None,
        });

        self.push_compensation(employee_id, salary, hire_date, "New Hire");

        self.workforce.push(SimEmployee {
            business_unit,
            seniority,
            talent,
            salary,
            hire_date,
            termination_date: None,
            job_row,
            org_row,
        });
    }

    fn starting_salary(
        &mut self,
        business_unit: usize,
        location: usize,
        level: SeniorityLevel,
    ) -> f64 {
        let base = BASE_SALARY_BY_SENIORITY[usize::from(level.rank() - 1)];
        let spread = (1.0 + 0.08 * self.rng.gaussian()).max(0.7);
        round_salary(
            base * BUSINESS_UNITS[business_unit].pay_factor * LOCATIONS[location].pay_factor * spread,
        )
    }

    fn review(&mut self, index: usize, year: i32) -> u8 {
        let noise = self.params.noise_std * self.rng.gaussian();
        let score = 3.0 + self.workforce[index].talent + noise;
        let rating = score.round().clamp(1.0, 5.0) as u8;

        let employee_id = self.employee_id(index);
        if let Some(reviews) = self.dataset.employee_performance.as_mut() {
            reviews.push(PerformanceReview {
                employee_id,
                review_year: year,
                rating,
            });
        }
        rating
    }

    fn annual_review(&mut self, index: usize, rating: u8, effective: NaiveDate) {
        if self.workforce[index].hire_date >= effective {
            return;
        }

        let promoted = rating >= 4
            && self.workforce[index].seniority != SeniorityLevel::Executive
            && self.rng.chance(PROMOTION_PROBABILITY);

        if promoted {
            let next = SeniorityLevel::try_from(self.workforce[index].seniority.rank() + 1)
                .unwrap_or(SeniorityLevel::Executive);
            self.promote(index, next, effective);
            return;
        }

        let merit = 0.02 + 0.01 * f64::from(rating.saturating_sub(1)) * 0.75;
        let salary = round_salary(self.workforce[index].salary * (1.0 + merit));
        self.workforce[index].salary = salary;
        let employee_id = self.employee_id(index);
        self.push_compensation(employee_id, salary, effective, "Merit Increase");

        if self.rng.chance(TRANSFER_PROBABILITY) {
            self.transfer(index, effective);
        }
    }

    fn promote(&mut self, index: usize, next: SeniorityLevel, effective: NaiveDate) {
        let employee_id = self.employee_id(index);
        let business_unit = self.workforce[index].business_unit;
        let previous_row = self.workforce[index].job_row;
        self.dataset.employee_job_assignment[previous_row].end_date =
            Some(effective - Duration::days(1));

        let job_row = self.dataset.employee_job_assignment.len();
        self.dataset.employee_job_assignment.push(JobAssignment {
            employee_id: employee_id.clone(),
            job_id: job_id(business_unit, next),
            start_date: effective,
            end_date: None,
        });

        let salary = round_salary(self.workforce[index].salary * 1.10);
        let member = &mut self.workforce[index];
        member.seniority = next;
        member.job_row = job_row;
        member.salary = salary;
        self.push_compensation(employee_id, salary, effective, "Promotion");
    }

    fn transfer(&mut self, index: usize, effective: NaiveDate) {
        let business_unit = self.workforce[index].business_unit;
        let previous_row = self.workforce[index].org_row;
        let current = self.dataset.employee_org_assignment[previous_row].org_id.clone();
        let candidates: Vec<OrgId> = self.org_ids[business_unit][1..]
            .iter()
            .filter(|org| **org != current)
            .cloned()
            .collect();
        if candidates.is_empty() {
            return;
        }

        let org_id = self.rng.pick(&candidates).clone();
        self.dataset.employee_org_assignment[previous_row].end_date =
            Some(effective - Duration::days(1));
        let org_row = self.dataset.employee_org_assignment.len();
        self.dataset.employee_org_assignment.push(OrgAssignment {
            employee_id: self.employee_id(index),
            org_id,
            business_unit: Some(BUSINESS_UNITS[business_unit].name.to_string()),
            start_date: effective,
            end_date: None,
        });
        self.workforce[index].org_row = org_row;
    }

    fn maybe_terminate(
        &mut self,
        index: usize,
        rating: u8,
        year_start: NaiveDate,
        year_end: NaiveDate,
    ) -> bool {
        let performance_factor = match rating {
            1 => 2.0,
            2 => 1.5,
            3 => 1.0,
            4 => 0.7,
            _ => 0.5,
        };
        let jitter = (1.0 + self.params.noise_std * self.rng.gaussian()).max(0.0);
        let probability = self.params.attrition_rate * performance_factor * jitter;
        if !self.rng.chance(probability) {
            return false;
        }

        let earliest = (self.workforce[index].hire_date + Duration::days(1)).max(year_start);
        if earliest > year_end {
            return false;
        }

        let date = self.random_date(earliest, year_end);
        let reason = TERMINATION_REASONS[self.rng.weighted(TERMINATION_REASON_WEIGHTS)];
        let member = &mut self.workforce[index];
        member.termination_date = Some(date);
        let (job_row, org_row) = (member.job_row, member.org_row);

        self.dataset.employee[index].termination_date = Some(date);
        self.dataset.employee[index].termination_reason = Some(reason.to_string());
        self.dataset.employee_job_assignment[job_row].end_date = Some(date);
        self.dataset.employee_org_assignment[org_row].end_date = Some(date);
        true
    }

    fn assign_managers(&mut self) {
        // Only people still employed at the end of the window can manage.
        let mut by_unit: BTreeMap<usize, Vec<(SeniorityLevel, usize)>> = BTreeMap::new();
        for (index, member) in self.workforce.iter().enumerate() {
            if member.termination_date.is_some() {
                continue;
            }
            by_unit
                .entry(member.business_unit)
                .or_default()
                .push((member.seniority, index));
        }
        for members in by_unit.values_mut() {
            members.sort();
        }

        for index in 0..self.workforce.len() {
            let member = &self.workforce[index];
            let Some(members) = by_unit.get(&member.business_unit) else {
                continue;
            };
            let first_senior = members.partition_point(|(level, _)| *level <= member.seniority);
            let seniors = &members[first_senior..];
            if seniors.is_empty() {
                continue;
            }
            let (_, manager) = *self.rng.pick(seniors);
            let manager_id = self.employee_id(manager);
            self.dataset.employee[index].manager_id = Some(manager_id);
        }
    }

    fn push_compensation(
        &mut self,
        employee_id: EmployeeId,
        base_salary: f64,
        start_date: NaiveDate,
        reason: &str,
    ) {
        if let Some(rows) = self.dataset.employee_compensation.as_mut() {
            rows.push(Compensation {
                employee_id,
                base_salary,
                currency: "USD".to_string(),
                start_date,
                change_reason: Some(reason.to_string()),
            });
        }
    }

    fn random_date(&mut self, first: NaiveDate, last: NaiveDate) -> NaiveDate {
        let span = (last - first).num_days().max(0) as usize + 1;
        first + Duration::days(self.rng.below(span) as i64)
    }

    fn employee_id(&self, index: usize) -> EmployeeId {
        self.dataset.employee[index].employee_id.clone()
    }
}

fn round_salary(value: f64) -> f64 {
    (value / 100.0).round() * 100.0
}

fn business_unit_weights() -> Vec<u32> {
    BUSINESS_UNITS.iter().map(|unit| unit.weight).collect()
}

fn location_weights() -> Vec<u32> {
    LOCATIONS.iter().map(|location| location.weight).collect()
}

fn location_id(index: usize) -> LocationId {
    LocationId(format!("LOC{:02}", index + 1))
}

fn job_id(business_unit: usize, level: SeniorityLevel) -> JobId {
    JobId(format!("JOB{:02}{}", business_unit + 1, level.rank()))
}

fn locations() -> Vec<Location> {
    LOCATIONS
        .iter()
        .enumerate()
        .map(|(index, profile)| Location {
            location_id: location_id(index),
            city: profile.city.to_string(),
            country: profile.country.to_string(),
            region: profile.region.to_string(),
            latitude: profile.latitude,
            longitude: profile.longitude,
        })
        .collect()
}

fn job_roles() -> Vec<JobRole> {
    let mut roles = Vec::new();
    for (unit_index, unit) in BUSINESS_UNITS.iter().enumerate() {
        for level in SeniorityLevel::ordered() {
            let job_title = match level {
                SeniorityLevel::Entry => format!("Associate {}", unit.role_noun),
                SeniorityLevel::Junior => unit.role_noun.to_string(),
                SeniorityLevel::Mid => format!("Senior {}", unit.role_noun),
                SeniorityLevel::Senior => format!("Principal {}", unit.role_noun),
                SeniorityLevel::Executive => format!("Head of {}", unit.job_family),
            };
            roles.push(JobRole {
                job_id: job_id(unit_index, level),
                job_title,
                job_family: unit.job_family.to_string(),
                job_level: format!("L{}", level.rank()),
                seniority_level: level,
            });
        }
    }
    roles
}

/// One root unit per business unit with its teams beneath it. The returned
/// index lists the root first, then the teams.
fn organization_units() -> (Vec<OrganizationUnit>, Vec<Vec<OrgId>>) {
    let mut units = Vec::new();
    let mut index = Vec::new();
    let mut next_id = 1;

    for unit in BUSINESS_UNITS {
        let root = OrgId(format!("ORG{next_id:03}"));
        next_id += 1;
        units.push(OrganizationUnit {
            org_id: root.clone(),
            org_name: unit.name.to_string(),
            business_unit: Some(unit.name.to_string()),
            parent_org_id: None,
        });

        let mut ids = vec![root.clone()];
        for team in unit.teams {
            let org_id = OrgId(format!("ORG{next_id:03}"));
            next_id += 1;
            units.push(OrganizationUnit {
                org_id: org_id.clone(),
                org_name: format!("{} - {}", unit.name, team),
                business_unit: Some(unit.name.to_string()),
                parent_org_id: Some(root.clone()),
            });
            ids.push(org_id);
        }
        index.push(ids);
    }

    (units, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn params(seed: u64) -> GenerationParams {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date");
        GenerationParams {
            n_employees: 60,
            seed: Some(seed),
            ..GenerationParams::with_defaults(today)
        }
    }

    #[test]
    fn emits_every_table_with_requested_headcount() {
        let dataset = SyntheticHrGenerator
            .generate(&params(42))
            .expect("generation succeeds");

        assert_eq!(dataset.employee.len(), 60);
        assert_eq!(dataset.job_role.len(), BUSINESS_UNITS.len() * 5);
        assert_eq!(dataset.location.len(), LOCATIONS.len());
        assert!(dataset
            .employee_compensation
            .as_ref()
            .is_some_and(|rows| rows.iter().all(|row| row.base_salary > 0.0)));
        assert!(dataset
            .employee_performance
            .as_ref()
            .is_some_and(|rows| rows.iter().all(|row| (1..=5).contains(&row.rating))));
    }

    #[test]
    fn different_seeds_produce_different_people() {
        let first = SyntheticHrGenerator.generate(&params(42)).expect("generates");
        let second = SyntheticHrGenerator.generate(&params(123)).expect("generates");

        let names = |dataset: &HrDataset| -> Vec<String> {
            dataset
                .employee
                .iter()
                .map(|employee| employee.first_name.clone())
                .collect()
        };
        assert_ne!(names(&first), names(&second));
    }

    #[test]
    fn terminations_follow_hire_dates_and_close_assignments() {
        let mut params = params(9);
        params.attrition_rate = 0.3;
        let dataset = SyntheticHrGenerator.generate(&params).expect("generates");

        let terminated: HashSet<&EmployeeId> = dataset
            .employee
            .iter()
            .filter(|employee| employee.termination_date.is_some())
            .map(|employee| &employee.employee_id)
            .collect();
        assert!(!terminated.is_empty());

        for employee in &dataset.employee {
            if let Some(term) = employee.termination_date {
                assert!(term > employee.hire_date);
                assert!(term <= params.end_date);
            }
        }

        for id in terminated {
            let open_jobs = dataset
                .employee_job_assignment
                .iter()
                .filter(|row| &row.employee_id == id && row.end_date.is_none())
                .count();
            assert_eq!(open_jobs, 0);
        }
    }

    #[test]
    fn attrition_disabled_keeps_everyone_employed() {
        let mut params = params(5);
        params.include_attrition = false;
        let dataset = SyntheticHrGenerator.generate(&params).expect("generates");
        assert!(dataset
            .employee
            .iter()
            .all(|employee| employee.termination_date.is_none()));
    }

    #[test]
    fn hiring_adds_employees_inside_the_window() {
        let mut params = params(11);
        params.include_hiring = true;
        params.growth_rate = 0.1;
        let dataset = SyntheticHrGenerator.generate(&params).expect("generates");

        let new_hires: Vec<&Employee> = dataset
            .employee
            .iter()
            .filter(|employee| employee.hire_date >= params.start_date)
            .collect();
        assert!(dataset.employee.len() > 60);
        assert_eq!(new_hires.len(), dataset.employee.len() - 60);
        assert!(new_hires
            .iter()
            .all(|employee| employee.hire_date <= params.end_date));
    }

    #[test]
    fn managers_outrank_their_reports() {
        let dataset = SyntheticHrGenerator.generate(&params(3)).expect("generates");
        assert!(dataset
            .employee
            .iter()
            .any(|employee| employee.manager_id.is_some()));
        for employee in &dataset.employee {
            if let Some(manager) = &employee.manager_id {
                assert_ne!(manager, &employee.employee_id);
            }
        }
    }

    #[test]
    fn departed_employees_never_manage_anyone() {
        let mut params = params(21);
        params.attrition_rate = 0.3;
        params.include_hiring = true;
        let dataset = SyntheticHrGenerator.generate(&params).expect("generates");

        let departed: HashSet<&EmployeeId> = dataset
            .employee
            .iter()
            .filter(|employee| employee.termination_date.is_some())
            .map(|employee| &employee.employee_id)
            .collect();
        assert!(!departed.is_empty());
        assert!(dataset
            .employee
            .iter()
            .filter_map(|employee| employee.manager_id.as_ref())
            .all(|manager| !departed.contains(manager)));
    }
}
