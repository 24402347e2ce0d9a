use chrono::NaiveDate;
use hr_dashboard::dataset::HrDataset;
use hr_dashboard::generator::{
    GenerationParams, GeneratorError, HrDataGenerator, SyntheticHrGenerator,
};
use hr_dashboard::workforce::{enrich_employees, resolve_as_of, resolve_current, resolve_first};
use std::collections::HashMap;

fn params(seed: u64) -> GenerationParams {
    let today = NaiveDate::from_ymd_opt(2025, 9, 30).expect("valid date");
    GenerationParams {
        n_employees: 120,
        seed: Some(seed),
        include_hiring: true,
        ..GenerationParams::with_defaults(today)
    }
}

fn generate(seed: u64) -> HrDataset {
    SyntheticHrGenerator
        .generate(&params(seed))
        .expect("generation succeeds")
}

#[test]
fn same_seed_reproduces_every_table() {
    for seed in [0, 1, 77, 2024, u64::MAX] {
        for n_employees in [10, 57, 400] {
            for include_hiring in [false, true] {
                let params = GenerationParams {
                    n_employees,
                    include_hiring,
                    ..params(seed)
                };
                let first = SyntheticHrGenerator.generate(&params).expect("generates");
                let second = SyntheticHrGenerator.generate(&params).expect("generates");
                assert_eq!(
                    first, second,
                    "seed {seed}, {n_employees} employees, hiring {include_hiring}"
                );
            }
        }
    }
}

#[test]
fn invalid_parameters_never_reach_the_simulation() {
    let mut params = params(1);
    params.n_employees = 5;
    let err = SyntheticHrGenerator
        .generate(&params)
        .expect_err("headcount below minimum");
    assert!(matches!(
        err,
        GeneratorError::InvalidParameter {
            name: "n_employees",
            ..
        }
    ));

    let mut params = self::params(1);
    params.end_date = params.start_date.pred_opt().expect("valid date");
    assert!(SyntheticHrGenerator.generate(&params).is_err());
}

#[test]
fn current_job_is_the_latest_assignment_for_everyone() {
    let dataset = generate(21);
    let current = resolve_current(&dataset.employee_job_assignment);

    let mut latest: HashMap<&str, NaiveDate> = HashMap::new();
    for row in &dataset.employee_job_assignment {
        let entry = latest.entry(row.employee_id.as_str()).or_insert(row.start_date);
        if row.start_date > *entry {
            *entry = row.start_date;
        }
    }

    assert_eq!(current.len(), latest.len());
    for (employee_id, row) in current.iter() {
        assert_eq!(Some(&row.start_date), latest.get(employee_id.as_str()));
    }
}

#[test]
fn first_job_starts_on_the_hire_date() {
    let dataset = generate(8);
    let first = resolve_first(&dataset.employee_job_assignment);

    for employee in &dataset.employee {
        let row = first
            .get(&employee.employee_id)
            .expect("every employee holds a job");
        assert_eq!(row.start_date, employee.hire_date);
    }
}

#[test]
fn snapshot_at_window_end_matches_current_state() {
    let params = params(34);
    let dataset = SyntheticHrGenerator.generate(&params).expect("generates");

    let current = resolve_current(&dataset.employee_org_assignment);
    let snapshot = resolve_as_of(&dataset.employee_org_assignment, params.end_date);

    assert_eq!(current.len(), snapshot.len());
    for (employee_id, row) in current.iter() {
        let held = snapshot.get(employee_id).expect("present in snapshot");
        assert!(std::ptr::eq(*row, held));
    }
}

#[test]
fn enrichment_joins_generated_reference_data() {
    let dataset = generate(55);
    let enriched = enrich_employees(&dataset);

    assert_eq!(enriched.len(), dataset.employee.len());
    for employee in &enriched {
        assert!(employee.job_title.is_some());
        assert!(employee.seniority_level.is_some());
        assert!(employee.business_unit.is_some());
        assert!(employee.country.is_some());
        assert!(employee.base_salary.is_some_and(|salary| salary > 0.0));
    }
}
