use chrono::NaiveDate;
use hr_dashboard::dataset::{load_dataset_dir, HrDataset, OrgId, SeniorityLevel};
use hr_dashboard::export::{export_table, ExportFormat};
use hr_dashboard::generator::{GenerationParams, HrDataGenerator, SyntheticHrGenerator};
use hr_dashboard::workforce::{
    enrich_employees, filter_dataset, DateRange, FilterCriteria, FilterOptions, SalaryRange,
};
use std::collections::HashSet;

fn dataset() -> HrDataset {
    let today = NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date");
    let params = GenerationParams {
        n_employees: 200,
        seed: Some(2024),
        include_hiring: true,
        ..GenerationParams::with_defaults(today)
    };
    SyntheticHrGenerator.generate(&params).expect("generates")
}

#[test]
fn selecting_every_option_returns_the_unfiltered_population() {
    let dataset = dataset();
    let options = FilterOptions::from_dataset(&dataset);

    let filtered = filter_dataset(&dataset, &FilterCriteria::select_all(&options));
    assert_eq!(filtered.employee.len(), dataset.employee.len());

    let by_units = filter_dataset(
        &dataset,
        &FilterCriteria {
            business_units: options.business_units.clone(),
            ..FilterCriteria::default()
        },
    );
    assert_eq!(by_units, dataset);
}

#[test]
fn history_tables_follow_the_surviving_employees() {
    let dataset = dataset();
    let criteria = FilterCriteria {
        seniority_levels: vec![SeniorityLevel::Senior, SeniorityLevel::Executive],
        ..FilterCriteria::default()
    };

    let filtered = filter_dataset(&dataset, &criteria);
    assert!(!filtered.employee.is_empty());
    assert!(filtered.employee.len() < dataset.employee.len());

    let kept: HashSet<&str> = filtered
        .employee
        .iter()
        .map(|employee| employee.employee_id.as_str())
        .collect();
    assert!(filtered
        .employee_job_assignment
        .iter()
        .all(|row| kept.contains(row.employee_id.as_str())));
    assert!(filtered
        .employee_compensation
        .as_ref()
        .is_some_and(|rows| rows.iter().all(|row| kept.contains(row.employee_id.as_str()))));
    assert_eq!(filtered.job_role, dataset.job_role);
    assert_eq!(filtered.location, dataset.location);

    for employee in enrich_employees(&filtered) {
        assert!(employee
            .seniority_level
            .is_some_and(|level| level.is_senior()));
    }
}

#[test]
fn combined_filters_intersect() {
    let dataset = dataset();
    let options = FilterOptions::from_dataset(&dataset);
    let country = options.countries.first().cloned().expect("countries present");
    let bounds = options.salary_bounds.expect("salary bounds present");
    let midpoint = (bounds.min + bounds.max) / 2.0;
    let hired_from = NaiveDate::from_ymd_opt(2018, 1, 1).expect("valid date");

    let criteria = FilterCriteria {
        countries: vec![country.clone()],
        salary_range: Some(SalaryRange {
            min: bounds.min,
            max: midpoint,
        }),
        hire_date_range: Some(DateRange {
            start: hired_from,
            end: NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date"),
        }),
        ..FilterCriteria::default()
    };

    for employee in enrich_employees(&filter_dataset(&dataset, &criteria)) {
        assert_eq!(employee.country.as_deref(), Some(country.as_str()));
        assert!(employee
            .base_salary
            .is_some_and(|salary| salary <= midpoint));
        assert!(employee.hire_date >= hired_from);
    }
}

#[test]
fn filtering_is_idempotent() {
    let dataset = dataset();
    let criteria = FilterCriteria {
        seniority_levels: vec![SeniorityLevel::Entry, SeniorityLevel::Junior],
        ..FilterCriteria::default()
    };

    let once = filter_dataset(&dataset, &criteria);
    let twice = filter_dataset(&once, &criteria);
    assert_eq!(once, twice);
}

#[test]
fn csv_rows_pointing_at_retired_units_survive_full_unit_selection() {
    let mut dataset = dataset();
    let moved = dataset.employee[0].employee_id.clone();
    for row in dataset
        .employee_org_assignment
        .iter_mut()
        .filter(|row| row.employee_id == moved)
    {
        row.org_id = OrgId::from("ORG-RETIRED");
        row.business_unit = Some("Legacy".to_string());
    }

    let dir = tempfile::tempdir().expect("tempdir");
    for table in dataset.tables() {
        let download = export_table(&dataset, table, ExportFormat::Csv).expect("exports");
        std::fs::write(dir.path().join(&download.file_name), &download.bytes).expect("writes");
    }
    let loaded = load_dataset_dir(dir.path()).expect("loads");

    let options = FilterOptions::from_dataset(&loaded);
    assert!(!options.business_units.iter().any(|unit| unit == "Legacy"));
    let filtered = filter_dataset(
        &loaded,
        &FilterCriteria {
            business_units: options.business_units,
            ..FilterCriteria::default()
        },
    );

    assert_eq!(filtered.employee.len(), loaded.employee.len());
    assert!(filtered
        .employee
        .iter()
        .any(|employee| employee.employee_id == moved));
}
