use chrono::NaiveDate;
use hr_dashboard::dataset::HrDataset;
use hr_dashboard::generator::{GenerationParams, HrDataGenerator, SyntheticHrGenerator};
use hr_dashboard::workforce::metrics::year_end_headcount;
use hr_dashboard::workforce::{run_health_checks, HealthContext, HealthStatus};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date")
}

fn generated(include_hiring: bool) -> (GenerationParams, HrDataset) {
    let params = GenerationParams {
        n_employees: 150,
        seed: Some(31),
        include_hiring,
        ..GenerationParams::with_defaults(today())
    };
    let dataset = SyntheticHrGenerator.generate(&params).expect("generates");
    (params, dataset)
}

fn context(params: &GenerationParams) -> HealthContext {
    HealthContext::new(
        params.start_year(),
        params.end_year(),
        params.include_hiring,
        today(),
    )
}

#[test]
fn empty_dataset_reports_only_missing_data() {
    let (params, _) = generated(false);
    let checks = run_health_checks(&HrDataset::default(), &context(&params));

    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].name, "Data Available");
    assert_eq!(checks[0].status, HealthStatus::Fail);
}

#[test]
fn hiring_adds_the_new_hire_check() {
    let (params, dataset) = generated(false);
    let without = run_health_checks(&dataset, &context(&params));
    assert_eq!(without.len(), 5);
    assert!(without.iter().all(|check| check.name != "New Hire Seniority"));

    let (params, dataset) = generated(true);
    let with = run_health_checks(&dataset, &context(&params));
    assert_eq!(with.len(), 6);
    assert_eq!(with[5].name, "New Hire Seniority");
}

#[test]
fn headcount_fails_exactly_when_a_year_end_goes_negative() {
    let (params, dataset) = generated(true);
    let checks = run_health_checks(&dataset, &context(&params));
    let headcount = checks
        .iter()
        .find(|check| check.name == "Headcount Trend")
        .expect("headcount check present");

    let any_negative = (params.start_year()..=params.end_year())
        .any(|year| year_end_headcount(&dataset.employee, year) < 0);
    assert_eq!(headcount.status == HealthStatus::Fail, any_negative);
    assert_ne!(headcount.status, HealthStatus::Fail);
}

#[test]
fn check_names_are_stable_and_ordered() {
    let (params, dataset) = generated(true);
    let names: Vec<String> = run_health_checks(&dataset, &context(&params))
        .into_iter()
        .map(|check| check.name)
        .collect();

    assert_eq!(
        names,
        [
            "Headcount Trend",
            "Attrition Rate",
            "BU Distribution",
            "Seniority Pyramid",
            "Tenure Mix",
            "New Hire Seniority",
        ]
    );
}
