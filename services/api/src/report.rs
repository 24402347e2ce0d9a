use crate::cli::{FilterArgs, GenerationArgs};
use crate::infra::{parse_date, today};
use chrono::NaiveDate;
use clap::Args;
use hr_dashboard::config::AppConfig;
use hr_dashboard::dataset::{load_dataset_dir, HrDataset, TableName};
use hr_dashboard::error::AppError;
use hr_dashboard::export::{bundle_archive, export_table, size_report, total_size_mb, ExportFormat};
use hr_dashboard::generator::{GenerationParams, HrDataGenerator, SyntheticHrGenerator};
use hr_dashboard::telemetry;
use hr_dashboard::workforce::{
    enrich_employees, filter_dataset, headcount_by_business_unit, headcount_by_seniority,
    run_health_checks, yearly_workforce_metrics, DatasetSummary, HealthCheck, HealthContext,
    HealthStatus, YearlyWorkforceMetrics,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) generation: GenerationArgs,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Read `{table}.csv` files from this directory instead of generating
    #[arg(long)]
    pub(crate) from_dir: Option<PathBuf>,
    /// Reporting date for tenure checks (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Emit the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) generation: GenerationArgs,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Read `{table}.csv` files from this directory instead of generating
    #[arg(long)]
    pub(crate) from_dir: Option<PathBuf>,
    /// csv or arrow
    #[arg(long, default_value = "csv")]
    pub(crate) format: ExportFormat,
    /// Export a single table instead of a zipped bundle
    #[arg(long)]
    pub(crate) table: Option<TableName>,
    /// Directory the file is written into
    #[arg(long, default_value = ".")]
    pub(crate) output: PathBuf,
}

#[derive(Debug, Serialize)]
pub(crate) struct WorkforceReport {
    pub(crate) start_year: i32,
    pub(crate) end_year: i32,
    pub(crate) summary: DatasetSummary,
    pub(crate) yearly: Vec<YearlyWorkforceMetrics>,
    pub(crate) checks: Vec<HealthCheck>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        generation,
        filters,
        from_dir,
        today: reporting_date,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let reporting_date = reporting_date.unwrap_or_else(today);
    let params = generation.params(&config.generation, reporting_date);
    let dataset = load_or_generate(from_dir, &params)?;
    let dataset = filter_dataset(&dataset, &filters.criteria());

    let report = build_report(&dataset, &params, reporting_date);
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Report payload unavailable: {err}"),
        }
    } else {
        render_report(&dataset, &report);
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        generation,
        filters,
        from_dir,
        format,
        table,
        output,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let params = generation.params(&config.generation, today());
    let dataset = load_or_generate(from_dir, &params)?;
    let dataset = filter_dataset(&dataset, &filters.criteria());

    let download = match table {
        Some(table) => export_table(&dataset, table, format)?,
        None => bundle_archive(&dataset, format)?,
    };

    fs::create_dir_all(&output)?;
    let path = output.join(&download.file_name);
    fs::write(&path, &download.bytes)?;
    info!(path = %path.display(), bytes = download.bytes.len(), "export written");
    println!("Wrote {} ({} bytes)", path.display(), download.bytes.len());
    Ok(())
}

pub(crate) fn load_or_generate(
    from_dir: Option<PathBuf>,
    params: &GenerationParams,
) -> Result<HrDataset, AppError> {
    match from_dir {
        Some(dir) => Ok(load_dataset_dir(dir)?),
        None => Ok(SyntheticHrGenerator.generate(params)?),
    }
}

pub(crate) fn build_report(
    dataset: &HrDataset,
    params: &GenerationParams,
    reporting_date: NaiveDate,
) -> WorkforceReport {
    let (start_year, end_year) = (params.start_year(), params.end_year());
    let context = HealthContext::new(start_year, end_year, params.include_hiring, reporting_date);

    WorkforceReport {
        start_year,
        end_year,
        summary: DatasetSummary::from_dataset(dataset),
        yearly: yearly_workforce_metrics(&dataset.employee, start_year, end_year),
        checks: run_health_checks(dataset, &context),
    }
}

fn render_report(dataset: &HrDataset, report: &WorkforceReport) {
    let summary = &report.summary;
    println!(
        "HR workforce report {}-{}",
        report.start_year, report.end_year
    );
    println!(
        "- {} employees ({} active)",
        summary.total_employees, summary.active_employees
    );
    match summary.average_salary {
        Some(salary) => println!("- Average current salary: {salary:.0}"),
        None => println!("- Average current salary: compensation data unavailable"),
    }
    let genders: Vec<String> = summary
        .gender_counts
        .iter()
        .map(|(gender, count)| format!("{gender} {count}"))
        .collect();
    println!("- Gender mix: {}", genders.join(" | "));

    println!("\nYearly workforce");
    for year in &report.yearly {
        println!(
            "  {}: {} hires | {} departures | net {:+} | headcount {} | growth {:+.1}%",
            year.year,
            year.hires,
            year.attrition,
            year.net_change,
            year.headcount,
            year.growth_rate * 100.0
        );
    }

    let enriched = enrich_employees(dataset);
    println!("\nActive headcount by business unit");
    for entry in headcount_by_business_unit(&enriched) {
        println!("  - {}: {}", entry.key, entry.headcount);
    }
    println!("Active headcount by seniority");
    for entry in headcount_by_seniority(&enriched) {
        println!("  - {}: {}", entry.key, entry.headcount);
    }

    println!("\nData health");
    for check in &report.checks {
        let marker = match check.status {
            HealthStatus::Pass => "ok",
            HealthStatus::Warning => "warn",
            HealthStatus::Fail => "FAIL",
        };
        match &check.details {
            Some(details) => println!(
                "  [{marker}] {}: {} ({details})",
                check.name, check.message
            ),
            None => println!("  [{marker}] {}: {}", check.name, check.message),
        }
    }

    match size_report(dataset) {
        Ok(sizes) => println!(
            "\nExport size: {:.2} MB as csv, {:.2} MB as arrow",
            total_size_mb(&sizes, ExportFormat::Csv),
            total_size_mb(&sizes, ExportFormat::Columnar)
        ),
        Err(err) => println!("\nExport size unavailable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hr_dashboard::config::GenerationDefaults;

    fn params() -> GenerationParams {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        GenerationParams {
            seed: Some(7),
            n_employees: 60,
            ..GenerationDefaults::default().params(today)
        }
    }

    #[test]
    fn report_covers_every_year_in_the_window() {
        let params = params();
        let dataset = load_or_generate(None, &params).expect("generates");
        let report = build_report(&dataset, &params, params.end_date);

        assert_eq!(report.start_year, 2020);
        assert_eq!(report.yearly.len(), 6);
        assert_eq!(report.summary.total_employees, 60);
        assert_eq!(report.checks.len(), 5);
    }

    #[test]
    fn exported_csv_directory_loads_back() {
        let params = params();
        let dataset = load_or_generate(None, &params).expect("generates");
        let dir = tempfile::tempdir().expect("temp dir");
        for table in dataset.tables() {
            let download = export_table(&dataset, table, ExportFormat::Csv).expect("exports");
            fs::write(dir.path().join(&download.file_name), &download.bytes).expect("writes");
        }

        let loaded =
            load_or_generate(Some(dir.path().to_path_buf()), &params).expect("loads from dir");
        assert_eq!(loaded.employee, dataset.employee);
        assert_eq!(loaded.job_role, dataset.job_role);
    }
}
