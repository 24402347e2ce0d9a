use crate::infra::parse_date;
use crate::report::{run_export, run_report, ExportArgs, ReportArgs};
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hr_dashboard::config::GenerationDefaults;
use hr_dashboard::dataset::SeniorityLevel;
use hr_dashboard::error::AppError;
use hr_dashboard::generator::{history_start, GenerationParams};
use hr_dashboard::workforce::{DateRange, FilterCriteria, SalaryRange};

#[derive(Parser, Debug)]
#[command(
    name = "hr-dashboard",
    about = "Generate, filter, check, and export synthetic HR workforce data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a workforce summary, yearly metrics, and health checks
    Report(ReportArgs),
    /// Write tables as CSV or Arrow files, or as a zipped bundle
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

/// Generation overrides; anything omitted comes from the environment defaults.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct GenerationArgs {
    /// Number of employees in the opening workforce (10-10000)
    #[arg(long)]
    pub(crate) employees: Option<usize>,
    /// Seed for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Years of history ending today
    #[arg(long)]
    pub(crate) years: Option<u32>,
    /// Disable terminations entirely
    #[arg(long)]
    pub(crate) no_attrition: bool,
    /// Annual attrition rate (0-0.3)
    #[arg(long)]
    pub(crate) attrition_rate: Option<f64>,
    /// Standard deviation of performance noise (0-0.5)
    #[arg(long)]
    pub(crate) noise_std: Option<f64>,
    /// Simulate growth and backfill hiring
    #[arg(long)]
    pub(crate) hiring: bool,
    /// Annual headcount growth rate (0-0.15)
    #[arg(long)]
    pub(crate) growth_rate: Option<f64>,
    /// Share of departures that are backfilled (0-1)
    #[arg(long)]
    pub(crate) backfill_rate: Option<f64>,
}

impl GenerationArgs {
    pub(crate) fn params(&self, defaults: &GenerationDefaults, today: NaiveDate) -> GenerationParams {
        let mut params = defaults.params(today);
        if let Some(employees) = self.employees {
            params.n_employees = employees;
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }
        if let Some(years) = self.years {
            params.start_date = history_start(today, years);
        }
        if self.no_attrition {
            params.include_attrition = false;
        }
        if let Some(rate) = self.attrition_rate {
            params.attrition_rate = rate;
        }
        if let Some(noise) = self.noise_std {
            params.noise_std = noise;
        }
        if self.hiring {
            params.include_hiring = true;
        }
        if let Some(rate) = self.growth_rate {
            params.growth_rate = rate;
        }
        if let Some(rate) = self.backfill_rate {
            params.backfill_rate = rate;
        }
        params
    }
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FilterArgs {
    /// Keep only these business units (repeatable)
    #[arg(long = "business-unit")]
    pub(crate) business_units: Vec<String>,
    /// Keep only these seniority levels, 1-5 (repeatable)
    #[arg(long = "seniority", value_parser = clap::value_parser!(u8).range(1..=5))]
    pub(crate) seniority_levels: Vec<u8>,
    /// Keep only these countries (repeatable)
    #[arg(long = "country")]
    pub(crate) countries: Vec<String>,
    /// Minimum current base salary
    #[arg(long)]
    pub(crate) min_salary: Option<f64>,
    /// Maximum current base salary
    #[arg(long)]
    pub(crate) max_salary: Option<f64>,
    /// Earliest hire date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) hired_from: Option<NaiveDate>,
    /// Latest hire date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) hired_to: Option<NaiveDate>,
}

impl FilterArgs {
    pub(crate) fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            business_units: self.business_units.clone(),
            seniority_levels: self
                .seniority_levels
                .iter()
                .filter_map(|level| SeniorityLevel::try_from(*level).ok())
                .collect(),
            countries: self.countries.clone(),
            salary_range: SalaryRange::from_bounds(self.min_salary, self.max_salary),
            hire_date_range: DateRange::from_bounds(self.hired_from, self.hired_to),
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Export(args) => run_export(args),
    }
}
