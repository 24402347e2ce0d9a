use crate::infra::{
    deserialize_list, deserialize_optional_date, deserialize_seniority_list, today, AppState,
};
use axum::extract::{Path, Query};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use hr_dashboard::dataset::{DatasetError, HrDataset, SeniorityLevel, TableName, TableStats};
use hr_dashboard::error::AppError;
use hr_dashboard::export::{
    bundle_archive, export_table, size_report, Download, ExportFormat, TableSize,
};
use hr_dashboard::generator::GenerationParams;
use hr_dashboard::workforce::{
    attrition_by_business_unit, enrich_employees, filter_dataset, headcount_by_business_unit,
    headcount_by_seniority, run_health_checks, yearly_workforce_metrics, BusinessUnitAttrition,
    DateRange, DatasetSummary, FilterCriteria, FilterOptions, HealthCheck, HealthContext,
    HealthStatus, HeadcountEntry, SalaryRange, YearlyWorkforceMetrics,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Optional overrides applied on top of the configured generation defaults.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateRequest {
    #[serde(default)]
    pub(crate) n_employees: Option<usize>,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    #[serde(default)]
    pub(crate) include_attrition: Option<bool>,
    #[serde(default)]
    pub(crate) attrition_rate: Option<f64>,
    #[serde(default)]
    pub(crate) noise_std: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) end_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) include_hiring: Option<bool>,
    #[serde(default)]
    pub(crate) growth_rate: Option<f64>,
    #[serde(default)]
    pub(crate) backfill_rate: Option<f64>,
    /// Regenerate even when the parameters match the cached dataset.
    #[serde(default)]
    pub(crate) force: bool,
}

impl GenerateRequest {
    fn apply(&self, mut params: GenerationParams) -> GenerationParams {
        if let Some(value) = self.n_employees {
            params.n_employees = value;
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }
        if let Some(value) = self.include_attrition {
            params.include_attrition = value;
        }
        if let Some(value) = self.attrition_rate {
            params.attrition_rate = value;
        }
        if let Some(value) = self.noise_std {
            params.noise_std = value;
        }
        if let Some(value) = self.start_date {
            params.start_date = value;
        }
        if let Some(value) = self.end_date {
            params.end_date = value;
        }
        if let Some(value) = self.include_hiring {
            params.include_hiring = value;
        }
        if let Some(value) = self.growth_rate {
            params.growth_rate = value;
        }
        if let Some(value) = self.backfill_rate {
            params.backfill_rate = value;
        }
        params
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DatasetResponse {
    pub(crate) params: GenerationParams,
    pub(crate) tables: Vec<TableStats>,
    pub(crate) summary: DatasetSummary,
    pub(crate) filter_options: FilterOptions,
    pub(crate) export_sizes: Vec<TableSize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FilterResponse {
    pub(crate) tables: Vec<TableStats>,
    pub(crate) summary: DatasetSummary,
}

/// Workforce filters carried as query fields on the read endpoints, e.g.
/// `?business_units=Sales,Engineering&seniority_levels=1,2&min_salary=50000`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FilterQuery {
    #[serde(default, deserialize_with = "deserialize_list")]
    pub(crate) business_units: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_seniority_list")]
    pub(crate) seniority_levels: Vec<SeniorityLevel>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub(crate) countries: Vec<String>,
    #[serde(default)]
    pub(crate) min_salary: Option<f64>,
    #[serde(default)]
    pub(crate) max_salary: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) hired_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) hired_to: Option<NaiveDate>,
}

impl FilterQuery {
    pub(crate) fn criteria(self) -> FilterCriteria {
        FilterCriteria {
            business_units: self.business_units,
            seniority_levels: self.seniority_levels,
            countries: self.countries,
            salary_range: SalaryRange::from_bounds(self.min_salary, self.max_salary),
            hire_date_range: DateRange::from_bounds(self.hired_from, self.hired_to),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) passed: usize,
    pub(crate) warnings: usize,
    pub(crate) failures: usize,
    pub(crate) checks: Vec<HealthCheck>,
}

impl HealthResponse {
    pub(crate) fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let count = |status: HealthStatus| {
            checks
                .iter()
                .filter(|check| check.status == status)
                .count()
        };
        Self {
            passed: count(HealthStatus::Pass),
            warnings: count(HealthStatus::Warning),
            failures: count(HealthStatus::Fail),
            checks,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WorkforceResponse {
    pub(crate) summary: DatasetSummary,
    pub(crate) yearly: Vec<YearlyWorkforceMetrics>,
    pub(crate) headcount_by_business_unit: Vec<HeadcountEntry>,
    pub(crate) headcount_by_seniority: Vec<HeadcountEntry>,
    pub(crate) attrition_by_business_unit: Vec<BusinessUnitAttrition>,
}

impl WorkforceResponse {
    pub(crate) fn build(dataset: &HrDataset, params: &GenerationParams) -> Self {
        let enriched = enrich_employees(dataset);
        Self {
            summary: DatasetSummary::from_dataset(dataset),
            yearly: yearly_workforce_metrics(
                &dataset.employee,
                params.start_year(),
                params.end_year(),
            ),
            headcount_by_business_unit: headcount_by_business_unit(&enriched),
            headcount_by_seniority: headcount_by_seniority(&enriched),
            attrition_by_business_unit: attrition_by_business_unit(&enriched),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default = "default_export_format")]
    pub(crate) format: ExportFormat,
    /// Single table to download; omitted means a zipped bundle of every table.
    #[serde(default)]
    pub(crate) table: Option<String>,
}

fn default_export_format() -> ExportFormat {
    ExportFormat::Csv
}

pub(crate) fn dataset_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/dataset/generate", post(generate_endpoint))
        .route("/api/v1/dataset/filter", post(filter_endpoint))
        .route("/api/v1/dataset/health", get(health_endpoint))
        .route("/api/v1/dataset/workforce", get(workforce_endpoint))
        .route("/api/v1/dataset/export", get(export_endpoint))
        .route("/api/v1/dataset/tables/:table", get(table_endpoint))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn generate_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<DatasetResponse>, AppError> {
    let params = request.apply(state.session.default_params(today()));
    let dataset = state.generate(params.clone(), request.force).await?;

    Ok(Json(DatasetResponse {
        tables: dataset.table_stats(),
        summary: DatasetSummary::from_dataset(&dataset),
        filter_options: FilterOptions::from_dataset(&dataset),
        export_sizes: size_report(&dataset)?,
        params,
    }))
}

pub(crate) async fn filter_endpoint(
    Extension(state): Extension<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<Json<FilterResponse>, AppError> {
    let response = state
        .with_dataset(move |_, dataset| {
            let filtered = filter_dataset(dataset, &criteria);
            Ok(FilterResponse {
                tables: filtered.table_stats(),
                summary: DatasetSummary::from_dataset(&filtered),
            })
        })
        .await?;
    Ok(Json(response))
}

pub(crate) async fn health_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<HealthQuery>,
    Query(filters): Query<FilterQuery>,
) -> Result<Json<HealthResponse>, AppError> {
    let reporting_date = query.today.unwrap_or_else(today);
    let criteria = filters.criteria();
    let checks = state
        .with_dataset(move |params, dataset| {
            let context = HealthContext::new(
                params.start_year(),
                params.end_year(),
                params.include_hiring,
                reporting_date,
            );
            Ok(run_health_checks(
                &filter_dataset(dataset, &criteria),
                &context,
            ))
        })
        .await?;

    Ok(Json(HealthResponse::from_checks(checks)))
}

pub(crate) async fn workforce_endpoint(
    Extension(state): Extension<AppState>,
    Query(filters): Query<FilterQuery>,
) -> Result<Json<WorkforceResponse>, AppError> {
    let criteria = filters.criteria();
    let response = state
        .with_dataset(move |params, dataset| {
            Ok(WorkforceResponse::build(
                &filter_dataset(dataset, &criteria),
                params,
            ))
        })
        .await?;
    Ok(Json(response))
}

pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<ExportQuery>,
    Query(filters): Query<FilterQuery>,
) -> Result<Response, AppError> {
    let table = query
        .table
        .as_deref()
        .map(str::parse::<TableName>)
        .transpose()?;
    let format = query.format;
    let criteria = filters.criteria();

    let download = state
        .with_dataset(move |_, dataset| {
            let filtered = filter_dataset(dataset, &criteria);
            let download = match table {
                Some(table) => export_table(&filtered, table, format)?,
                None => bundle_archive(&filtered, format)?,
            };
            Ok(download)
        })
        .await?;
    Ok(attachment(download))
}

pub(crate) async fn table_endpoint(
    Extension(state): Extension<AppState>,
    Path(table): Path<String>,
    Query(filters): Query<FilterQuery>,
) -> Result<Json<Value>, AppError> {
    let table = table.parse::<TableName>()?;
    let criteria = filters.criteria();
    let rows = state
        .with_dataset(move |_, dataset| {
            table_rows(&filter_dataset(dataset, &criteria), table)
                .ok_or(AppError::Dataset(DatasetError::MissingTable(table)))
        })
        .await?;

    Ok(Json(json!({
        "table": table,
        "rows": rows.as_array().map(Vec::len).unwrap_or_default(),
        "data": rows,
    })))
}

fn table_rows(dataset: &HrDataset, table: TableName) -> Option<Value> {
    let value = match table {
        TableName::Employee => serde_json::to_value(&dataset.employee),
        TableName::EmployeeJobAssignment => {
            serde_json::to_value(&dataset.employee_job_assignment)
        }
        TableName::EmployeeOrgAssignment => {
            serde_json::to_value(&dataset.employee_org_assignment)
        }
        TableName::EmployeeCompensation => {
            serde_json::to_value(dataset.employee_compensation.as_ref()?)
        }
        TableName::EmployeePerformance => {
            serde_json::to_value(dataset.employee_performance.as_ref()?)
        }
        TableName::JobRole => serde_json::to_value(&dataset.job_role),
        TableName::OrganizationUnit => serde_json::to_value(&dataset.organization_unit),
        TableName::Location => serde_json::to_value(&dataset.location),
    };
    value.ok()
}

fn attachment(download: Download) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", download.file_name);
    let mut response = (StatusCode::OK, download.bytes).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(download.mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}
