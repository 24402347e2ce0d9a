//! Derived views over an [`HrDataset`](crate::dataset::HrDataset): current-state
//! resolution, enrichment, filtering, analytics, and health checks.

pub mod enrich;
pub mod filter;
pub mod health;
pub mod metrics;
pub mod resolve;

pub use enrich::{enrich_employees, EnrichedEmployee};
pub use filter::{filter_dataset, DateRange, FilterCriteria, FilterOptions, SalaryRange};
pub use health::{run_health_checks, HealthCheck, HealthContext, HealthStatus, HealthThresholds};
pub use metrics::{
    attrition_by_business_unit, headcount_by_business_unit, headcount_by_seniority,
    yearly_workforce_metrics, BusinessUnitAttrition, DatasetSummary, HeadcountEntry,
    YearlyWorkforceMetrics,
};
pub use resolve::{resolve_as_of, resolve_current, resolve_first, EffectiveDated, ResolvedRecords};
