use chrono::{Local, NaiveDate};
use hr_dashboard::cache::DatasetCache;
use hr_dashboard::config::GenerationDefaults;
use hr_dashboard::dataset::{HrDataset, SeniorityLevel};
use hr_dashboard::error::AppError;
use hr_dashboard::generator::{GenerationParams, GeneratorError, SyntheticHrGenerator};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::Error as _;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) session: Arc<DatasetSession>,
}

impl AppState {
    /// Generate (or fetch from cache) on the blocking pool.
    pub(crate) async fn generate(
        &self,
        params: GenerationParams,
        force: bool,
    ) -> Result<Arc<HrDataset>, AppError> {
        let session = Arc::clone(&self.session);
        blocking(move || Ok(session.generate(&params, force)?)).await
    }

    /// Run `work` against the current dataset on the blocking pool.
    pub(crate) async fn with_dataset<T, F>(&self, work: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&GenerationParams, &HrDataset) -> Result<T, AppError> + Send + 'static,
    {
        let session = Arc::clone(&self.session);
        blocking(move || {
            let (params, dataset) = session.current()?;
            work(&params, &dataset)
        })
        .await
    }
}

/// Generation and the views over it are CPU bound and hold the session lock,
/// so they stay off the async workers.
async fn blocking<T, F>(task: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(std::io::Error::from)?
}

/// The one dataset a running service works against.
pub(crate) struct DatasetSession {
    defaults: GenerationDefaults,
    cache: Mutex<DatasetCache<SyntheticHrGenerator>>,
}

impl DatasetSession {
    pub(crate) fn new(defaults: GenerationDefaults) -> Self {
        Self {
            defaults,
            cache: Mutex::new(DatasetCache::new(SyntheticHrGenerator)),
        }
    }

    pub(crate) fn default_params(&self, today: NaiveDate) -> GenerationParams {
        self.defaults.params(today)
    }

    /// Fetch the dataset for `params`, regenerating only when they changed.
    pub(crate) fn generate(
        &self,
        params: &GenerationParams,
        force: bool,
    ) -> Result<Arc<HrDataset>, GeneratorError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if force {
            cache.force_regenerate(params)
        } else {
            cache.get(params)
        }
    }

    /// The cached dataset, or one generated from the configured defaults.
    pub(crate) fn current(&self) -> Result<(GenerationParams, Arc<HrDataset>), GeneratorError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((params, dataset)) = cache.current() {
            return Ok((params.clone(), dataset));
        }
        let params = self.defaults.params(today());
        let dataset = cache.get(&params)?;
        Ok((params, dataset))
    }
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Comma-separated query value, e.g. `countries=Germany,Japan`.
pub(crate) fn deserialize_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse()
                .map_err(|err| D::Error::custom(format!("invalid list item '{item}': {err}")))
        })
        .collect()
}

pub(crate) fn deserialize_seniority_list<'de, D>(
    deserializer: D,
) -> Result<Vec<SeniorityLevel>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_list::<D, u8>(deserializer)?
        .into_iter()
        .map(|level| SeniorityLevel::try_from(level).map_err(D::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_trims_and_reports_input() {
        assert_eq!(
            parse_date(" 2024-02-29 "),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date"))
        );
        let err = parse_date("29/02/2024").expect_err("wrong layout");
        assert!(err.contains("29/02/2024"));
    }

    #[derive(Debug, Deserialize)]
    struct Listed {
        #[serde(default, deserialize_with = "deserialize_list")]
        countries: Vec<String>,
        #[serde(default, deserialize_with = "deserialize_seniority_list")]
        levels: Vec<SeniorityLevel>,
    }

    #[test]
    fn list_values_split_on_commas_and_validate_levels() {
        let listed: Listed =
            serde_json::from_str(r#"{"countries": " Germany, ,Japan", "levels": "1,5"}"#)
                .expect("parses");
        assert_eq!(listed.countries, vec!["Germany", "Japan"]);
        assert_eq!(listed.levels, vec![SeniorityLevel::Entry, SeniorityLevel::Executive]);

        let empty: Listed = serde_json::from_str("{}").expect("parses");
        assert!(empty.countries.is_empty());

        let err = serde_json::from_str::<Listed>(r#"{"levels": "0"}"#).expect_err("level 0");
        assert!(err.to_string().contains("seniority"));
    }

    #[tokio::test]
    async fn dataset_work_runs_on_the_blocking_pool() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(recorder.handle()),
            session: Arc::new(DatasetSession::new(GenerationDefaults {
                n_employees: 15,
                seed: Some(4),
                ..GenerationDefaults::default()
            })),
        };

        let params = state.session.default_params(today());
        let generated = state.generate(params, false).await.expect("generates");
        let employees = state
            .with_dataset(|_, dataset| Ok(dataset.employee.len()))
            .await
            .expect("reads current dataset");
        assert_eq!(employees, generated.employee.len());
    }

    #[test]
    fn session_reuses_dataset_for_identical_params() {
        let session = DatasetSession::new(GenerationDefaults {
            n_employees: 20,
            seed: Some(3),
            ..GenerationDefaults::default()
        });
        let params = session.default_params(NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"));

        let first = session.generate(&params, false).expect("generates");
        let second = session.generate(&params, false).expect("cached");
        let forced = session.generate(&params, true).expect("regenerates");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &forced));
        assert_eq!(first.employee, forced.employee);
    }
}
