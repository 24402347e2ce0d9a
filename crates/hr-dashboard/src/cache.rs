use crate::dataset::HrDataset;
use crate::generator::{GenerationParams, GeneratorError, HrDataGenerator};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
struct CachedDataset {
    params: GenerationParams,
    dataset: Arc<HrDataset>,
}

/// Holds the most recently generated dataset keyed by its full parameter tuple.
///
/// Lookups with identical parameters are free; any differing field triggers a
/// blocking regeneration that replaces the cached entry.
#[derive(Debug)]
pub struct DatasetCache<G> {
    generator: G,
    entry: Option<CachedDataset>,
}

impl<G: HrDataGenerator> DatasetCache<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            entry: None,
        }
    }

    pub fn get(&mut self, params: &GenerationParams) -> Result<Arc<HrDataset>, GeneratorError> {
        if let Some(entry) = &self.entry {
            if &entry.params == params {
                debug!("serving cached HR dataset");
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        let dataset = Arc::new(self.generator.generate(params)?);
        info!(
            employees = dataset.employee.len(),
            "regenerated HR dataset for new parameters"
        );
        self.entry = Some(CachedDataset {
            params: params.clone(),
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Drop whatever is cached and generate again, even for unchanged parameters.
    pub fn force_regenerate(
        &mut self,
        params: &GenerationParams,
    ) -> Result<Arc<HrDataset>, GeneratorError> {
        self.entry = None;
        self.get(params)
    }

    pub fn current(&self) -> Option<(&GenerationParams, Arc<HrDataset>)> {
        self.entry
            .as_ref()
            .map(|entry| (&entry.params, Arc::clone(&entry.dataset)))
    }
}
