//! Shared application state for front ends (CLI, diagnostics).

use crate::cache::ValueCache;
use crate::capture::{FrameSource, XcapSource};
use crate::config::AppConfig;
use crate::error::{ConfigError, QueryError};
use crate::registry::OffsetRegistry;
use crate::sampler::Sampler;
use std::sync::Arc;

/// Config plus the running sampler, if any.
///
/// The registry is built by `start_sampling` strictly before the
/// sampler thread exists and is immutable from then on.
#[derive(Default)]
pub struct AppState {
    pub config: AppConfig,
    pub registry: Option<Arc<OffsetRegistry>>,
    sampler: Option<Sampler>,
}

impl AppState {
    pub fn new() -> Self {
        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("[STATE] config load failed ({e}), using defaults");
            AppConfig::default()
        });
        Self {
            config,
            registry: None,
            sampler: None,
        }
    }

    /// Build the registry from the config table and spawn the sample
    /// loop against the primary display.
    pub fn start_sampling(&mut self) -> Result<(), ConfigError> {
        let source = XcapSource::primary()?;
        self.start_sampling_with(Box::new(source))
    }

    /// Same, with an explicit frame source (tests, alternate backends).
    pub fn start_sampling_with(
        &mut self,
        source: Box<dyn FrameSource>,
    ) -> Result<(), ConfigError> {
        self.stop_sampling();

        let registry = Arc::new(self.config.build_registry()?);
        let sampler = Sampler::spawn(
            source,
            Arc::clone(&registry),
            self.config.calibration.clone(),
            self.config.sampler.clone(),
        )?;

        self.registry = Some(registry);
        self.sampler = Some(sampler);
        Ok(())
    }

    /// Signal the loop to stop and join it. No-op when idle.
    pub fn stop_sampling(&mut self) {
        if let Some(mut sampler) = self.sampler.take() {
            sampler.shutdown();
        }
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.as_ref().is_some_and(Sampler::is_running)
    }

    /// Query API: most recent decoded value for a name.
    pub fn get_value(&self, name: &str) -> Result<i64, QueryError> {
        match &self.sampler {
            Some(sampler) => sampler.cache().get_value(name),
            None => Err(QueryError::KeyNotFound(name.to_string())),
        }
    }

    pub fn cache(&self) -> Option<Arc<ValueCache>> {
        self.sampler.as_ref().map(Sampler::cache)
    }
}
