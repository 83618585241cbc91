use crate::repository::{ContentRepository, InMemoryRepository};
use crate::tags::TagRegistry;
use crate::types::AnalysisConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ContentRepository>,
    pub tag_registry: Arc<TagRegistry>,
    /// Analysis thresholds used when a request carries no `config`.
    pub analysis_defaults: AnalysisConfig,
    /// Cap for every hierarchy walk, request-supplied depths included.
    pub max_hierarchy_depth: usize,
    /// File-based config loaded from `seo-scout.json` (env-var fallback for all fields).
    pub scout_config: Arc<crate::core::config::ScoutConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tags", &self.tag_registry.names().len())
            .field("max_hierarchy_depth", &self.max_hierarchy_depth)
            .finish()
    }
}

impl AppState {
    pub fn new(repository: Arc<dyn ContentRepository>, scout_config: crate::core::config::ScoutConfig) -> Self {
        Self {
            repository,
            tag_registry: Arc::new(TagRegistry::with_builtin_tags()),
            analysis_defaults: scout_config.analysis_defaults(),
            max_hierarchy_depth: scout_config.resolve_max_hierarchy_depth(),
            scout_config: Arc::new(scout_config),
        }
    }

    /// State over an in-memory corpus with default config; used by tests and demos.
    pub fn in_memory(repository: InMemoryRepository) -> Self {
        Self::new(Arc::new(repository), crate::core::config::ScoutConfig::default())
    }

    pub fn with_analysis_defaults(mut self, config: AnalysisConfig) -> Self {
        self.analysis_defaults = config;
        self
    }
}
