use std::sync::Arc;

use crate::config::engine::EngineConfig;
use crate::ports::notifier::{NoopNotifier, Notifier};
use crate::ports::stats::{NoopStatsSink, StatsSink};
use crate::registry::MatchRegistry;

/// Shared engine resources: the registry, configuration, and the
/// collaborator seams.
pub struct AppState {
    pub registry: MatchRegistry,
    pub config: EngineConfig,
    pub notifier: Arc<dyn Notifier>,
    pub stats: Arc<dyn StatsSink>,
}

impl AppState {
    pub fn new(config: EngineConfig, notifier: Arc<dyn Notifier>, stats: Arc<dyn StatsSink>) -> Self {
        Self {
            registry: MatchRegistry::new(),
            config,
            notifier,
            stats,
        }
    }

    /// State with no collaborators wired in; notifications and statistics
    /// go nowhere.
    pub fn detached(config: EngineConfig) -> Self {
        Self::new(config, Arc::new(NoopNotifier), Arc::new(NoopStatsSink))
    }
}
