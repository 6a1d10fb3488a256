#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod registry;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-exports for public API
pub use config::engine::EngineConfig;
pub use errors::domain::{EngineError, PickRejection};
pub use ports::notifier::{DeliveryError, DeliveryResult, NoopNotifier, Notifier};
pub use ports::stats::{NoopStatsSink, PlayerMatchResult, StatsError, StatsSink};
pub use registry::MatchRegistry;
pub use services::match_flow::MatchFlowService;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::logging::init();
}
