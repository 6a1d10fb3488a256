//! Collaborator interfaces the engine talks through.
//!
//! The engine never renders, sends, or persists anything itself; outbound
//! notifications and end-of-match statistics cross these seams, and the
//! delivery layer owns everything on the far side.

pub mod notifier;
pub mod stats;

pub use notifier::{DeliveryError, DeliveryResult, NoopNotifier, Notifier};
pub use stats::{NoopStatsSink, PlayerMatchResult, StatsError, StatsSink};
