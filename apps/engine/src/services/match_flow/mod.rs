//! Match flow orchestration - bridges the pure domain with timers and
//! collaborator notifications.
//!
//! Concurrency model: all mutations of one match serialize on that match's
//! async mutex, so a player's pick submission and the same player's
//! timeout callback can never interleave; whichever loses the race finds
//! its precondition gone and becomes a no-op. The registry's index maps
//! sit behind a synchronous lock that is never held across an await.

mod finalize;
mod lobby;
mod rounds;
mod timers;

use std::sync::Arc;

use tracing::warn;

use crate::domain::state::{GroupId, MatchState};
use crate::ports::notifier::DeliveryResult;
use crate::state::app_state::AppState;

pub use timers::TimerSet;

/// A live match: domain state plus the cancellable timer handles driving
/// it. The handles never leave the service layer.
#[derive(Debug)]
pub struct ActiveMatch {
    pub state: MatchState,
    pub timers: TimerSet,
}

impl ActiveMatch {
    pub fn new(group: GroupId) -> Self {
        Self {
            state: MatchState::new(group),
            timers: TimerSet::default(),
        }
    }
}

/// Match flow service. Cheap to clone; every spawned timer task carries
/// its own handle to the shared state.
#[derive(Clone)]
pub struct MatchFlowService {
    app: Arc<AppState>,
}

impl MatchFlowService {
    pub fn new(app: Arc<AppState>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    /// Delivery failures are logged and dropped; they must never abort a
    /// round or a match-ending sequence.
    pub(super) fn log_delivery(result: DeliveryResult, op: &'static str) {
        if let Err(error) = result {
            warn!(%error, op, "notification delivery failed");
        }
    }
}
