use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::state::{GroupId, UserId};

/// Per-player aggregates pushed to the statistics collaborator once per
/// match. The persisted schema belongs to the sink, not the engine.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerMatchResult {
    pub user_id: UserId,
    pub score_delta: i32,
    pub won: bool,
    pub rounds_played: u32,
    pub eliminated: bool,
    pub penalties: u32,
}

#[derive(Debug, Error)]
#[error("statistics sink failure: {0}")]
pub struct StatsError(pub String);

/// End-of-match statistics persistence.
///
/// Best effort per player; one player's failure must not block finalizing
/// the match for the rest.
#[async_trait]
pub trait StatsSink: Send + Sync {
    async fn record_match_result(
        &self,
        group: GroupId,
        result: &PlayerMatchResult,
    ) -> Result<(), StatsError>;
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NoopStatsSink;

#[async_trait]
impl StatsSink for NoopStatsSink {
    async fn record_match_result(
        &self,
        _group: GroupId,
        _result: &PlayerMatchResult,
    ) -> Result<(), StatsError> {
        Ok(())
    }
}
