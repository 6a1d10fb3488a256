use async_trait::async_trait;
use thiserror::Error;

use crate::domain::standings::{FinalStandings, RoundSummary};
use crate::domain::state::{GroupId, UserId};

/// Failure delivering an outbound notification.
///
/// The engine logs these and moves on; authoritative match state never
/// depends on delivery success.
#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct DeliveryError(pub String);

pub type DeliveryResult = Result<(), DeliveryError>;

/// Outbound messages to the chat platform.
///
/// Every call is fire-and-forget from the engine's perspective. There is
/// no exactly-once guarantee anywhere here.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A new round is starting in the group.
    async fn announce_round(&self, group: GroupId, round_no: u32) -> DeliveryResult;

    /// One-time notice that the duplicate-penalty rule is now in force.
    async fn announce_duplicate_rule(&self, group: GroupId) -> DeliveryResult;

    /// Ask a player, privately, for their pick.
    async fn request_pick(&self, user: UserId, round_no: u32) -> DeliveryResult;

    /// The join phase is running out.
    async fn warn_join_time_left(&self, group: GroupId, seconds: u64) -> DeliveryResult;

    /// A player's pick deadline is running out.
    async fn warn_pick_time_left(&self, group: GroupId, user: UserId, seconds: u64)
        -> DeliveryResult;

    /// A player missed the pick deadline.
    async fn report_miss(&self, group: GroupId, user: UserId) -> DeliveryResult;

    /// A player is out of the match.
    async fn report_elimination(&self, group: GroupId, user: UserId) -> DeliveryResult;

    /// A player was dropped because the match was over capacity when the
    /// join phase settled.
    async fn report_overflow_removal(&self, user: UserId) -> DeliveryResult;

    /// The lineup is locked in and rounds are about to begin.
    async fn report_match_settled(&self, group: GroupId, players: &[UserId]) -> DeliveryResult;

    /// Results of a resolved round.
    async fn report_round_result(&self, group: GroupId, summary: &RoundSummary) -> DeliveryResult;

    /// Final standings and champion.
    async fn report_match_end(&self, group: GroupId, standings: &FinalStandings)
        -> DeliveryResult;

    /// The match was cancelled before producing a result.
    async fn report_cancelled(&self, group: GroupId, reason: &str) -> DeliveryResult;
}

/// Discards everything. Useful when no delivery layer is wired in.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn announce_round(&self, _group: GroupId, _round_no: u32) -> DeliveryResult {
        Ok(())
    }

    async fn announce_duplicate_rule(&self, _group: GroupId) -> DeliveryResult {
        Ok(())
    }

    async fn request_pick(&self, _user: UserId, _round_no: u32) -> DeliveryResult {
        Ok(())
    }

    async fn warn_join_time_left(&self, _group: GroupId, _seconds: u64) -> DeliveryResult {
        Ok(())
    }

    async fn warn_pick_time_left(
        &self,
        _group: GroupId,
        _user: UserId,
        _seconds: u64,
    ) -> DeliveryResult {
        Ok(())
    }

    async fn report_miss(&self, _group: GroupId, _user: UserId) -> DeliveryResult {
        Ok(())
    }

    async fn report_elimination(&self, _group: GroupId, _user: UserId) -> DeliveryResult {
        Ok(())
    }

    async fn report_overflow_removal(&self, _user: UserId) -> DeliveryResult {
        Ok(())
    }

    async fn report_match_settled(&self, _group: GroupId, _players: &[UserId]) -> DeliveryResult {
        Ok(())
    }

    async fn report_round_result(
        &self,
        _group: GroupId,
        _summary: &RoundSummary,
    ) -> DeliveryResult {
        Ok(())
    }

    async fn report_match_end(
        &self,
        _group: GroupId,
        _standings: &FinalStandings,
    ) -> DeliveryResult {
        Ok(())
    }

    async fn report_cancelled(&self, _group: GroupId, _reason: &str) -> DeliveryResult {
        Ok(())
    }
}
