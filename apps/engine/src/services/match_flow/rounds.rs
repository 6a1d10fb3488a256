//! The per-round machinery: announcement, pick collection, per-player
//! timers, and the single resolution point.

use tokio::time::sleep;
use tracing::{debug, info};

use super::{ActiveMatch, MatchFlowService};
use crate::domain::rules::parse_pick;
use crate::domain::scoring::apply_round_scoring;
use crate::domain::standings::round_summary;
use crate::domain::state::{GroupId, MatchPhase, Pick, UserId};
use crate::errors::domain::{EngineError, PickRejection};

impl MatchFlowService {
    /// Start the next round.
    ///
    /// Safe to call redundantly: a missing match, an ended match, or a
    /// round already in progress make this a no-op.
    pub async fn start_round(&self, group: GroupId) {
        let Some(entry) = self.app.registry.get(group) else {
            return;
        };
        let mut m = entry.lock().await;
        if m.state.phase != MatchPhase::Playing || m.state.round_active {
            return;
        }

        m.state.round_active = true;
        m.state.round_no += 1;
        m.state.round_resolved = false;
        m.state.reset_round_picks();
        // Defensive cleanup; a previous round should have left nothing.
        m.timers.cancel_round_timers();

        // One-round-delayed activation of the duplicate rule, with its
        // one-time notice.
        let rule_just_activated = m.state.duplicate_rule_pending;
        if rule_just_activated {
            m.state.duplicate_rule_active = true;
            m.state.duplicate_rule_pending = false;
        }

        let round_no = m.state.round_no;
        if rule_just_activated {
            Self::log_delivery(
                self.app.notifier.announce_duplicate_rule(group).await,
                "announce_duplicate_rule",
            );
        }
        Self::log_delivery(
            self.app.notifier.announce_round(group, round_no).await,
            "announce_round",
        );

        let active: Vec<UserId> = m.state.active_players().map(|p| p.user_id).collect();
        if active.is_empty() {
            info!(group, round_no, "no active players remain, ending match");
            self.finalize(&mut m).await;
            return;
        }
        info!(group, round_no, players = active.len(), "round started");

        let pick_window = self.app.config.pick_window;
        let warning_lead = self.app.config.pick_warning_lead;
        for &user in &active {
            Self::log_delivery(
                self.app.notifier.request_pick(user, round_no).await,
                "request_pick",
            );

            let svc = self.clone();
            let warning = tokio::spawn(async move {
                sleep(pick_window.saturating_sub(warning_lead)).await;
                svc.pick_warning_fired(group, user).await;
            });
            m.timers.arm_pick_warning(user, warning);

            let svc = self.clone();
            let timeout = tokio::spawn(async move {
                sleep(pick_window).await;
                svc.handle_pick_timeout(group, user).await;
            });
            m.timers.arm_pick_timeout(user, timeout);
        }
    }

    /// Record a private pick submission for whichever match the user is
    /// playing in. Returns the accepted value.
    pub async fn submit_pick(&self, user: UserId, text: &str) -> Result<u8, EngineError> {
        let Some(group) = self.app.registry.locate(user) else {
            return Err(EngineError::PickRejected(PickRejection::NoActiveRound));
        };
        let Some(entry) = self.app.registry.get(group) else {
            // Stale binding left behind by a vanished match.
            self.app.registry.unbind(user);
            return Err(EngineError::PickRejected(PickRejection::NoActiveRound));
        };

        let mut m = entry.lock().await;
        if !m.state.round_active || m.state.round_resolved {
            return Err(EngineError::PickRejected(PickRejection::NoActiveRound));
        }
        let value = parse_pick(text).map_err(EngineError::PickRejected)?;

        let Some(player) = m.state.player_mut(user) else {
            return Err(EngineError::NotInMatch { user, group });
        };
        if player.eliminated {
            return Err(EngineError::PickRejected(PickRejection::AlreadyEliminated));
        }
        if !player.pick.is_pending() {
            return Err(EngineError::PickRejected(PickRejection::AlreadyPicked));
        }

        player.pick = Pick::Picked(value);
        player.consecutive_misses = 0;
        m.timers.cancel_player_timers(user);
        debug!(group, user, "pick recorded");

        if m.state.round_complete() {
            self.resolve_round(&mut m).await;
        }
        Ok(value)
    }

    /// A player's pick deadline fired.
    ///
    /// Every early return here is a benign race, not an error: the pick
    /// landed first, the player was eliminated, or the round (or the
    /// whole match) moved on while this task was waiting.
    pub async fn handle_pick_timeout(&self, group: GroupId, user: UserId) {
        let Some(entry) = self.app.registry.get(group) else {
            return;
        };
        let mut m = entry.lock().await;
        if !m.state.round_active || m.state.round_resolved {
            m.timers.disarm_after_pick_timeout(user);
            return;
        }

        let miss_penalty = self.app.config.miss_penalty;
        let Some(player) = m.state.player_mut(user) else {
            return;
        };
        if player.eliminated || !player.pick.is_pending() {
            m.timers.disarm_after_pick_timeout(user);
            return;
        }

        let eliminated = if player.consecutive_misses == 0 {
            player.score -= miss_penalty;
            player.total_penalties += miss_penalty.unsigned_abs();
            player.consecutive_misses = 1;
            player.pick = Pick::Missed;
            false
        } else {
            // Second consecutive miss: out, with no further penalty.
            player.consecutive_misses += 1;
            player.eliminated = true;
            true
        };
        m.timers.disarm_after_pick_timeout(user);

        if eliminated {
            info!(group, user, "player eliminated after repeated missed picks");
            Self::log_delivery(
                self.app.notifier.report_elimination(group, user).await,
                "report_elimination",
            );
        } else {
            info!(group, user, "pick deadline missed");
            Self::log_delivery(
                self.app.notifier.report_miss(group, user).await,
                "report_miss",
            );
        }

        if m.state.round_complete() {
            self.resolve_round(&mut m).await;
        }
    }

    async fn pick_warning_fired(&self, group: GroupId, user: UserId) {
        let Some(entry) = self.app.registry.get(group) else {
            return;
        };
        {
            let m = entry.lock().await;
            if !m.state.round_active || m.state.round_resolved {
                return;
            }
            match m.state.player(user) {
                Some(p) if !p.eliminated && p.pick.is_pending() => {}
                _ => return,
            }
        }
        let seconds = self.app.config.pick_warning_lead.as_secs();
        Self::log_delivery(
            self.app
                .notifier
                .warn_pick_time_left(group, user, seconds)
                .await,
            "warn_pick_time_left",
        );
    }

    /// Resolve the collected round.
    ///
    /// Exactly once per round: the `round_resolved` flag absorbs the race
    /// between a timeout and a last-second pick, whichever entry point
    /// runs second finds it set and backs off.
    pub(super) async fn resolve_round(&self, m: &mut ActiveMatch) {
        if m.state.round_resolved || m.state.phase != MatchPhase::Playing {
            return;
        }
        m.state.round_resolved = true;
        m.state.round_active = false;
        m.timers.cancel_round_timers();

        let group = m.state.group_id;
        let Some(outcome) = apply_round_scoring(&mut m.state, &self.app.config) else {
            info!(
                group,
                round_no = m.state.round_no,
                "no numeric picks this round, ending match"
            );
            self.finalize(m).await;
            return;
        };

        info!(
            group,
            round_no = outcome.round_no,
            target = outcome.target,
            winners = ?outcome.winners,
            eliminated = ?outcome.eliminated,
            "round resolved"
        );
        let summary = round_summary(&m.state, &outcome);
        Self::log_delivery(
            self.app.notifier.report_round_result(group, &summary).await,
            "report_round_result",
        );
        for &user in &outcome.eliminated {
            Self::log_delivery(
                self.app.notifier.report_elimination(group, user).await,
                "report_elimination",
            );
        }

        if m.state.active_count() <= 1 {
            self.finalize(m).await;
            return;
        }

        // Kick the next round off from a fresh task; a stale kickoff
        // against a match that ended meanwhile is a no-op.
        spawn_start_round(self.clone(), group);
    }
}

// Free function so the `Send` bound on `start_round`'s future is checked
// outside the async call cycle (start_round -> handle_pick_timeout ->
// resolve_round -> start_round), which the compiler cannot resolve from
// within the cycle itself.
fn spawn_start_round(svc: MatchFlowService, group: GroupId) {
    tokio::spawn(async move {
        svc.start_round(group).await;
    });
}
