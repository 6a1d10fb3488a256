//! Match teardown: final standings, stats recording, and registry
//! cleanup.

use tracing::{info, warn};

use super::{ActiveMatch, MatchFlowService};
use crate::domain::standings::final_standings;
use crate::domain::state::{GroupId, MatchPhase};
use crate::errors::domain::EngineError;
use crate::ports::stats::PlayerMatchResult;

impl MatchFlowService {
    /// End the match held by `m`: publish final standings, record per
    /// player stats, and release every registry entry.
    ///
    /// Idempotent; a match already in `Ended` is left alone.
    pub(super) async fn finalize(&self, m: &mut ActiveMatch) {
        if m.state.phase == MatchPhase::Ended {
            return;
        }
        m.state.phase = MatchPhase::Ended;
        m.state.round_active = false;
        m.timers.cancel_all();

        let group = m.state.group_id;
        let standings = final_standings(&m.state);
        info!(
            group,
            rounds = m.state.round_no,
            champion = ?standings.champion,
            "match ended"
        );

        Self::log_delivery(
            self.app.notifier.report_match_end(group, &standings).await,
            "report_match_end",
        );

        for p in &m.state.players {
            let result = PlayerMatchResult {
                user_id: p.user_id,
                score_delta: p.score,
                won: standings.champion == Some(p.user_id),
                rounds_played: p.rounds_played,
                eliminated: p.eliminated,
                penalties: p.total_penalties,
            };
            if let Err(error) = self.app.stats.record_match_result(group, &result).await {
                warn!(%error, group, user = p.user_id, "failed to record match stats");
            }
            self.app.registry.unbind(p.user_id);
        }
        self.app.registry.remove(group);
    }

    /// Privileged shutdown of a running match. The lineup is released and
    /// stats are recorded with nobody marked as the winner.
    pub async fn end_match_early(&self, group: GroupId) -> Result<(), EngineError> {
        let Some(entry) = self.app.registry.get(group) else {
            return Err(EngineError::MatchNotFound { group });
        };

        let mut m = entry.lock().await;
        if m.state.phase == MatchPhase::Ended {
            return Ok(());
        }
        m.state.phase = MatchPhase::Ended;
        m.state.round_active = false;
        m.timers.cancel_all();

        info!(group, rounds = m.state.round_no, "match ended by admin");
        for p in &m.state.players {
            let result = PlayerMatchResult {
                user_id: p.user_id,
                score_delta: p.score,
                won: false,
                rounds_played: p.rounds_played,
                eliminated: p.eliminated,
                penalties: p.total_penalties,
            };
            if let Err(error) = self.app.stats.record_match_result(group, &result).await {
                warn!(%error, group, user = p.user_id, "failed to record match stats");
            }
            self.app.registry.unbind(p.user_id);
        }
        self.app.registry.remove(group);

        drop(m);
        Self::log_delivery(
            self.app
                .notifier
                .report_cancelled(group, "match ended by admin")
                .await,
            "report_cancelled",
        );
        Ok(())
    }
}
