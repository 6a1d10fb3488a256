//! Join phase: match creation, joins and leaves, the join timer, and the
//! settle transition that hands the lineup to the round engine.

use tokio::time::sleep;
use tracing::{debug, info};

use super::MatchFlowService;
use crate::domain::state::{GroupId, MatchPhase, Player, UserId};
use crate::errors::domain::EngineError;
use crate::registry::SharedMatch;

impl MatchFlowService {
    /// Create a match for `group` and open the join phase.
    ///
    /// Fails with `AlreadyActive` when the group already has one; that
    /// check is the only guard against two matches in one group.
    pub async fn create_match(&self, group: GroupId) -> Result<(), EngineError> {
        let entry = self.app.registry.create(group)?;
        info!(group, "match created, join phase open");

        let join_window = self.app.config.join_window;
        let mut m = entry.lock().await;
        for &checkpoint in &self.app.config.join_warnings {
            if checkpoint >= join_window {
                continue;
            }
            let svc = self.clone();
            let handle = tokio::spawn(async move {
                sleep(join_window - checkpoint).await;
                svc.join_warning_fired(group, checkpoint.as_secs()).await;
            });
            m.timers.push_join_warning(handle);
        }
        let svc = self.clone();
        let handle = tokio::spawn(async move {
            sleep(join_window).await;
            svc.join_timer_expired(group).await;
        });
        m.timers.set_join_timer(handle);

        Ok(())
    }

    /// Add a player to the lobby.
    ///
    /// Reaching the hard cap exactly settles the join phase on the spot
    /// without waiting for the timer.
    pub async fn join(
        &self,
        group: GroupId,
        user: UserId,
        name: &str,
        username: Option<String>,
    ) -> Result<(), EngineError> {
        if let Some(existing) = self.app.registry.locate(user) {
            return Err(EngineError::AlreadyInMatch {
                user,
                group: existing,
            });
        }
        let Some(entry) = self.app.registry.get(group) else {
            return Err(EngineError::NotJoinable {
                group,
                detail: "no active match".into(),
            });
        };

        let mut m = entry.lock().await;
        if m.state.phase != MatchPhase::Joining {
            return Err(EngineError::NotJoinable {
                group,
                detail: "the join phase is closed".into(),
            });
        }
        if m.state.players.len() >= self.app.config.max_players {
            return Err(EngineError::NotJoinable {
                group,
                detail: "the match is full".into(),
            });
        }

        m.state.add_player(Player::new(user, name, username));
        self.app.registry.bind(user, group);
        let joined = m.state.players.len();
        info!(group, user, joined, "player joined");

        let at_capacity = joined == self.app.config.max_players;
        drop(m);

        if at_capacity {
            debug!(group, "capacity reached, settling join phase early");
            self.settle_join_phase(&entry).await;
        }
        Ok(())
    }

    /// Remove a player from the lobby. Only possible while the join phase
    /// is still open.
    pub async fn leave(&self, group: GroupId, user: UserId) -> Result<(), EngineError> {
        let Some(entry) = self.app.registry.get(group) else {
            return Err(EngineError::MatchNotFound { group });
        };

        let mut m = entry.lock().await;
        if m.state.phase != MatchPhase::Joining {
            return Err(EngineError::JoinPhaseClosed { group });
        }
        if !m.state.remove_player(user) {
            return Err(EngineError::NotInMatch { user, group });
        }
        self.app.registry.unbind(user);
        info!(group, user, remaining = m.state.players.len(), "player left");
        Ok(())
    }

    /// Privileged early start. The caller authorizes; the engine only
    /// validates phase and the minimum-player threshold.
    pub async fn force_start(&self, group: GroupId) -> Result<(), EngineError> {
        let Some(entry) = self.app.registry.get(group) else {
            return Err(EngineError::MatchNotFound { group });
        };

        {
            let m = entry.lock().await;
            if m.state.phase != MatchPhase::Joining {
                return Err(EngineError::JoinPhaseClosed { group });
            }
            let joined = m.state.players.len();
            if joined < self.app.config.min_players {
                return Err(EngineError::NotEnoughPlayers {
                    group,
                    joined,
                    min: self.app.config.min_players,
                });
            }
        }

        info!(group, "join phase closed by early start");
        self.settle_join_phase(&entry).await;
        Ok(())
    }

    /// Current lineup in join order.
    pub async fn roster(&self, group: GroupId) -> Result<Vec<(UserId, String)>, EngineError> {
        let Some(entry) = self.app.registry.get(group) else {
            return Err(EngineError::MatchNotFound { group });
        };
        let m = entry.lock().await;
        Ok(m.state
            .players
            .iter()
            .map(|p| (p.user_id, p.name.clone()))
            .collect())
    }

    async fn join_warning_fired(&self, group: GroupId, seconds: u64) {
        let Some(entry) = self.app.registry.get(group) else {
            return;
        };
        {
            let m = entry.lock().await;
            if m.state.phase != MatchPhase::Joining {
                return;
            }
        }
        Self::log_delivery(
            self.app.notifier.warn_join_time_left(group, seconds).await,
            "warn_join_time_left",
        );
    }

    /// Natural join timer expiry. Races against `force_start` and the
    /// capacity settle are decided by the phase check inside
    /// `settle_join_phase`.
    async fn join_timer_expired(&self, group: GroupId) {
        let Some(entry) = self.app.registry.get(group) else {
            return;
        };
        {
            let mut m = entry.lock().await;
            if m.state.phase != MatchPhase::Joining {
                return;
            }
            // This very task is the join timer; drop our own handle
            // without aborting before the settle path cancels the rest.
            m.timers.disarm_after_join_expiry();
        }
        self.settle_join_phase(&entry).await;
    }

    /// Settle or cancel the join phase. Exactly one caller wins: the join
    /// timer, `force_start`, or the join that reached capacity. Later
    /// callers find the phase already advanced and do nothing.
    pub(super) async fn settle_join_phase(&self, entry: &SharedMatch) {
        let mut m = entry.lock().await;
        if m.state.phase != MatchPhase::Joining {
            return;
        }
        let group = m.state.group_id;
        m.timers.cancel_join_timers();

        if m.state.players.len() < self.app.config.min_players {
            let joined = m.state.players.len();
            for p in &m.state.players {
                self.app.registry.unbind(p.user_id);
            }
            m.state.phase = MatchPhase::Ended;
            self.app.registry.remove(group);
            info!(
                group,
                joined,
                min = self.app.config.min_players,
                "too few players joined, match cancelled"
            );
            drop(m);
            Self::log_delivery(
                self.app
                    .notifier
                    .report_cancelled(group, "not enough players joined")
                    .await,
                "report_cancelled",
            );
            return;
        }

        let cap = self.app.config.max_players;
        let overflow: Vec<UserId> = if m.state.players.len() > cap {
            m.state
                .players
                .split_off(cap)
                .into_iter()
                .map(|p| p.user_id)
                .collect()
        } else {
            Vec::new()
        };
        for &user in &overflow {
            self.app.registry.unbind(user);
        }

        m.state.phase = MatchPhase::Playing;
        let roster: Vec<UserId> = m.state.players.iter().map(|p| p.user_id).collect();
        info!(group, players = roster.len(), "join phase settled");
        drop(m);

        for user in overflow {
            Self::log_delivery(
                self.app.notifier.report_overflow_removal(user).await,
                "report_overflow_removal",
            );
        }
        Self::log_delivery(
            self.app.notifier.report_match_settled(group, &roster).await,
            "report_match_settled",
        );

        self.start_round(group).await;
    }
}
