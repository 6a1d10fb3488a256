//! In-memory match driver.
//!
//! Wires a channel-backed notifier into the engine and plays every seat
//! itself, so whole matches run in milliseconds with real timers at
//! millisecond scale.

use std::sync::Arc;

use async_trait::async_trait;
use engine::domain::standings::{FinalStandings, RoundSummary};
use engine::domain::state::{GroupId, UserId};
use engine::{
    AppState, DeliveryResult, EngineConfig, MatchFlowService, NoopStatsSink, Notifier,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::policy::{Bot, BotPolicy};

/// Engine callbacks the driver reacts to. Everything else the notifier
/// receives is dropped.
enum SimEvent {
    PickRequested { user: UserId, round_no: u32 },
    RoundResolved { summary: RoundSummary },
    MatchEnded { standings: FinalStandings },
    Cancelled { reason: String },
}

struct SimNotifier {
    tx: mpsc::UnboundedSender<SimEvent>,
}

impl SimNotifier {
    fn forward(&self, event: SimEvent) -> DeliveryResult {
        self.tx
            .send(event)
            .map_err(|_| engine::DeliveryError("driver channel closed".into()))
    }
}

#[async_trait]
impl Notifier for SimNotifier {
    async fn announce_round(&self, _group: GroupId, _round_no: u32) -> DeliveryResult {
        Ok(())
    }

    async fn announce_duplicate_rule(&self, _group: GroupId) -> DeliveryResult {
        Ok(())
    }

    async fn request_pick(&self, user: UserId, round_no: u32) -> DeliveryResult {
        self.forward(SimEvent::PickRequested { user, round_no })
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

    async fn report_round_result(&self, _group: GroupId, summary: &RoundSummary) -> DeliveryResult {
        self.forward(SimEvent::RoundResolved {
            summary: summary.clone(),
        })
    }

    async fn report_match_end(
        &self,
        _group: GroupId,
        standings: &FinalStandings,
    ) -> DeliveryResult {
        self.forward(SimEvent::MatchEnded {
            standings: standings.clone(),
        })
    }

    async fn report_cancelled(&self, _group: GroupId, reason: &str) -> DeliveryResult {
        self.forward(SimEvent::Cancelled {
            reason: reason.to_string(),
        })
    }
}

/// Outcome of one simulated match.
#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub match_no: u32,
    pub rounds: u32,
    pub champion: Option<UserId>,
    pub standings: FinalStandings,
}

pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

/// Run one match to completion with `players` bots all following
/// `policy`. Deterministic for a fixed `seed`. Each match gets its own
/// engine instance, so any number of these can run concurrently.
pub async fn run_match(
    match_no: u32,
    players: usize,
    policy: BotPolicy,
    miss_rate: f64,
    seed: u64,
    config: EngineConfig,
) -> Result<MatchReport, DriverError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let app = Arc::new(AppState::new(
        config,
        Arc::new(SimNotifier { tx }),
        Arc::new(NoopStatsSink),
    ));
    let svc = MatchFlowService::new(app);

    let group: GroupId = i64::from(match_no);
    svc.create_match(group).await?;
    let mut bots: Vec<Bot> = Vec::with_capacity(players);
    for i in 0..players {
        let user = (i + 1) as UserId;
        let name = format!("bot-{user}");
        svc.join(group, user, &name, Some(name.clone())).await?;
        bots.push(Bot::new(user, policy, seed.wrapping_add(i as u64)));
    }
    // Hitting the capacity cap settles the lobby on its own; only then
    // is the explicit start redundant.
    if let Err(error) = svc.force_start(group).await {
        if !matches!(error, engine::EngineError::JoinPhaseClosed { .. }) {
            return Err(error.into());
        }
    }

    let mut miss_rng = StdRng::seed_from_u64(seed ^ 0x6d69_7373);
    let mut last_target: Option<f64> = None;
    let mut rounds = 0;

    while let Some(event) = rx.recv().await {
        match event {
            SimEvent::PickRequested { user, round_no } => {
                if miss_rate > 0.0 && miss_rng.random_bool(miss_rate) {
                    debug!(user, round_no, "bot sits this one out");
                    continue;
                }
                let Some(bot) = bots.iter_mut().find(|b| b.user == user) else {
                    continue;
                };
                let value = bot.pick(last_target);
                // A pick can lose the race against its own deadline;
                // that is part of what the simulation exercises.
                if let Err(error) = svc.submit_pick(user, &value.to_string()).await {
                    warn!(user, round_no, %error, "pick rejected");
                }
            }
            SimEvent::RoundResolved { summary } => {
                rounds = summary.round_no;
                last_target = Some(summary.target);
            }
            SimEvent::MatchEnded { standings } => {
                return Ok(MatchReport {
                    match_no,
                    rounds,
                    champion: standings.champion,
                    standings,
                });
            }
            SimEvent::Cancelled { reason } => {
                return Err(format!("match cancelled: {reason}").into());
            }
        }
    }
    Err("driver channel closed before the match ended".into())
}
