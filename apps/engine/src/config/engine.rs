//! Engine configuration.
//!
//! All timeouts are wall-clock durations, fixed per deployment rather than
//! per match. Rule thresholds live here too so they can be tuned without
//! touching the scoring pipeline.

use std::time::Duration;

/// Tunables for the match engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of the join phase.
    pub join_window: Duration,
    /// Remaining-time checkpoints at which join-phase warnings fire.
    /// Checkpoints at or beyond the join window are skipped.
    pub join_warnings: Vec<Duration>,
    /// Time each player has to submit a pick every round.
    pub pick_window: Duration,
    /// How long before the pick deadline the per-player warning fires.
    pub pick_warning_lead: Duration,
    /// Minimum players required when the join timer expires.
    pub min_players: usize,
    /// Hard cap on players per match. Reaching it ends the join phase
    /// immediately.
    pub max_players: usize,
    /// Score at or below which a player is eliminated.
    pub elimination_threshold: i32,
    /// Number of players sharing one value needed to trigger the
    /// duplicate-penalty rule.
    pub duplicate_value_threshold: usize,
    /// Multiplier applied to the mean of numeric picks to get the target.
    pub target_factor: f64,
    /// Penalty for a first missed pick.
    pub miss_penalty: i32,
    /// Penalty for sharing a heavily-duplicated value.
    pub duplicate_penalty: i32,
    /// Penalty for active non-winners when an exact-target pick wins.
    pub exact_target_penalty: i32,
    /// Penalty for the 0-picker in the two-player 0-vs-100 endgame.
    pub zero_vs_hundred_penalty: i32,
    /// Generic penalty for active non-winners.
    pub non_winner_penalty: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            join_window: Duration::from_secs(150),
            join_warnings: vec![
                Duration::from_secs(60),
                Duration::from_secs(30),
                Duration::from_secs(10),
            ],
            pick_window: Duration::from_secs(120),
            pick_warning_lead: Duration::from_secs(30),
            min_players: 5,
            max_players: 7,
            elimination_threshold: -10,
            duplicate_value_threshold: 4,
            target_factor: 0.8,
            miss_penalty: 1,
            duplicate_penalty: 1,
            exact_target_penalty: 2,
            zero_vs_hundred_penalty: 1,
            non_winner_penalty: 1,
        }
    }
}
