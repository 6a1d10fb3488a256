//! Pick policies for simulated players.

use clap::ValueEnum;
use engine::domain::state::UserId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BotPolicy {
    /// Uniform picks across the whole range.
    Random,
    /// Chases the shrinking target by anticipating one more contraction.
    Drifter,
    /// Picks the same value every round, which eventually trips the
    /// duplicate rule when several bots share an anchor.
    Stubborn,
}

/// One simulated player with its own seeded rng.
pub struct Bot {
    pub user: UserId,
    policy: BotPolicy,
    anchor: u8,
    rng: StdRng,
}

impl Bot {
    pub fn new(user: UserId, policy: BotPolicy, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let anchor = rng.random_range(0..=100);
        Self {
            user,
            policy,
            anchor,
            rng,
        }
    }

    /// Decide a pick given the previous round's target, if any.
    pub fn pick(&mut self, last_target: Option<f64>) -> u8 {
        match self.policy {
            BotPolicy::Random => self.rng.random_range(0..=100),
            BotPolicy::Drifter => {
                let base = last_target.unwrap_or(40.0) * 0.8;
                let jitter: f64 = self.rng.random_range(-5.0..=5.0);
                (base + jitter).clamp(0.0, 100.0).round() as u8
            }
            BotPolicy::Stubborn => self.anchor,
        }
    }
}
