//! Domain layer: pure match state, rules, and scoring.

pub mod rules;
pub mod scoring;
pub mod standings;
pub mod state;

#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_standings;

// Re-exports for ergonomics
pub use rules::{compute_target, parse_pick};
pub use scoring::{apply_round_scoring, RoundOutcome};
pub use standings::{final_standings, round_summary, FinalStandings, RoundSummary};
pub use state::{GroupId, MatchPhase, MatchState, Pick, Player, UserId};
