//! Outward-facing round and match summaries.

use serde::Serialize;

use crate::domain::scoring::RoundOutcome;
use crate::domain::state::{MatchState, UserId};

/// One line of a scoreboard. The username, when known, lets the
/// delivery layer render a mention instead of the bare display name.
#[derive(Debug, Clone, Serialize)]
pub struct StandingLine {
    pub user_id: UserId,
    pub name: String,
    pub username: Option<String>,
    pub score: i32,
    pub eliminated: bool,
}

/// A player's revealed pick; `None` means the pick was missed.
#[derive(Debug, Clone, Serialize)]
pub struct RevealedPick {
    pub user_id: UserId,
    pub name: String,
    pub username: Option<String>,
    pub pick: Option<u8>,
}

/// Everything a round-result announcement needs.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub round_no: u32,
    pub target: f64,
    pub winners: Vec<UserId>,
    /// Picks revealed to the group, in join order.
    pub picks: Vec<RevealedPick>,
    /// Scores after the round, best first.
    pub scoreboard: Vec<StandingLine>,
}

/// Final scoreboard plus champion.
#[derive(Debug, Clone, Serialize)]
pub struct FinalStandings {
    /// Best score first. Sorting is stable, so equal scores keep join
    /// order.
    pub lines: Vec<StandingLine>,
    pub champion: Option<UserId>,
}

fn scoreboard(state: &MatchState) -> Vec<StandingLine> {
    let mut lines: Vec<StandingLine> = state
        .players
        .iter()
        .map(|p| StandingLine {
            user_id: p.user_id,
            name: p.name.clone(),
            username: p.username.clone(),
            score: p.score,
            eliminated: p.eliminated,
        })
        .collect();
    lines.sort_by_key(|l| std::cmp::Reverse(l.score));
    lines
}

/// Build the announcement payload for a resolved round.
pub fn round_summary(state: &MatchState, outcome: &RoundOutcome) -> RoundSummary {
    let picks = state
        .players
        .iter()
        .filter(|p| !p.eliminated || outcome.eliminated.contains(&p.user_id))
        .map(|p| RevealedPick {
            user_id: p.user_id,
            name: p.name.clone(),
            username: p.username.clone(),
            pick: p.pick.number(),
        })
        .collect();

    RoundSummary {
        round_no: outcome.round_no,
        target: outcome.target,
        winners: outcome.winners.clone(),
        picks,
        scoreboard: scoreboard(state),
    }
}

/// Compute the final standings and champion.
///
/// The champion is the best-scoring non-eliminated player; if nobody is
/// left standing, the best-scoring player overall.
pub fn final_standings(state: &MatchState) -> FinalStandings {
    let lines = scoreboard(state);
    let champion = lines
        .iter()
        .find(|l| !l.eliminated)
        .or_else(|| lines.first())
        .map(|l| l.user_id);
    FinalStandings { lines, champion }
}
