//! Round scoring: the ordered rule pipeline.
//!
//! The rules run as a strict sequence over an accumulating set of
//! already-penalized players, so the precedence between the duplicate
//! penalty, the two-player 0-vs-100 endgame, the exact-target bonus, and
//! the generic non-winner penalty stays explicit and testable on its own.
//!
//! "Active" throughout means not eliminated when the round was collected;
//! eliminations only happen in the final step.

use std::collections::{HashMap, HashSet};

use crate::config::engine::EngineConfig;
use crate::domain::rules::compute_target;
use crate::domain::state::{MatchState, Pick, UserId};

/// What one round of scoring produced.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub round_no: u32,
    /// The value picks were scored against.
    pub target: f64,
    /// Winner user ids; ties produce several.
    pub winners: Vec<UserId>,
    /// Score change per player, in join order. Already applied to the
    /// state; miss penalties applied earlier in the round are not part of
    /// these deltas.
    pub deltas: Vec<(UserId, i32)>,
    /// Players newly eliminated by this round's penalties.
    pub eliminated: Vec<UserId>,
}

/// Apply the scoring pipeline to the round just collected.
///
/// Pure with respect to the outside world: mutates only `state`. Returns
/// `None` when no numeric picks exist; the caller must then end the match
/// without scoring.
pub fn apply_round_scoring(state: &mut MatchState, config: &EngineConfig) -> Option<RoundOutcome> {
    let numeric: Vec<(UserId, u8)> = state
        .active_players()
        .filter_map(|p| p.pick.number().map(|n| (p.user_id, n)))
        .collect();

    // Step 1: target from the mean of numeric picks. Missed picks
    // contribute nothing.
    let values: Vec<u8> = numeric.iter().map(|&(_, n)| n).collect();
    let target = compute_target(&values, config.target_factor)?;

    let eliminated_before = state.eliminated_count();
    let active_before = state.active_count();
    let scores_before: HashMap<UserId, i32> =
        state.players.iter().map(|p| (p.user_id, p.score)).collect();

    for p in &mut state.players {
        if !p.eliminated {
            p.rounds_played += 1;
        }
    }

    // Step 2: duplicate penalty. Activation scheduling is independent of
    // whether the rule currently applies: any heavily-shared value this
    // round arms the rule for the next one.
    let mut counts: HashMap<u8, usize> = HashMap::new();
    for &(_, n) in &numeric {
        *counts.entry(n).or_default() += 1;
    }
    if counts.values().any(|&c| c >= config.duplicate_value_threshold) {
        state.duplicate_rule_pending = true;
    }

    let mut penalized: HashSet<UserId> = HashSet::new();
    let mut duplicates_applied = false;
    if active_before > 2 && state.duplicate_rule_active {
        let duplicate_values: HashSet<u8> = counts
            .iter()
            .filter(|&(_, &c)| c >= config.duplicate_value_threshold)
            .map(|(&n, _)| n)
            .collect();
        if !duplicate_values.is_empty() {
            duplicates_applied = true;
            for p in state.players.iter_mut().filter(|p| !p.eliminated) {
                if let Pick::Picked(n) = p.pick {
                    if duplicate_values.contains(&n) {
                        p.score -= config.duplicate_penalty;
                        p.total_penalties += config.duplicate_penalty.unsigned_abs();
                        penalized.insert(p.user_id);
                    }
                }
            }
        }
    }

    // Step 3: closest to target. Eliminated and missed players cannot win.
    let mut winners: Vec<UserId> = Vec::new();
    if let Some(min_diff) = numeric
        .iter()
        .map(|&(_, n)| (f64::from(n) - target).abs())
        .min_by(|a, b| a.total_cmp(b))
    {
        winners = numeric
            .iter()
            .filter(|&&(_, n)| (f64::from(n) - target).abs() == min_diff)
            .map(|&(id, _)| id)
            .collect();
    }

    // Step 4: the two-player 0-vs-100 endgame. The 100-picker wins
    // outright and the 0-picker takes a penalty; the generic non-winner
    // penalty is suppressed.
    let mut zero_vs_hundred = false;
    if active_before == 2 && numeric.len() == 2 {
        let mut picks = [numeric[0].1, numeric[1].1];
        picks.sort_unstable();
        if picks == [0, 100] {
            zero_vs_hundred = true;
            let (hundred, zero) = if numeric[0].1 == 100 {
                (numeric[0].0, numeric[1].0)
            } else {
                (numeric[1].0, numeric[0].0)
            };
            winners = vec![hundred];
            if !penalized.contains(&zero) {
                if let Some(p) = state.player_mut(zero) {
                    p.score -= config.zero_vs_hundred_penalty;
                    p.total_penalties += config.zero_vs_hundred_penalty.unsigned_abs();
                    penalized.insert(zero);
                }
            }
        }
    }

    // Step 5: exact-target bonus. Only once the match has seen at least
    // two eliminations, and only when neither of the earlier special
    // rules fired this round.
    let mut exact_target_applied = false;
    if eliminated_before >= 2 && !zero_vs_hundred && !duplicates_applied {
        let rounded = target.round() as u32;
        let exact: Vec<UserId> = numeric
            .iter()
            .filter(|&&(_, n)| u32::from(n) == rounded)
            .map(|&(id, _)| id)
            .collect();
        if !exact.is_empty() {
            winners = exact;
            exact_target_applied = true;
            for p in state.players.iter_mut().filter(|p| !p.eliminated) {
                if winners.contains(&p.user_id) || penalized.contains(&p.user_id) {
                    continue;
                }
                p.score -= config.exact_target_penalty;
                p.total_penalties += config.exact_target_penalty.unsigned_abs();
                penalized.insert(p.user_id);
            }
        }
    }

    // Step 6: generic non-winner penalty, suppressed wholesale by the two
    // special cases above. A player who already took the first-miss
    // penalty this round is exempt.
    if !zero_vs_hundred && !exact_target_applied {
        for p in state.players.iter_mut().filter(|p| !p.eliminated) {
            if winners.contains(&p.user_id)
                || penalized.contains(&p.user_id)
                || p.pick == Pick::Missed
            {
                continue;
            }
            p.score -= config.non_winner_penalty;
            p.total_penalties += config.non_winner_penalty.unsigned_abs();
        }
    }

    // Step 7: eliminations, in one pass after all penalties. The match's
    // first elimination arms the duplicate rule for the next round.
    let mut eliminated_now = Vec::new();
    for p in &mut state.players {
        if !p.eliminated && p.score <= config.elimination_threshold {
            p.eliminated = true;
            eliminated_now.push(p.user_id);
        }
    }
    if !eliminated_now.is_empty() && eliminated_before == 0 {
        state.duplicate_rule_pending = true;
    }

    // Step 8: report what happened.
    let deltas = state
        .players
        .iter()
        .map(|p| (p.user_id, p.score - scores_before[&p.user_id]))
        .collect();

    Some(RoundOutcome {
        round_no: state.round_no,
        target,
        winners,
        deltas,
        eliminated: eliminated_now,
    })
}
