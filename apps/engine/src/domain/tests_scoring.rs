use crate::config::engine::EngineConfig;
use crate::domain::scoring::apply_round_scoring;
use crate::domain::state::Pick;
use crate::domain::test_state_helpers::{eliminate, playing_match};

fn delta_of(outcome: &crate::domain::scoring::RoundOutcome, user: i64) -> i32 {
    outcome
        .deltas
        .iter()
        .find(|&&(id, _)| id == user)
        .map(|&(_, d)| d)
        .unwrap()
}

#[test]
fn target_is_mean_times_factor_and_closest_wins() {
    let mut m = playing_match(&[
        (1, Pick::Picked(20)),
        (2, Pick::Picked(40)),
        (3, Pick::Picked(60)),
        (4, Pick::Picked(80)),
    ]);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    assert_eq!(outcome.target, 40.0);
    assert_eq!(outcome.winners, vec![2]);
    assert_eq!(delta_of(&outcome, 2), 0);
    assert_eq!(delta_of(&outcome, 1), -1);
    assert_eq!(delta_of(&outcome, 3), -1);
    assert_eq!(delta_of(&outcome, 4), -1);
    assert!(outcome.eliminated.is_empty());
}

#[test]
fn equidistant_picks_share_the_win() {
    let mut m = playing_match(&[
        (1, Pick::Picked(30)),
        (2, Pick::Picked(50)),
        (3, Pick::Picked(70)),
    ]);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    // Mean 50, target 40; 30 and 50 are both 10 away.
    assert_eq!(outcome.target, 40.0);
    assert_eq!(outcome.winners, vec![1, 2]);
    assert_eq!(delta_of(&outcome, 1), 0);
    assert_eq!(delta_of(&outcome, 2), 0);
    assert_eq!(delta_of(&outcome, 3), -1);
}

#[test]
fn heavy_duplicates_arm_the_rule_without_penalizing_yet() {
    let mut m = playing_match(&[
        (1, Pick::Picked(30)),
        (2, Pick::Picked(30)),
        (3, Pick::Picked(30)),
        (4, Pick::Picked(30)),
        (5, Pick::Picked(80)),
    ]);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    assert!(m.duplicate_rule_pending);
    assert!(!m.duplicate_rule_active);
    // Target 32; the 30-pickers win and only the 80-picker pays.
    assert_eq!(outcome.winners, vec![1, 2, 3, 4]);
    assert_eq!(delta_of(&outcome, 1), 0);
    assert_eq!(delta_of(&outcome, 5), -1);
}

#[test]
fn active_duplicate_rule_penalizes_every_sharer() {
    let mut m = playing_match(&[
        (1, Pick::Picked(30)),
        (2, Pick::Picked(30)),
        (3, Pick::Picked(30)),
        (4, Pick::Picked(30)),
        (5, Pick::Picked(80)),
    ]);
    m.duplicate_rule_active = true;
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    // The 30-pickers still win on distance but each pays the duplicate
    // penalty; the 80-picker pays the generic one.
    assert_eq!(outcome.winners, vec![1, 2, 3, 4]);
    for user in 1..=5 {
        assert_eq!(delta_of(&outcome, user), -1);
    }
    assert_eq!(m.player(1).unwrap().total_penalties, 1);
}

#[test]
fn zero_vs_hundred_flips_the_winner_in_a_two_player_round() {
    let mut m = playing_match(&[(1, Pick::Picked(0)), (2, Pick::Picked(100))]);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    // On plain distance the 0-picker would win; the endgame rule
    // overrides that.
    assert_eq!(outcome.winners, vec![2]);
    assert_eq!(delta_of(&outcome, 1), -1);
    assert_eq!(delta_of(&outcome, 2), 0);
}

#[test]
fn zero_vs_hundred_needs_exactly_two_active_players() {
    let mut m = playing_match(&[
        (1, Pick::Picked(0)),
        (2, Pick::Picked(100)),
        (3, Pick::Picked(50)),
    ]);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    // Mean 50, target 40; 50 wins on distance and the endgame rule
    // stays dormant.
    assert_eq!(outcome.winners, vec![3]);
    assert_eq!(delta_of(&outcome, 1), -1);
    assert_eq!(delta_of(&outcome, 2), -1);
}

#[test]
fn exact_target_doubles_the_stakes_after_two_eliminations() {
    let mut m = playing_match(&[
        (1, Pick::Picked(20)),
        (2, Pick::Picked(25)),
        (3, Pick::Picked(30)),
        (4, Pick::Pending),
        (5, Pick::Pending),
    ]);
    eliminate(&mut m, 4);
    eliminate(&mut m, 5);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    // Mean 25, target 20, hit exactly by player 1.
    assert_eq!(outcome.target, 20.0);
    assert_eq!(outcome.winners, vec![1]);
    assert_eq!(delta_of(&outcome, 1), 0);
    assert_eq!(delta_of(&outcome, 2), -2);
    assert_eq!(delta_of(&outcome, 3), -2);
    assert_eq!(delta_of(&outcome, 4), 0);
}

#[test]
fn exact_target_requires_a_hit_to_change_anything() {
    let mut m = playing_match(&[
        (1, Pick::Picked(21)),
        (2, Pick::Picked(25)),
        (3, Pick::Picked(30)),
        (4, Pick::Pending),
        (5, Pick::Pending),
    ]);
    eliminate(&mut m, 4);
    eliminate(&mut m, 5);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    // Rounded target is 20 and nobody picked it, so the ordinary rules
    // decide the round.
    assert_eq!(outcome.winners, vec![1]);
    assert_eq!(delta_of(&outcome, 2), -1);
    assert_eq!(delta_of(&outcome, 3), -1);
}

#[test]
fn reaching_the_threshold_eliminates_and_arms_the_duplicate_rule() {
    let mut m = playing_match(&[
        (1, Pick::Picked(10)),
        (2, Pick::Picked(10)),
        (3, Pick::Picked(40)),
    ]);
    m.player_mut(3).unwrap().score = -9;
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    assert_eq!(outcome.eliminated, vec![3]);
    assert!(m.player(3).unwrap().eliminated);
    assert_eq!(m.player(3).unwrap().score, -10);
    assert!(m.duplicate_rule_pending);
}

#[test]
fn missed_picks_stay_out_of_the_mean_and_skip_the_generic_penalty() {
    let mut m = playing_match(&[
        (1, Pick::Picked(40)),
        (2, Pick::Picked(80)),
        (3, Pick::Missed),
    ]);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    // Mean of 40 and 80 only; the miss was already paid for when the
    // deadline fired.
    assert_eq!(outcome.target, 48.0);
    assert_eq!(outcome.winners, vec![1]);
    assert_eq!(delta_of(&outcome, 2), -1);
    assert_eq!(delta_of(&outcome, 3), 0);
}

#[test]
fn a_round_with_no_numeric_picks_scores_nothing() {
    let mut m = playing_match(&[(1, Pick::Missed), (2, Pick::Missed)]);
    assert!(apply_round_scoring(&mut m, &EngineConfig::default()).is_none());
}

#[test]
fn rounds_played_counts_only_active_players() {
    let mut m = playing_match(&[
        (1, Pick::Picked(10)),
        (2, Pick::Picked(20)),
        (3, Pick::Pending),
    ]);
    eliminate(&mut m, 3);
    apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    assert_eq!(m.player(1).unwrap().rounds_played, 1);
    assert_eq!(m.player(3).unwrap().rounds_played, 0);
}
