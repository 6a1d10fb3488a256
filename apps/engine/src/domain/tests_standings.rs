use crate::config::engine::EngineConfig;
use crate::domain::scoring::apply_round_scoring;
use crate::domain::standings::{final_standings, round_summary};
use crate::domain::state::Pick;
use crate::domain::test_state_helpers::{eliminate, playing_match};

#[test]
fn final_standings_sort_best_first_and_keep_join_order_on_ties() {
    let mut m = playing_match(&[(1, Pick::Pending), (2, Pick::Pending), (3, Pick::Pending)]);
    m.player_mut(1).unwrap().score = -3;
    m.player_mut(2).unwrap().score = -1;
    m.player_mut(3).unwrap().score = -1;

    let standings = final_standings(&m);
    let order: Vec<i64> = standings.lines.iter().map(|l| l.user_id).collect();
    assert_eq!(order, vec![2, 3, 1]);
    assert_eq!(standings.champion, Some(2));
}

#[test]
fn champion_skips_eliminated_players() {
    let mut m = playing_match(&[(1, Pick::Pending), (2, Pick::Pending)]);
    m.player_mut(1).unwrap().score = 5;
    eliminate(&mut m, 1);
    m.player_mut(2).unwrap().score = -4;

    let standings = final_standings(&m);
    assert_eq!(standings.champion, Some(2));
}

#[test]
fn champion_falls_back_to_best_score_when_nobody_survived() {
    let mut m = playing_match(&[(1, Pick::Pending), (2, Pick::Pending)]);
    m.player_mut(1).unwrap().score = -10;
    m.player_mut(2).unwrap().score = -12;
    eliminate(&mut m, 1);
    eliminate(&mut m, 2);

    let standings = final_standings(&m);
    assert_eq!(standings.champion, Some(1));
}

#[test]
fn round_summary_reveals_picks_for_survivors_and_the_just_eliminated() {
    let mut m = playing_match(&[
        (1, Pick::Picked(10)),
        (2, Pick::Picked(10)),
        (3, Pick::Picked(40)),
        (4, Pick::Pending),
    ]);
    // Player 4 went out in an earlier round; player 3 goes out now.
    eliminate(&mut m, 4);
    m.player_mut(3).unwrap().score = -9;

    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();
    assert_eq!(outcome.eliminated, vec![3]);

    let summary = round_summary(&m, &outcome);
    let revealed: Vec<i64> = summary.picks.iter().map(|r| r.user_id).collect();
    assert_eq!(revealed, vec![1, 2, 3]);
    assert_eq!(summary.target, 16.0);
    assert_eq!(summary.winners, vec![1, 2]);
}

#[test]
fn summaries_carry_usernames_for_mentions() {
    let mut m = playing_match(&[(1, Pick::Picked(40)), (2, Pick::Picked(80))]);
    m.player_mut(1).unwrap().username = Some("alice".into());

    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();
    let summary = round_summary(&m, &outcome);
    let revealed = summary.picks.iter().find(|r| r.user_id == 1).unwrap();
    assert_eq!(revealed.username.as_deref(), Some("alice"));

    let standings = final_standings(&m);
    let line = standings.lines.iter().find(|l| l.user_id == 1).unwrap();
    assert_eq!(line.username.as_deref(), Some("alice"));
    let line = standings.lines.iter().find(|l| l.user_id == 2).unwrap();
    assert_eq!(line.username, None);
}

#[test]
fn round_summary_shows_missed_picks_as_none() {
    let mut m = playing_match(&[(1, Pick::Picked(40)), (2, Pick::Picked(80)), (3, Pick::Missed)]);
    let outcome = apply_round_scoring(&mut m, &EngineConfig::default()).unwrap();

    let summary = round_summary(&m, &outcome);
    let missed = summary.picks.iter().find(|r| r.user_id == 3).unwrap();
    assert_eq!(missed.pick, None);
    assert_eq!(
        summary.picks.iter().find(|r| r.user_id == 1).unwrap().pick,
        Some(40)
    );
}
