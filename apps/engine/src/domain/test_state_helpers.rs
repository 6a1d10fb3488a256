//! Constructors for match states used across the domain test files.

use crate::domain::state::{MatchPhase, MatchState, Pick, Player, UserId};

/// A match in the playing phase with the given players and their picks
/// for the round being scored. Player names are derived from the ids.
pub fn playing_match(picks: &[(UserId, Pick)]) -> MatchState {
    let mut m = MatchState::new(100);
    for &(id, pick) in picks {
        let mut p = Player::new(id, format!("p{id}"), None);
        p.pick = pick;
        m.players.push(p);
    }
    m.phase = MatchPhase::Playing;
    m.round_no = 1;
    m
}

/// Marks a player as eliminated without going through scoring.
pub fn eliminate(m: &mut MatchState, user: UserId) {
    if let Some(p) = m.player_mut(user) {
        p.eliminated = true;
    }
}
