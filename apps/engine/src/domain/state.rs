pub type GroupId = i64;
pub type UserId = i64;

/// A player's pick status within the round in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// No submission yet.
    Pending,
    /// A numeric pick.
    Picked(u8),
    /// The deadline passed. Counts as present for round completion but
    /// contributes no numeric value.
    Missed,
}

impl Pick {
    pub fn number(self) -> Option<u8> {
        match self {
            Pick::Picked(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Pick::Pending)
    }
}

/// One participant in a match.
///
/// Owned exclusively by its `MatchState`; mutated only by the round and
/// scoring code while the match is active. Every field is explicit and
/// default-initialized, there are no optional counters.
#[derive(Debug, Clone)]
pub struct Player {
    pub user_id: UserId,
    pub name: String,
    pub username: Option<String>,
    /// Pick for the round currently collecting.
    pub pick: Pick,
    /// Cumulative score; starts at 0.
    pub score: i32,
    pub eliminated: bool,
    /// Consecutive missed picks; reset when a pick lands.
    pub consecutive_misses: u32,
    /// Total penalty points accrued across the match.
    pub total_penalties: u32,
    /// Rounds this player was active in.
    pub rounds_played: u32,
}

impl Player {
    pub fn new(user_id: UserId, name: impl Into<String>, username: Option<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            username,
            pick: Pick::Pending,
            score: 0,
            eliminated: false,
            consecutive_misses: 0,
            total_penalties: 0,
            rounds_played: 0,
        }
    }
}

/// Overall match progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Players may join or leave.
    Joining,
    /// Rounds are running.
    Playing,
    /// Finalized; the match is about to leave the registry.
    Ended,
}

/// Entire match container, sufficient for pure domain operations.
///
/// Timer handles live beside this in the service layer so the domain stays
/// free of runtime types.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub group_id: GroupId,
    /// Join order is preserved; overflow truncation and champion
    /// tie-breaks depend on it.
    pub players: Vec<Player>,
    pub phase: MatchPhase,
    /// Round counter; 0 before the first round.
    pub round_no: u32,
    /// A round is currently collecting picks.
    pub round_active: bool,
    /// Resolution guard, set once per round by whichever completion path
    /// gets there first.
    pub round_resolved: bool,
    /// The duplicate-penalty rule applies to the round in progress.
    pub duplicate_rule_active: bool,
    /// The duplicate-penalty rule switches on at the next round start.
    pub duplicate_rule_pending: bool,
}

impl MatchState {
    pub fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            players: Vec::new(),
            phase: MatchPhase::Joining,
            round_no: 0,
            round_active: false,
            round_resolved: false,
            duplicate_rule_active: false,
            duplicate_rule_pending: false,
        }
    }

    pub fn player(&self, user_id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    pub fn player_mut(&mut self, user_id: UserId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.user_id == user_id)
    }

    /// Players still in the running, in join order.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.eliminated)
    }

    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    pub fn eliminated_count(&self) -> usize {
        self.players.iter().filter(|p| p.eliminated).count()
    }

    /// Add a player; ignored if the user is already in the match.
    pub fn add_player(&mut self, player: Player) {
        if self.player(player.user_id).is_none() {
            self.players.push(player);
        }
    }

    /// Remove a player. Returns whether the user was present.
    pub fn remove_player(&mut self, user_id: UserId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.user_id != user_id);
        self.players.len() != before
    }

    pub fn reset_round_picks(&mut self) {
        for p in &mut self.players {
            p.pick = Pick::Pending;
        }
    }

    /// Every active player has either picked or missed.
    pub fn round_complete(&self) -> bool {
        self.active_players().all(|p| !p.pick.is_pending())
    }
}
