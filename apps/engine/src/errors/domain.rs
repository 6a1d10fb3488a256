//! Domain-level error type used across the engine services.
//!
//! Only validation failures surface as errors; they are reported to the
//! caller and leave state unchanged. Race and staleness conditions (a timer
//! firing into a round that already resolved, a duplicate resolution
//! attempt) are expected and are absorbed as no-ops, never as errors.

use thiserror::Error;

use crate::domain::state::{GroupId, UserId};

/// Why a pick submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickRejection {
    /// The submission is not a plain non-negative integer.
    NotANumber,
    /// The value lies outside the legal pick range.
    OutOfRange,
    /// The player's match has no round collecting picks right now.
    NoActiveRound,
    /// The player has been eliminated.
    AlreadyEliminated,
    /// A pick was already recorded for this round.
    AlreadyPicked,
}

/// Central engine error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A match already exists for this group.
    #[error("a match is already active in group {group}")]
    AlreadyActive { group: GroupId },

    /// No match exists for this group.
    #[error("no active match in group {group}")]
    MatchNotFound { group: GroupId },

    /// Join rejected: no match, join phase over, or the table is full.
    #[error("cannot join the match in group {group}: {detail}")]
    NotJoinable { group: GroupId, detail: String },

    /// One active match per user, globally.
    #[error("user {user} is already playing in group {group}")]
    AlreadyInMatch { user: UserId, group: GroupId },

    /// The operation is only valid while the join phase is open.
    #[error("the join phase in group {group} is closed")]
    JoinPhaseClosed { group: GroupId },

    /// The user is not a player in this match.
    #[error("user {user} is not part of the match in group {group}")]
    NotInMatch { user: UserId, group: GroupId },

    /// Too few players joined for an early start.
    #[error("group {group} has {joined} players, {min} required to start")]
    NotEnoughPlayers {
        group: GroupId,
        joined: usize,
        min: usize,
    },

    /// Pick submission rejected; see the specific reason.
    #[error("pick rejected: {0:?}")]
    PickRejected(PickRejection),
}
