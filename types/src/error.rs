use serde::Serialize;
use thiserror::Error;

use crate::action::ActionKind;
use crate::player_state::PlayerId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Role configuration has {roles} roles for {players} players")]
    ConfigMismatch { roles: usize, players: usize },

    #[error("At least {minimum} players are needed to start, got {players}")]
    NotEnoughPlayers { minimum: usize, players: usize },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("No free room code after {0} attempts")]
    RoomCodeExhausted(usize),
}

/// A record that was skipped during resolution because it cannot be right.
/// Resolution still completes; these are surfaced for operators.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataIntegrityWarning {
    #[error("Action by {actor} has an unknown kind")]
    UnknownActionKind { actor: PlayerId },

    #[error("{kind:?} action by {actor} has no target")]
    MissingTarget { actor: PlayerId, kind: ActionKind },

    #[error("Record references unknown player {id}")]
    UnknownPlayer { id: PlayerId },

    #[error("Record references dead player {id}")]
    DeadPlayer { id: PlayerId },

    #[error("Malformed payload from {actor}: {reason}")]
    MalformedPayload { actor: PlayerId, reason: String },
}
