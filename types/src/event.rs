use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::player_state::PlayerId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Death,
    Save,
    LoverDeath,
    Win,
    PhaseChange,
    Spy,
    Reveal,
    Vote,
    Shot,
}

/// One line of the game's event log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub night: Option<u32>,
    pub day: Option<u32>,
    pub kind: EventKind,
    pub message: String,
    pub player: Option<PlayerId>,
    /// Set for events only one player may see (seer results, spying).
    pub audience: Option<PlayerId>,
}

impl GameEvent {
    pub fn night(night: u32, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            night: Some(night),
            day: None,
            kind,
            message: message.into(),
            player: None,
            audience: None,
        }
    }

    pub fn day(day: u32, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            night: None,
            day: Some(day),
            kind,
            message: message.into(),
            player: None,
            audience: None,
        }
    }

    pub fn about(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    pub fn private_to(mut self, player: PlayerId) -> Self {
        self.audience = Some(player);
        self
    }

    pub fn is_visible_to(&self, viewer: Option<PlayerId>) -> bool {
        match self.audience {
            None => true,
            Some(audience) => viewer == Some(audience),
        }
    }
}

impl Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.night, self.day) {
            (Some(n), _) => write!(f, "[night {n}] {}", self.message),
            (None, Some(d)) => write!(f, "[day {d}] {}", self.message),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}
