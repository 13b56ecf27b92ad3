use std::{collections::BTreeMap, fmt::Display};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    event::GameEvent,
    player_state::{PlayerId, PlayerState, PublicPlayerState},
    role::Role,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Lobby,
    RoleReveal,
    Night,
    DaySummary,
    DayVote,
    Ended,
}

impl RoomStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Lobby => "Waiting room",
            RoomStatus::RoleReveal => "Role reveal",
            RoomStatus::Night => "Night",
            RoomStatus::DaySummary => "Dawn",
            RoomStatus::DayVote => "Village vote",
            RoomStatus::Ended => "Game over",
        }
    }
}

impl Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Wolves,
    Villagers,
    Lovers,
}

impl Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Wolves => write!(f, "the werewolves"),
            Winner::Villagers => write!(f, "the village"),
            Winner::Lovers => write!(f, "the lovers"),
        }
    }
}

/// Where a game is: which phase, which night/day, and whose turn it is at night.
/// Only the engine's transition function produces new values of this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseState {
    pub status: RoomStatus,
    pub night_number: u32,
    pub day_number: u32,
    pub completed_roles: Vec<Role>,
    /// `None` during the night means every role has acted.
    pub current_role: Option<Role>,
    pub winner: Option<Winner>,
}

impl Default for PhaseState {
    fn default() -> Self {
        Self {
            status: RoomStatus::Lobby,
            night_number: 0,
            day_number: 0,
            completed_roles: Vec::new(),
            current_role: None,
            winner: None,
        }
    }
}

impl Display for PhaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            RoomStatus::Night => write!(
                f,
                "{} {} (done: [{}], awaiting: {})",
                self.status,
                self.night_number,
                self.completed_roles.iter().join(", "),
                self.current_role
                    .map_or_else(|| "nobody".to_string(), |r| r.to_string())
            ),
            RoomStatus::DaySummary | RoomStatus::DayVote => {
                write!(f, "{} (day {})", self.status, self.day_number)
            }
            RoomStatus::Ended => write!(
                f,
                "{}: {} won",
                self.status,
                self.winner
                    .map_or_else(|| "nobody".to_string(), |w| w.to_string())
            ),
            _ => write!(f, "{}", self.status),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PublicInfo {
    pub phase: PhaseState,
    pub public_table: Vec<PublicPlayerState>,
    pub history: Vec<GameEvent>,
}

/// What one player knows beyond the public table.
#[derive(Clone, Debug)]
pub struct PrivateInfo {
    pub state: PlayerState,
    /// Roles this player has learned: fellow wolves, seer results, a spied wolf.
    pub known_roles: BTreeMap<PlayerId, Role>,
    /// The wolves' chosen victim, told to the witch before she acts.
    pub night_victim: Option<PlayerId>,
    pub lover: Option<PlayerId>,
}

impl PrivateInfo {
    pub fn new(state: PlayerState) -> Self {
        Self {
            state,
            known_roles: BTreeMap::new(),
            night_victim: None,
            lover: None,
        }
    }

    pub fn known_wolves(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.known_roles
            .iter()
            .filter(|(_, role)| role.is_wolf())
            .map(|(&id, _)| id)
    }
}

impl Display for PrivateInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.state)?;
        if !self.known_roles.is_empty() {
            write!(
                f,
                " knows: [{}]",
                self.known_roles
                    .iter()
                    .map(|(id, role)| format!("{}={role}", &id.simple().to_string()[..8]))
                    .join(", ")
            )?;
        }
        Ok(())
    }
}
