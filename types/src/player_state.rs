use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::{Faction, Role};

pub type PlayerId = Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub role: Option<Role>,
    pub is_alive: bool,
    pub is_lover: bool,
}

/// What every other player can see about someone. The role only shows once
/// its holder is dead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicPlayerState {
    pub id: PlayerId,
    pub name: String,
    pub is_alive: bool,
    pub revealed_role: Option<Role>,
}

impl From<&PlayerState> for PublicPlayerState {
    fn from(value: &PlayerState) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            is_alive: value.is_alive,
            revealed_role: if value.is_alive { None } else { value.role },
        }
    }
}

impl PartialEq for PlayerState {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.name,
            self.role
                .map_or_else(|| "No Role".to_string(), |role| role.to_string()),
        )?;
        if self.is_lover {
            write!(f, " \u{2665}")?;
        }
        if !self.is_alive {
            write!(f, " [dead]")?;
        }
        Ok(())
    }
}

impl PlayerState {
    pub fn new(name: String) -> Self {
        Self::new_with_id(Uuid::new_v4(), name)
    }

    pub fn new_with_id(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            role: None,
            is_alive: true,
            is_lover: false,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn faction(&self) -> Option<Faction> {
        self.role.map(|role| role.faction())
    }

    pub fn is_wolf(&self) -> bool {
        self.role.map_or(false, |role| role.is_wolf())
    }

    /// Marks the player dead. Death is permanent, so there is no way back.
    pub fn kill(&mut self) {
        self.is_alive = false;
    }
}

pub fn find_player(players: &[PlayerState], id: PlayerId) -> Option<&PlayerState> {
    players.iter().find(|p| p.id == id)
}

/// Display name for an id, or `???` when it matches nobody.
pub fn player_name(players: &[PlayerState], id: PlayerId) -> &str {
    find_player(players, id).map_or("???", |p| p.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_state_hides_role_of_living_players() {
        let mut player = PlayerState::new("Alice".to_string()).with_role(Role::Seer);
        let public: PublicPlayerState = (&player).into();
        assert_eq!(public.revealed_role, None);

        player.kill();
        let public: PublicPlayerState = (&player).into();
        assert_eq!(public.revealed_role, Some(Role::Seer));
        assert!(!public.is_alive);
    }

    #[test]
    fn unknown_ids_get_a_placeholder_name() {
        let players = vec![PlayerState::new("Alice".to_string())];
        assert_eq!(player_name(&players, players[0].id), "Alice");
        assert_eq!(player_name(&players, Uuid::new_v4()), "???");
    }
}
