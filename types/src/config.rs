use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::role::Role;

pub const MIN_PLAYERS: usize = 4;

/// How many of each role go into the pool. Roles absent from the map count as zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleConfig(BTreeMap<Role, usize>);

impl Default for RoleConfig {
    fn default() -> Self {
        Self::from_counts([
            (Role::Werewolf, 2),
            (Role::Villager, 3),
            (Role::Seer, 1),
            (Role::Witch, 1),
            (Role::Hunter, 1),
            (Role::Cupid, 1),
        ])
    }
}

impl RoleConfig {
    pub fn from_counts(counts: impl IntoIterator<Item = (Role, usize)>) -> Self {
        Self(counts.into_iter().filter(|&(_, n)| n > 0).collect())
    }

    pub fn count(&self, role: Role) -> usize {
        self.0.get(&role).copied().unwrap_or(0)
    }

    pub fn set(&mut self, role: Role, count: usize) {
        if count == 0 {
            self.0.remove(&role);
        } else {
            self.0.insert(role, count);
        }
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, usize)> + '_ {
        self.0.iter().map(|(&role, &count)| (role, count))
    }

    /// The role pool in a stable order, each role repeated by its count.
    pub fn pool(&self) -> Vec<Role> {
        self.iter()
            .flat_map(|(role, count)| std::iter::repeat(role).take(count))
            .collect()
    }

    pub fn validate(&self, player_count: usize) -> Result<(), GameError> {
        if self.total() != player_count {
            return Err(GameError::ConfigMismatch {
                roles: self.total(),
                players: player_count,
            });
        }
        Ok(())
    }
}
