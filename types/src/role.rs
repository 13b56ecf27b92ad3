use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Wolves,
    Villagers,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    Villager,
    Seer,
    Witch,
    Hunter,
    Guard,
    Cupid,
    LittleGirl,
}

/// Static metadata for one role. Nothing here changes during a game.
#[derive(Debug, PartialEq, Eq)]
pub struct RoleInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
    pub faction: Faction,
    pub night_order: Option<u8>,
}

/// Roles that get a night turn, in the order they are woken up.
pub const NIGHT_ORDER: [Role; 6] = [
    Role::Guard,
    Role::Cupid,
    Role::LittleGirl,
    Role::Werewolf,
    Role::Witch,
    Role::Seer,
];

const WEREWOLF: RoleInfo = RoleInfo {
    name: "Werewolf",
    description: "Each night, eliminate a villager with your pack. Stay discreet during the day.",
    emoji: "\u{1F43A}",
    color: "#dc2626",
    faction: Faction::Wolves,
    night_order: Some(4),
};

const VILLAGER: RoleInfo = RoleInfo {
    name: "Villager",
    description: "Unmask the werewolves during the village votes!",
    emoji: "\u{1F468}\u{200D}\u{1F33E}",
    color: "#16a34a",
    faction: Faction::Villagers,
    night_order: None,
};

const SEER: RoleInfo = RoleInfo {
    name: "Seer",
    description: "Each night, secretly discover the role of one player. Guide the village without exposing yourself.",
    emoji: "\u{1F52E}",
    color: "#9b59b6",
    faction: Faction::Villagers,
    night_order: Some(6),
};

const WITCH: RoleInfo = RoleInfo {
    name: "Witch",
    description: "Two single-use potions: one to save the wolves' victim, one to kill.",
    emoji: "\u{1F9EA}",
    color: "#7c3aed",
    faction: Faction::Villagers,
    night_order: Some(5),
};

const HUNTER: RoleInfo = RoleInfo {
    name: "Hunter",
    description: "When you die, fire a last shot and take a player of your choice with you!",
    emoji: "\u{1F3F9}",
    color: "#92400e",
    faction: Faction::Villagers,
    night_order: None,
};

const GUARD: RoleInfo = RoleInfo {
    name: "Guard",
    description: "Each night, protect a player from the wolves. You cannot protect the same player two nights in a row.",
    emoji: "\u{1F6E1}\u{FE0F}",
    color: "#2563eb",
    faction: Faction::Villagers,
    night_order: Some(1),
};

const CUPID: RoleInfo = RoleInfo {
    name: "Cupid",
    description: "On the first night, bind two players by love. If one dies, the other dies of grief.",
    emoji: "\u{1F498}",
    color: "#ec4899",
    faction: Faction::Villagers,
    night_order: Some(2),
};

const LITTLE_GIRL: RoleInfo = RoleInfo {
    name: "Little Girl",
    description: "Spy on the werewolves at night. If they catch you, you die in place of their victim.",
    emoji: "\u{1F467}",
    color: "#d97706",
    faction: Faction::Villagers,
    night_order: Some(3),
};

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Werewolf,
        Role::Villager,
        Role::Seer,
        Role::Witch,
        Role::Hunter,
        Role::Guard,
        Role::Cupid,
        Role::LittleGirl,
    ];

    pub fn info(&self) -> &'static RoleInfo {
        match self {
            Role::Werewolf => &WEREWOLF,
            Role::Villager => &VILLAGER,
            Role::Seer => &SEER,
            Role::Witch => &WITCH,
            Role::Hunter => &HUNTER,
            Role::Guard => &GUARD,
            Role::Cupid => &CUPID,
            Role::LittleGirl => &LITTLE_GIRL,
        }
    }

    pub fn faction(&self) -> Faction {
        self.info().faction
    }

    pub fn night_order(&self) -> Option<u8> {
        self.info().night_order
    }

    pub fn is_wolf(&self) -> bool {
        self.faction() == Faction::Wolves
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info().name)
    }
}

impl Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Wolves => write!(f, "Wolves"),
            Faction::Villagers => write!(f, "Villagers"),
        }
    }
}
