use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::player_state::{player_name, PlayerId, PlayerState};
use crate::role::Role;

/// A choice offered to a player on their turn, at night or during the vote.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Kill { target: PlayerId },
    Heal { target: PlayerId },
    Poison { target: PlayerId },
    Protect { target: PlayerId },
    Reveal { target: PlayerId },
    Spy,
    LinkLovers { first: PlayerId, second: PlayerId },
    Vote { target: PlayerId },
    Shoot { target: PlayerId },
    Pass,
}

fn short(id: &Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = match self {
            Action::Kill { target } => format!("Kill {}", short(target)),
            Action::Heal { target } => format!("Heal {}", short(target)),
            Action::Poison { target } => format!("Poison {}", short(target)),
            Action::Protect { target } => format!("Protect {}", short(target)),
            Action::Reveal { target } => format!("Reveal {}", short(target)),
            Action::Spy => "Spy".to_string(),
            Action::LinkLovers { first, second } => {
                format!("Link {} & {}", short(first), short(second))
            }
            Action::Vote { target } => format!("Vote {}", short(target)),
            Action::Shoot { target } => format!("Shoot {}", short(target)),
            Action::Pass => "Pass".to_string(),
        };
        write!(f, "{}", string)
    }
}

impl Action {
    pub fn target(&self) -> Option<PlayerId> {
        match *self {
            Action::Kill { target }
            | Action::Heal { target }
            | Action::Poison { target }
            | Action::Protect { target }
            | Action::Reveal { target }
            | Action::Vote { target }
            | Action::Shoot { target } => Some(target),
            Action::LinkLovers { first, .. } => Some(first),
            Action::Spy | Action::Pass => None,
        }
    }

    /// The night-record kind for this action; `None` for day-only actions.
    pub fn night_kind(&self) -> Option<ActionKind> {
        match self {
            Action::Kill { .. } => Some(ActionKind::Kill),
            Action::Heal { .. } => Some(ActionKind::Heal),
            Action::Poison { .. } => Some(ActionKind::Poison),
            Action::Protect { .. } => Some(ActionKind::Protect),
            Action::Reveal { .. } => Some(ActionKind::Reveal),
            Action::Spy => Some(ActionKind::Spy),
            Action::LinkLovers { .. } => Some(ActionKind::LinkLovers),
            Action::Pass => Some(ActionKind::Pass),
            Action::Vote { .. } | Action::Shoot { .. } => None,
        }
    }

    /// Same as `Display` but with player names instead of short ids.
    pub fn describe(&self, players: &[PlayerState]) -> String {
        let name = |id: &PlayerId| player_name(players, *id).to_string();
        match self {
            Action::Kill { target } => format!("Kill {}", name(target)),
            Action::Heal { target } => format!("Heal {}", name(target)),
            Action::Poison { target } => format!("Poison {}", name(target)),
            Action::Protect { target } => format!("Protect {}", name(target)),
            Action::Reveal { target } => format!("Reveal {}", name(target)),
            Action::Spy => "Spy".to_string(),
            Action::LinkLovers { first, second } => {
                format!("Link {} & {}", name(first), name(second))
            }
            Action::Vote { target } => format!("Vote {}", name(target)),
            Action::Shoot { target } => format!("Shoot {}", name(target)),
            Action::Pass => "Pass".to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Kill,
    Heal,
    Poison,
    Protect,
    Reveal,
    Spy,
    LinkLovers,
    Pass,
    /// Anything a stored record names that this engine does not know.
    #[serde(other)]
    Unknown,
}

impl ActionKind {
    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            ActionKind::Kill
                | ActionKind::Heal
                | ActionKind::Poison
                | ActionKind::Protect
                | ActionKind::Reveal
                | ActionKind::LinkLovers
        )
    }
}

/// One submitted night turn: (night, role, actor) plus what was chosen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NightAction {
    pub night: u32,
    pub role: Role,
    pub kind: ActionKind,
    pub actor: PlayerId,
    pub target: Option<PlayerId>,
    #[serde(default)]
    pub extra: serde_json::Value,
}

impl NightAction {
    pub fn new(
        night: u32,
        role: Role,
        kind: ActionKind,
        actor: PlayerId,
        target: Option<PlayerId>,
    ) -> Self {
        Self {
            night,
            role,
            kind,
            actor,
            target,
            extra: serde_json::Value::Null,
        }
    }

    pub fn from_action(night: u32, role: Role, actor: PlayerId, action: &Action) -> Option<Self> {
        let kind = action.night_kind()?;
        let mut record = Self::new(night, role, kind, actor, action.target());
        if let Action::LinkLovers { second, .. } = action {
            record.extra = json!({ "lover2": second.to_string() });
        }
        Some(record)
    }

    pub fn second_lover(&self) -> Option<PlayerId> {
        self.extra
            .get("lover2")
            .and_then(|value| value.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn revealed_role(&self) -> Option<Role> {
        self.extra
            .get("role")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn record_revealed_role(&mut self, role: Role) {
        let value = json!(role);
        match self.extra.as_object_mut() {
            Some(map) => {
                map.insert("role".to_string(), value);
            }
            None => self.extra = json!({ "role": value }),
        }
    }
}

/// One ballot for a given day. A voter has at most one per day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub day: u32,
    pub voter: PlayerId,
    pub target: PlayerId,
}
