pub mod action;
pub mod config;
pub mod error;
pub mod event;
pub mod game_state;
pub mod lovers;
pub mod player;
pub mod player_state;
pub mod role;

pub use action::{Action, ActionKind, NightAction, Vote};
pub use config::{RoleConfig, MIN_PLAYERS};
pub use error::{DataIntegrityWarning, GameError};
pub use event::{EventKind, GameEvent};
pub use game_state::{PhaseState, PrivateInfo, PublicInfo, RoomStatus, Winner};
pub use lovers::LoverBond;
pub use player::{Player, Strategy};
pub use player_state::{find_player, player_name, PlayerId, PlayerState, PublicPlayerState};
pub use role::{Faction, Role, RoleInfo, NIGHT_ORDER};
