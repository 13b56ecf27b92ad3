//! The rules of the game as pure functions. Nothing in here stores state or
//! performs I/O: callers pass in a snapshot and persist whatever comes back.

pub mod assign;
pub mod cascade;
pub mod night;
pub mod night_order;
pub mod phase;
pub mod room_code;
pub mod votes;
pub mod win;

pub use assign::assign_roles;
pub use cascade::lover_cascade;
pub use night::{resolve_night, spy_caught, NightResult};
pub use night_order::{next_night_role, pre_completed_roles};
pub use phase::{transition, PhaseEvent};
pub use room_code::{generate_room_code, unique_room_code, ROOM_CODE_ATTEMPTS};
pub use votes::{resolve_vote, tally_votes, VoteResult, VoteTally};
pub use win::check_win;
