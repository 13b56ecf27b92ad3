use types::{GameError, PhaseState, Role, RoomStatus, Winner};

use crate::night_order::pre_completed_roles;

/// Something that moves a game from one phase to the next. Values that depend
/// on the table (who acts next, who won) are worked out by the caller with
/// the other engine functions and passed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Roles are dealt; the first night's opening role is already known.
    Start { first_role: Option<Role> },
    /// Everyone has seen their card.
    BeginNight,
    RoleCompleted { role: Role, next_role: Option<Role> },
    NightResolved { winner: Option<Winner> },
    VoteOpened,
    VoteResolved {
        winner: Option<Winner>,
        first_role: Option<Role>,
    },
}

fn rejected(state: &PhaseState, event: &PhaseEvent, why: &str) -> GameError {
    GameError::InvariantViolation(format!(
        "{event:?} rejected during {}: {why}",
        state.status
    ))
}

fn expect_status(
    state: &PhaseState,
    event: &PhaseEvent,
    status: RoomStatus,
) -> Result<(), GameError> {
    if state.status != status {
        return Err(rejected(
            state,
            event,
            &format!("only allowed during {status}"),
        ));
    }
    Ok(())
}

fn ended(state: &PhaseState, winner: Winner) -> PhaseState {
    PhaseState {
        status: RoomStatus::Ended,
        current_role: None,
        winner: Some(winner),
        ..state.clone()
    }
}

/// The game's phase machine. Returns the next state or an
/// `InvariantViolation` if the event makes no sense right now, such as a
/// vote during the night or a role acting out of turn.
pub fn transition(state: &PhaseState, event: PhaseEvent) -> Result<PhaseState, GameError> {
    let next = match &event {
        PhaseEvent::Start { first_role } => {
            expect_status(state, &event, RoomStatus::Lobby)?;
            PhaseState {
                status: RoomStatus::RoleReveal,
                night_number: 1,
                day_number: 0,
                completed_roles: pre_completed_roles(1),
                current_role: *first_role,
                winner: None,
            }
        }
        PhaseEvent::BeginNight => {
            expect_status(state, &event, RoomStatus::RoleReveal)?;
            PhaseState {
                status: RoomStatus::Night,
                ..state.clone()
            }
        }
        PhaseEvent::RoleCompleted { role, next_role } => {
            expect_status(state, &event, RoomStatus::Night)?;
            if state.current_role != Some(*role) {
                return Err(rejected(state, &event, "that role is not the one awaited"));
            }
            let mut completed_roles = state.completed_roles.clone();
            completed_roles.push(*role);
            if next_role.map_or(false, |r| completed_roles.contains(&r)) {
                return Err(rejected(state, &event, "next role has already acted"));
            }
            PhaseState {
                completed_roles,
                current_role: *next_role,
                ..state.clone()
            }
        }
        PhaseEvent::NightResolved { winner } => {
            expect_status(state, &event, RoomStatus::Night)?;
            if state.current_role.is_some() {
                return Err(rejected(state, &event, "a role has not acted yet"));
            }
            match winner {
                Some(winner) => ended(state, *winner),
                None => PhaseState {
                    status: RoomStatus::DaySummary,
                    day_number: state.night_number,
                    ..state.clone()
                },
            }
        }
        PhaseEvent::VoteOpened => {
            expect_status(state, &event, RoomStatus::DaySummary)?;
            PhaseState {
                status: RoomStatus::DayVote,
                ..state.clone()
            }
        }
        PhaseEvent::VoteResolved { winner, first_role } => {
            expect_status(state, &event, RoomStatus::DayVote)?;
            match winner {
                Some(winner) => ended(state, *winner),
                None => {
                    let night_number = state.night_number + 1;
                    PhaseState {
                        status: RoomStatus::Night,
                        night_number,
                        day_number: state.day_number,
                        completed_roles: pre_completed_roles(night_number),
                        current_role: *first_role,
                        winner: None,
                    }
                }
            }
        }
    };
    log::info!("Phase: {} -> {}", state, next);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> PhaseState {
        transition(
            &PhaseState::default(),
            PhaseEvent::Start {
                first_role: Some(Role::Werewolf),
            },
        )
        .unwrap()
    }

    fn night_one() -> PhaseState {
        transition(&started(), PhaseEvent::BeginNight).unwrap()
    }

    #[test]
    fn start_moves_lobby_to_reveal() {
        let state = started();
        assert_eq!(state.status, RoomStatus::RoleReveal);
        assert_eq!(state.night_number, 1);
        assert_eq!(state.current_role, Some(Role::Werewolf));
        assert!(state.completed_roles.is_empty());
    }

    #[test]
    fn cannot_start_twice() {
        let result = transition(&started(), PhaseEvent::Start { first_role: None });
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
    }

    #[test]
    fn roles_complete_in_turn() {
        let state = transition(
            &night_one(),
            PhaseEvent::RoleCompleted {
                role: Role::Werewolf,
                next_role: Some(Role::Seer),
            },
        )
        .unwrap();
        assert_eq!(state.completed_roles, vec![Role::Werewolf]);
        assert_eq!(state.current_role, Some(Role::Seer));
    }

    #[test]
    fn out_of_turn_role_is_rejected() {
        let result = transition(
            &night_one(),
            PhaseEvent::RoleCompleted {
                role: Role::Seer,
                next_role: None,
            },
        );
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
    }

    #[test]
    fn repeating_a_completed_role_is_rejected() {
        let result = transition(
            &night_one(),
            PhaseEvent::RoleCompleted {
                role: Role::Werewolf,
                next_role: Some(Role::Werewolf),
            },
        );
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
    }

    #[test]
    fn night_cannot_resolve_while_a_role_is_awaited() {
        let result = transition(&night_one(), PhaseEvent::NightResolved { winner: None });
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
    }

    #[test]
    fn vote_during_the_night_is_rejected() {
        let result = transition(
            &night_one(),
            PhaseEvent::VoteResolved {
                winner: None,
                first_role: None,
            },
        );
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
    }

    #[test]
    fn full_cycle_into_second_night() {
        let state = transition(
            &night_one(),
            PhaseEvent::RoleCompleted {
                role: Role::Werewolf,
                next_role: None,
            },
        )
        .unwrap();
        let state = transition(&state, PhaseEvent::NightResolved { winner: None }).unwrap();
        assert_eq!(state.status, RoomStatus::DaySummary);
        assert_eq!(state.day_number, 1);

        let state = transition(&state, PhaseEvent::VoteOpened).unwrap();
        assert_eq!(state.status, RoomStatus::DayVote);

        let state = transition(
            &state,
            PhaseEvent::VoteResolved {
                winner: None,
                first_role: Some(Role::Werewolf),
            },
        )
        .unwrap();
        assert_eq!(state.status, RoomStatus::Night);
        assert_eq!(state.night_number, 2);
        assert_eq!(state.completed_roles, vec![Role::Cupid]);
        assert_eq!(state.current_role, Some(Role::Werewolf));
    }

    #[test]
    fn winner_ends_the_game() {
        let state = transition(
            &night_one(),
            PhaseEvent::RoleCompleted {
                role: Role::Werewolf,
                next_role: None,
            },
        )
        .unwrap();
        let state = transition(
            &state,
            PhaseEvent::NightResolved {
                winner: Some(Winner::Wolves),
            },
        )
        .unwrap();
        assert_eq!(state.status, RoomStatus::Ended);
        assert_eq!(state.winner, Some(Winner::Wolves));

        let result = transition(&state, PhaseEvent::VoteOpened);
        assert!(result.is_err());
    }
}
