use std::{thread::sleep, time::Duration};

use types::{Action, Winner};

use crate::{
    error::SimulationError,
    game_state::{GameState, Turn},
};

/// Nights a game may last before it is called off. Every night or vote with
/// a death shortens the table, so only a game where nobody ever kills gets here.
pub const MAX_ROUNDS: u32 = 100;

/// Plays a game from the lobby to the end, asking each seat's strategy
/// whenever it has a choice to make.
pub fn run_game(game_state: &mut GameState, delay_ms: Option<u64>) -> Result<Winner, SimulationError> {
    loop {
        log::debug!("{game_state}");
        if let Some(ms) = delay_ms {
            sleep(Duration::from_millis(ms));
        }
        if game_state.phase.night_number > MAX_ROUNDS {
            return Err(SimulationError::RoundLimit(MAX_ROUNDS));
        }
        match game_state.awaiting() {
            Turn::Lobby => game_state.start()?,
            Turn::RoleReveal => game_state.finish_reveal()?,
            Turn::NightRole { role, actors } => {
                for actor in actors {
                    let action = game_state.ask(actor)?;
                    game_state.submit_night_action(actor, action)?;
                }
                game_state.complete_role(role)?;
            }
            Turn::ResolveNight => {
                for line in game_state.resolve_night()? {
                    log::info!("{line}");
                }
            }
            Turn::HunterShot { hunter } => {
                let action = game_state.ask(hunter)?;
                game_state.submit_shot(hunter, action)?;
            }
            Turn::Dawn => game_state.open_vote()?,
            Turn::Vote { voters } => {
                for voter in voters {
                    if let Action::Vote { target } = game_state.ask(voter)? {
                        game_state.submit_vote(voter, target)?;
                    }
                }
                for line in game_state.close_vote()? {
                    log::info!("{line}");
                }
            }
            Turn::Over(Some(winner)) => {
                log::info!("Room {} is over: {winner} won", game_state.room_code);
                return Ok(winner);
            }
            Turn::Over(None) => {
                return Err(types::GameError::InvariantViolation(
                    "game ended without a winner".to_string(),
                )
                .into())
            }
        }
    }
}
