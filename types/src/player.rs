use std::fmt::Debug;

use crate::{
    game_state::{PrivateInfo, PublicInfo},
    Action, PlayerState,
};

/// Decides what a seat does whenever the game offers it a choice, whether it
/// is a night turn, a vote or a hunter's last shot.
pub trait Strategy: Debug {
    fn select_action(
        &mut self,
        private_info: &PrivateInfo,
        public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action;
}

#[derive(Debug)]
pub struct Player {
    pub info: PrivateInfo,
    pub strategy: Box<dyn Strategy>,
}

impl Player {
    pub fn new(state: PlayerState, strategy: Box<dyn Strategy>) -> Self {
        Self {
            info: PrivateInfo::new(state),
            strategy,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.info.state
    }

    pub fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.info.state
    }

    pub fn select_action(&mut self, public_info: &PublicInfo, available_actions: &[Action]) -> Action {
        self.strategy
            .select_action(&self.info, public_info, available_actions)
    }
}
