pub mod input_strategy;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use types::{Action, PlayerId, PrivateInfo, PublicInfo, Strategy};

pub use crate::input_strategy::InputStrategy;

/// Picks uniformly among whatever it is offered.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomStrategy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn select_action(
        &mut self,
        _private_info: &PrivateInfo,
        _public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action {
        *available_actions
            .choose(&mut self.rng)
            .expect("Should always have at least one action to choose from")
    }
}

/// Plays its role straightforwardly using only what it knows: heals the
/// victim, poisons and votes out known wolves, never targets its own pack.
#[derive(Debug, Default)]
pub struct DefaultStrategy {}

fn knows_wolf(info: &PrivateInfo, id: PlayerId) -> bool {
    info.known_roles.get(&id).map_or(false, |role| role.is_wolf())
}

/// Lower is better; `None` means never choose it.
fn preference(info: &PrivateInfo, action: &Action) -> Option<u8> {
    let i_am_wolf = info.state.is_wolf();
    let rank = match *action {
        Action::Heal { .. } => 0,
        Action::Poison { target } if knows_wolf(info, target) => 1,
        Action::Kill { target } if !knows_wolf(info, target) => 2,
        Action::Protect { .. } => 3,
        Action::Reveal { target } if !info.known_roles.contains_key(&target) => 4,
        Action::LinkLovers { .. } => 5,
        Action::Spy => 6,
        Action::Vote { target } | Action::Shoot { target } if knows_wolf(info, target) != i_am_wolf => 7,
        Action::Vote { .. } | Action::Shoot { .. } if !i_am_wolf => 8,
        _ => return None,
    };
    Some(rank)
}

impl Strategy for DefaultStrategy {
    fn select_action(
        &mut self,
        private_info: &PrivateInfo,
        _public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action {
        let best = available_actions
            .iter()
            .filter_map(|action| preference(private_info, action).map(|rank| (rank, *action)))
            .min_by_key(|&(rank, _)| rank);
        if let Some((_, action)) = best {
            return action;
        }

        // nothing worth doing: pass if allowed, otherwise take what's first
        if available_actions.contains(&Action::Pass) {
            return Action::Pass;
        }
        *available_actions
            .first()
            .expect("Always should have an action available when this is called")
    }
}

#[cfg(test)]
mod tests {
    use types::{PhaseState, PlayerState, Role};
    use uuid::Uuid;

    use super::*;

    fn me(role: Role) -> PrivateInfo {
        PrivateInfo::new(PlayerState::new("Me".to_string()).with_role(role))
    }

    fn public() -> PublicInfo {
        PublicInfo {
            phase: PhaseState::default(),
            public_table: Vec::new(),
            history: Vec::new(),
        }
    }

    #[test]
    fn random_picks_an_offered_action() {
        let target = Uuid::new_v4();
        let actions = [Action::Vote { target }, Action::Pass];
        let mut strategy = RandomStrategy::seeded(1);
        for _ in 0..20 {
            let picked = strategy.select_action(&me(Role::Villager), &public(), &actions);
            assert!(actions.contains(&picked));
        }
    }

    #[test]
    fn witch_heals_before_anything_else() {
        let victim = Uuid::new_v4();
        let actions = [
            Action::Poison { target: victim },
            Action::Heal { target: victim },
            Action::Pass,
        ];
        let picked = DefaultStrategy::default().select_action(&me(Role::Witch), &public(), &actions);
        assert_eq!(picked, Action::Heal { target: victim });
    }

    #[test]
    fn witch_only_poisons_known_wolves() {
        let (stranger, wolf) = (Uuid::new_v4(), Uuid::new_v4());
        let actions = [
            Action::Poison { target: stranger },
            Action::Poison { target: wolf },
            Action::Pass,
        ];
        let mut info = me(Role::Witch);
        let picked = DefaultStrategy::default().select_action(&info, &public(), &actions);
        assert_eq!(picked, Action::Pass);

        info.known_roles.insert(wolf, Role::Werewolf);
        let picked = DefaultStrategy::default().select_action(&info, &public(), &actions);
        assert_eq!(picked, Action::Poison { target: wolf });
    }

    #[test]
    fn villagers_vote_for_a_known_wolf() {
        let (a, wolf) = (Uuid::new_v4(), Uuid::new_v4());
        let mut info = me(Role::Seer);
        info.known_roles.insert(wolf, Role::Werewolf);
        let actions = [Action::Vote { target: a }, Action::Vote { target: wolf }];
        let picked = DefaultStrategy::default().select_action(&info, &public(), &actions);
        assert_eq!(picked, Action::Vote { target: wolf });
    }

    #[test]
    fn wolves_never_vote_for_the_pack() {
        let (packmate, villager) = (Uuid::new_v4(), Uuid::new_v4());
        let mut info = me(Role::Werewolf);
        info.known_roles.insert(packmate, Role::Werewolf);
        let actions = [
            Action::Vote { target: packmate },
            Action::Vote { target: villager },
        ];
        let picked = DefaultStrategy::default().select_action(&info, &public(), &actions);
        assert_eq!(picked, Action::Vote { target: villager });
    }

    #[test]
    fn seer_looks_at_someone_new() {
        let (seen, unseen) = (Uuid::new_v4(), Uuid::new_v4());
        let mut info = me(Role::Seer);
        info.known_roles.insert(seen, Role::Villager);
        let actions = [
            Action::Reveal { target: seen },
            Action::Reveal { target: unseen },
        ];
        let picked = DefaultStrategy::default().select_action(&info, &public(), &actions);
        assert_eq!(picked, Action::Reveal { target: unseen });
    }
}
