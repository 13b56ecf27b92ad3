use std::collections::HashMap;

use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use types::{GameError, PlayerId, Role, RoleConfig};

/// Deals one role to each player. The pool is built from `config`, shuffled
/// uniformly, then zipped against `player_ids` in the order given.
pub fn assign_roles<R: Rng + ?Sized>(
    player_ids: &[PlayerId],
    config: &RoleConfig,
    rng: &mut R,
) -> Result<HashMap<PlayerId, Role>, GameError> {
    config.validate(player_ids.len())?;
    if player_ids.iter().unique().count() != player_ids.len() {
        return Err(GameError::InvariantViolation(
            "player ids passed to role assignment are not unique".to_string(),
        ));
    }

    let mut pool = config.pool();
    pool.shuffle(rng);
    log::debug!("Shuffled role pool: [{}]", pool.iter().join(", "));

    Ok(player_ids.iter().copied().zip(pool).collect())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use uuid::Uuid;

    use super::*;

    fn ids(n: u128) -> Vec<PlayerId> {
        (1..=n).map(Uuid::from_u128).collect()
    }

    #[test]
    fn every_player_gets_a_role_matching_the_config() {
        let players = ids(8);
        let config = RoleConfig::from_counts([
            (Role::Werewolf, 2),
            (Role::Seer, 1),
            (Role::Villager, 5),
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        let assignment = assign_roles(&players, &config, &mut rng).unwrap();

        assert_eq!(assignment.len(), 8);
        assert!(players.iter().all(|id| assignment.contains_key(id)));
        let counts = assignment.values().counts();
        assert_eq!(counts[&Role::Werewolf], 2);
        assert_eq!(counts[&Role::Seer], 1);
        assert_eq!(counts[&Role::Villager], 5);
    }

    #[test]
    fn mismatched_config_fails_loudly() {
        let players = ids(5);
        let config = RoleConfig::from_counts([(Role::Werewolf, 1), (Role::Villager, 3)]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            assign_roles(&players, &config, &mut rng),
            Err(GameError::ConfigMismatch {
                roles: 4,
                players: 5
            })
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let id = Uuid::from_u128(1);
        let config = RoleConfig::from_counts([(Role::Werewolf, 1), (Role::Villager, 1)]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            assign_roles(&[id, id], &config, &mut rng),
            Err(GameError::InvariantViolation(_))
        ));
    }

    #[test]
    fn same_seed_same_deal() {
        let players = ids(9);
        let config = RoleConfig::default();
        let first = assign_roles(&players, &config, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = assign_roles(&players, &config, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn permutations_are_roughly_uniform() {
        let players = ids(3);
        let config = RoleConfig::from_counts([
            (Role::Werewolf, 1),
            (Role::Seer, 1),
            (Role::Villager, 1),
        ]);
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 6000;

        let permutations = (0..trials)
            .map(|_| {
                let assignment = assign_roles(&players, &config, &mut rng).unwrap();
                players.iter().map(|id| assignment[id]).collect::<Vec<_>>()
            })
            .counts();

        // 3! orderings, ~1000 each; 4+ standard deviations of slack either way
        assert_eq!(permutations.len(), 6);
        for (permutation, count) in permutations {
            assert!(
                (850..=1150).contains(&count),
                "{permutation:?} occurred {count} times"
            );
        }
    }
}
