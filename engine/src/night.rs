use rand::Rng;
use types::{
    find_player, player_name, ActionKind, DataIntegrityWarning, LoverBond, NightAction, PlayerId,
    PlayerState,
};

use crate::cascade::lover_cascade;

/// Everything the night produced, in the order it should be announced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NightResult {
    pub deaths: Vec<PlayerId>,
    /// True only when the witch's heal cancelled the wolves' kill.
    pub healed: bool,
    pub summary: Vec<String>,
    pub warnings: Vec<DataIntegrityWarning>,
}

impl NightResult {
    fn add_death(&mut self, id: PlayerId) -> bool {
        if self.deaths.contains(&id) {
            return false;
        }
        self.deaths.push(id);
        true
    }

    fn cascade(&mut self, victim: PlayerId, players: &[PlayerState], lovers: Option<&LoverBond>) {
        if let Some(partner) = lover_cascade(victim, players, lovers) {
            if self.add_death(partner) {
                self.summary.push(format!(
                    "\u{1F494} {} died of a broken heart!",
                    player_name(players, partner)
                ));
            }
        }
    }
}

#[derive(Default)]
struct Targets {
    kill: Option<PlayerId>,
    heal: Option<PlayerId>,
    poison: Option<PlayerId>,
    protect: Option<PlayerId>,
}

/// Checks a record against the table. Broken records are reported and come
/// back as `None` so resolution simply skips them.
fn checked_target(
    action: &NightAction,
    players: &[PlayerState],
    warnings: &mut Vec<DataIntegrityWarning>,
) -> Option<PlayerId> {
    let mut flag = |warning: DataIntegrityWarning| {
        log::warn!("Ignoring night action: {warning}");
        warnings.push(warning);
    };

    if action.kind == ActionKind::Unknown {
        flag(DataIntegrityWarning::UnknownActionKind {
            actor: action.actor,
        });
        return None;
    }
    match find_player(players, action.actor) {
        None => {
            flag(DataIntegrityWarning::UnknownPlayer { id: action.actor });
            return None;
        }
        Some(actor) if !actor.is_alive => {
            flag(DataIntegrityWarning::DeadPlayer { id: action.actor });
            return None;
        }
        Some(_) => {}
    }

    let Some(target) = action.target else {
        if action.kind.requires_target() {
            flag(DataIntegrityWarning::MissingTarget {
                actor: action.actor,
                kind: action.kind,
            });
        }
        return None;
    };
    match find_player(players, target) {
        None => {
            flag(DataIntegrityWarning::UnknownPlayer { id: target });
            None
        }
        Some(p) if !p.is_alive => {
            flag(DataIntegrityWarning::DeadPlayer { id: target });
            None
        }
        Some(_) => {
            if action.kind == ActionKind::LinkLovers && action.second_lover().is_none() {
                flag(DataIntegrityWarning::MalformedPayload {
                    actor: action.actor,
                    reason: "link_lovers without a valid lover2".to_string(),
                });
                return None;
            }
            Some(target)
        }
    }
}

/// Resolves one night's actions against the table.
///
/// Order of precedence: the guard's protection cancels the wolves' kill
/// outright; failing that, the witch's heal cancels it; otherwise the victim
/// dies and takes their lover along. The witch's poison is applied on its
/// own afterwards whatever happened to the kill. Each id appears in
/// `deaths` at most once.
pub fn resolve_night(
    actions: &[NightAction],
    players: &[PlayerState],
    lovers: Option<&LoverBond>,
) -> NightResult {
    let mut result = NightResult::default();
    let mut targets = Targets::default();

    for action in actions {
        let Some(target) = checked_target(action, players, &mut result.warnings) else {
            continue;
        };
        let slot = match action.kind {
            ActionKind::Kill => &mut targets.kill,
            ActionKind::Heal => &mut targets.heal,
            ActionKind::Poison => &mut targets.poison,
            ActionKind::Protect => &mut targets.protect,
            _ => continue,
        };
        // first submitted record of each kind wins
        if slot.is_none() {
            *slot = Some(target);
        }
    }

    match targets.kill {
        None => result
            .summary
            .push("\u{1F634} Nothing happened during the night...".to_string()),
        Some(victim) if targets.protect == Some(victim) => {
            log::debug!("Kill on {victim} blocked by protection");
            result.summary.push(format!(
                "\u{1F6E1}\u{FE0F} The Guard protected {} tonight!",
                player_name(players, victim)
            ));
        }
        Some(victim) if targets.heal == Some(victim) => {
            log::debug!("Kill on {victim} cancelled by heal");
            result.healed = true;
            result
                .summary
                .push("\u{1F9EA} The Witch saved someone tonight!".to_string());
        }
        Some(victim) => {
            result.add_death(victim);
            result.summary.push(format!(
                "\u{1F43A} {} was devoured by the werewolves!",
                player_name(players, victim)
            ));
            result.cascade(victim, players, lovers);
        }
    }

    if let Some(poisoned) = targets.poison {
        if result.add_death(poisoned) {
            result.summary.push(format!(
                "\u{2620}\u{FE0F} {} was poisoned by the Witch!",
                player_name(players, poisoned)
            ));
            result.cascade(poisoned, players, lovers);
        }
    }

    result
}

/// Whether the wolves notice the little girl spying on them.
pub fn spy_caught<R: Rng + ?Sized>(wolves_alive: usize, rng: &mut R) -> bool {
    let chance = (0.2 * wolves_alive as f64).min(0.6);
    rng.gen_bool(chance)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;
    use types::Role;
    use uuid::Uuid;

    use super::*;

    struct Table {
        players: Vec<PlayerState>,
    }

    impl Table {
        fn new() -> Self {
            let roles = [
                ("Wolf", Role::Werewolf),
                ("Guard", Role::Guard),
                ("Witch", Role::Witch),
                ("Alice", Role::Villager),
                ("Bob", Role::Villager),
                ("Carol", Role::Seer),
            ];
            let players = roles
                .iter()
                .enumerate()
                .map(|(idx, (name, role))| {
                    PlayerState::new_with_id(Uuid::from_u128(idx as u128 + 1), name.to_string())
                        .with_role(*role)
                })
                .collect();
            Self { players }
        }

        fn id(&self, name: &str) -> PlayerId {
            self.players
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.id)
                .expect("name is on the table")
        }

        fn act(&self, actor: &str, role: Role, kind: ActionKind, target: &str) -> NightAction {
            NightAction::new(1, role, kind, self.id(actor), Some(self.id(target)))
        }

        fn kill(&self, target: &str) -> NightAction {
            self.act("Wolf", Role::Werewolf, ActionKind::Kill, target)
        }

        fn protect(&self, target: &str) -> NightAction {
            self.act("Guard", Role::Guard, ActionKind::Protect, target)
        }

        fn heal(&self, target: &str) -> NightAction {
            self.act("Witch", Role::Witch, ActionKind::Heal, target)
        }

        fn poison(&self, target: &str) -> NightAction {
            self.act("Witch", Role::Witch, ActionKind::Poison, target)
        }

        fn bond(&self, a: &str, b: &str) -> LoverBond {
            LoverBond::new(self.id(a), self.id(b)).unwrap()
        }
    }

    #[test]
    fn nothing_submitted_means_a_quiet_night() {
        let table = Table::new();
        let result = resolve_night(&[], &table.players, None);
        assert!(result.deaths.is_empty());
        assert!(!result.healed);
        assert_eq!(result.summary.len(), 1);
        assert!(result.summary[0].contains("Nothing happened"));
    }

    #[test]
    fn protection_beats_kill() {
        let table = Table::new();
        let actions = [table.kill("Alice"), table.protect("Alice")];
        let result = resolve_night(&actions, &table.players, None);
        assert!(result.deaths.is_empty());
        assert!(!result.healed);
        assert!(result.summary[0].contains("protected Alice"));
    }

    #[test]
    fn protection_beats_heal_too() {
        let table = Table::new();
        let actions = [
            table.kill("Alice"),
            table.heal("Alice"),
            table.protect("Alice"),
        ];
        let result = resolve_night(&actions, &table.players, None);
        assert!(result.deaths.is_empty());
        assert!(!result.healed);
        assert!(result.summary[0].contains("Guard"));
    }

    #[test]
    fn heal_beats_unprotected_kill() {
        let table = Table::new();
        let actions = [table.kill("Alice"), table.heal("Alice")];
        let result = resolve_night(&actions, &table.players, None);
        assert!(result.deaths.is_empty());
        assert!(result.healed);
        assert!(result.summary[0].contains("saved"));
    }

    #[test]
    fn heal_on_someone_else_changes_nothing() {
        let table = Table::new();
        let actions = [table.kill("Alice"), table.heal("Bob")];
        let result = resolve_night(&actions, &table.players, None);
        assert_eq!(result.deaths, vec![table.id("Alice")]);
        assert!(!result.healed);
    }

    #[test]
    fn unprotected_kill() {
        let table = Table::new();
        let result = resolve_night(&[table.kill("Alice")], &table.players, None);
        assert_eq!(result.deaths, vec![table.id("Alice")]);
        assert_eq!(result.summary.len(), 1);
        assert!(result.summary[0].contains("Alice"));
    }

    #[test]
    fn lover_dies_with_kill_victim() {
        let table = Table::new();
        let bond = table.bond("Alice", "Bob");
        let result = resolve_night(&[table.kill("Alice")], &table.players, Some(&bond));
        assert_eq!(result.deaths, vec![table.id("Alice"), table.id("Bob")]);
        assert_eq!(result.summary.len(), 2);
        assert!(result.summary[1].contains("Bob"));
        assert!(result.summary[1].contains("broken heart"));
    }

    #[test]
    fn poison_stands_when_kill_is_blocked() {
        let table = Table::new();
        let actions = [
            table.kill("Alice"),
            table.protect("Alice"),
            table.poison("Bob"),
        ];
        let result = resolve_night(&actions, &table.players, None);
        assert_eq!(result.deaths, vec![table.id("Bob")]);
        assert_eq!(result.summary.len(), 2);
        assert!(result.summary[1].contains("poisoned"));
    }

    #[test]
    fn poison_without_kill_still_reports_the_quiet_wolves() {
        let table = Table::new();
        let result = resolve_night(&[table.poison("Bob")], &table.players, None);
        assert_eq!(result.deaths, vec![table.id("Bob")]);
        assert!(result.summary[0].contains("Nothing happened"));
        assert!(result.summary[1].contains("Bob"));
    }

    #[test]
    fn crossed_cascades_do_not_double_count() {
        let table = Table::new();
        let bond = table.bond("Alice", "Bob");
        let actions = [table.kill("Alice"), table.poison("Bob")];
        let result = resolve_night(&actions, &table.players, Some(&bond));
        assert_eq!(result.deaths, vec![table.id("Alice"), table.id("Bob")]);
        assert_eq!(result.summary.len(), 2);
    }

    #[test]
    fn poisoning_a_lover_takes_the_partner() {
        let table = Table::new();
        let bond = table.bond("Bob", "Carol");
        let actions = [table.kill("Alice"), table.poison("Bob")];
        let result = resolve_night(&actions, &table.players, Some(&bond));
        assert_eq!(
            result.deaths,
            vec![table.id("Alice"), table.id("Bob"), table.id("Carol")]
        );
        assert_eq!(result.summary.len(), 3);
    }

    #[test]
    fn poisoning_the_kill_victim_adds_nothing() {
        let table = Table::new();
        let actions = [table.kill("Alice"), table.poison("Alice")];
        let result = resolve_night(&actions, &table.players, None);
        assert_eq!(result.deaths, vec![table.id("Alice")]);
        assert_eq!(result.summary.len(), 1);
    }

    #[test]
    fn first_kill_record_wins() {
        let table = Table::new();
        let actions = [table.kill("Alice"), table.kill("Bob")];
        let result = resolve_night(&actions, &table.players, None);
        assert_eq!(result.deaths, vec![table.id("Alice")]);
    }

    #[test]
    fn malformed_records_are_skipped_and_flagged() {
        let table = Table::new();
        let wolf = table.id("Wolf");
        let stranger = Uuid::from_u128(404);
        let mut cupid = NightAction::new(
            1,
            Role::Cupid,
            ActionKind::LinkLovers,
            table.id("Alice"),
            Some(table.id("Bob")),
        );
        cupid.extra = json!({ "lover2": 17 });
        let actions = [
            NightAction::new(1, Role::Werewolf, ActionKind::Unknown, wolf, Some(table.id("Bob"))),
            NightAction::new(1, Role::Werewolf, ActionKind::Kill, wolf, None),
            NightAction::new(1, Role::Werewolf, ActionKind::Kill, wolf, Some(stranger)),
            cupid,
        ];

        let result = resolve_night(&actions, &table.players, None);

        assert!(result.deaths.is_empty());
        assert!(result.summary[0].contains("Nothing happened"));
        assert_eq!(
            result.warnings,
            vec![
                DataIntegrityWarning::UnknownActionKind { actor: wolf },
                DataIntegrityWarning::MissingTarget {
                    actor: wolf,
                    kind: ActionKind::Kill
                },
                DataIntegrityWarning::UnknownPlayer { id: stranger },
                DataIntegrityWarning::MalformedPayload {
                    actor: table.id("Alice"),
                    reason: "link_lovers without a valid lover2".to_string()
                },
            ]
        );
    }

    #[test]
    fn a_malformed_kill_does_not_hide_a_valid_one() {
        let table = Table::new();
        let wolf = table.id("Wolf");
        let actions = [
            NightAction::new(1, Role::Werewolf, ActionKind::Kill, wolf, None),
            table.kill("Bob"),
        ];
        let result = resolve_night(&actions, &table.players, None);
        assert_eq!(result.deaths, vec![table.id("Bob")]);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn dead_targets_are_ignored() {
        let mut table = Table::new();
        table.players[3].kill();
        let result = resolve_night(&[table.kill("Alice")], &table.players, None);
        assert!(result.deaths.is_empty());
        assert_eq!(
            result.warnings,
            vec![DataIntegrityWarning::DeadPlayer {
                id: table.id("Alice")
            }]
        );
    }

    #[test]
    fn pass_and_spy_need_no_target() {
        let table = Table::new();
        let actions = [
            NightAction::new(1, Role::Witch, ActionKind::Pass, table.id("Witch"), None),
            NightAction::new(1, Role::LittleGirl, ActionKind::Spy, table.id("Bob"), None),
        ];
        let result = resolve_night(&actions, &table.players, None);
        assert!(result.warnings.is_empty());
        assert!(result.deaths.is_empty());
    }

    #[test]
    fn spy_catch_odds_are_capped() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(!(0..100).any(|_| spy_caught(0, &mut rng)));

        let caught = (0..10_000).filter(|_| spy_caught(10, &mut rng)).count();
        assert!((5_600..=6_400).contains(&caught), "caught {caught} times");
    }
}
