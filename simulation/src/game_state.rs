use std::{
    collections::{HashMap, HashSet, VecDeque},
    fmt::Display,
};

use engine::{
    assign_roles, check_win, generate_room_code, lover_cascade, next_night_role,
    pre_completed_roles, resolve_night, resolve_vote, spy_caught, tally_votes, transition,
    PhaseEvent,
};
use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use types::{
    player_name, Action, ActionKind, DataIntegrityWarning, EventKind, GameError, GameEvent,
    LoverBond, NightAction, PhaseState, Player, PlayerId, PlayerState, PublicInfo, Role,
    RoleConfig, RoomStatus, Strategy, Vote, Winner, MIN_PLAYERS,
};

use crate::config::GameOptions;

/// What the game is waiting for next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Lobby,
    RoleReveal,
    NightRole { role: Role, actors: Vec<PlayerId> },
    ResolveNight,
    HunterShot { hunter: PlayerId },
    Dawn,
    Vote { voters: Vec<PlayerId> },
    Over(Option<Winner>),
}

/// Deaths have been applied but the phase cannot move on until every dead
/// hunter has taken their shot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Settling {
    Night,
    Vote,
}

/// One game room. Validates every submission, feeds the engine and applies
/// what it returns. `&mut self` on every mutation keeps one game's updates
/// strictly ordered.
#[derive(Debug)]
pub struct GameState {
    pub room_code: String,
    pub table: Vec<Player>,
    pub phase: PhaseState,
    pub config: RoleConfig,
    pub options: GameOptions,
    pub lovers: Option<LoverBond>,
    pub night_actions: Vec<NightAction>,
    pub votes: Vec<Vote>,
    pub history: Vec<GameEvent>,
    pub warnings: Vec<DataIntegrityWarning>,
    witch_heal_used: bool,
    witch_poison_used: bool,
    guard_last_protected: Option<(u32, PlayerId)>,
    caught_spy: Option<PlayerId>,
    pending_shots: VecDeque<PlayerId>,
    fired_hunters: HashSet<PlayerId>,
    settling: Option<Settling>,
    rng: StdRng,
}

impl GameState {
    pub fn new(
        player_inputs: Vec<(PlayerId, String, Box<dyn Strategy>)>,
        config: RoleConfig,
        options: GameOptions,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let room_code = generate_room_code(&mut rng);
        log::info!(
            "Room {room_code}: {} players, roles [{}]",
            player_inputs.len(),
            config.iter().map(|(role, n)| format!("{role} x{n}")).join(", ")
        );
        let table = player_inputs
            .into_iter()
            .map(|(id, name, strategy)| Player::new(PlayerState::new_with_id(id, name), strategy))
            .collect();

        Self {
            room_code,
            table,
            phase: PhaseState::default(),
            config,
            options,
            lovers: None,
            night_actions: Vec::new(),
            votes: Vec::new(),
            history: Vec::new(),
            warnings: Vec::new(),
            witch_heal_used: false,
            witch_poison_used: false,
            guard_last_protected: None,
            caught_spy: None,
            pending_shots: VecDeque::new(),
            fired_hunters: HashSet::new(),
            settling: None,
            rng,
        }
    }

    pub fn with_room_code(mut self, room_code: String) -> Self {
        self.room_code = room_code;
        self
    }

    /// Seats a player in the lobby, or renames them if already seated.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: String,
        strategy: Box<dyn Strategy>,
    ) -> Result<(), GameError> {
        if self.phase.status != RoomStatus::Lobby {
            return Err(GameError::InvariantViolation(format!(
                "players can only join in the lobby, not during {}",
                self.phase.status
            )));
        }
        match self.table.iter_mut().find(|p| p.state().id == id) {
            Some(player) => player.state_mut().name = name,
            None => self
                .table
                .push(Player::new(PlayerState::new_with_id(id, name), strategy)),
        }
        Ok(())
    }

    pub fn player_states(&self) -> Vec<PlayerState> {
        self.table.iter().map(|p| p.state().clone()).collect()
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.table.iter().find(|p| p.state().id == id)
    }

    fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.get_player(id).ok_or(GameError::UnknownPlayer(id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.table
            .iter_mut()
            .find(|p| p.state().id == id)
            .ok_or(GameError::UnknownPlayer(id))
    }

    fn name_of(&self, id: PlayerId) -> String {
        self.get_player(id)
            .map_or_else(|| "???".to_string(), |p| p.state().name.clone())
    }

    fn alive_ids(&self) -> Vec<PlayerId> {
        self.table
            .iter()
            .filter(|p| p.state().is_alive)
            .map(|p| p.state().id)
            .collect()
    }

    fn alive_with_role(&self, role: Role) -> Vec<PlayerId> {
        self.table
            .iter()
            .filter(|p| p.state().is_alive && p.state().role == Some(role))
            .map(|p| p.state().id)
            .collect()
    }

    fn advance(&mut self, event: PhaseEvent) -> Result<(), GameError> {
        self.phase = transition(&self.phase, event)?;
        Ok(())
    }

    /// An event stamped with the current night or day.
    fn event(&self, kind: EventKind, message: impl Into<String>) -> GameEvent {
        match self.phase.status {
            RoomStatus::Night => GameEvent::night(self.phase.night_number, kind, message),
            _ => GameEvent::day(self.phase.day_number, kind, message),
        }
    }

    /// Deals roles and moves to the role reveal.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.phase.status != RoomStatus::Lobby {
            return Err(GameError::InvariantViolation(format!(
                "room {} has already started",
                self.room_code
            )));
        }
        if self.table.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                minimum: MIN_PLAYERS,
                players: self.table.len(),
            });
        }
        let ids = self.table.iter().map(|p| p.state().id).collect_vec();
        let roles = assign_roles(&ids, &self.config, &mut self.rng)?;
        self.deal(roles)
    }

    pub(crate) fn deal(&mut self, roles: HashMap<PlayerId, Role>) -> Result<(), GameError> {
        for player in self.table.iter_mut() {
            let id = player.state().id;
            player.state_mut().role = roles.get(&id).copied();
        }

        let wolves = self
            .table
            .iter()
            .filter(|p| p.state().is_wolf())
            .map(|p| p.state().id)
            .collect_vec();
        for player in self.table.iter_mut().filter(|p| p.state().is_wolf()) {
            for &wolf in &wolves {
                player.info.known_roles.insert(wolf, Role::Werewolf);
            }
        }

        let first_role = next_night_role(&pre_completed_roles(1), &self.player_states());
        self.advance(PhaseEvent::Start { first_role })?;
        let event = self.event(EventKind::PhaseChange, "\u{1F3AD} The roles have been dealt");
        self.history.push(event);
        Ok(())
    }

    /// Everyone has seen their card; the first night begins.
    pub fn finish_reveal(&mut self) -> Result<(), GameError> {
        self.advance(PhaseEvent::BeginNight)?;
        self.push_nightfall();
        Ok(())
    }

    fn push_nightfall(&mut self) {
        let night = self.phase.night_number;
        self.history.push(GameEvent::night(
            night,
            EventKind::PhaseChange,
            format!("\u{1F319} Night {night} falls on the village"),
        ));
    }

    pub fn awaiting(&self) -> Turn {
        if let Some(&hunter) = self.pending_shots.front() {
            return Turn::HunterShot { hunter };
        }
        match self.phase.status {
            RoomStatus::Lobby => Turn::Lobby,
            RoomStatus::RoleReveal => Turn::RoleReveal,
            RoomStatus::Night => match self.phase.current_role {
                Some(role) => Turn::NightRole {
                    role,
                    actors: self.alive_with_role(role),
                },
                None => Turn::ResolveNight,
            },
            RoomStatus::DaySummary => Turn::Dawn,
            RoomStatus::DayVote => Turn::Vote {
                voters: self.alive_ids(),
            },
            RoomStatus::Ended => Turn::Over(self.phase.winner),
        }
    }

    /// Everything `player_id` may do right now. Empty when it is not their turn.
    pub fn permitted_actions(&self, player_id: PlayerId) -> Vec<Action> {
        let Some(player) = self.get_player(player_id) else {
            return Vec::new();
        };
        let me = player.state();
        let alive = self.alive_ids();
        let others = alive.iter().copied().filter(|&id| id != player_id);

        let mut actions = if !self.pending_shots.is_empty() {
            if self.pending_shots.front() != Some(&player_id) {
                return Vec::new();
            }
            others.map(|target| Action::Shoot { target }).collect_vec()
        } else if !me.is_alive {
            return Vec::new();
        } else {
            match (self.phase.status, self.phase.current_role) {
                (RoomStatus::Night, Some(role)) if me.role == Some(role) => {
                    self.night_options(role, player, &alive)
                }
                (RoomStatus::DayVote, _) => others.map(|target| Action::Vote { target }).collect(),
                _ => return Vec::new(),
            }
        };
        actions.push(Action::Pass);

        let states = self.player_states();
        log::debug!(
            "Available actions for {}: [{}]",
            me.name,
            actions.iter().map(|a| a.describe(&states)).join(", ")
        );
        actions
    }

    fn night_options(&self, role: Role, player: &Player, alive: &[PlayerId]) -> Vec<Action> {
        let me = player.state().id;
        let night = self.phase.night_number;
        let others = alive.iter().copied().filter(|&id| id != me).collect_vec();
        match role {
            Role::Werewolf => alive
                .iter()
                .copied()
                .filter(|&id| self.get_player(id).map_or(false, |p| !p.state().is_wolf()))
                .map(|target| Action::Kill { target })
                .collect(),
            Role::Guard => alive
                .iter()
                .copied()
                .filter(|&id| self.guard_last_protected != Some((night - 1, id)))
                .map(|target| Action::Protect { target })
                .collect(),
            Role::Cupid if night == 1 && self.lovers.is_none() => alive
                .iter()
                .copied()
                .tuple_combinations::<(_, _)>()
                .map(|(first, second)| Action::LinkLovers { first, second })
                .collect(),
            Role::Cupid => Vec::new(),
            Role::LittleGirl => vec![Action::Spy],
            Role::Witch => {
                let mut actions = Vec::new();
                if !self.witch_heal_used {
                    if let Some(target) = player.info.night_victim {
                        actions.push(Action::Heal { target });
                    }
                }
                if !self.witch_poison_used {
                    actions.extend(others.iter().map(|&target| Action::Poison { target }));
                }
                actions
            }
            Role::Seer => others.iter().map(|&target| Action::Reveal { target }).collect(),
            Role::Villager | Role::Hunter => Vec::new(),
        }
    }

    /// Stores a night choice for the role currently awaited. Submitting again
    /// for the same night replaces the earlier choice.
    pub fn submit_night_action(&mut self, actor: PlayerId, action: Action) -> Result<(), GameError> {
        let role = match (self.phase.status, self.phase.current_role) {
            (RoomStatus::Night, Some(role)) => role,
            _ => {
                return Err(GameError::InvariantViolation(format!(
                    "no night role is awaited during {}",
                    self.phase
                )))
            }
        };
        if matches!(action, Action::LinkLovers { .. })
            && (self.phase.night_number != 1 || self.lovers.is_some())
        {
            return Err(GameError::InvariantViolation(
                "lovers can only be linked once, on the first night".to_string(),
            ));
        }

        let state = self.player(actor)?.state();
        if state.role != Some(role) || !state.is_alive {
            log::error!("{state} tried to act while the {role} is awaited");
            return Err(GameError::IllegalAction(format!(
                "{} cannot act for the {role}",
                state.name
            )));
        }
        if !self.permitted_actions(actor).contains(&action) {
            log::error!("{} is not allowed to {action}", state.name);
            return Err(GameError::IllegalAction(format!(
                "{} is not allowed to {}",
                state.name,
                action.describe(&self.player_states())
            )));
        }

        let night = self.phase.night_number;
        let record = NightAction::from_action(night, role, actor, &action).ok_or_else(|| {
            GameError::IllegalAction(format!("{action} is not a night action"))
        })?;
        log::info!(
            "{} ({role}) chose: {}",
            self.name_of(actor),
            action.describe(&self.player_states())
        );
        match self
            .night_actions
            .iter_mut()
            .find(|r| r.night == night && r.role == role && r.actor == actor)
        {
            Some(existing) => *existing = record,
            None => self.night_actions.push(record),
        }
        Ok(())
    }

    fn tonight(&self, role: Role) -> Vec<NightAction> {
        self.night_actions
            .iter()
            .filter(|r| r.night == self.phase.night_number && r.role == role)
            .cloned()
            .collect()
    }

    /// Closes the awaited role's turn, applies what it learned or changed,
    /// and wakes the next role.
    pub fn complete_role(&mut self, role: Role) -> Result<(), GameError> {
        if self.phase.status != RoomStatus::Night || self.phase.current_role != Some(role) {
            return Err(GameError::InvariantViolation(format!(
                "{role} is not the awaited role during {}",
                self.phase
            )));
        }
        self.apply_role_effects(role)?;

        let mut completed = self.phase.completed_roles.clone();
        completed.push(role);
        let next_role = next_night_role(&completed, &self.player_states());
        self.advance(PhaseEvent::RoleCompleted { role, next_role })
    }

    fn apply_role_effects(&mut self, role: Role) -> Result<(), GameError> {
        let night = self.phase.night_number;
        let records = self.tonight(role);
        let first_of = |kind: ActionKind| records.iter().find(|r| r.kind == kind);
        match role {
            Role::Guard => {
                self.guard_last_protected = first_of(ActionKind::Protect)
                    .and_then(|r| r.target)
                    .map(|target| (night, target));
            }
            Role::Cupid => {
                if let Some(record) = first_of(ActionKind::LinkLovers) {
                    self.link_lovers(record)?;
                }
            }
            Role::LittleGirl => {
                if let Some(record) = first_of(ActionKind::Spy) {
                    self.spy(record.actor);
                }
            }
            Role::Werewolf => self.settle_wolf_victim(),
            Role::Witch => {
                self.witch_heal_used |= first_of(ActionKind::Heal).is_some();
                self.witch_poison_used |= first_of(ActionKind::Poison).is_some();
            }
            Role::Seer => {
                for record in records.iter().filter(|r| r.kind == ActionKind::Reveal) {
                    if let Some(target) = record.target {
                        self.reveal(record.actor, target);
                    }
                }
            }
            Role::Villager | Role::Hunter => {}
        }
        Ok(())
    }

    fn link_lovers(&mut self, record: &NightAction) -> Result<(), GameError> {
        let bond = record
            .target
            .zip(record.second_lover())
            .and_then(|(first, second)| LoverBond::new(first, second))
            .ok_or_else(|| GameError::IllegalAction("lovers must be two different players".to_string()))?;
        let [first, second] = bond.members();
        for (lover, partner) in [(first, second), (second, first)] {
            let partner_name = self.name_of(partner);
            let player = self.player_mut(lover)?;
            player.state_mut().is_lover = true;
            player.info.lover = Some(partner);
            let event = self
                .event(
                    EventKind::Reveal,
                    format!("\u{1F498} Cupid has bound your heart to {partner_name}"),
                )
                .private_to(lover);
            self.history.push(event);
        }
        log::info!(
            "{} and {} are now lovers",
            self.name_of(first),
            self.name_of(second)
        );
        self.lovers = Some(bond);
        Ok(())
    }

    fn spy(&mut self, girl: PlayerId) {
        let wolves = self
            .table
            .iter()
            .filter(|p| p.state().is_alive && p.state().is_wolf())
            .map(|p| p.state().id)
            .collect_vec();
        if spy_caught(wolves.len(), &mut self.rng) {
            log::info!("{} was caught spying", self.name_of(girl));
            if self.options.caught_spy_becomes_victim {
                self.caught_spy = Some(girl);
            }
            let event = self
                .event(EventKind::Spy, "\u{1F440} The werewolves caught you spying!")
                .private_to(girl);
            self.history.push(event);
        } else if let Some(&wolf) = wolves.choose(&mut self.rng) {
            let wolf_name = self.name_of(wolf);
            if let Ok(player) = self.player_mut(girl) {
                player.info.known_roles.insert(wolf, Role::Werewolf);
            }
            let event = self
                .event(
                    EventKind::Spy,
                    format!("\u{1F440} Peeking through your fingers, you recognise {wolf_name} among the werewolves"),
                )
                .private_to(girl)
                .about(wolf);
            self.history.push(event);
        }
    }

    /// Fixes tonight's victim once the wolves are done and tells the witch.
    fn settle_wolf_victim(&mut self) {
        let night = self.phase.night_number;
        let caught = self
            .caught_spy
            .take()
            .filter(|&girl| self.get_player(girl).map_or(false, |p| p.state().is_alive));
        if let Some(girl) = caught {
            let existing = self
                .night_actions
                .iter_mut()
                .find(|r| r.night == night && r.kind == ActionKind::Kill);
            match existing {
                Some(record) => record.target = Some(girl),
                None => {
                    if let Some(&wolf) = self.alive_with_role(Role::Werewolf).first() {
                        self.night_actions.push(NightAction::new(
                            night,
                            Role::Werewolf,
                            ActionKind::Kill,
                            wolf,
                            Some(girl),
                        ));
                    }
                }
            }
        }

        let victim = self
            .night_actions
            .iter()
            .find(|r| r.night == night && r.kind == ActionKind::Kill)
            .and_then(|r| r.target);
        for player in self
            .table
            .iter_mut()
            .filter(|p| p.state().role == Some(Role::Witch))
        {
            player.info.night_victim = victim;
        }
    }

    fn reveal(&mut self, seer: PlayerId, target: PlayerId) {
        let night = self.phase.night_number;
        let Some(role) = self.get_player(target).and_then(|p| p.state().role) else {
            return;
        };
        if let Some(record) = self
            .night_actions
            .iter_mut()
            .find(|r| r.night == night && r.role == Role::Seer && r.actor == seer)
        {
            record.record_revealed_role(role);
        }
        if let Ok(player) = self.player_mut(seer) {
            player.info.known_roles.insert(target, role);
        }
        let event = self
            .event(
                EventKind::Reveal,
                format!("\u{1F52E} {} is the {role}", self.name_of(target)),
            )
            .private_to(seer)
            .about(target);
        self.history.push(event);
    }

    /// Resolves the finished night. Returns the dawn summary.
    pub fn resolve_night(&mut self) -> Result<Vec<String>, GameError> {
        if self.phase.status != RoomStatus::Night
            || self.phase.current_role.is_some()
            || self.settling.is_some()
        {
            return Err(GameError::InvariantViolation(format!(
                "the night cannot be resolved during {}",
                self.phase
            )));
        }
        let night = self.phase.night_number;
        let tonight = self
            .night_actions
            .iter()
            .filter(|r| r.night == night)
            .cloned()
            .collect_vec();
        let states = self.player_states();
        let result = resolve_night(&tonight, &states, self.lovers.as_ref());
        self.warnings.extend(result.warnings.iter().cloned());

        self.record_outcome(&result.summary, &result.deaths, EventKind::Save);
        self.kill_players(&result.deaths);
        for player in self.table.iter_mut() {
            player.info.night_victim = None;
        }

        self.settling = Some(Settling::Night);
        self.try_settle()?;
        Ok(result.summary)
    }

    /// The summary holds at most one leading line that is not about a death,
    /// then one line per entry of `deaths`.
    fn record_outcome(&mut self, summary: &[String], deaths: &[PlayerId], quiet: EventKind) {
        let (leading, death_lines) = summary.split_at(summary.len().saturating_sub(deaths.len()));
        for line in leading {
            let event = self.event(quiet, line.clone());
            self.history.push(event);
        }
        let mut fallen: Vec<PlayerId> = Vec::new();
        for (line, &id) in death_lines.iter().zip(deaths) {
            let heartbroken = self
                .lovers
                .and_then(|bond| bond.partner_of(id))
                .map_or(false, |partner| fallen.contains(&partner));
            let kind = if heartbroken {
                EventKind::LoverDeath
            } else {
                EventKind::Death
            };
            let event = self.event(kind, line.clone()).about(id);
            self.history.push(event);
            fallen.push(id);
        }
    }

    fn kill_players(&mut self, ids: &[PlayerId]) {
        for &id in ids {
            let Some(player) = self.table.iter_mut().find(|p| p.state().id == id) else {
                continue;
            };
            player.state_mut().kill();
            log::info!("{} died", player.state());
            if player.state().role == Some(Role::Hunter)
                && !self.fired_hunters.contains(&id)
                && !self.pending_shots.contains(&id)
            {
                self.pending_shots.push_back(id);
            }
        }
    }

    /// Once no hunter is left to shoot, checks for a winner and finishes the
    /// night or the vote.
    fn try_settle(&mut self) -> Result<(), GameError> {
        if !self.pending_shots.is_empty() {
            return Ok(());
        }
        let Some(settling) = self.settling.take() else {
            return Ok(());
        };
        let states = self.player_states();
        let winner = check_win(&states, self.lovers.as_ref());
        let win_event = winner.map(|winner| {
            self.event(EventKind::Win, format!("\u{1F3C6} Victory for {winner}!"))
        });
        match settling {
            Settling::Night => self.advance(PhaseEvent::NightResolved { winner })?,
            Settling::Vote => {
                let first_role =
                    next_night_role(&pre_completed_roles(self.phase.night_number + 1), &states);
                self.advance(PhaseEvent::VoteResolved { winner, first_role })?;
            }
        }

        match (win_event, settling) {
            (Some(event), _) => {
                log::info!("Room {}: {event}", self.room_code);
                self.history.push(event);
            }
            (None, Settling::Night) => {
                let day = self.phase.day_number;
                self.history.push(GameEvent::day(
                    day,
                    EventKind::PhaseChange,
                    format!("\u{2600}\u{FE0F} Day {day} dawns"),
                ));
            }
            (None, Settling::Vote) => self.push_nightfall(),
        }
        Ok(())
    }

    /// Takes the shot owed by the first hunter in line. `Pass` holds fire.
    pub fn submit_shot(&mut self, hunter: PlayerId, action: Action) -> Result<(), GameError> {
        if self.pending_shots.front() != Some(&hunter) {
            return Err(GameError::InvariantViolation(format!(
                "{} has no shot to take",
                self.name_of(hunter)
            )));
        }
        if !self.permitted_actions(hunter).contains(&action) {
            return Err(GameError::IllegalAction(format!(
                "{} is not allowed to {}",
                self.name_of(hunter),
                action.describe(&self.player_states())
            )));
        }
        self.pending_shots.pop_front();
        self.fired_hunters.insert(hunter);

        if let Action::Shoot { target } = action {
            let states = self.player_states();
            let line = format!(
                "\u{1F3F9} {} fired a last shot at {}!",
                player_name(&states, hunter),
                player_name(&states, target)
            );
            let event = self.event(EventKind::Shot, line).about(target);
            self.history.push(event);
            let mut deaths = vec![target];
            if let Some(partner) = lover_cascade(target, &states, self.lovers.as_ref()) {
                let event = self
                    .event(
                        EventKind::LoverDeath,
                        format!(
                            "\u{1F494} {} died of a broken heart!",
                            player_name(&states, partner)
                        ),
                    )
                    .about(partner);
                self.history.push(event);
                deaths.push(partner);
            }
            self.kill_players(&deaths);
        } else {
            log::info!("{} held their fire", self.name_of(hunter));
        }
        self.try_settle()
    }

    pub fn open_vote(&mut self) -> Result<(), GameError> {
        self.advance(PhaseEvent::VoteOpened)?;
        let event = self.event(
            EventKind::PhaseChange,
            "\u{1F5F3}\u{FE0F} The village gathers to vote",
        );
        self.history.push(event);
        Ok(())
    }

    /// Records or replaces `voter`'s ballot for today.
    pub fn submit_vote(&mut self, voter: PlayerId, target: PlayerId) -> Result<(), GameError> {
        if self.phase.status != RoomStatus::DayVote || self.settling.is_some() {
            return Err(GameError::InvariantViolation(format!(
                "votes are not taken during {}",
                self.phase
            )));
        }
        let name = self.player(voter)?.state().name.clone();
        self.player(target)?;
        if !self
            .permitted_actions(voter)
            .contains(&Action::Vote { target })
        {
            log::error!("{name} may not vote for {}", self.name_of(target));
            return Err(GameError::IllegalAction(format!(
                "{name} may not vote for {}",
                self.name_of(target)
            )));
        }
        let day = self.phase.day_number;
        let ballot = Vote { day, voter, target };
        match self
            .votes
            .iter_mut()
            .find(|v| v.day == day && v.voter == voter)
        {
            Some(existing) => *existing = ballot,
            None => self.votes.push(ballot),
        }
        log::info!("{name} votes for {}", self.name_of(target));
        Ok(())
    }

    /// Counts today's ballots and applies the result. Returns the summary.
    pub fn close_vote(&mut self) -> Result<Vec<String>, GameError> {
        if self.phase.status != RoomStatus::DayVote || self.settling.is_some() {
            return Err(GameError::InvariantViolation(format!(
                "there is no open vote during {}",
                self.phase
            )));
        }
        let day = self.phase.day_number;
        let ballots = self
            .votes
            .iter()
            .filter(|v| v.day == day)
            .copied()
            .collect_vec();
        let states = self.player_states();
        let tally = tally_votes(&ballots, &states);
        self.warnings.extend(tally.warnings.iter().cloned());
        if !tally.counts.is_empty() {
            let counts = tally
                .counts
                .iter()
                .sorted_by_key(|&(_, &count)| std::cmp::Reverse(count))
                .map(|(&id, count)| format!("{} ({count})", player_name(&states, id)))
                .join(", ");
            let event = self.event(EventKind::Vote, format!("\u{1F5F3}\u{FE0F} Votes: {counts}"));
            self.history.push(event);
        }

        let result = resolve_vote(&tally, &states, self.lovers.as_ref());
        self.record_outcome(&result.summary, &result.deaths, EventKind::Vote);
        self.kill_players(&result.deaths);

        self.settling = Some(Settling::Vote);
        self.try_settle()?;
        Ok(result.summary)
    }

    /// Routes a chosen action to whatever the game is waiting for.
    pub fn perform_action(&mut self, player: PlayerId, action: Action) -> Result<(), GameError> {
        match self.awaiting() {
            Turn::NightRole { .. } => self.submit_night_action(player, action),
            Turn::HunterShot { .. } => self.submit_shot(player, action),
            Turn::Vote { .. } => match action {
                Action::Vote { target } => self.submit_vote(player, target),
                Action::Pass => Ok(()),
                other => Err(GameError::IllegalAction(format!(
                    "{other} during the village vote"
                ))),
            },
            turn => Err(GameError::InvariantViolation(format!(
                "no player action is expected at {turn:?}"
            ))),
        }
    }

    /// Asks the player's strategy to choose among the permitted actions.
    pub fn ask(&mut self, player_id: PlayerId) -> Result<Action, GameError> {
        let available_actions = self.permitted_actions(player_id);
        let public_info = self.public_info(Some(player_id));
        let player = self.player_mut(player_id)?;
        if available_actions.is_empty() {
            return Ok(Action::Pass);
        }
        Ok(player.select_action(&public_info, &available_actions))
    }

    /// The table and log as `viewer` may see them. `None` is a spectator.
    pub fn public_info(&self, viewer: Option<PlayerId>) -> PublicInfo {
        PublicInfo {
            phase: self.phase.clone(),
            public_table: self.table.iter().map(|p| p.state().into()).collect(),
            history: self
                .history
                .iter()
                .filter(|event| event.is_visible_to(viewer))
                .cloned()
                .collect(),
        }
    }

    pub fn still_playing(&self) -> bool {
        self.phase.status != RoomStatus::Ended
    }

    pub fn winner(&self) -> Option<Winner> {
        self.phase.winner
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Room {} | {} | {}",
            self.room_code,
            self.phase,
            self.table.iter().map(|p| p.state().to_string()).join(", ")
        )
    }
}
