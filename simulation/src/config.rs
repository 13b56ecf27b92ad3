use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use types::RoleConfig;

use crate::error::SimulationError;

pub const CONFIG_ENV_VAR: &str = "WEREWOLF_CONFIG";

/// House rules that change how the orchestrator plays a night.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// A little girl caught spying replaces the wolves' chosen victim.
    pub caught_spy_becomes_victim: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            caught_spy_becomes_victim: true,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BotKind {
    #[default]
    Default,
    Random,
}

/// Everything the YAML file may set. Any field left out falls back to the
/// built-in default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationFile {
    pub players: Option<Vec<String>>,
    pub roles: Option<RoleConfig>,
    pub seed: Option<u64>,
    pub delay_ms: Option<u64>,
    pub games: Option<usize>,
    pub bots: Option<BotKind>,
    pub options: Option<GameOptions>,
}

impl SimulationFile {
    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub players: Vec<String>,
    pub roles: RoleConfig,
    pub seed: Option<u64>,
    pub delay_ms: Option<u64>,
    pub games: usize,
    pub bots: BotKind,
    pub options: GameOptions,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let roles = RoleConfig::default();
        Self {
            players: default_player_names(roles.total()),
            roles,
            seed: None,
            delay_ms: None,
            games: 1,
            bots: BotKind::Default,
            options: GameOptions::default(),
        }
    }
}

fn default_player_names(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("Player {n}")).collect()
}

impl SimulationConfig {
    /// Command-line values win, then the YAML file named on the command line
    /// or by `WEREWOLF_CONFIG`, then defaults. With no player names anywhere,
    /// one generated name per role in the pool is used.
    pub fn from_cli_or_env_or_yaml(
        cli: SimulationFile,
        yaml_path: Option<PathBuf>,
    ) -> Result<Self, SimulationError> {
        let yaml_path = if let Some(path) = yaml_path {
            Some(path)
        } else if let Ok(env) = std::env::var(CONFIG_ENV_VAR) {
            Some(PathBuf::from(env))
        } else {
            None
        };
        let yaml = match yaml_path {
            Some(path) => {
                log::info!("Loading simulation config from {}", path.display());
                SimulationFile::load(&path)?
            }
            None => SimulationFile::default(),
        };
        Ok(Self::merge(cli, yaml))
    }

    pub fn merge(cli: SimulationFile, yaml: SimulationFile) -> Self {
        let defaults = Self::default();
        let roles = cli.roles.or(yaml.roles).unwrap_or(defaults.roles);
        let players = cli
            .players
            .filter(|names| !names.is_empty())
            .or(yaml.players)
            .unwrap_or_else(|| default_player_names(roles.total()));
        Self {
            players,
            roles,
            seed: cli.seed.or(yaml.seed),
            delay_ms: cli.delay_ms.or(yaml.delay_ms),
            games: cli.games.or(yaml.games).unwrap_or(defaults.games),
            bots: cli.bots.or(yaml.bots).unwrap_or(defaults.bots),
            options: cli.options.or(yaml.options).unwrap_or(defaults.options),
        }
    }
}

#[cfg(test)]
mod tests {
    use types::Role;

    use super::*;

    #[test]
    fn defaults_seat_one_player_per_role() {
        let config = SimulationConfig::merge(SimulationFile::default(), SimulationFile::default());
        assert_eq!(config.players.len(), config.roles.total());
        assert_eq!(config.players[0], "Player 1");
        assert_eq!(config.games, 1);
        assert!(config.options.caught_spy_becomes_victim);
    }

    #[test]
    fn cli_beats_yaml() {
        let cli = SimulationFile {
            seed: Some(7),
            ..SimulationFile::default()
        };
        let yaml = SimulationFile {
            seed: Some(99),
            games: Some(5),
            ..SimulationFile::default()
        };
        let config = SimulationConfig::merge(cli, yaml);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.games, 5);
    }

    #[test]
    fn generated_names_follow_the_role_pool() {
        let yaml: SimulationFile = serde_yaml::from_str(
            "roles:\n  werewolf: 1\n  villager: 3\nbots: random\noptions:\n  caught_spy_becomes_victim: false\n",
        )
        .unwrap();
        let config = SimulationConfig::merge(SimulationFile::default(), yaml);
        assert_eq!(config.roles.count(Role::Werewolf), 1);
        assert_eq!(config.players.len(), 4);
        assert_eq!(config.bots, BotKind::Random);
        assert!(!config.options.caught_spy_becomes_victim);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimulationFile::load(Path::new("/nonexistent/werewolf.yaml")).unwrap_err();
        assert!(matches!(err, SimulationError::Io(_)));
    }
}
