use thiserror::Error;
use types::GameError;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Game still running after {0} rounds")]
    RoundLimit(u32),
}
