use std::{collections::HashSet, path::PathBuf};

use clap::Parser;
use engine::{unique_room_code, ROOM_CODE_ATTEMPTS};
use itertools::Itertools;
use rand::{rngs::StdRng, SeedableRng};
use simulation::{
    run_game, BotKind, GameState, SimulationConfig, SimulationError, SimulationFile,
};
use strategies::{DefaultStrategy, InputStrategy, RandomStrategy};
use types::Strategy;
use uuid::Uuid;

#[derive(Parser, Debug)]
struct Params {
    #[arg(short, long)]
    player: Vec<String>,

    /// YAML file with players, role counts and options
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long)]
    games: Option<usize>,

    #[arg(long)]
    delay_ms: Option<u64>,

    #[arg(long, value_enum)]
    bots: Option<BotKind>,

    /// Play the first seat from the terminal
    #[arg(short, long)]
    interactive: bool,

    /// Print each game's event log as JSON
    #[arg(long)]
    json: bool,
}

fn make_player_inputs(
    config: &SimulationConfig,
    game_seed: Option<u64>,
    interactive: bool,
) -> Vec<(Uuid, String, Box<dyn Strategy>)> {
    config
        .players
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let strategy: Box<dyn Strategy> = match (interactive && idx == 0, config.bots) {
                (true, _) => Box::new(InputStrategy::default()),
                (false, BotKind::Default) => Box::new(DefaultStrategy::default()),
                (false, BotKind::Random) => match game_seed {
                    Some(seed) => Box::new(RandomStrategy::seeded(seed + idx as u64 + 1)),
                    None => Box::new(RandomStrategy::default()),
                },
            };
            (Uuid::new_v4(), name.clone(), strategy)
        })
        .collect()
}

fn main() -> Result<(), SimulationError> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let cli = SimulationFile {
        players: Some(args.player.clone()),
        seed: args.seed,
        games: args.games,
        delay_ms: args.delay_ms,
        bots: args.bots,
        ..SimulationFile::default()
    };
    let config = SimulationConfig::from_cli_or_env_or_yaml(cli, args.config.clone())?;
    log::info!("config: {config:?}");

    let mut code_rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut used_codes: HashSet<String> = HashSet::new();
    let mut wins = Vec::new();
    for game_idx in 0..config.games {
        let game_seed = config.seed.map(|seed| seed.wrapping_add(game_idx as u64 * 1000));
        let room_code = unique_room_code(
            &mut code_rng,
            |code| used_codes.contains(code),
            ROOM_CODE_ATTEMPTS,
        )?;
        used_codes.insert(room_code.clone());

        let player_inputs = make_player_inputs(&config, game_seed, args.interactive);
        let mut game_state = GameState::new(
            player_inputs,
            config.roles.clone(),
            config.options,
            game_seed,
        )
        .with_room_code(room_code);
        let winner = run_game(&mut game_state, config.delay_ms)?;
        println!("Game {} (room {}): {winner} won", game_idx + 1, game_state.room_code);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&game_state.history)?);
        }
        wins.push(winner);
    }

    if config.games > 1 {
        for (winner, count) in wins.iter().counts() {
            println!("{winner}: {count} wins");
        }
    }
    Ok(())
}
