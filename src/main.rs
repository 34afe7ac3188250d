use std::sync::Arc;

use clap::{Parser, ValueEnum};
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use salvo::{
    init_logging, Board, GameError, GameId, GamePhase, GameService, Player, PlayerId, Rules,
    ShipClass, InMemoryGameStore, STANDARD_FLEET,
};
use serde_json::json;
use tokio::task::yield_now;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FleetPreset {
    /// Carrier, Battleship, Cruiser, Submarine, Destroyer.
    Standard,
    /// A single one-cell ship.
    Single,
}

#[derive(Parser)]
enum Commands {
    /// Play scripted games between two shooters through the game service.
    Simulate {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        games: u32,
        #[arg(long, default_value_t = 10)]
        board_size: u8,
        #[arg(long, value_enum, default_value_t = FleetPreset::Standard)]
        fleet: FleetPreset,
    },
    /// Print the rule set the other options describe.
    Rules {
        #[arg(long, default_value_t = 10)]
        board_size: u8,
        #[arg(long, value_enum, default_value_t = FleetPreset::Standard)]
        fleet: FleetPreset,
    },
}

fn build_rules(board_size: u8, fleet: FleetPreset) -> anyhow::Result<Rules> {
    let fleet = match fleet {
        FleetPreset::Standard => STANDARD_FLEET.to_vec(),
        FleetPreset::Single => vec![ShipClass::new("Dinghy", 1)],
    };
    Ok(Rules::new(board_size, fleet)?)
}

/// Shoots every cell once in a shuffled order, one shot per round.
async fn run_shooter(
    service: Arc<GameService<InMemoryGameStore>>,
    game: GameId,
    me: PlayerId,
    mut targets: Vec<(usize, usize)>,
) -> anyhow::Result<usize> {
    targets.reverse();
    let mut fired = 0;
    loop {
        let state = service.get_state(&game)?;
        if state.phase != GamePhase::Shoot {
            return Ok(fired);
        }
        if !state.awaiting.contains(&me) {
            yield_now().await;
            continue;
        }
        let Some(&(x, y)) = targets.last() else {
            return Ok(fired);
        };
        match service.shoot(&game, &me, x, y) {
            Ok(outcome) => {
                debug!("{} fired at ({}, {}): {:?}", me, x, y, outcome);
                targets.pop();
                fired += 1;
            }
            Err(GameError::AlreadyShot) => {}
            Err(GameError::InvalidPhase) => return Ok(fired),
            Err(e) => return Err(e.into()),
        }
        yield_now().await;
    }
}

async fn simulate_game(
    service: Arc<GameService<InMemoryGameStore>>,
    rules: &Rules,
    rng: &mut SmallRng,
) -> anyhow::Result<serde_json::Value> {
    let game = service.create_game_with(rules.clone());
    let players = [PlayerId::from("player1"), PlayerId::from("player2")];
    for (i, id) in players.iter().enumerate() {
        service.add_player(&game, Player::new(id.clone(), format!("Shooter {}", i + 1)))?;
    }
    service.start_game(&game)?;

    let size = rules.board_size() as usize;
    let mut shooters = Vec::new();
    for id in &players {
        let fleet = Board::random_fleet(rng, rules)
            .ok_or_else(|| anyhow::anyhow!("could not place the fleet on the board"))?;
        service.place_ships(&game, id, &fleet)?;

        let mut targets: Vec<(usize, usize)> = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .collect();
        targets.shuffle(rng);
        shooters.push(tokio::spawn(run_shooter(
            service.clone(),
            game.clone(),
            id.clone(),
            targets,
        )));
    }

    let mut shots = Vec::new();
    for shooter in shooters {
        shots.push(shooter.await??);
    }

    let state = service.get_state(&game)?;
    info!("game {} ended in phase {}", game, state.phase);
    Ok(json!({
        "game": game.as_str(),
        "phase": state.phase.to_string(),
        "rounds": state.rounds_played,
        "shots": shots,
        "winner": state.winner.as_ref().map(PlayerId::as_str),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            seed,
            games,
            board_size,
            fleet,
        } => {
            let rules = build_rules(board_size, fleet)?;
            let mut rng = if let Some(s) = seed {
                info!("using fixed seed {} (games will be reproducible)", s);
                SmallRng::seed_from_u64(s)
            } else {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            };
            let service = Arc::new(GameService::with_store(
                InMemoryGameStore::new(),
                rules.clone(),
            ));
            for _ in 0..games {
                let summary = simulate_game(service.clone(), &rules, &mut rng).await?;
                println!("{}", serde_json::to_string(&summary)?);
            }
        }
        Commands::Rules { board_size, fleet } => {
            let rules = build_rules(board_size, fleet)?;
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(())
}
