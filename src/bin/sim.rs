use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use catan_engine::MapType;
use catan_engine::game::{Game, GameConfig};
use catan_engine::players::{BasePlayer, BasicPlayer, RandomPlayer, run_bots};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser, Clone)]
#[command(name = "catan-sim")]
#[command(about = "Play bot-only games and report who wins")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes, one per seat (e.g. B,B,R,R).
    /// Codes: B=Basic, R=Random
    #[arg(long, default_value = "B,B,B,B")]
    players: String,

    /// Random seed for reproducibility; game i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Map type: BEGINNER or RANDOM
    #[arg(long, default_value = "BEGINNER")]
    map: MapType,

    /// Victory points needed to win
    #[arg(long, default_value_t = 10)]
    vps_to_win: u32,

    /// Stop a game after this many actions
    #[arg(long, default_value_t = 5000)]
    max_actions: usize,

    /// Silence per-game output and engine logs below warn
    #[arg(long)]
    quiet: bool,

    /// Save the last game played to this path
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
enum Code {
    Basic,
    Random,
}

impl Code {
    fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "B" => Some(Code::Basic),
            "R" => Some(Code::Random),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Code::Basic => "Basic",
            Code::Random => "Random",
        }
    }

    fn player(self) -> Box<dyn BasePlayer> {
        match self {
            Code::Basic => Box::new(BasicPlayer),
            Code::Random => Box::new(RandomPlayer),
        }
    }
}

#[derive(Debug, Default)]
struct Summary {
    games: u32,
    unfinished: u32,
    wins: Vec<u32>,
    points: Vec<u32>,
    total_rounds: i64,
    total_actions: usize,
    total_duration: Duration,
}

/// Log filter used when `RUST_LOG` is unset.
fn default_filter(quiet: bool) -> &'static str {
    if quiet { "catan_engine=warn" } else { "catan_engine=info" }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(args.quiet).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut codes = Vec::new();
    for key in args.players.split(',') {
        match Code::parse(key) {
            Some(code) => codes.push(code),
            None => {
                eprintln!("Error: unknown player code '{key}'. Use B or R");
                return ExitCode::FAILURE;
            }
        }
    }
    if !(2..=4).contains(&codes.len()) {
        eprintln!("Error: must specify 2-4 players");
        return ExitCode::FAILURE;
    }
    let players: Vec<Box<dyn BasePlayer>> = codes.iter().map(|code| code.player()).collect();

    let mut summary = Summary {
        wins: vec![0; codes.len()],
        points: vec![0; codes.len()],
        ..Summary::default()
    };
    let mut last_game = None;

    for game_idx in 0..args.num {
        let config = GameConfig {
            num_players: codes.len(),
            map_type: args.map,
            vps_to_win: args.vps_to_win,
            seed: args.seed + u64::from(game_idx),
        };
        let mut bot_rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));

        let start = Instant::now();
        let mut game = match Game::new(config) {
            Ok(game) => game,
            Err(err) => {
                eprintln!("Error: {err}");
                return ExitCode::FAILURE;
            }
        };
        let performed = match run_bots(&mut game, &players, &mut bot_rng, args.max_actions) {
            Ok(performed) => performed,
            Err(err) => {
                eprintln!("Error: game {} stopped: {err}", game_idx + 1);
                return ExitCode::FAILURE;
            }
        };
        let duration = start.elapsed();

        let state = game.latest();
        summary.games += 1;
        summary.total_rounds += i64::from(state.round.max(0));
        summary.total_actions += performed;
        summary.total_duration += duration;
        for (seat, points) in summary.points.iter_mut().enumerate() {
            *points += state.compute_points(seat);
        }
        match state.winner {
            Some(seat) => summary.wins[seat] += 1,
            None => summary.unfinished += 1,
        }

        if !args.quiet {
            let winner = state
                .winner
                .map(|seat| format!("{} ({seat})", codes[seat].name()))
                .unwrap_or_else(|| "None".to_string());
            println!(
                "Game {:>4}: Winner={:>12}, Rounds={:>4}, Actions={:>5}, Duration={:?}",
                game_idx + 1,
                winner,
                state.round,
                performed,
                duration
            );
        }
        last_game = Some(game);
    }

    if let (Some(path), Some(game)) = (&args.save, &last_game) {
        if let Err(err) = game.save(path) {
            eprintln!("Error: could not save to {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    }

    if !args.quiet {
        print_summary(&summary, &codes);
    }
    ExitCode::SUCCESS
}

fn print_summary(summary: &Summary, codes: &[Code]) {
    println!("\n{}", "=".repeat(60));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(60));

    println!("\nPlayer Summary:");
    println!("{:<15} {:<10} {:<12} {:<12}", "Player", "Wins", "Win Rate", "Avg VP");
    println!("{}", "-".repeat(50));

    let games = f64::from(summary.games.max(1));
    for (seat, code) in codes.iter().enumerate() {
        let wins = summary.wins[seat];
        println!(
            "{:<15} {:<10} {:<11.1}% {:<12.2}",
            format!("{} ({seat})", code.name()),
            wins,
            f64::from(wins) / games * 100.0,
            f64::from(summary.points[seat]) / games
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", summary.games);
    println!("  Unfinished: {}", summary.unfinished);
    println!("  Avg Rounds: {:.2}", summary.total_rounds as f64 / games);
    println!("  Avg Actions: {:.2}", summary.total_actions as f64 / games);
    println!(
        "  Avg Duration: {:.2?}",
        summary.total_duration / summary.games.max(1)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_raises_log_filter() {
        let args = Args::try_parse_from(["catan-sim", "--quiet"]).unwrap();
        assert!(args.quiet);
        assert_eq!(default_filter(args.quiet), "catan_engine=warn");

        let args = Args::try_parse_from(["catan-sim", "-n", "2"]).unwrap();
        assert_eq!(default_filter(args.quiet), "catan_engine=info");
    }

    #[test]
    fn player_codes_ignore_case() {
        assert!(matches!(Code::parse(" b"), Some(Code::Basic)));
        assert!(matches!(Code::parse("r"), Some(Code::Random)));
        assert!(Code::parse("X").is_none());
    }
}
