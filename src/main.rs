//! Quoridor-Rust: a Monte Carlo tree search Quoridor agent.
//!
//! ## Usage
//!
//! - `quoridor-rust` - Decide one move from the initial position
//! - `quoridor-rust demo` - Same, explicitly
//! - `quoridor-rust self-play` - Play a full game between two engine
//!   instances and print the moves

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use quoridor_rust::agent::Agent;
use quoridor_rust::board::{Board, Percept};
use quoridor_rust::constants::MAX_ITERATIONS;

/// Quoridor-Rust: a Monte Carlo tree search Quoridor agent
#[derive(Parser)]
#[command(name = "quoridor-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide a single move from the initial position
    Demo {
        /// RNG seed; omit for a nondeterministic run
        #[arg(long)]
        seed: Option<u64>,
        /// MCTS iterations per decision
        #[arg(long, default_value_t = MAX_ITERATIONS)]
        iterations: usize,
    },
    /// Play a full game between two engine instances
    SelfPlay {
        /// RNG seed; omit for a nondeterministic run
        #[arg(long)]
        seed: Option<u64>,
        /// MCTS iterations per decision
        #[arg(long, default_value_t = 100)]
        iterations: usize,
        /// Time credit per player in seconds
        #[arg(long, default_value_t = 300.0)]
        time_credit: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::SelfPlay {
            seed,
            iterations,
            time_credit,
        }) => self_play(seed.unwrap_or_else(|| fastrand::u64(..)), iterations, time_credit),
        Some(Commands::Demo { seed, iterations }) => {
            demo(seed.unwrap_or_else(|| fastrand::u64(..)), iterations)
        }
        None => demo(fastrand::u64(..), MAX_ITERATIONS),
    }
}

fn demo(seed: u64, iterations: usize) -> Result<()> {
    println!("Quoridor-Rust: MCTS Quoridor agent (seed {seed})\n");

    let board = Board::new();
    println!("{board}");

    let mut agent = Agent::with_limits(seed, iterations);
    let action = agent.decide(&Percept::from(&board), 0, 1, Some(300.0));
    println!("Player 0 plays: {action}");

    let mut next = board;
    next.play_action(action, 0)?;
    println!("{next}");
    Ok(())
}

fn self_play(seed: u64, iterations: usize, time_credit: f64) -> Result<()> {
    println!("Quoridor-Rust self-play (seed {seed})\n");

    let mut agents = [
        Agent::with_limits(seed, iterations),
        Agent::with_limits(seed.wrapping_add(1), iterations),
    ];
    let mut credits = [time_credit, time_credit];
    let mut board = Board::new();

    // A game between two path-seeking agents cannot realistically exceed
    // this; the cap only guards against a pathological stall.
    for step in 1..=200 {
        let player = (step - 1) % 2;
        let started = std::time::Instant::now();
        let action = agents[player].decide(
            &Percept::from(&board),
            player,
            step,
            Some(credits[player]),
        );
        credits[player] -= started.elapsed().as_secs_f64();

        board.play_action(action, player)?;
        println!("step {step:>3}  player {player}  {action}");

        if board.is_finished() {
            println!("\n{board}");
            let winner = usize::from(board.pawns[0].0 != board.goals[0]);
            println!(
                "player {winner} wins after {step} plies ({:.1}s / {:.1}s credit left)",
                credits[0], credits[1]
            );
            return Ok(());
        }
    }

    bail!("game did not finish within 200 plies");
}
