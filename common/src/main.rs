use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;
use minesweeper_logic::{Game, GameConfig, GameState, MoveKind, Reveal};

/// Autonomous Minesweeper bot: plays proven-safe cells first, guesses otherwise.
#[derive(Parser, Debug)]
#[command(name = "minesweeper-bot", version, about, long_about = None)]
struct Args {
    /// Board height
    #[arg(long, default_value_t = 8)]
    height: usize,

    /// Board width
    #[arg(long, default_value_t = 8)]
    width: usize,

    /// Number of mines
    #[arg(long, short = 'm', default_value_t = 8)]
    mines: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 1)]
    games: usize,

    /// Pause between moves, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Only print the final results
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut wins = 0;
    for index in 0..args.games {
        let mut config = GameConfig::new(args.height, args.width, args.mines);
        if let Some(seed) = args.seed {
            config = config.with_seed(seed.wrapping_add(index as u64));
        }

        if play(&config, &args)? == GameState::Won {
            wins += 1;
        }
    }

    if args.games > 1 {
        println!(
            "Won {wins} of {} games ({:.1}%)",
            args.games,
            100.0 * wins as f64 / args.games as f64
        );
    }
    Ok(())
}

fn play(config: &GameConfig, args: &Args) -> Result<GameState> {
    // --- 1. Initialization ---
    let mut game = Game::new(config)?;
    let mut rng = config.rng();
    info!(
        "new {}x{} game with {} mines",
        config.height, config.width, config.mines
    );

    if !args.quiet {
        println!("--- Autonomous Minesweeper Bot ---");
        println!("Strategy: Prioritize logically safe moves, guess randomly otherwise.");
    }

    // --- 2. Game Loop ---
    let mut move_count = 0;
    while game.state == GameState::Playing {
        let Some(turn) = game.play_turn(&mut rng)? else {
            println!("No valid moves left for the bot to make.");
            break;
        };
        move_count += 1;

        if !args.quiet {
            println!("\n--- Move #{move_count} ---");
            match turn.kind {
                MoveKind::Safe => println!("Logic found a guaranteed safe cell."),
                MoveKind::Random => {
                    println!("No logically safe move found. Making a random guess...")
                }
            }
            match turn.reveal {
                Reveal::Clear(count) => println!("Bot reveals {}: {count}", turn.cell),
                Reveal::Mine => println!("Bot reveals {}: mine!", turn.cell),
                Reveal::AlreadyRevealed => {}
            }
            print!("{}", game.render());
        }

        if args.delay_ms > 0 {
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }

    // --- 3. Final Result ---
    if !args.quiet {
        println!("\n--- Game Over ---");
        println!("{}", game.board);
    }
    match game.state {
        GameState::Won => println!("Result: The bot won in {move_count} moves!"),
        GameState::Lost => println!("Result: The bot hit a mine after {move_count} moves."),
        GameState::Playing => println!("Result: The game ended unexpectedly."),
    }

    Ok(game.state)
}
