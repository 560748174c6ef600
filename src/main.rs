use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use fifteen_solver::{PuzzleState, SearchEngine, SearchOptions, State, Strategy};

/// Solve a sliding-tile puzzle by state-space search
#[derive(Parser, Debug)]
#[command(name = "fifteen-solver", version, about)]
struct Args {
    /// Traversal order
    #[arg(long, value_enum, default_value_t = Strategy::BestFirst)]
    strategy: Strategy,

    /// Board side length for a random puzzle
    #[arg(long, default_value_t = 3)]
    dimension: usize,

    /// Explicit start configuration, row by row, 0 for the blank
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    tiles: Option<Vec<u32>>,

    /// Seed for the random shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many expansions
    #[arg(long, value_name = "N")]
    max_expansions: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn root_state(args: &Args) -> Result<PuzzleState> {
    if let Some(tiles) = &args.tiles {
        return PuzzleState::new(tiles)
            .with_context(|| format!("invalid start configuration {:?}", tiles));
    }

    let state = match args.seed {
        Some(seed) => PuzzleState::shuffled(args.dimension, &mut StdRng::seed_from_u64(seed)),
        None => PuzzleState::random(args.dimension),
    };
    state.with_context(|| format!("cannot shuffle a board of dimension {}", args.dimension))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let root = root_state(&args)?;
    info!(strategy = %args.strategy, dimension = root.dimension(), "starting solver");
    println!("{}\n{}", "Initial configuration:".bold(), root);

    let mut engine = SearchEngine::with_strategy(args.strategy).options(SearchOptions {
        max_expansions: args.max_expansions,
    });
    let path = engine.solve(root);

    if path.is_empty() {
        println!("{}", "No solution found".red().bold());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Found a {} solution with {} moves",
            engine.strategy(),
            path.len() - 1
        )
        .green()
        .bold()
    );

    for state in path.iter().skip(1) {
        let header = match state.last_move() {
            Some(dir) => format!("Step {}: {}", state.distance(), dir),
            None => format!("Step {}", state.distance()),
        };
        println!("{}\n{}", header.cyan(), state);
    }

    Ok(())
}
