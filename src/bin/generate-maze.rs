//! CLI for maze generation

use clap::Parser;
use text_maze::{maze_generator::MazeGenerator, MAX_SIZE, MIN_SIZE};

/// Print a random maze in the text form accepted by `play-maze`
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Smallest generated height and width
    #[arg(long, default_value_t = MIN_SIZE)]
    min_size: usize,

    /// Largest generated height and width
    #[arg(long, default_value_t = MAX_SIZE)]
    max_size: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Generate maze, print it
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut gen = MazeGenerator::new(args.seed);
    let maze = gen.generate(args.min_size, args.max_size)?;
    println!("{}", maze.to_text());
    Ok(())
}
