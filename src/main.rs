//! CLI for playing a maze

use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use text_maze::{GameController, MazeLoader, MazeState, SessionEnd, MAX_SIZE, MIN_SIZE};

/// Walk from the start `S` to the exit `E` of a text maze
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Smallest allowed maze height and width
    #[arg(long, default_value_t = MIN_SIZE)]
    min_size: usize,

    /// Largest allowed maze height and width
    #[arg(long, default_value_t = MAX_SIZE)]
    max_size: usize,

    /// Random seed for a generated maze
    #[arg(long)]
    seed: Option<u64>,

    /// File, where to read the maze. A random maze is generated if omitted.
    file: Option<PathBuf>,
}

#[cfg(feature = "mapgen")]
fn generate(args: &Args) -> anyhow::Result<MazeState> {
    use text_maze::maze_generator::MazeGenerator;

    MazeGenerator::new(args.seed)
        .generate(args.min_size, args.max_size)
        .context("Failed to generate maze")
}

#[cfg(not(feature = "mapgen"))]
fn generate(_args: &Args) -> anyhow::Result<MazeState> {
    anyhow::bail!("No maze file given, and maze generation is not enabled (feature `mapgen`)")
}

/// Load or generate a maze, then play it on the terminal
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let maze = match &args.file {
        Some(path) => MazeLoader::new(args.min_size, args.max_size)?
            .load_file(path)
            .with_context(|| format!("Failed to load maze from {}", path.display()))?,
        None => generate(&args)?,
    };

    let mut game = GameController::new(maze);
    let end = game.run(io::stdin().lock(), io::stdout().lock())?;
    if end == SessionEnd::InputClosed {
        eprintln!("No more commands, leaving the maze.");
    }
    Ok(())
}
