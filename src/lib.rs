//! Find a way out of a text maze
//!
//! A maze is either read from text with [MazeLoader] or carved at random
//! with `maze_generator::MazeGenerator` (feature `mapgen`). The player is
//! then moved one step at a time with [MazeState::apply_move] until the
//! exit is reached.
//!
//! # Examples
//! ```
//! use text_maze::{Direction, MazeLoader, MoveOutcome};
//!
//! let text = [
//!     "#####",
//!     "#S  #",
//!     "### #",
//!     "#E  #",
//!     "#####",
//! ]
//! .join("\n");
//! let mut maze = MazeLoader::default().load(text.as_bytes()).unwrap();
//!
//! assert_eq!(maze.apply_move(Direction::Up), MoveOutcome::BlockedByWall);
//!
//! let path = [
//!     Direction::Right,
//!     Direction::Right,
//!     Direction::Down,
//!     Direction::Down,
//!     Direction::Left,
//! ];
//! for direction in path {
//!     assert_eq!(maze.apply_move(direction), MoveOutcome::Moved);
//! }
//! assert_eq!(maze.apply_move(Direction::Left), MoveOutcome::ReachedExit);
//! assert_eq!(maze.player_position(), maze.exit_position());
//! ```

use std::collections::VecDeque;
use std::fmt;

use itertools::Itertools;

pub mod game;
pub mod loader;
#[cfg(feature = "mapgen")]
pub mod maze_generator;
pub mod movement;

pub use game::{Command, GameController, SessionEnd};
pub use loader::{LoadError, Marker, MazeLoader};
pub use movement::{Direction, MoveOutcome};

/// Smallest allowed maze height and width
pub const MIN_SIZE: usize = 5;
/// Largest allowed maze height and width
pub const MAX_SIZE: usize = 100;

/// Location in the maze, `x` is the column and `y` the row
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}", self.x, self.y)
    }
}

/// Terrain of a single square
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Tile {
    Wall,
    Path,
}

impl Tile {
    /// Character used for this terrain in text form
    pub const fn symbol(self) -> char {
        match self {
            Tile::Wall => MazeState::S_WALL,
            Tile::Path => MazeState::S_PATH,
        }
    }
}

/// Invalid size bounds for loading or generating
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid size range: minimum {min} is greater than maximum {max}")]
    InvalidRange { min: usize, max: usize },
    #[error(
        "maze size {size} is not supported, expected {lo}..={hi}",
        lo = MIN_SIZE,
        hi = MAX_SIZE
    )]
    UnsupportedSize { size: usize },
}

/// Check that `min..=max` is a usable range of maze sizes.
pub(crate) fn validate_size_range(min: usize, max: usize) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange { min, max });
    }
    match [min, max]
        .into_iter()
        .find(|size| !(MIN_SIZE..=MAX_SIZE).contains(size))
    {
        Some(size) => Err(ConfigError::UnsupportedSize { size }),
        None => Ok(()),
    }
}

/// A maze with the player in it
///
/// The grid only holds terrain. Start, exit and player are kept as
/// positions and stamped onto the grid when it is rendered.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MazeState {
    /// Terrain, `grid[y][x]`
    grid: Vec<Vec<Tile>>,
    /// Where the player started
    start: Point,
    /// Current player position
    player: Point,
    /// Location of the exit
    exit: Point,
}

impl MazeState {
    pub const S_WALL: char = '#';
    pub const S_PATH: char = ' ';
    pub const S_START: char = 'S';
    pub const S_EXIT: char = 'E';
    pub const S_PLAYER: char = 'X';

    /// Create a maze with the player standing on `start`.
    ///
    /// The grid must be non-empty and rectangular, with both positions on
    /// it.
    pub(crate) fn new(grid: Vec<Vec<Tile>>, start: Point, exit: Point) -> Self {
        debug_assert!(!grid.is_empty() && grid.iter().map(Vec::len).all_equal());
        Self {
            grid,
            start,
            player: start,
            exit,
        }
    }

    pub fn height(&self) -> usize {
        self.grid.len()
    }

    pub fn width(&self) -> usize {
        self.grid[0].len()
    }

    pub fn start_position(&self) -> Point {
        self.start
    }

    pub fn player_position(&self) -> Point {
        self.player
    }

    pub fn exit_position(&self) -> Point {
        self.exit
    }

    /// Terrain at `point`, or `None` outside of the grid
    pub fn tile(&self, point: Point) -> Option<Tile> {
        self.grid.get(point.y)?.get(point.x).copied()
    }

    /// Whether a path of non-wall squares leads from the player to the exit
    ///
    /// Breadth-first search over the four cardinal neighbours.
    pub fn is_exit_reachable(&self) -> bool {
        let mut seen = vec![vec![false; self.width()]; self.height()];
        seen[self.player.y][self.player.x] = true;
        let mut queue = VecDeque::from([self.player]);

        while let Some(point) = queue.pop_front() {
            if point == self.exit {
                return true;
            }
            for direction in Direction::ALL {
                if let Some(next) = self.neighbour(point, direction) {
                    if self.grid[next.y][next.x] == Tile::Path && !seen[next.y][next.x] {
                        seen[next.y][next.x] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        false
    }

    /// Grid as characters, with start and exit marked
    fn symbols(&self) -> Vec<Vec<char>> {
        let mut rows: Vec<Vec<char>> = self
            .grid
            .iter()
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect();
        rows[self.start.y][self.start.x] = Self::S_START;
        rows[self.exit.y][self.exit.x] = Self::S_EXIT;
        rows
    }

    /// Current view of the maze, the player is drawn over whatever is below
    pub fn render(&self) -> RenderModel {
        let mut rows = self.symbols();
        rows[self.player.y][self.player.x] = Self::S_PLAYER;
        RenderModel { rows }
    }

    /// Text form of the maze, as accepted by [MazeLoader::load]
    ///
    /// The player is not part of the text; loading it back puts the player
    /// on the start.
    pub fn to_text(&self) -> String {
        self.symbols()
            .iter()
            .map(|row| row.iter().collect::<String>())
            .join("\n")
    }
}

/// What is shown to the player on request
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct RenderModel {
    rows: Vec<Vec<char>>,
}

impl RenderModel {
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn symbol_at(&self, point: Point) -> Option<char> {
        self.rows.get(point.y)?.get(point.x).copied()
    }
}

impl fmt::Display for RenderModel {
    /// One row per line, squares separated by a space
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.rows.iter().map(|row| row.iter().join(" ")).join("\n");
        f.write_str(&text)
    }
}
