//! Map generation

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{validate_size_range, ConfigError, MazeState, Point, Tile};

/// Maze generator for random maps.
///
/// All randomness comes from the owned random source, so two generators
/// seeded alike produce the same sequence of mazes.
pub struct MazeGenerator<R = StdRng> {
    random: R,
}

impl MazeGenerator<StdRng> {
    /// Generator seeded with `seed`, or from system entropy
    pub fn new(seed: Option<u64>) -> Self {
        Self::from_rng(if let Some(state) = seed {
            StdRng::seed_from_u64(state)
        } else {
            StdRng::from_entropy()
        })
    }
}

impl<R: Rng> MazeGenerator<R> {
    const DIRECTIONS: [(isize, isize); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];
    /// Random picks of the exit before falling back to the far corner
    const EXIT_ATTEMPTS: usize = 100;

    pub fn from_rng(random: R) -> Self {
        Self { random }
    }

    /// Generate a maze with height and width in `min_size..=max_size`
    ///
    /// The player starts at (1, 1). Corridors are carved with a randomized
    /// depth-first search, the exit is put on a random carved square and
    /// finally a straight path is dug from start to exit in case the two
    /// are not connected yet. When 100 picks of the exit all land on the
    /// start, the exit goes to `(width - 2, height - 2)`.
    ///
    /// Carving never touches the outermost ring of squares, so every maze
    /// has a closed wall border. With an even width or height this leaves a
    /// second wall next to the right or bottom border.
    pub fn generate(
        &mut self,
        min_size: usize,
        max_size: usize,
    ) -> Result<MazeState, ConfigError> {
        validate_size_range(min_size, max_size)?;

        let height = self.random.gen_range(min_size..=max_size);
        let width = self.random.gen_range(min_size..=max_size);
        let mut grid: Vec<Vec<Tile>> = (0..height)
            .map(|_| (0..width).map(|_| Tile::Wall).collect())
            .collect();

        let start = Point::new(1, 1);
        grid[start.y][start.x] = Tile::Path;

        let carved = self.build_maze(&mut grid, start);
        let exit = self.place_exit(&carved, start, width, height);
        Self::dig_path(&mut grid, start, exit);

        // Start and exit are always open squares
        grid[start.y][start.x] = Tile::Path;
        grid[exit.y][exit.x] = Tile::Path;

        Ok(MazeState::new(grid, start, exit))
    }

    /// Carve corridors from `start` with an explicit stack
    ///
    /// Cells two squares apart are connected by removing the wall between
    /// them, so corridors stay one square wide. The outermost ring of
    /// squares is never carved.
    ///
    /// Returns the visited cells in the order they were reached.
    fn build_maze(&mut self, grid: &mut [Vec<Tile>], start: Point) -> Vec<Point> {
        let height = grid.len();
        let width = grid[0].len();
        let mut visited = vec![vec![false; width]; height];
        visited[start.y][start.x] = true;

        let mut cells = vec![start];
        let mut stack = vec![start];
        while let Some(cell) = stack.pop() {
            let mut directions = Self::DIRECTIONS.to_vec();
            directions.shuffle(&mut self.random);

            for (dx, dy) in directions {
                let (Some(nx), Some(ny)) = (
                    cell.x.checked_add_signed(dx),
                    cell.y.checked_add_signed(dy),
                ) else {
                    continue;
                };
                if nx == 0 || ny == 0 || nx >= width - 1 || ny >= height - 1 || visited[ny][nx] {
                    continue;
                }

                // Remove wall between current cell and neighbour
                grid[(cell.y + ny) / 2][(cell.x + nx) / 2] = Tile::Path;
                grid[ny][nx] = Tile::Path;
                visited[ny][nx] = true;

                let next = Point::new(nx, ny);
                cells.push(next);
                stack.push(next);
            }
        }
        cells
    }

    fn place_exit(
        &mut self,
        carved: &[Point],
        start: Point,
        width: usize,
        height: usize,
    ) -> Point {
        for _ in 0..Self::EXIT_ATTEMPTS {
            match carved.choose(&mut self.random) {
                Some(&cell) if cell != start => return cell,
                _ => (),
            }
        }
        Point::new(width - 2, height - 2)
    }

    /// Open every square on a straight walk from `from` to `to`
    ///
    /// Walks horizontally first, then vertically.
    fn dig_path(grid: &mut [Vec<Tile>], from: Point, to: Point) {
        let mut cursor = from;
        while cursor != to {
            if cursor.x != to.x {
                cursor.x = if cursor.x < to.x { cursor.x + 1 } else { cursor.x - 1 };
            } else {
                cursor.y = if cursor.y < to.y { cursor.y + 1 } else { cursor.y - 1 };
            }
            grid[cursor.y][cursor.x] = Tile::Path;
        }
    }
}
