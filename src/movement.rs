//! Player movement

use crate::{MazeState, Point, Tile};

/// Direction of a single step
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset `(dx, dy)`, `y` grows downwards
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Result of a single move
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MoveOutcome {
    /// Player stepped onto an open square
    Moved,
    /// Step would leave the grid, player stays put
    BlockedByBoundary,
    /// Step would enter a wall, player stays put
    BlockedByWall,
    /// Player stepped onto the exit, the game is over
    ReachedExit,
}

impl MazeState {
    /// Square next to `from` in `direction`, if it is on the grid
    pub(crate) fn neighbour(&self, from: Point, direction: Direction) -> Option<Point> {
        let (dx, dy) = direction.offset();
        let x = from.x.checked_add_signed(dx)?;
        let y = from.y.checked_add_signed(dy)?;
        (x < self.width() && y < self.height()).then_some(Point { x, y })
    }

    /// Move the player one step
    ///
    /// The player position only changes when the outcome is
    /// [MoveOutcome::Moved] or [MoveOutcome::ReachedExit]. Moving on after
    /// the exit has been reached is up to the caller.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        let Some(target) = self.neighbour(self.player, direction) else {
            return MoveOutcome::BlockedByBoundary;
        };
        if self.grid[target.y][target.x] == Tile::Wall {
            return MoveOutcome::BlockedByWall;
        }

        self.player = target;
        if target == self.exit {
            MoveOutcome::ReachedExit
        } else {
            MoveOutcome::Moved
        }
    }
}
