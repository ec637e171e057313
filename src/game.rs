//! Interactive command loop

use std::io::{self, BufRead, Write};

use crate::{Direction, MazeState, MoveOutcome};

/// Player command, one character each
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Command {
    /// `W`, `A`, `S` or `D`
    Move(Direction),
    /// `M`
    ShowMap,
    /// `Q`
    Quit,
}

impl Command {
    /// Map a command character, case does not matter
    pub fn parse(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Command::Move(Direction::Up)),
            'A' => Some(Command::Move(Direction::Left)),
            'S' => Some(Command::Move(Direction::Down)),
            'D' => Some(Command::Move(Direction::Right)),
            'M' => Some(Command::ShowMap),
            'Q' => Some(Command::Quit),
            _ => None,
        }
    }
}

/// How the game ended
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SessionEnd {
    /// Player asked to quit
    Quit,
    /// Player reached the exit
    Victory,
    /// No more commands to read
    InputClosed,
}

/// A single game session over one maze
pub struct GameController {
    maze: MazeState,
    /// Number of successful moves
    steps: usize,
}

impl GameController {
    pub const PROMPT: &'static str = "Command (WASD/M/Q): ";

    pub fn new(maze: MazeState) -> Self {
        Self { maze, steps: 0 }
    }

    pub fn maze(&self) -> &MazeState {
        &self.maze
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Read commands from `input` until the game ends
    ///
    /// The first non-blank character of a line is the command, the rest of
    /// the line is ignored. Blank lines are skipped without a new prompt.
    pub fn run(
        &mut self,
        input: impl BufRead,
        mut output: impl Write,
    ) -> io::Result<SessionEnd> {
        let mut lines = input.lines();
        loop {
            write!(output, "{}", Self::PROMPT)?;
            output.flush()?;

            let symbol = loop {
                match lines.next() {
                    Some(line) => {
                        if let Some(c) = line?.trim_start().chars().next() {
                            break c;
                        }
                    }
                    None => {
                        writeln!(output)?;
                        return Ok(SessionEnd::InputClosed);
                    }
                }
            };

            let Some(command) = Command::parse(symbol) else {
                writeln!(output, "Invalid action.")?;
                continue;
            };
            if let Some(end) = self.handle(command, &mut output)? {
                return Ok(end);
            }
        }
    }

    /// Apply one command, returns how the game ended if it did
    pub fn handle(
        &mut self,
        command: Command,
        output: &mut impl Write,
    ) -> io::Result<Option<SessionEnd>> {
        match command {
            Command::Quit => {
                writeln!(output, "Game quit.")?;
                Ok(Some(SessionEnd::Quit))
            }
            Command::ShowMap => {
                writeln!(output, "{}", self.maze.render())?;
                Ok(None)
            }
            Command::Move(direction) => match self.maze.apply_move(direction) {
                MoveOutcome::Moved => {
                    self.steps += 1;
                    Ok(None)
                }
                MoveOutcome::ReachedExit => {
                    self.steps += 1;
                    writeln!(output, "\n!!! VICTORY !!! You found the exit!")?;
                    writeln!(output, "You took {} steps.", self.steps)?;
                    Ok(Some(SessionEnd::Victory))
                }
                MoveOutcome::BlockedByBoundary => {
                    writeln!(output, "Cannot move off the edge!")?;
                    Ok(None)
                }
                MoveOutcome::BlockedByWall => {
                    writeln!(output, "Blocked by wall!")?;
                    Ok(None)
                }
            },
        }
    }
}
