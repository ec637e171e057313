//! Reading mazes from text
//!
//! The text form has one row per line. Walls are `#`, open squares are
//! spaces, and the start and exit are `S` and `E`, each exactly once.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::{validate_size_range, ConfigError, MazeState, Point, Tile, MAX_SIZE, MIN_SIZE};

/// Special squares that must appear exactly once
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Marker {
    Start,
    Exit,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Start => write!(f, "start (`{}`)", MazeState::S_START),
            Marker::Exit => write!(f, "exit (`{}`)", MazeState::S_EXIT),
        }
    }
}

/// Why a maze could not be loaded
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("cannot read maze: {0}")]
    SourceUnavailable(#[from] io::Error),
    #[error("maze is not rectangular: line {line} has {found} squares, expected {expected}")]
    NotRectangular {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("maze of {width}x{height} squares is outside of the allowed size {min}..={max}")]
    OutOfBounds {
        height: usize,
        width: usize,
        min: usize,
        max: usize,
    },
    #[error("unexpected character {found:?} at {position}")]
    InvalidCharacter { found: char, position: Point },
    #[error("more than one {0} in maze")]
    DuplicateMarker(Marker),
    #[error("no {0} in maze")]
    MissingMarker(Marker),
    #[error("exit cannot be reached from the start")]
    Unreachable,
}

/// Parser for the text form of a maze, with the accepted size range
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct MazeLoader {
    min_size: usize,
    max_size: usize,
}

impl Default for MazeLoader {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE,
            max_size: MAX_SIZE,
        }
    }
}

impl MazeLoader {
    /// Loader accepting heights and widths within `min_size..=max_size`
    pub fn new(min_size: usize, max_size: usize) -> Result<Self, ConfigError> {
        validate_size_range(min_size, max_size)?;
        Ok(Self { min_size, max_size })
    }

    /// Read maze from file at `path`
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<MazeState, LoadError> {
        let file = File::open(path)?;
        self.load(BufReader::new(file))
    }

    /// Parse maze from its text form
    ///
    /// The shape is checked over all lines before any square is looked at,
    /// so a ragged or oversized maze is reported as such even when it also
    /// holds bad characters. Reading stops at the first row past
    /// `max_size`, or the first row longer than `max_size`, so an oversized
    /// source is never read in full.
    ///
    /// # Examples
    /// ```
    /// use text_maze::{LoadError, Marker, MazeLoader, Point};
    ///
    /// let loader = MazeLoader::default();
    /// let maze = loader.load("#####\n#S E#\n#   #\n#   #\n#####\n".as_bytes()).unwrap();
    /// assert_eq!(maze.player_position(), Point::new(1, 1));
    /// assert_eq!(maze.exit_position(), Point::new(3, 1));
    ///
    /// let err = loader.load("#####\n#S  #\n#   #\n#   #\n#####".as_bytes()).unwrap_err();
    /// assert!(matches!(err, LoadError::MissingMarker(Marker::Exit)));
    /// ```
    pub fn load(&self, source: impl BufRead) -> Result<MazeState, LoadError> {
        let lines = self.read_lines(source)?;
        self.check_shape(&lines)?;
        Self::parse_squares(&lines)
    }

    /// Read at most `max_size` rows of at most `max_size` characters each
    ///
    /// Line endings (`\n` or `\r\n`) are stripped.
    fn read_lines(&self, mut source: impl BufRead) -> Result<Vec<String>, LoadError> {
        // Widest accepted row in bytes, with `\r\n`
        let line_limit = (self.max_size * 4 + 2) as u64;
        let out_of_bounds = |height: usize, width: usize| LoadError::OutOfBounds {
            height,
            width,
            min: self.min_size,
            max: self.max_size,
        };

        let mut lines: Vec<String> = Vec::new();
        loop {
            let mut buf = Vec::new();
            let read = source.by_ref().take(line_limit).read_until(b'\n', &mut buf)?;
            if read == 0 {
                return Ok(lines);
            }
            if lines.len() == self.max_size {
                let width = lines[0].chars().count();
                return Err(out_of_bounds(self.max_size + 1, width));
            }

            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            } else if read as u64 == line_limit {
                // Cut off mid-row, possibly inside a character
                let width = String::from_utf8_lossy(&buf).chars().count();
                return Err(out_of_bounds(lines.len() + 1, width));
            }

            let line = String::from_utf8(buf)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            let width = line.chars().count();
            if width > self.max_size {
                return Err(out_of_bounds(lines.len() + 1, width));
            }
            lines.push(line);
        }
    }

    /// First pass: rectangular and within the size range
    fn check_shape(&self, lines: &[String]) -> Result<(), LoadError> {
        let width = lines.first().map_or(0, |line| line.chars().count());
        for (idx, line) in lines.iter().enumerate().skip(1) {
            let found = line.chars().count();
            if found != width {
                return Err(LoadError::NotRectangular {
                    line: idx + 1,
                    expected: width,
                    found,
                });
            }
        }

        let height = lines.len();
        let allowed = self.min_size..=self.max_size;
        if !allowed.contains(&height) || !allowed.contains(&width) {
            return Err(LoadError::OutOfBounds {
                height,
                width,
                min: self.min_size,
                max: self.max_size,
            });
        }
        Ok(())
    }

    /// Second pass: terrain and markers
    fn parse_squares(lines: &[String]) -> Result<MazeState, LoadError> {
        let mut start = None;
        let mut exit = None;

        let mut grid = Vec::with_capacity(lines.len());
        for (y, line) in lines.iter().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (x, c) in line.chars().enumerate() {
                let position = Point::new(x, y);
                let tile = match c {
                    MazeState::S_WALL => Tile::Wall,
                    MazeState::S_PATH => Tile::Path,
                    MazeState::S_START => {
                        Self::place_marker(&mut start, position, Marker::Start)?;
                        Tile::Path
                    }
                    MazeState::S_EXIT => {
                        Self::place_marker(&mut exit, position, Marker::Exit)?;
                        Tile::Path
                    }
                    found => return Err(LoadError::InvalidCharacter { found, position }),
                };
                row.push(tile);
            }
            grid.push(row);
        }

        let start = start.ok_or(LoadError::MissingMarker(Marker::Start))?;
        let exit = exit.ok_or(LoadError::MissingMarker(Marker::Exit))?;

        let maze = MazeState::new(grid, start, exit);
        if !maze.is_exit_reachable() {
            return Err(LoadError::Unreachable);
        }
        Ok(maze)
    }

    fn place_marker(
        slot: &mut Option<Point>,
        position: Point,
        kind: Marker,
    ) -> Result<(), LoadError> {
        match slot.replace(position) {
            Some(_) => Err(LoadError::DuplicateMarker(kind)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, BufReader, Read};

    use crate::{ConfigError, LoadError, Marker, MazeLoader, MazeState, Point, Tile};

    fn load(rows: &[&str]) -> Result<MazeState, LoadError> {
        MazeLoader::default().load(rows.join("\n").as_bytes())
    }

    #[test]
    fn parse_maze_input() {
        let maze = load(&["#####", "#S E#", "#   #", "#   #", "#####"]).unwrap();

        assert_eq!(maze.height(), 5);
        assert_eq!(maze.width(), 5);
        assert_eq!(maze.start_position(), Point::new(1, 1));
        assert_eq!(maze.player_position(), Point::new(1, 1));
        assert_eq!(maze.exit_position(), Point::new(3, 1));
        // Markers are open squares underneath
        assert_eq!(maze.tile(Point::new(1, 1)), Some(Tile::Path));
        assert_eq!(maze.tile(Point::new(3, 1)), Some(Tile::Path));
        assert_eq!(maze.tile(Point::new(0, 0)), Some(Tile::Wall));
    }

    #[test]
    fn too_few_lines() {
        let err = load(&["#####", "#S E#", "#####"]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::OutOfBounds {
                height: 3,
                width: 5,
                ..
            }
        ));
    }

    #[test]
    fn empty_source() {
        let err = MazeLoader::default().load("".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::OutOfBounds {
                height: 0,
                width: 0,
                ..
            }
        ));
    }

    #[test]
    fn ragged_rows() {
        let err = load(&["#####", "#S E#", "#    #"]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NotRectangular {
                line: 3,
                expected: 5,
                found: 6
            }
        ));
    }

    #[test]
    fn shape_is_checked_before_content() {
        let err = load(&["#####", "#S@E#", "####"]).unwrap_err();
        assert!(matches!(err, LoadError::NotRectangular { line: 3, .. }));
    }

    #[test]
    fn invalid_character() {
        let err = load(&["#####", "#S@ #", "#   #", "#  E#", "#####"]).unwrap_err();
        match err {
            LoadError::InvalidCharacter { found, position } => {
                assert_eq!(found, '@');
                assert_eq!(position, Point::new(2, 1));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn duplicate_start() {
        let err = load(&["#####", "#SS #", "#   #", "#  E#", "#####"]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateMarker(Marker::Start)));
    }

    #[test]
    fn duplicate_exit() {
        let err = load(&["#####", "#S  #", "#   #", "# EE#", "#####"]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateMarker(Marker::Exit)));
    }

    #[test]
    fn missing_markers() {
        let err = load(&["#####", "#S  #", "#   #", "#   #", "#####"]).unwrap_err();
        assert!(matches!(err, LoadError::MissingMarker(Marker::Exit)));

        let err = load(&["#####", "#   #", "#   #", "#  E#", "#####"]).unwrap_err();
        assert!(matches!(err, LoadError::MissingMarker(Marker::Start)));
    }

    #[test]
    fn walled_off_exit() {
        let err = load(&["#####", "#S  #", "#####", "#  E#", "#####"]).unwrap_err();
        assert!(matches!(err, LoadError::Unreachable));
    }

    #[test]
    fn windows_line_endings() {
        let text = "#####\r\n#S E#\r\n#   #\r\n#   #\r\n#####\r\n";
        let maze = MazeLoader::default().load(text.as_bytes()).unwrap();
        assert_eq!(maze.width(), 5);
        assert_eq!(maze.exit_position(), Point::new(3, 1));
    }

    #[test]
    fn invalid_utf8() {
        let bytes: &[u8] = b"#####\n#S\xffE#\n#   #\n#   #\n#####";
        let err = MazeLoader::default().load(bytes).unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable(_)));
    }

    #[test]
    fn missing_file() {
        let err = MazeLoader::default()
            .load_file("this/maze/does/not/exist.txt")
            .unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable(_)));
    }

    /// Endless `#####` rows, counting the bytes handed out
    struct EndlessRows {
        row: &'static [u8],
        consumed: usize,
    }

    impl Read for EndlessRows {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            for byte in buf.iter_mut() {
                *byte = self.row[self.consumed % self.row.len()];
                self.consumed += 1;
            }
            Ok(buf.len())
        }
    }

    #[test]
    fn endless_rows_stop_at_max_size() {
        let mut rows = EndlessRows {
            row: b"#####\n",
            consumed: 0,
        };
        let err = MazeLoader::default()
            .load(BufReader::with_capacity(64, &mut rows))
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::OutOfBounds {
                height: 101,
                width: 5,
                ..
            }
        ));
        assert!(rows.consumed < 1024, "consumed {} bytes", rows.consumed);
    }

    #[test]
    fn endless_row_stops_at_max_size() {
        let mut rows = EndlessRows {
            row: b"#",
            consumed: 0,
        };
        let err = MazeLoader::default()
            .load(BufReader::with_capacity(64, &mut rows))
            .unwrap_err();

        assert!(matches!(err, LoadError::OutOfBounds { height: 1, .. }));
        assert!(rows.consumed < 1024, "consumed {} bytes", rows.consumed);
    }

    #[test]
    fn long_row() {
        let long = "#".repeat(101);
        let rows = ["#####", long.as_str(), "#####", "#####", "#####"];
        let err = load(&rows).unwrap_err();
        assert!(matches!(
            err,
            LoadError::OutOfBounds {
                height: 2,
                width: 101,
                ..
            }
        ));

        // Exactly at the limit is still read
        let row = format!("#S{}E#", " ".repeat(96));
        let wall = "#".repeat(100);
        let rows = [wall.as_str(), row.as_str(), wall.as_str(), wall.as_str(), wall.as_str()];
        let maze = load(&rows).unwrap();
        assert_eq!(maze.width(), 100);
        assert_eq!(maze.exit_position(), Point::new(98, 1));
    }

    #[test]
    fn custom_size_range() {
        let loader = MazeLoader::new(5, 6).unwrap();
        let rows = ["#######", "#S   E#", "#######", "#######", "#######"];
        let err = loader.load(rows.join("\n").as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::OutOfBounds {
                width: 7,
                max: 6,
                ..
            }
        ));

        assert_eq!(
            MazeLoader::new(8, 6),
            Err(ConfigError::InvalidRange { min: 8, max: 6 })
        );
    }
}
