//! One floor of the maze.
//!
//! A level is a rectangular grid of tiles parsed once from text rows and
//! mutated in place for the rest of the run. The parser is strict: every
//! row must match the declared width, the glyph set is closed, and each
//! level carries exactly one start tile and exactly one of ladder or
//! instructor. Anything else is a structured error naming the level and,
//! where known, the offending row and column (reported 1-indexed).
//!
//! ## Tile legend:
//!   ' ' = open space    '#' = wall
//!   '@' = start         '^' = ladder    '%' = instructor

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::domain::position::Position;
use crate::domain::tile::{OpenSpace, Tile};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("maze level {}: missing row {} (stream ended early)", .level + 1, .row + 1)]
    MissingRow { level: usize, row: usize },

    #[error(
        "row {} of maze level {}: row width {} does not match the declared width {}",
        .row + 1, .level + 1, .found, .width
    )]
    RowWidth { level: usize, row: usize, found: usize, width: usize },

    #[error(
        "row {}, column {} of maze level {}: unknown character {:?}",
        .row + 1, .col + 1, .level + 1, .glyph
    )]
    UnknownGlyph { level: usize, row: usize, col: usize, glyph: char },

    #[error("row {}, column {} of maze level {}: second start tile", .row + 1, .col + 1, .level + 1)]
    DuplicateStart { level: usize, row: usize, col: usize },

    #[error("row {}, column {} of maze level {}: second ladder", .row + 1, .col + 1, .level + 1)]
    DuplicateLadder { level: usize, row: usize, col: usize },

    #[error("row {}, column {} of maze level {}: second instructor", .row + 1, .col + 1, .level + 1)]
    DuplicateInstructor { level: usize, row: usize, col: usize },

    #[error("maze level {}: no start tile", .level + 1)]
    MissingStart { level: usize },

    #[error("maze level {}: no ladder or instructor", .level + 1)]
    MissingExit { level: usize },

    #[error("maze level {}: found both a ladder and an instructor", .level + 1)]
    LadderAndInstructor { level: usize },
}

#[derive(Debug)]
pub struct Level {
    grid: Vec<Vec<Tile>>,
    height: usize,
    width: usize,
    start: Position,
    instructor: Option<Position>,
}

impl Level {
    /// Parses one level from its text rows. `rows` may be shorter than
    /// `height` when the input ran dry; that is a `MissingRow` error.
    /// A failed parse constructs nothing.
    pub fn parse(
        rows: &[&str],
        index: usize,
        height: usize,
        width: usize,
    ) -> Result<Level, ParseError> {
        let mut grid: Vec<Vec<Tile>> = Vec::with_capacity(height);
        let mut start: Option<Position> = None;
        let mut ladder: Option<Position> = None;
        let mut instructor: Option<Position> = None;

        for row in 0..height {
            let text = *rows
                .get(row)
                .ok_or(ParseError::MissingRow { level: index, row })?;
            let glyphs: Vec<char> = text.chars().collect();
            if glyphs.len() != width {
                return Err(ParseError::RowWidth {
                    level: index,
                    row,
                    found: glyphs.len(),
                    width,
                });
            }

            let mut tiles: Vec<Tile> = Vec::with_capacity(width);
            for (col, glyph) in glyphs.into_iter().enumerate() {
                let pos = Position::new(index, row, col);
                let tile = match glyph {
                    ' ' => Tile::open(),
                    '#' => Tile::Wall,
                    '@' => {
                        if start.is_some() {
                            return Err(ParseError::DuplicateStart { level: index, row, col });
                        }
                        start = Some(pos);
                        Tile::Open(OpenSpace { is_start: true, ..OpenSpace::default() })
                    }
                    '^' => {
                        if ladder.is_some() {
                            return Err(ParseError::DuplicateLadder { level: index, row, col });
                        }
                        ladder = Some(pos);
                        Tile::Open(OpenSpace { has_ladder: true, ..OpenSpace::default() })
                    }
                    '%' => {
                        if instructor.is_some() {
                            return Err(ParseError::DuplicateInstructor {
                                level: index,
                                row,
                                col,
                            });
                        }
                        instructor = Some(pos);
                        Tile::Open(OpenSpace { has_instructor: true, ..OpenSpace::default() })
                    }
                    other => {
                        return Err(ParseError::UnknownGlyph {
                            level: index,
                            row,
                            col,
                            glyph: other,
                        })
                    }
                };
                tiles.push(tile);
            }
            grid.push(tiles);
        }

        let start = start.ok_or(ParseError::MissingStart { level: index })?;
        match (ladder, instructor) {
            (None, None) => return Err(ParseError::MissingExit { level: index }),
            (Some(_), Some(_)) => {
                return Err(ParseError::LadderAndInstructor { level: index })
            }
            _ => {}
        }

        Ok(Level { grid, height, width, start, instructor })
    }

    #[allow(dead_code)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[allow(dead_code)]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The level's single start tile.
    pub fn start(&self) -> Position {
        self.start
    }

    /// The instructor tile, present on the final level only.
    pub fn instructor_position(&self) -> Option<Position> {
        self.instructor
    }

    /// Bounds-checked tile lookup. Only row/col are checked here; matching
    /// the position's level against this level is the maze's job.
    pub fn location_at(&self, pos: Position) -> Option<&Tile> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        Some(&self.grid[pos.row][pos.col])
    }

    pub fn location_at_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        Some(&mut self.grid[pos.row][pos.col])
    }

    /// The open space at `pos`, if the tile exists and is occupiable.
    pub fn space_at(&self, pos: Position) -> Option<&OpenSpace> {
        self.location_at(pos).and_then(Tile::as_open)
    }

    pub fn space_at_mut(&mut self, pos: Position) -> Option<&mut OpenSpace> {
        self.location_at_mut(pos).and_then(Tile::as_open_mut)
    }

    /// Clears every transient flag (student, TA, skill). Permanent flags
    /// survive, so reset right after parse is a no-op.
    pub fn reset(&mut self) {
        for row in &mut self.grid {
            for tile in row {
                if let Tile::Open(space) = tile {
                    space.clear_transient();
                }
            }
        }
    }

    /// Positions of every currently-empty open tile, or `None` when there
    /// are none.
    pub fn empty_positions(&self) -> Option<Vec<Position>> {
        let mut positions = Vec::new();
        for (row, tiles) in self.grid.iter().enumerate() {
            for (col, tile) in tiles.iter().enumerate() {
                if let Tile::Open(space) = tile {
                    if space.is_empty() {
                        positions.push(Position::new(self.start.level, row, col));
                    }
                }
            }
        }
        if positions.is_empty() {
            None
        } else {
            Some(positions)
        }
    }

    /// Uniform sample without replacement of up to `count` empty tiles.
    /// Fewer than `count` is not an error; callers check the length.
    /// `None` only when the level has no empty tile at all.
    pub fn random_empty_positions(
        &self,
        count: usize,
        rng: &mut impl Rng,
    ) -> Option<Vec<Position>> {
        let mut positions = self.empty_positions()?;
        positions.shuffle(rng);
        positions.truncate(count);
        Some(positions)
    }

    /// Glyph grid, one text row per grid row, newline-terminated.
    pub fn view(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in &self.grid {
            for tile in row {
                out.push(tile.glyph());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn parse(rows: &[&str]) -> Result<Level, ParseError> {
        Level::parse(rows, 0, rows.len(), rows[0].len())
    }

    #[test]
    fn parses_a_minimal_level() {
        let level = parse(&[
            "@^#",
            "   ",
        ])
        .unwrap();
        assert_eq!(level.start(), Position::new(0, 0, 0));
        assert_eq!(level.instructor_position(), None);
        assert!(level.space_at(Position::new(0, 0, 1)).unwrap().has_ladder);
        assert!(!level.location_at(Position::new(0, 0, 2)).unwrap().is_occupiable());
    }

    #[test]
    fn parses_an_instructor_level() {
        let level = parse(&[
            "@ %",
            "   ",
        ])
        .unwrap();
        assert_eq!(level.instructor_position(), Some(Position::new(0, 0, 2)));
        assert!(level.space_at(Position::new(0, 0, 2)).unwrap().has_instructor);
    }

    #[test]
    fn reset_after_parse_changes_nothing() {
        let mut level = parse(&[
            "@^#",
            "   ",
        ])
        .unwrap();
        let before = level.view();
        level.reset();
        assert_eq!(level.view(), before);
        assert!(level.space_at(level.start()).unwrap().is_start);
    }

    #[test]
    fn reset_clears_only_transient_flags() {
        let mut level = parse(&[
            "@^ ",
            "   ",
        ])
        .unwrap();
        let pos = Position::new(0, 1, 0);
        let space = level.space_at_mut(pos).unwrap();
        space.has_student = true;
        space.has_skill = true;
        level.space_at_mut(Position::new(0, 1, 1)).unwrap().has_ta = true;

        level.reset();

        assert!(level.space_at(pos).unwrap().is_empty());
        assert!(level.space_at(Position::new(0, 1, 1)).unwrap().is_empty());
        assert!(level.space_at(level.start()).unwrap().is_start);
        assert!(level.space_at(Position::new(0, 0, 1)).unwrap().has_ladder);
    }

    #[test]
    fn rejects_a_missing_row() {
        let err = Level::parse(&["@^ "], 2, 2, 3).unwrap_err();
        assert_eq!(err, ParseError::MissingRow { level: 2, row: 1 });
        assert_eq!(
            err.to_string(),
            "maze level 3: missing row 2 (stream ended early)"
        );
    }

    #[test]
    fn rejects_a_short_row() {
        let err = Level::parse(&["@^ ", "  "], 0, 2, 3).unwrap_err();
        assert_eq!(
            err,
            ParseError::RowWidth { level: 0, row: 1, found: 2, width: 3 }
        );
    }

    #[test]
    fn rejects_an_unknown_glyph() {
        let err = parse(&["@^", " x"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownGlyph { level: 0, row: 1, col: 1, glyph: 'x' }
        );
        assert_eq!(
            err.to_string(),
            "row 2, column 2 of maze level 1: unknown character 'x'"
        );
    }

    #[test]
    fn rejects_duplicate_permanent_tiles() {
        assert_eq!(
            parse(&["@@", "^ "]).unwrap_err(),
            ParseError::DuplicateStart { level: 0, row: 0, col: 1 }
        );
        assert_eq!(
            parse(&["@^", "^ "]).unwrap_err(),
            ParseError::DuplicateLadder { level: 0, row: 1, col: 0 }
        );
        assert_eq!(
            parse(&["@%", "% "]).unwrap_err(),
            ParseError::DuplicateInstructor { level: 0, row: 1, col: 0 }
        );
    }

    #[test]
    fn rejects_missing_start_and_bad_exits() {
        assert_eq!(
            parse(&["  ", "^ "]).unwrap_err(),
            ParseError::MissingStart { level: 0 }
        );
        assert_eq!(
            parse(&["@ ", "  "]).unwrap_err(),
            ParseError::MissingExit { level: 0 }
        );
        assert_eq!(
            parse(&["@^", "% "]).unwrap_err(),
            ParseError::LadderAndInstructor { level: 0 }
        );
    }

    #[test]
    fn random_sample_returns_what_exists() {
        // Exactly two empty tiles: (1,0) and (1,1).
        let level = parse(&[
            "@^#",
            "  #",
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let picked = level.random_empty_positions(3, &mut rng).unwrap();
        assert_eq!(picked.len(), 2);
        assert!(picked.contains(&Position::new(0, 1, 0)));
        assert!(picked.contains(&Position::new(0, 1, 1)));
    }

    #[test]
    fn random_sample_without_replacement() {
        let level = parse(&[
            "@^  ",
            "    ",
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let picked = level.random_empty_positions(4, &mut rng).unwrap();
        assert_eq!(picked.len(), 4);
        for (i, a) in picked.iter().enumerate() {
            assert!(level.space_at(*a).unwrap().is_empty());
            for b in &picked[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn random_sample_on_a_full_level_is_none() {
        let level = parse(&[
            "@^",
            "##",
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(level.random_empty_positions(1, &mut rng).is_none());
    }

    #[test]
    fn lookup_is_bounds_checked() {
        let level = parse(&["@^"]).unwrap();
        assert!(level.location_at(Position::new(0, 0, 1)).is_some());
        assert!(level.location_at(Position::new(0, 1, 0)).is_none());
        assert!(level.location_at(Position::new(0, 0, 2)).is_none());
    }

    #[test]
    fn view_renders_glyphs() {
        let level = parse(&[
            "@^#",
            "   ",
        ])
        .unwrap();
        assert_eq!(level.view(), "@^#\n   \n");
    }
}
