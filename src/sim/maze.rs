//! The maze: every level, every actor, one randomness source.
//!
//! Construction parses the whole text description, validates the global
//! instructor invariant, then seats the actors: the student on level 0's
//! start tile, the instructor on the final level, and per level exactly
//! two randomly placed TAs and three randomly placed skills. Failure at
//! any point drops everything built so far; there is no partially
//! constructed maze.
//!
//! All randomness flows through the single injected `StdRng`, so a seeded
//! maze plays out deterministically.

use log::{debug, info};
use rand::rngs::StdRng;
use thiserror::Error;

use crate::domain::action::Action;
use crate::domain::entity::{Instructor, Student, Ta};
use crate::domain::position::{Direction, Position};
use crate::domain::tile::{OpenSpace, Tile};

use super::level::{Level, ParseError};

pub const TAS_PER_LEVEL: usize = 2;
pub const SKILLS_PER_LEVEL: usize = 3;
/// Skills the student must hold when meeting the instructor.
pub const SKILLS_TO_SATISFY: u32 = 3;

#[derive(Debug, Error)]
pub enum MazeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("malformed maze header: expected three integers `levels height width`")]
    BadHeader,

    #[error("levels, height, and width must all be >= 1")]
    ZeroDimension,

    #[error("no instructor found on the final level")]
    MissingInstructor,

    #[error("instructor found on maze level {}, not the final level", .level + 1)]
    MisplacedInstructor { level: usize },

    #[error("maze level {} does not have enough empty tiles to place {}", .level + 1, .what)]
    Capacity { level: usize, what: &'static str },
}

/// Appeasement state of one TA, for the status display.
#[derive(Clone, Copy, Debug)]
pub struct TaStatus {
    pub appeased: bool,
    pub turns_remaining: u32,
}

/// Snapshot of everything the status display shows.
#[derive(Clone, Debug)]
pub struct StatusView {
    pub skills: u32,
    pub position: Position,
    pub remaining_levels: usize,
    pub tas: Vec<TaStatus>,
}

#[derive(Debug)]
pub struct Maze {
    pub(crate) levels: Vec<Level>,
    pub(crate) student: Student,
    /// One roster per level, always `TAS_PER_LEVEL` strong.
    pub(crate) tas: Vec<Vec<Ta>>,
    pub(crate) instructor: Instructor,
    pub(crate) rng: StdRng,
}

// ══════════════════════════════════════════════════════════════
// Construction
// ══════════════════════════════════════════════════════════════

impl Maze {
    /// Parses a full maze description: a `levels height width` header line
    /// followed by `levels` blocks of `height` rows.
    pub fn parse(text: &str, rng: StdRng) -> Result<Maze, MazeError> {
        let mut lines = text.lines();
        let header = lines.next().ok_or(MazeError::BadHeader)?;
        let (level_count, height, width) = parse_header(header)?;

        let rows: Vec<&str> = lines.collect();
        let mut levels = Vec::with_capacity(level_count);
        for index in 0..level_count {
            let begin = index * height;
            let end = rows.len().min(begin + height);
            let slice = rows.get(begin..end).unwrap_or(&[]);
            levels.push(Level::parse(slice, index, height, width)?);
        }

        let last = level_count - 1;
        for (index, level) in levels.iter().enumerate() {
            if index != last && level.instructor_position().is_some() {
                return Err(MazeError::MisplacedInstructor { level: index });
            }
        }
        let instructor_pos = levels[last]
            .instructor_position()
            .ok_or(MazeError::MissingInstructor)?;

        let start = levels[0].start();
        let mut maze = Maze {
            levels,
            student: Student::new(start),
            tas: Vec::with_capacity(level_count),
            instructor: Instructor::new(instructor_pos),
            rng,
        };
        maze.space_at_mut(start)
            .expect("start tile is an open tile")
            .has_student = true;

        for index in 0..level_count {
            let roster = maze.place_tas_for_level(index)?;
            maze.tas.push(roster);
        }
        for index in 0..level_count {
            maze.place_skills_for_level(index)?;
        }

        info!(
            "loaded maze: {} level(s) of {}x{}",
            level_count, height, width
        );
        Ok(maze)
    }

    fn place_tas_for_level(&mut self, index: usize) -> Result<Vec<Ta>, MazeError> {
        let positions = self.levels[index]
            .random_empty_positions(TAS_PER_LEVEL, &mut self.rng)
            .filter(|found| found.len() == TAS_PER_LEVEL)
            .ok_or(MazeError::Capacity { level: index, what: "TAs" })?;

        let mut roster = Vec::with_capacity(TAS_PER_LEVEL);
        for pos in positions {
            self.levels[index]
                .space_at_mut(pos)
                .expect("sampled position is an open tile")
                .has_ta = true;
            debug!("placed TA at {pos}");
            roster.push(Ta::new(pos));
        }
        Ok(roster)
    }

    fn place_skills_for_level(&mut self, index: usize) -> Result<(), MazeError> {
        let positions = self.levels[index]
            .random_empty_positions(SKILLS_PER_LEVEL, &mut self.rng)
            .filter(|found| found.len() == SKILLS_PER_LEVEL)
            .ok_or(MazeError::Capacity { level: index, what: "skills" })?;

        for pos in positions {
            self.levels[index]
                .space_at_mut(pos)
                .expect("sampled position is an open tile")
                .has_skill = true;
            debug!("placed skill at {pos}");
        }
        Ok(())
    }
}

/// Parses the `levels height width` header line.
fn parse_header(line: &str) -> Result<(usize, usize, usize), MazeError> {
    let mut fields = line.split_whitespace();
    let mut next = || -> Result<usize, MazeError> {
        fields
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or(MazeError::BadHeader)
    };
    let levels = next()?;
    let height = next()?;
    let width = next()?;
    if levels < 1 || height < 1 || width < 1 {
        return Err(MazeError::ZeroDimension);
    }
    Ok((levels, height, width))
}

// ══════════════════════════════════════════════════════════════
// Resets
// ══════════════════════════════════════════════════════════════

impl Maze {
    /// Clears one level's transient state and rebuilds its population:
    /// a fresh student (zero skills) on the level's start tile, a fresh TA
    /// roster, fresh skill placements. Replacing the owned values drops the
    /// old ones, appeasement state included.
    pub fn reset_level(&mut self, index: usize) -> Result<(), MazeError> {
        self.levels[index].reset();

        let start = self.levels[index].start();
        self.levels[index]
            .space_at_mut(start)
            .expect("start tile is an open tile")
            .has_student = true;
        self.student = Student::new(start);

        let roster = self.place_tas_for_level(index)?;
        self.tas[index] = roster;
        self.place_skills_for_level(index)?;

        info!("reset level {}", index + 1);
        Ok(())
    }

    /// Resets the level the student currently stands on.
    pub fn reset_current_level(&mut self) -> Result<(), MazeError> {
        self.reset_level(self.student.position.level)
    }

    /// Resets every level, then puts the student back on level 0's start.
    pub fn reset_all_levels(&mut self) -> Result<(), MazeError> {
        for index in 0..self.levels.len() {
            // Each per-level reset seats the student on that level; undo
            // that so only level 0's start ends up occupied.
            self.reset_level(index)?;
            let start = self.levels[index].start();
            self.levels[index]
                .space_at_mut(start)
                .expect("start tile is an open tile")
                .has_student = false;
        }

        let start = self.levels[0].start();
        self.levels[0]
            .space_at_mut(start)
            .expect("start tile is an open tile")
            .has_student = true;
        self.student.position = start;
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Lookups (pure)
// ══════════════════════════════════════════════════════════════

impl Maze {
    #[allow(dead_code)]
    pub fn location_at(&self, pos: Position) -> Option<&Tile> {
        self.levels.get(pos.level)?.location_at(pos)
    }

    /// The open space at `pos`, if that tile exists and is occupiable.
    pub fn space_at(&self, pos: Position) -> Option<&OpenSpace> {
        self.levels.get(pos.level)?.space_at(pos)
    }

    pub(crate) fn space_at_mut(&mut self, pos: Position) -> Option<&mut OpenSpace> {
        self.levels.get_mut(pos.level)?.space_at_mut(pos)
    }

    /// The TA standing at `pos`, found by scanning that level's roster.
    pub fn ta_at(&self, pos: Position) -> Option<&Ta> {
        if !self.space_at(pos)?.has_ta {
            return None;
        }
        self.tas.get(pos.level)?.iter().find(|ta| ta.position == pos)
    }

    /// Can an entity standing at `pos` move one tile in `dir`? True when
    /// both the source and the target are occupiable tiles.
    pub fn can_move_in_direction(&self, pos: Position, dir: Direction) -> bool {
        if self.space_at(pos).is_none() {
            return false;
        }
        pos.translated(dir, 1)
            .map_or(false, |target| self.space_at(target).is_some())
    }

    /// Occupiable tiles directly adjacent to `pos`, in up/down/left/right
    /// scan order.
    pub fn adjacent_spaces(&self, pos: Position) -> Vec<Position> {
        let mut spaces = Vec::new();
        for dir in Direction::ALL {
            if self.can_move_in_direction(pos, dir) {
                let adjacent = pos
                    .translated(dir, 1)
                    .expect("adjacent move stays on the grid");
                spaces.push(adjacent);
            }
        }
        spaces
    }

    /// Directions an entity at `pos` may legally step in.
    pub fn valid_directions_at(&self, pos: Position) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.can_move_in_direction(pos, *dir))
            .collect()
    }

    /// Movement actions an entity at `pos` may legally take. This is the
    /// full action set for TAs, who never climb or demonstrate.
    pub fn valid_movements_at(&self, pos: Position) -> Vec<Action> {
        self.valid_directions_at(pos)
            .into_iter()
            .map(Action::from_direction)
            .collect()
    }

    /// The student's legal actions at `pos`: every legal movement, plus
    /// climbing when standing on a ladder, plus demonstrating when holding
    /// at least one skill.
    pub fn valid_actions_at(&self, pos: Position) -> Vec<Action> {
        let mut actions = self.valid_movements_at(pos);
        let on_ladder = self.space_at(pos).map_or(false, |space| space.has_ladder);
        if on_ladder {
            actions.push(Action::ClimbUp);
        }
        if self.student.has_skills() {
            actions.push(Action::DemonstrateSkill);
        }
        actions
    }
}

// ══════════════════════════════════════════════════════════════
// Views and accessors
// ══════════════════════════════════════════════════════════════

impl Maze {
    pub fn student(&self) -> &Student {
        &self.student
    }

    #[allow(dead_code)]
    pub fn instructor(&self) -> &Instructor {
        &self.instructor
    }

    #[allow(dead_code)]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The level the student currently stands on.
    pub fn current_level(&self) -> usize {
        self.student.position.level
    }

    /// Glyph grid of the student's current level.
    pub fn level_view(&self) -> String {
        self.levels[self.current_level()].view()
    }

    /// Glyph grids of every level, blank-line separated.
    #[allow(dead_code)]
    pub fn maze_view(&self) -> String {
        let mut out = String::new();
        for level in &self.levels {
            out.push_str(&level.view());
            out.push('\n');
        }
        out
    }

    /// Everything the status display shows: skills, position, levels left,
    /// and the appeasement state of each TA on the current level.
    pub fn status(&self) -> StatusView {
        let level = self.current_level();
        StatusView {
            skills: self.student.skills(),
            position: self.student.position,
            remaining_levels: self.levels.len() - (level + 1),
            tas: self.tas[level]
                .iter()
                .map(|ta| TaStatus {
                    appeased: ta.is_appeased(),
                    turns_remaining: ta.appeased_turns(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn maze_from(text: &str, seed: u64) -> Maze {
        Maze::parse(text, StdRng::seed_from_u64(seed)).unwrap()
    }

    /// Two 3x5 levels: a ladder level on top of an instructor level.
    fn two_levels() -> String {
        [
            "2 3 5",
            "@   ^",
            "     ",
            "#   #",
            "@   %",
            "     ",
            "#   #",
        ]
        .join("\n")
    }

    fn count_flags(maze: &Maze, flag: fn(&OpenSpace) -> bool) -> usize {
        let mut count = 0;
        for (index, level) in maze.levels.iter().enumerate() {
            for row in 0..level.height() {
                for col in 0..level.width() {
                    if let Some(space) = level.space_at(Position::new(index, row, col)) {
                        if flag(space) {
                            count += 1;
                        }
                    }
                }
            }
        }
        count
    }

    #[test]
    fn construction_places_everyone() {
        let maze = maze_from(&two_levels(), 11);

        // Student on level 0's start, exactly one student tile anywhere.
        assert_eq!(maze.student.position, Position::new(0, 0, 0));
        assert_eq!(count_flags(&maze, |s| s.has_student), 1);

        // Two TAs and three skills per level, flags matching the rosters.
        assert_eq!(count_flags(&maze, |s| s.has_ta), 2 * TAS_PER_LEVEL);
        assert_eq!(count_flags(&maze, |s| s.has_skill), 2 * SKILLS_PER_LEVEL);
        for roster in &maze.tas {
            assert_eq!(roster.len(), TAS_PER_LEVEL);
            for ta in roster {
                assert!(maze.space_at(ta.position).unwrap().has_ta);
            }
        }

        // Instructor seated on the final level's marked tile.
        assert_eq!(maze.instructor.position, Position::new(1, 0, 4));
        assert!(maze.space_at(maze.instructor.position).unwrap().has_instructor);
    }

    #[test]
    fn placement_avoids_permanent_tiles() {
        let maze = maze_from(&two_levels(), 3);
        for roster in &maze.tas {
            for ta in roster {
                let space = maze.space_at(ta.position).unwrap();
                assert!(!space.is_start && !space.has_ladder && !space.has_instructor);
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = maze_from(&two_levels(), 77);
        let b = maze_from(&two_levels(), 77);
        for (ra, rb) in a.tas.iter().zip(&b.tas) {
            for (ta, tb) in ra.iter().zip(rb) {
                assert_eq!(ta.position, tb.position);
            }
        }
        assert_eq!(a.maze_view(), b.maze_view());
    }

    #[test]
    fn rejects_bad_headers() {
        let rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            Maze::parse("", rng).unwrap_err(),
            MazeError::BadHeader
        ));
        let rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            Maze::parse("2 3\n", rng).unwrap_err(),
            MazeError::BadHeader
        ));
        let rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            Maze::parse("0 3 5\n", rng).unwrap_err(),
            MazeError::ZeroDimension
        ));
    }

    #[test]
    fn rejects_instructor_off_the_final_level() {
        let text = "\
2 1 3
@ %
@ ^
";
        let err = Maze::parse(text, StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(
            err,
            MazeError::MisplacedInstructor { level: 0 }
        ));
    }

    #[test]
    fn rejects_a_final_level_without_instructor() {
        let text = "\
1 1 3
@ ^
";
        let err = Maze::parse(text, StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, MazeError::MissingInstructor));
    }

    #[test]
    fn rejects_a_level_too_small_to_populate() {
        // One open tile next to the start; TAs alone need two.
        let text = "\
1 1 4
@% #
";
        let err = Maze::parse(text, StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(
            err,
            MazeError::Capacity { level: 0, what: "TAs" }
        ));
    }

    #[test]
    fn parse_errors_carry_through() {
        let text = "\
1 1 3
@ x
";
        let err = Maze::parse(text, StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, MazeError::Parse(_)));
    }

    #[test]
    fn reset_level_rebuilds_the_population() {
        let mut maze = maze_from(&two_levels(), 5);
        maze.student.increment_skills();
        let old_ta_turns: Vec<u32> = {
            // Appease the level's TAs so the reset has state to discard.
            for ta in &mut maze.tas[0] {
                ta.appease();
            }
            maze.tas[0].iter().map(|ta| ta.appeased_turns()).collect()
        };
        assert!(old_ta_turns.iter().all(|&turns| turns == 10));

        maze.reset_level(0).unwrap();

        // Fresh student, zero skills, back on the start tile.
        assert_eq!(maze.student.skills(), 0);
        assert_eq!(maze.student.position, maze.levels[0].start());
        assert!(maze.space_at(maze.student.position).unwrap().has_student);

        // Fresh TAs with no appeasement left over.
        assert_eq!(maze.tas[0].len(), TAS_PER_LEVEL);
        for ta in &maze.tas[0] {
            assert_eq!(ta.appeased_turns(), 0);
        }

        // Population counts hold after the reset.
        assert_eq!(count_flags(&maze, |s| s.has_ta), 2 * TAS_PER_LEVEL);
        assert_eq!(count_flags(&maze, |s| s.has_skill), 2 * SKILLS_PER_LEVEL);
        assert_eq!(count_flags(&maze, |s| s.has_student), 1);
    }

    #[test]
    fn reset_all_levels_returns_to_the_first_start() {
        let mut maze = maze_from(&two_levels(), 8);
        // Walk the student somewhere else first.
        let start = maze.student.position;
        maze.space_at_mut(start).unwrap().has_student = false;
        maze.student.position = Position::new(1, 1, 2);
        maze.space_at_mut(maze.student.position).unwrap().has_student = true;

        maze.reset_all_levels().unwrap();

        assert_eq!(maze.student.position, maze.levels[0].start());
        assert_eq!(maze.student.skills(), 0);
        assert_eq!(count_flags(&maze, |s| s.has_student), 1);
        assert_eq!(count_flags(&maze, |s| s.has_ta), 2 * TAS_PER_LEVEL);
        assert_eq!(count_flags(&maze, |s| s.has_skill), 2 * SKILLS_PER_LEVEL);
    }

    #[test]
    fn lookup_helpers_agree() {
        let maze = maze_from(&two_levels(), 2);
        let pos = Position::new(0, 1, 1);

        // Off-maze level index misses cleanly.
        assert!(maze.location_at(Position::new(9, 0, 0)).is_none());

        // A wall is a location but not a space.
        let wall = Position::new(0, 2, 0);
        assert!(maze.location_at(wall).is_some());
        assert!(maze.space_at(wall).is_none());

        // Adjacency respects walls and edges, in scan order.
        let corner = Position::new(0, 0, 0);
        let adjacent = maze.adjacent_spaces(corner);
        assert_eq!(
            adjacent,
            vec![Position::new(0, 1, 0), Position::new(0, 0, 1)]
        );

        // ta_at only answers where the flag is set.
        assert!(maze.ta_at(pos).is_none() || maze.space_at(pos).unwrap().has_ta);
        for ta in &maze.tas[0] {
            assert_eq!(maze.ta_at(ta.position).unwrap().position, ta.position);
        }
    }

    #[test]
    fn status_reports_the_current_level() {
        let maze = maze_from(&two_levels(), 6);
        let status = maze.status();
        assert_eq!(status.skills, 0);
        assert_eq!(status.position, maze.student.position);
        assert_eq!(status.remaining_levels, 1);
        assert_eq!(status.tas.len(), TAS_PER_LEVEL);
        assert!(status.tas.iter().all(|ta| !ta.appeased));
    }
}
