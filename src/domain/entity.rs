//! The three actors: the student, the TAs, and the instructor.
//!
//! Each actor knows its position and how entering or leaving a tile affects
//! that tile's flags (see `EntityKind`). Move *selection* differs per actor:
//! the student's choice comes from the outside world, a TA picks uniformly
//! at random among its legal moves, and the instructor never moves at all.

use rand::Rng;

use super::position::{Direction, Position};
use super::tile::OpenSpace;

/// How many turns of appeasement one skill demonstration buys.
const APPEASE_TURNS: u32 = 10;

#[derive(Clone, Debug)]
pub struct Student {
    pub position: Position,
    skills: u32,
}

impl Student {
    pub fn new(position: Position) -> Self {
        Student { position, skills: 0 }
    }

    pub fn skills(&self) -> u32 {
        self.skills
    }

    pub fn has_skills(&self) -> bool {
        self.skills > 0
    }

    pub fn increment_skills(&mut self) {
        self.skills += 1;
    }

    pub fn decrement_skills(&mut self) {
        self.skills = self.skills.saturating_sub(1);
    }
}

#[derive(Clone, Debug)]
pub struct Ta {
    pub position: Position,
    appeased_turns: u32,
}

impl Ta {
    pub fn new(position: Position) -> Self {
        Ta { position, appeased_turns: 0 }
    }

    pub fn appease(&mut self) {
        self.appeased_turns += APPEASE_TURNS;
    }

    /// The threshold is `> 1`, not `> 0`: the counter has already lost this
    /// turn's decrement by the time the student's tile is inspected, so a TA
    /// at exactly 1 counts as dangerous.
    pub fn is_appeased(&self) -> bool {
        self.appeased_turns > 1
    }

    pub fn appeased_turns(&self) -> u32 {
        self.appeased_turns
    }

    /// Picks one of `legal` uniformly at random. Being asked to move costs
    /// one turn of appeasement whatever the answer, even when `legal` is
    /// empty and the TA stays put.
    pub fn choose_move(&mut self, legal: &[Direction], rng: &mut impl Rng) -> Option<Direction> {
        self.appeased_turns = self.appeased_turns.saturating_sub(1);
        if legal.is_empty() {
            return None;
        }
        Some(legal[rng.gen_range(0..legal.len())])
    }
}

#[derive(Clone, Debug)]
pub struct Instructor {
    pub position: Position,
}

impl Instructor {
    pub fn new(position: Position) -> Self {
        Instructor { position }
    }
}

/// Which actor is entering or leaving a tile. The instructor's arms are
/// no-ops: it never moves, and its tile carries the permanent
/// `has_instructor` flag instead.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntityKind {
    Student,
    Ta,
    #[allow(dead_code)]
    Instructor,
}

impl EntityKind {
    pub fn occupy(self, space: &mut OpenSpace) {
        match self {
            EntityKind::Student => space.has_student = true,
            EntityKind::Ta => space.has_ta = true,
            EntityKind::Instructor => {}
        }
    }

    pub fn unoccupy(self, space: &mut OpenSpace) {
        match self {
            EntityKind::Student => space.has_student = false,
            EntityKind::Ta => space.has_ta = false,
            EntityKind::Instructor => {}
        }
    }
}
