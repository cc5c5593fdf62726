//! Player actions and their menu bindings.
//!
//! The four movement actions are shared by the student and the TAs; climbing
//! and demonstrating are student-only and are offered by the simulation when
//! their preconditions hold.

use super::position::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    ClimbUp,
    DemonstrateSkill,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

impl Action {
    /// The direction of a movement action; `None` for climb/demonstrate.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            Action::ClimbUp | Action::DemonstrateSkill => None,
        }
    }

    pub fn from_direction(dir: Direction) -> Action {
        match dir {
            Direction::Up => Action::MoveUp,
            Direction::Down => Action::MoveDown,
            Direction::Left => Action::MoveLeft,
            Direction::Right => Action::MoveRight,
        }
    }

    /// Menu key for the console prompt.
    pub fn key(self) -> char {
        match self {
            Action::ClimbUp => 'U',
            Action::DemonstrateSkill => 'P',
            Action::MoveUp => 'W',
            Action::MoveDown => 'S',
            Action::MoveLeft => 'A',
            Action::MoveRight => 'D',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::ClimbUp => "Climb up the ladder to the next level.",
            Action::DemonstrateSkill => "Demonstrate a programming skill.",
            Action::MoveUp => "Move up.",
            Action::MoveDown => "Move down.",
            Action::MoveLeft => "Move left.",
            Action::MoveRight => "Move right.",
        }
    }
}
