//! Turn resolution: one student action, every TA on the student's level,
//! then event detection.
//!
//! Processing order, fixed:
//!   1. Compute the student's legal actions and ask the action source.
//!   2. Apply the student's action (climb, demonstrate, or move).
//!   3. Move every TA on the student's resulting level, in roster order.
//!      Asking a TA to move decrements its appeasement; a demonstration
//!      this turn appeases each TA after it moves (net +9 per turn).
//!   4. Detect events at the student's new position.
//!
//! Event precedence, first applicable wins:
//!   a. non-appeased TA on the student's own tile  -> CaughtByTa
//!   b. skill on the student's own tile            -> AcquiredSkill
//!   c. adjacent tiles in up/down/left/right order:
//!      non-appeased TA -> CaughtByTa; instructor -> SatisfiedInstructor
//!      when the student holds enough skills, FailedByInstructor otherwise
//!   d. nothing applies                            -> NoEvent

use log::info;
use thiserror::Error;

use crate::domain::action::Action;
use crate::domain::entity::EntityKind;
use crate::domain::position::Position;

use super::event::TurnOutcome;
use super::maze::{Maze, SKILLS_TO_SATISFY};

/// Where the student's chosen action comes from. The console menu
/// implements this; tests use scripted sources. Returning `None` means the
/// collaborator declined to choose, which ends the run.
pub trait ActionSource {
    fn choose(&mut self, legal: &[Action]) -> Option<Action>;
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("no action was selected; the game cannot continue")]
    Cancelled,
}

/// What one turn did: the action the student took and what came of it.
#[derive(Clone, Copy, Debug)]
pub struct TurnReport {
    pub action: Action,
    pub outcome: TurnOutcome,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn resolve_turn(
    maze: &mut Maze,
    source: &mut dyn ActionSource,
) -> Result<TurnReport, TurnError> {
    let legal = maze.valid_actions_at(maze.student.position);
    let action = source.choose(&legal).ok_or(TurnError::Cancelled)?;
    debug_assert!(legal.contains(&action), "chosen action must be legal");

    let appease = apply_student_action(maze, action);
    move_tas(maze, appease);
    let outcome = detect_events(maze);

    info!("turn: {:?} -> {:?}", action, outcome);
    Ok(TurnReport { action, outcome })
}

// ══════════════════════════════════════════════════════════════
// Student action
// ══════════════════════════════════════════════════════════════

/// Applies the student's action. Returns whether this turn appeases the
/// TAs (only a skill demonstration does).
fn apply_student_action(maze: &mut Maze, action: Action) -> bool {
    match action {
        Action::ClimbUp => {
            climb(maze);
            false
        }
        Action::DemonstrateSkill => {
            maze.student.decrement_skills();
            true
        }
        _ => {
            let from = maze.student.position;
            if let Some(to) = move_entity(maze, EntityKind::Student, from, action) {
                maze.student.position = to;
            }
            false
        }
    }
}

/// Moves the student up to the next level's start tile. Only reachable
/// from a ladder tile, and ladders exist on non-final levels only, so the
/// next level always exists.
fn climb(maze: &mut Maze) {
    let from = maze.student.position;
    let space = maze
        .space_at_mut(from)
        .expect("student stands on an open tile");
    EntityKind::Student.unoccupy(space);

    let to = maze.levels[from.level + 1].start();
    let space = maze
        .space_at_mut(to)
        .expect("start tile is an open tile");
    EntityKind::Student.occupy(space);
    maze.student.position = to;
}

/// Applies a movement action to the entity at `pos`, toggling the
/// occupancy flags on both tiles. Returns the new position, or `None`
/// (a silent no-op) when the action is not one of the four movements.
fn move_entity(
    maze: &mut Maze,
    kind: EntityKind,
    pos: Position,
    action: Action,
) -> Option<Position> {
    let dir = action.direction()?;
    let space = maze
        .space_at_mut(pos)
        .expect("entity stands on an open tile");
    kind.unoccupy(space);

    let to = pos.translated(dir, 1).expect("legal move stays on the grid");
    let space = maze
        .space_at_mut(to)
        .expect("legal move targets an open tile");
    kind.occupy(space);
    Some(to)
}

// ══════════════════════════════════════════════════════════════
// TA sweep
// ══════════════════════════════════════════════════════════════

/// Moves every TA on the student's resulting level, in roster order.
fn move_tas(maze: &mut Maze, appease: bool) {
    let level = maze.student.position.level;
    for index in 0..maze.tas[level].len() {
        let pos = maze.tas[level][index].position;
        let legal = maze.valid_directions_at(pos);
        let chosen = maze.tas[level][index].choose_move(&legal, &mut maze.rng);

        if let Some(dir) = chosen {
            let to = move_entity(maze, EntityKind::Ta, pos, Action::from_direction(dir))
                .expect("a direction always maps to a movement action");
            maze.tas[level][index].position = to;
        }
        if appease {
            maze.tas[level][index].appease();
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Event detection
// ══════════════════════════════════════════════════════════════

fn detect_events(maze: &mut Maze) -> TurnOutcome {
    let pos = maze.student.position;
    let here = *maze
        .space_at(pos)
        .expect("student stands on an open tile");

    if here.has_ta {
        let ta = maze.ta_at(pos).expect("has_ta flag names a rostered TA");
        if !ta.is_appeased() {
            return TurnOutcome::CaughtByTa;
        }
    } else if here.has_skill {
        maze.student.increment_skills();
        maze.space_at_mut(pos)
            .expect("student stands on an open tile")
            .has_skill = false;
        return TurnOutcome::AcquiredSkill;
    }

    for adjacent in maze.adjacent_spaces(pos) {
        let space = maze
            .space_at(adjacent)
            .expect("adjacent positions are open tiles");
        if space.has_ta {
            let ta = maze
                .ta_at(adjacent)
                .expect("has_ta flag names a rostered TA");
            if !ta.is_appeased() {
                return TurnOutcome::CaughtByTa;
            }
        } else if space.has_instructor {
            return if maze.student.skills() >= SKILLS_TO_SATISFY {
                TurnOutcome::SatisfiedInstructor
            } else {
                TurnOutcome::FailedByInstructor
            };
        }
    }

    TurnOutcome::NoEvent
}
