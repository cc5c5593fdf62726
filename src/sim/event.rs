//! Outcome of one resolved turn.
//!
//! Outcomes are not errors: the losing variants trigger in-engine recovery
//! (a level reset) and play continues. Only `SatisfiedInstructor` ends the
//! run.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnOutcome {
    /// The student stepped onto a skill and picked it up.
    AcquiredSkill,
    /// A non-appeased TA shares or borders the student's tile.
    CaughtByTa,
    /// Adjacent to the instructor with fewer than the required skills.
    FailedByInstructor,
    /// Adjacent to the instructor with enough skills. Terminal success.
    SatisfiedInstructor,
    NoEvent,
}

impl TurnOutcome {
    #[allow(dead_code)]
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnOutcome::SatisfiedInstructor)
    }
}
