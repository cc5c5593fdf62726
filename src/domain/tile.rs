//! Tile variants and their properties.
//!
//! A tile is either a wall or an open space. Walls are inert; open spaces
//! carry the flags that drive the whole game. Three flags are permanent,
//! fixed when the level text is parsed (start, ladder, instructor; at most
//! one of them per tile) and three are transient, toggled during play
//! (skill, student, TA).

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct OpenSpace {
    // Permanent flags, set once at parse time.
    pub is_start: bool,
    pub has_ladder: bool,
    pub has_instructor: bool,
    // Transient flags, changed during play.
    pub has_skill: bool,
    pub has_student: bool,
    pub has_ta: bool,
}

impl OpenSpace {
    /// Empty means all six flags are off. Start, ladder, and instructor
    /// tiles are never empty; random placement only lands on empty tiles.
    pub fn is_empty(&self) -> bool {
        !self.is_start
            && !self.has_ladder
            && !self.has_instructor
            && !self.has_skill
            && !self.has_student
            && !self.has_ta
    }

    /// Clears the transient flags only.
    pub fn clear_transient(&mut self) {
        self.has_skill = false;
        self.has_student = false;
        self.has_ta = false;
    }

    /// Display glyph. Precedence: student > TA > skill > start > ladder
    /// > instructor > blank.
    pub fn glyph(&self) -> char {
        if self.has_student {
            '*'
        } else if self.has_ta {
            'T'
        } else if self.has_skill {
            '$'
        } else if self.is_start {
            '@'
        } else if self.has_ladder {
            '^'
        } else if self.has_instructor {
            '%'
        } else {
            ' '
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Open(OpenSpace),
}

impl Tile {
    /// A fresh open tile with no flags set.
    pub fn open() -> Tile {
        Tile::Open(OpenSpace::default())
    }

    #[allow(dead_code)]
    pub fn is_occupiable(&self) -> bool {
        matches!(self, Tile::Open(_))
    }

    pub fn as_open(&self) -> Option<&OpenSpace> {
        match self {
            Tile::Wall => None,
            Tile::Open(space) => Some(space),
        }
    }

    pub fn as_open_mut(&mut self) -> Option<&mut OpenSpace> {
        match self {
            Tile::Wall => None,
            Tile::Open(space) => Some(space),
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Open(space) => space.glyph(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_open_space_is_empty() {
        assert!(OpenSpace::default().is_empty());
        assert_eq!(Tile::open().glyph(), ' ');
    }

    #[test]
    fn any_flag_makes_a_space_non_empty() {
        let mut space = OpenSpace::default();
        space.has_skill = true;
        assert!(!space.is_empty());

        let mut space = OpenSpace::default();
        space.is_start = true;
        assert!(!space.is_empty());
    }

    #[test]
    fn glyph_precedence() {
        let mut space = OpenSpace {
            is_start: true,
            has_skill: true,
            has_student: true,
            has_ta: true,
            ..OpenSpace::default()
        };
        assert_eq!(space.glyph(), '*');
        space.has_student = false;
        assert_eq!(space.glyph(), 'T');
        space.has_ta = false;
        assert_eq!(space.glyph(), '$');
        space.has_skill = false;
        assert_eq!(space.glyph(), '@');
    }

    #[test]
    fn clear_transient_keeps_permanent_flags() {
        let mut space = OpenSpace {
            has_ladder: true,
            has_student: true,
            has_ta: true,
            has_skill: true,
            ..OpenSpace::default()
        };
        space.clear_transient();
        assert!(space.has_ladder);
        assert!(!space.has_student && !space.has_ta && !space.has_skill);
        assert_eq!(space.glyph(), '^');
    }

    #[test]
    fn walls_are_not_occupiable() {
        assert!(!Tile::Wall.is_occupiable());
        assert!(Tile::Wall.as_open().is_none());
        assert_eq!(Tile::Wall.glyph(), '#');
    }
}
