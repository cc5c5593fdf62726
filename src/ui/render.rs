//! Console rendering of the maze.
//!
//! The simulation produces plain glyph grids and a status snapshot; this
//! module owns all the terminal work: optional screen clearing, per-glyph
//! coloring, and the status block layout.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::config::UiConfig;
use crate::sim::maze::Maze;

pub struct Renderer {
    color: bool,
    clear_screen: bool,
}

impl Renderer {
    pub fn new(config: &UiConfig) -> Self {
        Renderer {
            color: config.color,
            clear_screen: config.clear_screen,
        }
    }

    /// Draws the status block and the current level's grid.
    pub fn draw(&self, out: &mut impl Write, maze: &Maze) -> io::Result<()> {
        if self.clear_screen {
            queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        self.draw_status(out, maze)?;
        self.draw_grid(out, maze)?;
        out.flush()
    }

    fn draw_status(&self, out: &mut impl Write, maze: &Maze) -> io::Result<()> {
        let status = maze.status();
        writeln!(out, "# of Programming Skills: {}", status.skills)?;
        writeln!(out, "Current Position: {}", status.position)?;
        writeln!(out, "Remaining Levels: {}", status.remaining_levels)?;
        for (index, ta) in status.tas.iter().enumerate() {
            if ta.appeased {
                writeln!(
                    out,
                    "TA {}: appeased, {} turns remaining",
                    index + 1,
                    ta.turns_remaining
                )?;
            } else {
                writeln!(out, "TA {}: not appeased", index + 1)?;
            }
        }
        writeln!(out)
    }

    fn draw_grid(&self, out: &mut impl Write, maze: &Maze) -> io::Result<()> {
        for glyph in maze.level_view().chars() {
            match glyph_color(glyph).filter(|_| self.color) {
                Some(color) => {
                    queue!(out, SetForegroundColor(color), Print(glyph), ResetColor)?
                }
                None => queue!(out, Print(glyph))?,
            }
        }
        writeln!(out)
    }
}

fn glyph_color(glyph: char) -> Option<Color> {
    match glyph {
        '*' => Some(Color::Green),
        'T' => Some(Color::Red),
        '$' => Some(Color::Yellow),
        '@' => Some(Color::Cyan),
        '^' => Some(Color::Magenta),
        '%' => Some(Color::Blue),
        '#' => Some(Color::DarkGrey),
        _ => None,
    }
}
