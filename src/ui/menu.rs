//! Line-based menu prompting.
//!
//! A menu is a list of (key, label, value) items printed to the console;
//! the user answers with a single character, case-insensitively, and is
//! re-prompted until the answer matches an item. Menus read from any
//! `BufRead` and write to any `Write`. An optional cancel entry lets
//! auxiliary menus return nothing; running out of input does the same.

use std::io::{self, BufRead, Write};

use crate::domain::action::Action;
use crate::sim::turn::ActionSource;

const CANCEL_KEY: char = '0';

pub struct MenuItem<T> {
    pub key: char,
    pub label: &'static str,
    pub value: T,
}

pub struct MenuPrompt<T> {
    items: Vec<MenuItem<T>>,
    enable_cancel: bool,
}

impl<T: Copy> MenuPrompt<T> {
    pub fn new() -> Self {
        MenuPrompt { items: Vec::new(), enable_cancel: false }
    }

    /// A menu with an extra cancel entry that resolves to `None`.
    #[allow(dead_code)]
    pub fn with_cancel() -> Self {
        MenuPrompt { items: Vec::new(), enable_cancel: true }
    }

    pub fn add_item(&mut self, key: char, label: &'static str, value: T) {
        self.items.push(MenuItem { key, label, value });
    }

    pub fn options_text(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            out.push_str(&format!("  {}) {}\n", item.key, item.label));
        }
        if self.enable_cancel {
            out.push_str(&format!("  {}) Cancel.\n", CANCEL_KEY));
        }
        out
    }

    /// Prints the options and reads lines until one selects an item.
    /// `Ok(None)` means cancelled, or end of input.
    pub fn prompt_from(
        &self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> io::Result<Option<T>> {
        loop {
            write!(output, "{}Your choice: ", self.options_text())?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match self.resolve(&line) {
                Some(choice) => return Ok(choice),
                None => writeln!(output, "Invalid choice, try again.")?,
            }
        }
    }

    /// Outer `None` is an invalid answer; `Some(None)` is a cancel.
    fn resolve(&self, input: &str) -> Option<Option<T>> {
        let mut chars = input.trim().chars();
        let answer = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if self.enable_cancel && answer == CANCEL_KEY {
            return Some(None);
        }
        self.items
            .iter()
            .find(|item| item.key.eq_ignore_ascii_case(&answer))
            .map(|item| Some(item.value))
    }
}

/// The student's per-turn action prompt over stdin/stdout. During normal
/// play there is no cancel entry: a turn always needs an action, and only
/// end of input resolves to `None`.
pub struct ConsoleActionSource;

impl ActionSource for ConsoleActionSource {
    fn choose(&mut self, legal: &[Action]) -> Option<Action> {
        let mut menu = MenuPrompt::new();
        for &action in legal {
            menu.add_item(action.key(), action.label(), action);
        }

        println!("\nWhat would you like to do?");
        let stdin = io::stdin();
        let mut input = stdin.lock();
        menu.prompt_from(&mut input, &mut io::stdout()).ok().flatten()
    }
}
