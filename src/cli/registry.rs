//! Command table consulted by the dispatcher, `help` and tab completion.

use std::collections::HashMap;

use strsim::levenshtein;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::parser::ParsedCommand;

/// Largest edit distance still offered as a "did you mean" hint.
pub const MAX_SUGGESTION_DISTANCE: usize = 3;

pub type CommandHandler = fn(&mut ShellContext, &ParsedCommand) -> CommandResult;

/// A registered command with its help text.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands in registration order, looked up by lower-case name.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    by_name: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`; a second entry with the same name replaces the first in place.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.by_name.get(entry.name) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.by_name.insert(entry.name, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Finds a command by the word typed at the prompt, ignoring case.
    pub fn get(&self, word: &str) -> Option<&CommandEntry> {
        self.by_name
            .get(word.to_lowercase().as_str())
            .map(|&slot| &self.entries[slot])
    }

    pub fn handler(&self, word: &str) -> Option<CommandHandler> {
        self.get(word).map(|entry| entry.handler)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Closest registered name to a mistyped word; ties go to the earlier
    /// registration.
    pub fn closest(&self, word: &str) -> Option<&'static str> {
        if word.is_empty() {
            return None;
        }
        let word = word.to_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &word), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .map(|(_, name)| name)
    }
}
