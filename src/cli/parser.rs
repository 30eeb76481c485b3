//! Splits one input line into a command word, a description and `/flag value` arguments.

use chrono::NaiveDate;

use crate::cli::core::CommandError;
use crate::ledger::{parse_amount, Recurrence, TransactionKind};

/// Character that introduces a named argument.
pub const FLAG_MARKER: char = '/';

pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Flag values in the order they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    entries: Vec<(String, String)>,
}

impl Arguments {
    fn insert(&mut self, name: String, value: String) -> Result<(), CommandError> {
        if name.is_empty() {
            return Err(CommandError::InvalidArguments(
                "flag name cannot be empty".into(),
            ));
        }
        if self.contains(&name) {
            return Err(CommandError::DuplicateArgument(name));
        }
        self.entries.push((name, value));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One tokenized input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub description: String,
    pub args: Arguments,
}

pub fn parse_line(raw: &str) -> Result<ParsedCommand, CommandError> {
    let line = raw.trim_start();
    let (word, remainder) = match line.find(char::is_whitespace) {
        Some(split) => line.split_at(split),
        None => (line, ""),
    };

    let (description, flags) = match find_flag_start(remainder) {
        Some(start) => (&remainder[..start], &remainder[start..]),
        None => (remainder, ""),
    };

    Ok(ParsedCommand {
        command: word.to_lowercase(),
        description: description.trim().to_string(),
        args: parse_flags(flags)?,
    })
}

/// Byte offset of the first flag marker that follows whitespace.
fn find_flag_start(text: &str) -> Option<usize> {
    let mut previous_is_space = false;
    for (offset, ch) in text.char_indices() {
        if ch == FLAG_MARKER && previous_is_space {
            return Some(offset);
        }
        previous_is_space = ch.is_whitespace();
    }
    None
}

fn parse_flags(segment: &str) -> Result<Arguments, CommandError> {
    let mut args = Arguments::default();
    let mut current: Option<String> = None;
    let mut words: Vec<&str> = Vec::new();

    for token in segment.split_whitespace() {
        if let Some(name) = token.strip_prefix(FLAG_MARKER) {
            if let Some(previous) = current.take() {
                args.insert(previous, words.join(" ").trim().to_string())?;
                words.clear();
            }
            current = Some(name.to_string());
        } else {
            words.push(token);
        }
    }
    if let Some(last) = current {
        args.insert(last, words.join(" ").trim().to_string())?;
    }
    Ok(args)
}

/// Parses a non-negative amount, rejecting negatives (`-0` included) and
/// strings without digits.
pub fn parse_non_negative_amount(raw: &str) -> Result<f64, CommandError> {
    parse_amount(raw.trim()).ok_or_else(|| CommandError::NotANumber(raw.trim().to_string()))
}

/// Turns a 1-based display index into a 0-based position in a list of `count`.
pub fn parse_index(raw: &str, count: usize, kind: TransactionKind) -> Result<usize, CommandError> {
    let index = parse_positive_integer(raw)?;
    if index > count {
        return Err(CommandError::IndexOutOfRange {
            index: raw.trim().to_string(),
            count,
            kind,
        });
    }
    Ok(index - 1)
}

/// Validates that `raw` is a positive integer without checking any bound.
/// Values too large for `usize` saturate, so they land out of range.
pub fn parse_positive_integer(raw: &str) -> Result<usize, CommandError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(CommandError::InvalidIndex(raw.to_string()));
    }
    match raw.parse::<usize>() {
        Ok(0) => Err(CommandError::InvalidIndex(raw.to_string())),
        Ok(index) => Ok(index),
        Err(_) => Ok(usize::MAX),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), INPUT_DATE_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use DD/MM/YYYY)", raw.trim()))
    })
}

pub fn parse_recurrence(raw: &str) -> Result<Recurrence, CommandError> {
    raw.parse::<Recurrence>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}
