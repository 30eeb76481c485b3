use colored::Colorize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

static PLAIN: AtomicBool = AtomicBool::new(false);

/// Disables colours and labels decoration, used for scripted sessions.
pub fn set_plain(plain: bool) {
    PLAIN.store(plain, Ordering::Relaxed);
    if plain {
        colored::control::set_override(false);
    }
}

fn is_plain() -> bool {
    PLAIN.load(Ordering::Relaxed)
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info | MessageKind::Section => "",
        MessageKind::Success => "[ok] ",
        MessageKind::Warning => "[!] ",
        MessageKind::Error => "[x] ",
    }
}

pub(crate) fn format_message(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let base = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{}{}", label(kind), text),
    };
    if is_plain() {
        return base;
    }
    match kind {
        MessageKind::Success => base.bright_green().to_string(),
        MessageKind::Warning => base.bright_yellow().to_string(),
        MessageKind::Error => base.bright_red().to_string(),
        MessageKind::Section => base.bold().to_string(),
        MessageKind::Info => base,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = format_message(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_messages_keep_labels_without_colour() {
        set_plain(true);
        assert_eq!(format_message(MessageKind::Error, "boom"), "[x] boom");
        assert_eq!(format_message(MessageKind::Section, " Goals "), "=== Goals ===");
        assert_eq!(format_message(MessageKind::Info, "hello"), "hello");
    }
}
