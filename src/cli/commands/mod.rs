pub mod category;
pub mod export;
pub mod goal;
pub mod summary;
pub mod system;
pub mod transaction;

use crate::cli::core::CommandError;
use crate::cli::parser::{parse_non_negative_amount, Arguments, ParsedCommand};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::ledger::TransactionKind;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(transaction::definitions());
    commands.extend(summary::definitions());
    commands.extend(goal::definitions());
    commands.extend(category::definitions());
    commands.extend(export::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// Value of a flag that must be present and non-blank.
pub(crate) fn required_value<'a>(args: &'a Arguments, flag: &str) -> Result<&'a str, CommandError> {
    match args.get(flag) {
        None => Err(CommandError::MissingArgument(flag.to_string())),
        Some(value) if value.trim().is_empty() => Err(CommandError::BlankArgument(flag.to_string())),
        Some(value) => Ok(value),
    }
}

/// Value of an optional flag; supplying it blank is still an error.
pub(crate) fn optional_value<'a>(
    args: &'a Arguments,
    flag: &str,
) -> Result<Option<&'a str>, CommandError> {
    match args.get(flag) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(CommandError::BlankArgument(flag.to_string())),
        Some(value) => Ok(Some(value)),
    }
}

/// Flags used as switches must not carry a value.
pub(crate) fn switch(args: &Arguments, flag: &str) -> Result<bool, CommandError> {
    match args.get(flag) {
        None => Ok(false),
        Some("") => Ok(true),
        Some(value) => Err(CommandError::InvalidArguments(format!(
            "`/{}` does not take a value, got `{}`",
            flag, value
        ))),
    }
}

pub(crate) fn parse_kind(raw: &str) -> Result<TransactionKind, CommandError> {
    raw.trim().parse::<TransactionKind>().map_err(|_| {
        CommandError::InvalidArguments(format!(
            "invalid value `{}` for `/type` (use income or expense)",
            raw.trim()
        ))
    })
}

pub(crate) fn required_kind(args: &Arguments) -> Result<TransactionKind, CommandError> {
    parse_kind(required_value(args, "type")?)
}

pub(crate) fn required_amount(args: &Arguments) -> Result<f64, CommandError> {
    parse_non_negative_amount(required_value(args, "amount")?)
}

/// Classification value for `kind`, rejecting the flag of the other kind.
pub(crate) fn classification_value(
    args: &Arguments,
    kind: TransactionKind,
) -> Result<Option<&str>, CommandError> {
    let other = match kind {
        TransactionKind::Income => TransactionKind::Expense,
        TransactionKind::Expense => TransactionKind::Income,
    };
    if args.contains(other.classification_flag()) {
        return Err(CommandError::WrongClassification {
            flag: other.classification_flag(),
            kind,
        });
    }
    optional_value(args, kind.classification_flag())
}

pub(crate) fn reject_description(
    parsed: &ParsedCommand,
    command: &'static str,
) -> Result<(), CommandError> {
    if parsed.description.is_empty() {
        Ok(())
    } else {
        Err(CommandError::UnexpectedDescription(command))
    }
}

/// Rejects any flag outside `allowed`.
pub(crate) fn reject_unknown(
    args: &Arguments,
    command: &'static str,
    allowed: &[&str],
) -> Result<(), CommandError> {
    match args.names().find(|name| !allowed.contains(name)) {
        Some(flag) => Err(CommandError::UnexpectedArgument {
            flag: flag.to_string(),
            command,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::parse_line;

    #[test]
    fn every_command_is_registered_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "add", "edit", "remove", "list", "summary", "goal", "category", "export", "help",
                "exit"
            ]
        );
    }

    #[test]
    fn classification_of_the_other_kind_is_rejected() {
        let parsed = parse_line("add x /type income /category Food").unwrap();
        assert!(matches!(
            classification_value(&parsed.args, TransactionKind::Income),
            Err(CommandError::WrongClassification {
                flag: "category",
                ..
            })
        ));
    }

    #[test]
    fn switches_must_be_blank() {
        let parsed = parse_line("summary /day /week now").unwrap();
        assert!(switch(&parsed.args, "day").unwrap());
        assert!(!switch(&parsed.args, "month").unwrap());
        assert!(switch(&parsed.args, "week").is_err());
    }
}
