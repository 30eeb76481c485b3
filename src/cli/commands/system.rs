use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::parser::ParsedCommand;
use crate::cli::registry::CommandEntry;

use super::reject_unknown;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Save and leave the tracker", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    reject_unknown(&parsed.args, "help", &[])?;
    if parsed.description.is_empty() {
        help::print_overview(&context.registry);
        return Ok(());
    }
    let name = parsed.description.to_lowercase();
    match context.registry.get(&name) {
        Some(entry) => {
            help::print_command(entry);
            Ok(())
        }
        None => Err(CommandError::UnknownCommand(name)),
    }
}

fn cmd_exit(_context: &mut ShellContext, _parsed: &ParsedCommand) -> CommandResult {
    Err(CommandError::ExitRequested)
}
