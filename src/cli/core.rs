//! Shell context, command errors and per-line dispatch.

use std::{env, io, path::PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    errors::{LedgerError, StorageError},
    ledger::{generate_due_occurrences, Ledger, ListOrder, TransactionKind},
    storage::{CsvStorage, LoadReport, StorageBackend},
    utils::clock::{Clock, FixedClock, SystemClock},
};

use super::commands;
use super::output;
use super::parser::{parse_line, ParsedCommand};
use super::registry::CommandRegistry;

/// Environment variable pinning "today" to a `YYYY-MM-DD` date.
pub const TODAY_ENV: &str = "BUDGET_TRACKER_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single command; reported and recovered per line.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("no command entered")]
    EmptyCommand,
    #[error("line {0} is not valid UTF-8 and was skipped")]
    InvalidEncoding(usize),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{0}` needs a description")]
    MissingDescription(&'static str),
    #[error("`{0}` does not take a description")]
    UnexpectedDescription(&'static str),
    #[error("`{0}` needs the index of an entry")]
    MissingIndex(&'static str),
    #[error("index `{0}` must be a positive integer")]
    InvalidIndex(String),
    #[error("index {index} is out of range, there are {count} {kind} entries")]
    IndexOutOfRange {
        index: String,
        count: usize,
        kind: TransactionKind,
    },
    #[error("missing argument `/{0}`")]
    MissingArgument(String),
    #[error("argument `/{0}` cannot be blank")]
    BlankArgument(String),
    #[error("duplicate argument `/{0}`")]
    DuplicateArgument(String),
    #[error("`/{flag}` is not accepted by `{command}`")]
    UnexpectedArgument { flag: String, command: &'static str },
    #[error("`/{flag}` cannot be used with {kind} entries")]
    WrongClassification {
        flag: &'static str,
        kind: TransactionKind,
    },
    #[error("`{0}` is not a valid non-negative amount")]
    NotANumber(String),
    #[error("the date of an entry cannot be edited")]
    DateNotEditable,
    #[error("nothing to edit, supply /description, /amount, /goal or /category")]
    NothingToEdit,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    /// Errors caused by the shape of the input line rather than ledger state.
    fn is_usage_error(&self) -> bool {
        !matches!(
            self,
            CommandError::Ledger(_)
                | CommandError::Storage(_)
                | CommandError::Io(_)
                | CommandError::ExitRequested
                | CommandError::UnknownCommand(_)
                | CommandError::EmptyCommand
                | CommandError::InvalidEncoding(_)
        )
    }
}

/// Failure that ends the session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Storage(StorageError::Io(err))
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Session state handed to every command handler.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    ledger: Ledger,
    config: Config,
    data_dir: PathBuf,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    pub(crate) last_command: Option<String>,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        Self::from_config_manager(mode, &manager)
    }

    fn from_config_manager(mode: CliMode, manager: &ConfigManager) -> Result<Self, CliError> {
        if !manager.path().exists() {
            manager.save(&Config::default())?;
        }
        let config = manager.load()?;
        let data_dir = manager.data_dir(&config);
        let storage = CsvStorage::new(data_dir.clone());
        Self::with_parts(
            mode,
            config,
            data_dir,
            Box::new(storage),
            clock_from_env()?,
        )
    }

    /// Builds a context from explicit collaborators, loading the ledger and
    /// catching up recurring entries.
    pub fn with_parts(
        mode: CliMode,
        config: Config,
        data_dir: PathBuf,
        storage: Box<dyn StorageBackend>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let (ledger, report) = storage.load()?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let mut context = ShellContext {
            mode,
            registry,
            ledger,
            config,
            data_dir,
            storage,
            clock,
            last_command: None,
            running: true,
        };
        context.report_load(&report);
        context.generate_recurring();
        Ok(context)
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Replaces the ledger with a fresh, empty instance.
    pub fn reset_ledger(&mut self) {
        self.ledger = Ledger::new();
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn list_order(&self) -> ListOrder {
        self.config.list_order
    }

    pub(crate) fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn generate_recurring(&mut self) -> usize {
        let today = self.clock.today();
        generate_due_occurrences(&mut self.ledger, today)
    }

    pub fn save(&self) -> Result<(), StorageError> {
        self.storage.save(&self.ledger)
    }

    /// Parses and runs one line.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(CommandError::EmptyCommand);
        }
        self.last_command = Some(trimmed.to_string());

        let parsed = parse_line(trimmed)?;
        match self.dispatch(&parsed) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            Err(err) => Err(err),
        }
    }

    fn dispatch(&mut self, parsed: &ParsedCommand) -> CommandResult {
        let handler = self
            .registry
            .handler(&parsed.command)
            .ok_or_else(|| CommandError::UnknownCommand(parsed.command.clone()))?;
        tracing::debug!(command = %parsed.command, args = parsed.args.len(), "dispatching");
        handler(self, parsed)
    }

    pub(crate) fn suggest_command(&self, input: &str) -> Option<&'static str> {
        self.registry.closest(input)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::UnknownCommand(ref word) => {
                output::error(&err);
                if let Some(best) = self.suggest_command(word) {
                    output::info(format!("Did you mean `{}`?", best));
                }
                output::info("Type `help` to see available commands.");
            }
            CommandError::EmptyCommand => {
                output::error(&err);
                output::info("Type `help` to see available commands.");
            }
            ref usage if usage.is_usage_error() => {
                output::error(usage);
                let command = self
                    .last_command
                    .as_deref()
                    .and_then(|line| line.split_whitespace().next())
                    .map(str::to_lowercase)
                    .unwrap_or_else(|| "<command>".to_string());
                output::info(format!("Use `help {}` for usage details.", command));
            }
            other => output::error(other),
        }
    }

    fn report_load(&self, report: &LoadReport) {
        if report.skipped > 0 {
            output::warning(format!(
                "Skipped {} malformed record(s) while loading.",
                report.skipped
            ));
        }
        let notes = report.warnings.len().saturating_sub(report.skipped);
        if notes > 0 {
            output::warning(format!(
                "{} record(s) referenced a missing goal or category and were moved to Uncategorised.",
                notes
            ));
        }
    }

    /// Saves the ledger before the session ends.
    pub(crate) fn shutdown(&mut self) -> Result<(), CliError> {
        self.running = false;
        self.save()?;
        Ok(())
    }
}

fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(|date| Box::new(FixedClock(date)) as Box<dyn Clock>)
            .map_err(|_| CliError::Input(format!("{} must be YYYY-MM-DD, got `{}`", TODAY_ENV, raw))),
        Err(_) => Ok(Box::new(SystemClock)),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn unknown_commands_are_errors_with_suggestions() {
        let mut context = context_on(date(2024, 1, 1));
        let err = context.process_line("lst").unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(ref word) if word == "lst"));
        assert_eq!(context.suggest_command("lst"), Some("list"));
        assert_eq!(context.suggest_command("sumary"), Some("summary"));
        assert_eq!(context.suggest_command("zzzzzzzzzz"), None);
    }

    #[test]
    fn blank_lines_are_reported_and_session_continues() {
        let mut context = context_on(date(2024, 1, 1));
        assert!(matches!(
            context.process_line("   "),
            Err(CommandError::EmptyCommand)
        ));
        assert!(context.running);
        assert!(matches!(
            context.process_line("exit"),
            Ok(LoopControl::Exit)
        ));
        assert!(!context.running);
    }

    #[test]
    fn command_word_is_case_insensitive() {
        let mut context = context_on(date(2024, 1, 1));
        run_all(
            &mut context,
            &["ADD Salary /type income /amount 100 /date 01/01/2024"],
        );
        assert_eq!(context.ledger().incomes.len(), 1);
    }

    #[test]
    fn reset_replaces_the_ledger() {
        let mut context = context_on(date(2024, 1, 1));
        run_all(&mut context, &["category /add Food"]);
        context.reset_ledger();
        assert!(context.ledger().categories.is_empty());
    }

    #[test]
    fn startup_catches_up_recurring_entries() {
        use crate::ledger::{Income, Recurrence, Transaction};

        let mut ledger = Ledger::new();
        ledger.add_income(Income::unassigned(
            Transaction::new("Salary", 1000.0, date(2024, 1, 31))
                .with_recurrence(Recurrence::Monthly),
        ));
        let context = context_with(ledger, date(2024, 3, 31), Config::default());
        let dates: Vec<_> = context
            .ledger()
            .incomes
            .iter()
            .map(|income| income.transaction.date)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 29)]
        );
    }

    #[test]
    fn shutdown_saves_the_ledger() {
        let storage = MemoryStorage::default();
        let saved = storage.saved.clone();
        let mut context = ShellContext::with_parts(
            CliMode::Script,
            Config::default(),
            std::env::temp_dir(),
            Box::new(storage),
            Box::new(FixedClock(date(2024, 1, 1))),
        )
        .unwrap();
        run_all(&mut context, &["goal /add Car /amount 500"]);
        context.shutdown().unwrap();
        let saved = saved.borrow();
        assert_eq!(saved.as_ref().unwrap().goals[0].description, "Car");
    }
}
