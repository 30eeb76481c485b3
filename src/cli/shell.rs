use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use dialoguer::Confirm;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;

/// Set to run commands from stdin without a prompt.
pub const SCRIPT_ENV: &str = "BUDGET_TRACKER_CLI_SCRIPT";

const PROMPT: &str = "budget> ";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    if mode == CliMode::Script {
        output::set_plain(true);
    }

    let mut context = ShellContext::new(mode)?;
    greet(&context);

    let outcome = match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    };
    context.shutdown()?;
    output::info("Your records have been saved. Goodbye!");
    outcome
}

fn greet(context: &ShellContext) {
    let ledger = context.ledger();
    output::section("Budget tracker");
    output::info(format!(
        "{} income(s), {} expense(s), {} goal(s) and {} categor(ies) loaded.",
        ledger.incomes.len(),
        ledger.expenses.len(),
        ledger.goals.len(),
        ledger.categories.len()
    ));
    if context.mode() == CliMode::Interactive {
        output::info("Type `help` to see available commands.");
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));

    while context.running {
        match editor.readline(PROMPT) {
            Ok(line) => {
                // An empty prompt line just asks again.
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.trim()).ok();
                if handle_line(context, &line) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    run_lines(context, stdin.lock())
}

/// Feeds `reader` to the context line by line until `exit` or end of input.
/// Lines that are not UTF-8 are reported and skipped.
fn run_lines<R: BufRead>(context: &mut ShellContext, mut reader: R) -> Result<(), CliError> {
    let mut buffer = Vec::new();
    let mut line_number = 0;
    while context.running {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;
        let control = match std::str::from_utf8(&buffer) {
            Ok(line) => handle_line(context, line),
            Err(_) => {
                context.report_error(CommandError::InvalidEncoding(line_number));
                LoopControl::Continue
            }
        };
        if control == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> LoopControl {
    match context.process_line(line) {
        Ok(control) => control,
        Err(err) => {
            context.report_error(err);
            LoopControl::Continue
        }
    }
}

fn confirm_exit() -> Result<bool, CliError> {
    Confirm::new()
        .with_prompt("Save and exit?")
        .default(false)
        .interact()
        .map_err(|err| CliError::Command(err.to_string()))
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let leading = prefix.len() - prefix.trim_start().len();
        // Only the command word is completed.
        if prefix[leading..].contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let needle = prefix[leading..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((leading, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::test_support::{context_on, date};

    #[test]
    fn script_lines_that_are_not_utf8_are_skipped() {
        let mut context = context_on(date(2024, 1, 1));
        let input: &[u8] = b"category /add Food\nadd caf\xe9 /type expense /amount 2\r\ncategory /add Travel\nexit\ncategory /add Never\n";
        run_lines(&mut context, input).unwrap();

        let names: Vec<_> = context
            .ledger()
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Travel"]);
        assert!(context.ledger().expenses.is_empty());
        assert!(!context.running);
    }

    #[test]
    fn script_without_trailing_newline_runs_last_line() {
        let mut context = context_on(date(2024, 1, 1));
        run_lines(&mut context, &b"goal /add Car /amount 10"[..]).unwrap();
        assert_eq!(context.ledger().goals.len(), 1);
    }

    #[test]
    fn completes_only_the_command_word() {
        let helper = CommandHelper::new(vec!["summary", "add", "goal"]);
        let history = DefaultHistory::new();
        let ctx = ReadlineContext::new(&history);

        let (start, pairs) = helper.complete("su", 2, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "summary");

        let (_, pairs) = helper.complete("add x", 5, &ctx).unwrap();
        assert!(pairs.is_empty());
    }
}
