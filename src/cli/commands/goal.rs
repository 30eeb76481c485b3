use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_amount, Table, TableColumn};
use crate::cli::output;
use crate::cli::parser::ParsedCommand;
use crate::cli::registry::CommandEntry;
use crate::core::services::{GoalService, SummaryService};

use super::{reject_description, reject_unknown, required_amount, required_value, switch};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "goal",
        "Add, remove or list savings goals",
        "goal /add <name> /amount <target> | goal /remove <name> | goal /list",
        cmd_goal,
    )]
}

/// Exactly one action flag out of `actions` must be present.
pub(crate) fn single_action(
    parsed: &ParsedCommand,
    actions: &[&'static str],
) -> Result<&'static str, CommandError> {
    let supplied: Vec<&'static str> = actions
        .iter()
        .copied()
        .filter(|action| parsed.args.contains(action))
        .collect();
    match supplied.as_slice() {
        [action] => Ok(*action),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` needs exactly one of {}",
            parsed.command,
            actions
                .iter()
                .map(|action| format!("/{}", action))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

fn cmd_goal(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    reject_description(parsed, "goal")?;
    let args = &parsed.args;
    match single_action(parsed, &["add", "remove", "list"])? {
        "add" => {
            let name = required_value(args, "add")?.to_string();
            let target = required_amount(args)?;
            reject_unknown(args, "goal", &["add", "amount"])?;
            GoalService::add(context.ledger_mut(), &name, target)?;
            output::success(format!(
                "Added goal `{}` with a target of {}.",
                name,
                format_amount(target)
            ));
        }
        "remove" => {
            let name = required_value(args, "remove")?.to_string();
            reject_unknown(args, "goal", &["remove"])?;
            let removed = GoalService::remove(context.ledger_mut(), &name)?;
            output::success(format!(
                "Removed goal `{}`; its incomes are now Uncategorised.",
                removed.description
            ));
        }
        _ => {
            switch(args, "list")?;
            reject_unknown(args, "goal", &["list"])?;
            list_goals(context);
        }
    }
    Ok(())
}

fn list_goals(context: &ShellContext) {
    let progress = SummaryService::goal_progress(context.ledger());
    output::section(format!("Goals ({})", progress.len()));
    if progress.is_empty() {
        output::info("No goals yet. Add one with `goal /add <name> /amount <target>`.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Goal").truncated(32),
        TableColumn::right("Saved"),
        TableColumn::right("Target"),
        TableColumn::left("Status"),
    ]);
    for (index, goal) in progress.iter().enumerate() {
        table.push_row(vec![
            (index + 1).to_string(),
            goal.description.clone(),
            format_amount(goal.saved),
            format_amount(goal.target),
            if goal.reached() { "reached" } else { "in progress" }.to_string(),
        ]);
    }
    output::info(table.render());
}

#[cfg(test)]
mod tests {
    use crate::cli::core::test_support::*;
    use crate::cli::core::CommandError;
    use crate::errors::LedgerError;
    use crate::ledger::is_uncategorised_name;

    #[test]
    fn goal_names_are_unique_and_the_sentinel_is_protected() {
        let mut context = context_on(date(2024, 1, 1));
        run_all(&mut context, &["goal /add Car /amount 5000", "goal /list"]);
        assert!(matches!(
            context.process_line("goal /add car /amount 10").unwrap_err(),
            CommandError::Ledger(LedgerError::AlreadyExists { .. })
        ));
        assert!(matches!(
            context
                .process_line("goal /add Uncategorised /amount 10")
                .unwrap_err(),
            CommandError::Ledger(LedgerError::Protected { kind: "goal" })
        ));
        assert!(matches!(
            context.process_line("goal /remove UNCATEGORISED").unwrap_err(),
            CommandError::Ledger(LedgerError::Protected { kind: "goal" })
        ));
        assert!(matches!(
            context.process_line("goal /remove Boat").unwrap_err(),
            CommandError::Ledger(LedgerError::NotFound { kind: "goal", .. })
        ));
    }

    #[test]
    fn goal_needs_exactly_one_action() {
        let mut context = context_on(date(2024, 1, 1));
        assert!(matches!(
            context.process_line("goal").unwrap_err(),
            CommandError::InvalidArguments(_)
        ));
        assert!(matches!(
            context.process_line("goal /add A /remove B").unwrap_err(),
            CommandError::InvalidArguments(_)
        ));
        assert!(matches!(
            context.process_line("goal /add House").unwrap_err(),
            CommandError::MissingArgument(ref f) if f == "amount"
        ));
    }

    #[test]
    fn removing_a_goal_cascades_to_its_incomes() {
        let mut context = context_on(date(2024, 1, 1));
        run_all(
            &mut context,
            &[
                "goal /add Car /amount 5000",
                "goal /add House /amount 90000",
                "add Salary /type income /amount 100 /goal Car",
                "add Bonus /type income /amount 50 /goal House",
                "goal /remove car",
            ],
        );
        let ledger = context.ledger();
        assert_eq!(ledger.goals.len(), 1);
        assert!(is_uncategorised_name(ledger.goal_name(ledger.incomes[0].goal_id)));
        assert_eq!(ledger.goal_name(ledger.incomes[1].goal_id), "House");
        assert!(ledger.is_consistent());
    }
}
