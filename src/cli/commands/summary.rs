use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::format::{format_amount, Table, TableColumn};
use crate::cli::output;
use crate::cli::parser::ParsedCommand;
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::ledger::{SummaryFilter, TransactionKind};

use super::{reject_description, reject_unknown, required_kind, switch};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Total incomes or expenses, optionally for today, this week or this month",
        "summary /type income|expense [/day] [/week] [/month]",
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    reject_description(parsed, "summary")?;
    let args = &parsed.args;
    let kind = required_kind(args)?;
    let filter = SummaryFilter {
        day: switch(args, "day")?,
        week: switch(args, "week")?,
        month: switch(args, "month")?,
    };
    reject_unknown(args, "summary", &["type", "day", "week", "month"])?;

    let ledger = context.ledger();
    let window = filter.window(context.today());
    let total = SummaryService::total(ledger, kind, window)?;

    output::section(format!("{} summary", kind.title()));
    output::info(format!(
        "Total {} ({}): {}",
        kind,
        filter.label(),
        format_amount(total)
    ));

    // Per-classification breakdowns cover all time only.
    if window.is_some() {
        return Ok(());
    }
    let (totals, heading, plural) = match kind {
        TransactionKind::Income => (SummaryService::goal_totals(ledger), "Goal", "goals"),
        TransactionKind::Expense => (
            SummaryService::category_totals(ledger),
            "Category",
            "categories",
        ),
    };
    let mut table = Table::new(vec![
        TableColumn::left(heading).truncated(24),
        TableColumn::right("Total"),
    ]);
    for (name, amount) in &totals.used {
        table.push_row(vec![name.clone(), format_amount(*amount)]);
    }
    output::info(table.render());
    if !totals.unused.is_empty() {
        output::info(format!("Unused {}: {}", plural, totals.unused.join(", ")));
    }
    Ok(())
}
