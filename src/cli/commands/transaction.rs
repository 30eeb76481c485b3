use uuid::Uuid;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_amount, format_date, Table, TableColumn};
use crate::cli::output;
use crate::cli::parser::{
    parse_date, parse_index, parse_non_negative_amount, parse_positive_integer, parse_recurrence,
    ParsedCommand,
};
use crate::cli::registry::CommandEntry;
use crate::core::services::{CategoryService, GoalService};
use crate::errors::LedgerError;
use crate::ledger::{Expense, Income, Transaction, TransactionKind};

use super::{
    classification_value, optional_value, parse_kind, reject_description, reject_unknown,
    required_amount, required_kind,
};

const ADD_FLAGS: &[&str] = &["type", "amount", "date", "goal", "category", "recurrence"];
const EDIT_FLAGS: &[&str] = &["type", "description", "amount", "goal", "category", "date"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an income or an expense",
            "add <description> /type income|expense /amount <amount> [/date DD/MM/YYYY] [/goal <goal>] [/category <category>] [/recurrence none|daily|weekly|monthly]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change the description, amount or classification of an entry",
            "edit <index> /type income|expense [/description <text>] [/amount <amount>] [/goal <goal>] [/category <category>]",
            cmd_edit,
        ),
        CommandEntry::new(
            "remove",
            "Delete an entry by its listing index",
            "remove <index> /type income|expense",
            cmd_remove,
        ),
        CommandEntry::new(
            "list",
            "List incomes, expenses or both",
            "list [/type income|expense]",
            cmd_list,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    if parsed.description.is_empty() {
        return Err(CommandError::MissingDescription("add"));
    }
    let args = &parsed.args;
    let kind = required_kind(args)?;
    let amount = required_amount(args)?;
    let date = optional_value(args, "date")?
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| context.today());
    let recurrence = optional_value(args, "recurrence")?
        .map(parse_recurrence)
        .transpose()?
        .unwrap_or_default();
    let classification = classification_value(args, kind)?;
    reject_unknown(args, "add", ADD_FLAGS)?;

    let transaction =
        Transaction::new(parsed.description.clone(), amount, date).with_recurrence(recurrence);
    let ledger = context.ledger_mut();
    let filed_under = match kind {
        TransactionKind::Income => {
            let goal_id = match classification {
                Some(name) => GoalService::find(ledger, name)?,
                None => Uuid::nil(),
            };
            ledger.add_income(Income::new(transaction, goal_id));
            ledger.goal_name(goal_id).to_string()
        }
        TransactionKind::Expense => {
            let category_id = classification
                .map(|name| CategoryService::find_or_create(ledger, name))
                .unwrap_or_else(Uuid::nil);
            ledger.add_expense(Expense::new(transaction, category_id));
            ledger.category_name(category_id).to_string()
        }
    };
    let count = ledger.count(kind);
    tracing::info!(%kind, amount, "entry added");

    output::success(format!(
        "Added {} `{}` of {} on {} under {}.",
        kind,
        parsed.description,
        format_amount(amount),
        format_date(date),
        filed_under
    ));
    output::info(format!("There are now {} {} entries.", count, kind));

    let generated = context.generate_recurring();
    if generated > 0 {
        output::info(format!(
            "Generated {} recurring occurrence(s) that were already due.",
            generated
        ));
    }
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    require_index(parsed, "edit")?;
    let args = &parsed.args;
    let kind = required_kind(args)?;
    let (display, position) = resolve_position(context, parsed, kind)?;

    let description = optional_value(args, "description")?;
    let amount = optional_value(args, "amount")?
        .map(parse_non_negative_amount)
        .transpose()?;
    let classification = classification_value(args, kind)?;
    let goal_id = match (kind, classification) {
        (TransactionKind::Income, Some(name)) => Some(GoalService::find(context.ledger(), name)?),
        _ => None,
    };
    if args.get("date").is_some_and(|value| !value.trim().is_empty()) {
        return Err(CommandError::DateNotEditable);
    }
    if description.is_none() && amount.is_none() && classification.is_none() {
        return Err(CommandError::NothingToEdit);
    }
    reject_unknown(args, "edit", EDIT_FLAGS)?;

    let ledger = context.ledger_mut();
    let category_id = match (kind, classification) {
        (TransactionKind::Expense, Some(name)) => {
            Some(CategoryService::find_or_create(ledger, name))
        }
        _ => None,
    };
    let out_of_range = || CommandError::IndexOutOfRange {
        index: display.to_string(),
        count: 0,
        kind,
    };
    match kind {
        TransactionKind::Income => {
            let income = ledger.income_mut(position).ok_or_else(out_of_range)?;
            apply_changes(&mut income.transaction, description, amount);
            if let Some(goal_id) = goal_id {
                income.goal_id = goal_id;
            }
        }
        TransactionKind::Expense => {
            let expense = ledger.expense_mut(position).ok_or_else(out_of_range)?;
            apply_changes(&mut expense.transaction, description, amount);
            if let Some(category_id) = category_id {
                expense.category_id = category_id;
            }
        }
    }
    tracing::info!(%kind, position, "entry edited");

    output::success(format!("Updated {} #{}.", kind, display));
    Ok(())
}

fn apply_changes(transaction: &mut Transaction, description: Option<&str>, amount: Option<f64>) {
    if let Some(description) = description {
        transaction.description = description.trim().to_string();
    }
    if let Some(amount) = amount {
        transaction.amount = amount;
    }
}

fn cmd_remove(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    require_index(parsed, "remove")?;
    let kind = required_kind(&parsed.args)?;
    let (display, position) = resolve_position(context, parsed, kind)?;
    reject_unknown(&parsed.args, "remove", &["type"])?;

    let ledger = context.ledger_mut();
    let removed = match kind {
        TransactionKind::Income => ledger.remove_income_at(position).map(|i| i.transaction),
        TransactionKind::Expense => ledger.remove_expense_at(position).map(|e| e.transaction),
    };
    let removed = removed.ok_or(CommandError::IndexOutOfRange {
        index: display.to_string(),
        count: 0,
        kind,
    })?;
    tracing::info!(%kind, position, "entry removed");

    output::success(format!(
        "Removed {} #{} `{}` ({}).",
        kind,
        display,
        removed.description,
        format_amount(removed.amount)
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    reject_description(parsed, "list")?;
    let kind = optional_value(&parsed.args, "type")?
        .map(parse_kind)
        .transpose()?;
    reject_unknown(&parsed.args, "list", &["type"])?;

    match kind {
        Some(kind) => {
            if context.ledger().count(kind) == 0 {
                return Err(LedgerError::NothingToList(kind).into());
            }
            print_listing(context, kind);
        }
        None => {
            let ledger = context.ledger();
            if ledger.incomes.is_empty() && ledger.expenses.is_empty() {
                return Err(LedgerError::NothingRecorded.into());
            }
            for kind in [TransactionKind::Income, TransactionKind::Expense] {
                if context.ledger().count(kind) == 0 {
                    output::section(format!("{} entries (0)", kind.title()));
                    output::info(format!("No {} entries yet.", kind));
                } else {
                    print_listing(context, kind);
                }
            }
        }
    }
    Ok(())
}

fn print_listing(context: &ShellContext, kind: TransactionKind) {
    let ledger = context.ledger();
    let positions = ledger.listing_positions(kind, context.list_order());
    let transactions = ledger.transactions(kind);

    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Description").truncated(32),
        TableColumn::left("Date"),
        TableColumn::right("Amount"),
        TableColumn::left("Recurrence"),
        TableColumn::left(kind_classification_header(kind)).truncated(24),
    ]);
    let mut total = 0.0;
    for (display, position) in positions.iter().enumerate() {
        let transaction = transactions[*position];
        total += transaction.amount;
        table.push_row(vec![
            (display + 1).to_string(),
            transaction.description.clone(),
            format_date(transaction.date),
            format_amount(transaction.amount),
            transaction.recurrence.to_string(),
            ledger
                .classification_name(kind, *position)
                .unwrap_or_default()
                .to_string(),
        ]);
    }

    output::section(format!("{} entries ({})", kind.title(), positions.len()));
    output::info(table.render());
    output::info(format!("Total: {}", format_amount(total)));
}

fn kind_classification_header(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "Goal",
        TransactionKind::Expense => "Category",
    }
}

fn require_index(parsed: &ParsedCommand, command: &'static str) -> CommandResult {
    if parsed.description.is_empty() {
        return Err(CommandError::MissingIndex(command));
    }
    parse_positive_integer(&parsed.description)?;
    Ok(())
}

/// Display index and storage position addressed by the description.
fn resolve_position(
    context: &ShellContext,
    parsed: &ParsedCommand,
    kind: TransactionKind,
) -> Result<(usize, usize), CommandError> {
    let ledger = context.ledger();
    let count = ledger.count(kind);
    let index = parse_index(&parsed.description, count, kind)?;
    let positions = ledger.listing_positions(kind, context.list_order());
    positions
        .get(index)
        .map(|position| (index + 1, *position))
        .ok_or(CommandError::IndexOutOfRange {
            index: (index + 1).to_string(),
            count,
            kind,
        })
}
