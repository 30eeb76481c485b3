use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::format::{format_amount, Table, TableColumn};
use crate::cli::output;
use crate::cli::parser::ParsedCommand;
use crate::cli::registry::CommandEntry;
use crate::core::services::{CategoryService, SummaryService};

use super::goal::single_action;
use super::{reject_description, reject_unknown, required_value, switch};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Add, remove or list expense categories",
        "category /add <name> | category /remove <name> | category /list",
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    reject_description(parsed, "category")?;
    let args = &parsed.args;
    match single_action(parsed, &["add", "remove", "list"])? {
        "add" => {
            let name = required_value(args, "add")?.to_string();
            reject_unknown(args, "category", &["add"])?;
            CategoryService::add(context.ledger_mut(), &name)?;
            output::success(format!("Added category `{}`.", name));
        }
        "remove" => {
            let name = required_value(args, "remove")?.to_string();
            reject_unknown(args, "category", &["remove"])?;
            let removed = CategoryService::remove(context.ledger_mut(), &name)?;
            output::success(format!(
                "Removed category `{}`; its expenses are now Uncategorised.",
                removed.name
            ));
        }
        _ => {
            switch(args, "list")?;
            reject_unknown(args, "category", &["list"])?;
            list_categories(context);
        }
    }
    Ok(())
}

fn list_categories(context: &ShellContext) {
    let ledger = context.ledger();
    let categories = CategoryService::list(ledger);
    output::section(format!("Categories ({})", categories.len()));
    if categories.is_empty() {
        output::info("No categories yet. Add one with `category /add <name>`.");
        return;
    }
    let totals = SummaryService::category_totals(ledger);
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Category").truncated(32),
        TableColumn::right("Spent"),
    ]);
    for (index, category) in categories.iter().enumerate() {
        let spent = totals
            .used
            .iter()
            .find(|(name, _)| *name == category.name)
            .map(|(_, amount)| *amount)
            .unwrap_or(0.0);
        table.push_row(vec![
            (index + 1).to_string(),
            category.name.clone(),
            format_amount(spent),
        ]);
    }
    output::info(table.render());
}
