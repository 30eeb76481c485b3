use std::fs::File;
use std::io::BufWriter;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::parser::ParsedCommand;
use crate::cli::registry::CommandEntry;
use crate::storage::{export_transactions, ExportSelection};
use crate::utils::paths::ensure_dir;

use super::{optional_value, reject_description, reject_unknown};

pub const EXPORT_FILE: &str = "export.csv";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Write transactions to export.csv in the data directory",
        "export [/type income|expense|all]",
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, parsed: &ParsedCommand) -> CommandResult {
    reject_description(parsed, "export")?;
    let selection = match optional_value(&parsed.args, "type")? {
        Some(raw) => raw.trim().parse::<ExportSelection>().map_err(|value| {
            CommandError::InvalidArguments(format!(
                "invalid value `{}` for `/type` (use income, expense or all)",
                value
            ))
        })?,
        None => ExportSelection::All,
    };
    reject_unknown(&parsed.args, "export", &["type"])?;

    ensure_dir(context.data_dir())?;
    let path = context.data_dir().join(EXPORT_FILE);
    let mut writer = BufWriter::new(File::create(&path)?);
    let rows = export_transactions(context.ledger(), selection, &mut writer)?;
    tracing::info!(rows, path = %path.display(), "export written");

    output::success(format!("Exported {} entries to {}.", rows, path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::test_support::*;
    use crate::cli::core::{CliMode, ShellContext};
    use crate::config::Config;
    use crate::utils::clock::FixedClock;

    #[test]
    fn export_writes_selected_rows_into_the_data_dir() {
        let temp = tempfile::tempdir().unwrap();
        let mut context = ShellContext::with_parts(
            CliMode::Script,
            Config::default(),
            temp.path().join("data"),
            Box::new(MemoryStorage::default()),
            Box::new(FixedClock(date(2024, 5, 1))),
        )
        .unwrap();
        run_all(
            &mut context,
            &[
                "add Pay /type income /amount 10",
                "add Tea /type expense /amount 2.5 /category Drinks",
                "export /type expense",
            ],
        );
        let written = std::fs::read_to_string(temp.path().join("data").join(EXPORT_FILE)).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Expense,Tea,01/05/2024,2.50"));

        assert!(matches!(
            context.process_line("export /type both").unwrap_err(),
            CommandError::InvalidArguments(_)
        ));
    }
}
