//! Flat CSV record files: one each for goals, categories, incomes and expenses.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use csv::Trim;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ledger::{
        is_uncategorised_name, parse_amount, Category, Expense, Goal, Income, Ledger, Recurrence,
        Transaction,
    },
    utils::paths::{ensure_dir, tmp_path},
};

use super::{LoadReport, Result, StorageBackend};

pub const RECORD_DATE_FORMAT: &str = "%d/%m/%Y";

const GOALS_FILE: &str = "goals.csv";
const CATEGORIES_FILE: &str = "categories.csv";
const INCOMES_FILE: &str = "incomes.csv";
const EXPENSES_FILE: &str = "expenses.csv";

#[derive(Debug, Serialize, Deserialize)]
struct GoalRecord {
    description: String,
    amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CategoryRecord {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct IncomeRecord {
    description: String,
    amount: String,
    date: String,
    goal: String,
    recurrence: String,
    has_next: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ExpenseRecord {
    description: String,
    amount: String,
    date: String,
    category: String,
    recurrence: String,
    has_next: String,
}

/// Stores a ledger as four CSV files inside one directory.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    root: PathBuf,
}

impl CsvStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn load_goals(&self, ledger: &mut Ledger, report: &mut LoadReport) -> Result<()> {
        for (line, row) in read_rows::<GoalRecord>(&self.file(GOALS_FILE), report)? {
            let description = row.description.trim();
            if description.is_empty() {
                report.skip(format!("{GOALS_FILE}:{line}: blank goal description"));
                continue;
            }
            if is_uncategorised_name(description) || ledger.goal_position(description).is_some() {
                report.skip(format!(
                    "{GOALS_FILE}:{line}: duplicate goal `{description}`"
                ));
                continue;
            }
            let Some(target) = parse_amount(row.amount.trim()) else {
                report.skip(format!(
                    "{GOALS_FILE}:{line}: invalid amount `{}`",
                    row.amount
                ));
                continue;
            };
            ledger.add_goal(Goal::new(description, target));
        }
        Ok(())
    }

    fn load_categories(&self, ledger: &mut Ledger, report: &mut LoadReport) -> Result<()> {
        for (line, row) in read_rows::<CategoryRecord>(&self.file(CATEGORIES_FILE), report)? {
            let name = row.name.trim();
            if name.is_empty() {
                report.skip(format!("{CATEGORIES_FILE}:{line}: blank category name"));
                continue;
            }
            if is_uncategorised_name(name) || ledger.category_position(name).is_some() {
                report.skip(format!(
                    "{CATEGORIES_FILE}:{line}: duplicate category `{name}`"
                ));
                continue;
            }
            ledger.add_category(Category::new(name));
        }
        Ok(())
    }

    fn load_incomes(&self, ledger: &mut Ledger, report: &mut LoadReport) -> Result<()> {
        for (line, row) in read_rows::<IncomeRecord>(&self.file(INCOMES_FILE), report)? {
            let fields = RowFields {
                description: &row.description,
                amount: &row.amount,
                date: &row.date,
                recurrence: &row.recurrence,
                has_next: &row.has_next,
            };
            let transaction = match fields.parse() {
                Ok(transaction) => transaction,
                Err(reason) => {
                    report.skip(format!("{INCOMES_FILE}:{line}: {reason}"));
                    continue;
                }
            };
            let goal = row.goal.trim();
            let goal_id = if goal.is_empty() || is_uncategorised_name(goal) {
                Uuid::nil()
            } else if let Some(index) = ledger.goal_position(goal) {
                ledger.goals[index].id
            } else {
                report.note(format!(
                    "{INCOMES_FILE}:{line}: unknown goal `{goal}`, using Uncategorised"
                ));
                Uuid::nil()
            };
            ledger.add_income(Income::new(transaction, goal_id));
        }
        Ok(())
    }

    fn load_expenses(&self, ledger: &mut Ledger, report: &mut LoadReport) -> Result<()> {
        for (line, row) in read_rows::<ExpenseRecord>(&self.file(EXPENSES_FILE), report)? {
            let fields = RowFields {
                description: &row.description,
                amount: &row.amount,
                date: &row.date,
                recurrence: &row.recurrence,
                has_next: &row.has_next,
            };
            let transaction = match fields.parse() {
                Ok(transaction) => transaction,
                Err(reason) => {
                    report.skip(format!("{EXPENSES_FILE}:{line}: {reason}"));
                    continue;
                }
            };
            let category = row.category.trim();
            let category_id = if category.is_empty() || is_uncategorised_name(category) {
                Uuid::nil()
            } else if let Some(index) = ledger.category_position(category) {
                ledger.categories[index].id
            } else {
                report.note(format!(
                    "{EXPENSES_FILE}:{line}: unknown category `{category}`, using Uncategorised"
                ));
                Uuid::nil()
            };
            ledger.add_expense(Expense::new(transaction, category_id));
        }
        Ok(())
    }
}

impl StorageBackend for CsvStorage {
    fn load(&self) -> Result<(Ledger, LoadReport)> {
        let mut ledger = Ledger::new();
        let mut report = LoadReport::default();
        // Goals and categories first so transaction rows can resolve names.
        self.load_goals(&mut ledger, &mut report)?;
        self.load_categories(&mut ledger, &mut report)?;
        self.load_incomes(&mut ledger, &mut report)?;
        self.load_expenses(&mut ledger, &mut report)?;
        tracing::info!(
            goals = ledger.goals.len(),
            categories = ledger.categories.len(),
            incomes = ledger.incomes.len(),
            expenses = ledger.expenses.len(),
            skipped = report.skipped,
            root = %self.root.display(),
            "ledger loaded"
        );
        Ok((ledger, report))
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        ensure_dir(&self.root)?;

        write_rows(
            &self.file(GOALS_FILE),
            ledger.goals.iter().map(|goal| GoalRecord {
                description: goal.description.clone(),
                amount: format_amount(goal.target_amount),
            }),
        )?;
        write_rows(
            &self.file(CATEGORIES_FILE),
            ledger.categories.iter().map(|category| CategoryRecord {
                name: category.name.clone(),
            }),
        )?;
        write_rows(
            &self.file(INCOMES_FILE),
            ledger.incomes.iter().map(|income| {
                let txn = &income.transaction;
                IncomeRecord {
                    description: txn.description.clone(),
                    amount: format_amount(txn.amount),
                    date: format_record_date(txn.date),
                    goal: ledger.goal_name(income.goal_id).to_string(),
                    recurrence: txn.recurrence.record_name().to_string(),
                    has_next: txn.has_generated_next.to_string(),
                }
            }),
        )?;
        write_rows(
            &self.file(EXPENSES_FILE),
            ledger.expenses.iter().map(|expense| {
                let txn = &expense.transaction;
                ExpenseRecord {
                    description: txn.description.clone(),
                    amount: format_amount(txn.amount),
                    date: format_record_date(txn.date),
                    category: ledger.category_name(expense.category_id).to_string(),
                    recurrence: txn.recurrence.record_name().to_string(),
                    has_next: txn.has_generated_next.to_string(),
                }
            }),
        )?;

        tracing::info!(root = %self.root.display(), "ledger saved");
        Ok(())
    }
}

struct RowFields<'a> {
    description: &'a str,
    amount: &'a str,
    date: &'a str,
    recurrence: &'a str,
    has_next: &'a str,
}

impl RowFields<'_> {
    fn parse(&self) -> std::result::Result<Transaction, String> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err("blank description".into());
        }
        let amount = parse_amount(self.amount.trim())
            .ok_or_else(|| format!("invalid amount `{}`", self.amount))?;
        let date = NaiveDate::parse_from_str(self.date.trim(), RECORD_DATE_FORMAT)
            .map_err(|_| format!("invalid date `{}`", self.date))?;
        let recurrence = self
            .recurrence
            .parse::<Recurrence>()
            .map_err(|err| err.to_string())?;
        let has_next = match self.has_next.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            other => return Err(format!("invalid boolean `{other}`")),
        };
        let mut transaction = Transaction::new(description, amount, date).with_recurrence(recurrence);
        transaction.has_generated_next = has_next;
        Ok(transaction)
    }
}

/// Reads every well-formed row of `path`, numbered by file line. A missing
/// file is an empty collection; rows that do not fit the record are skipped.
fn read_rows<T: DeserializeOwned>(
    path: &Path,
    report: &mut LoadReport,
) -> Result<Vec<(usize, T)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        let line = index + 2;
        match result {
            Ok(row) => rows.push((line, row)),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => report.skip(format!("{name}:{line}: malformed row ({err})")),
        }
    }
    Ok(rows)
}

fn write_rows<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> Result<()> {
    let tmp = tmp_path(path);
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        let mut wrote_any = false;
        for row in rows {
            writer.serialize(row)?;
            wrote_any = true;
        }
        if !wrote_any {
            // serialize() emits the header lazily; keep empty files readable.
            drop(writer);
            fs::write(&tmp, "")?;
        } else {
            writer.flush()?;
        }
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}
