//! Flat CSV export of incomes and expenses.

use std::{io::Write, str::FromStr};

use serde::Serialize;

use crate::ledger::{Ledger, TransactionKind};

use super::{csv_backend::format_record_date, Result};

/// Which transactions an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportSelection {
    Only(TransactionKind),
    #[default]
    All,
}

impl ExportSelection {
    fn includes(&self, kind: TransactionKind) -> bool {
        match self {
            ExportSelection::Only(only) => *only == kind,
            ExportSelection::All => true,
        }
    }
}

impl FromStr for ExportSelection {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "all" => Ok(ExportSelection::All),
            other => other.parse::<TransactionKind>().map(ExportSelection::Only),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Recurrence")]
    recurrence: &'static str,
    #[serde(rename = "Goal")]
    goal: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
}

const HEADER: [&str; 7] = [
    "Type",
    "Description",
    "Date",
    "Amount",
    "Recurrence",
    "Goal",
    "Category",
];

/// Writes the selected transactions, incomes before expenses, and returns
/// the number of data rows written.
pub fn export_transactions<W: Write>(
    ledger: &Ledger,
    selection: ExportSelection,
    writer: W,
) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    let mut rows = 0;
    if selection.includes(TransactionKind::Income) {
        for income in &ledger.incomes {
            let txn = &income.transaction;
            wtr.serialize(ExportRow {
                kind: TransactionKind::Income.title(),
                description: &txn.description,
                date: format_record_date(txn.date),
                amount: format!("{:.2}", txn.amount),
                recurrence: txn.recurrence.record_name(),
                goal: ledger.goal_name(income.goal_id),
                category: "",
            })?;
            rows += 1;
        }
    }
    if selection.includes(TransactionKind::Expense) {
        for expense in &ledger.expenses {
            let txn = &expense.transaction;
            wtr.serialize(ExportRow {
                kind: TransactionKind::Expense.title(),
                description: &txn.description,
                date: format_record_date(txn.date),
                amount: format!("{:.2}", txn.amount),
                recurrence: txn.recurrence.record_name(),
                goal: "",
                category: ledger.category_name(expense.category_id),
            })?;
            rows += 1;
        }
    }
    wtr.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::GoalService;
    use crate::ledger::{Expense, Income, Transaction};
    use chrono::NaiveDate;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let car = GoalService::add(&mut ledger, "Car", 100.0).unwrap();
        ledger.add_income(Income::new(Transaction::new("Salary", 1000.0, date), car));
        ledger.add_expense(Expense::unassigned(Transaction::new("Snacks", 3.5, date)));
        ledger
    }

    #[test]
    fn exports_all_transactions_with_header() {
        let mut buffer = Vec::new();
        let rows = export_transactions(&sample_ledger(), ExportSelection::All, &mut buffer).unwrap();
        assert_eq!(rows, 2);
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Type,Description,Date,Amount,Recurrence,Goal,Category\n\
             Income,Salary,05/03/2024,1000.00,NONE,Car,\n\
             Expense,Snacks,05/03/2024,3.50,NONE,,Uncategorised\n"
        );
    }

    #[test]
    fn selection_limits_rows() {
        let mut buffer = Vec::new();
        let rows = export_transactions(
            &sample_ledger(),
            ExportSelection::Only(TransactionKind::Expense),
            &mut buffer,
        )
        .unwrap();
        assert_eq!(rows, 1);
        assert!(!String::from_utf8(buffer).unwrap().contains("Salary"));
    }

    #[test]
    fn selection_parses_all_and_kinds() {
        assert_eq!("all".parse(), Ok(ExportSelection::All));
        assert_eq!(
            "income".parse(),
            Ok(ExportSelection::Only(TransactionKind::Income))
        );
        assert!("goals".parse::<ExportSelection>().is_err());
    }
}
