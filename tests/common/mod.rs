#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use budget_tracker::{
    core::services::{CategoryService, GoalService},
    ledger::{Expense, Income, Ledger, Recurrence, Transaction},
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Ledger with two goals, two categories and entries spread over October 2023.
pub fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    let car = GoalService::add(&mut ledger, "Car", 5000.0).expect("add goal");
    GoalService::add(&mut ledger, "Holiday", 1200.0).expect("add goal");
    let food = CategoryService::add(&mut ledger, "Food").expect("add category");
    CategoryService::add(&mut ledger, "Travel").expect("add category");

    ledger.add_income(Income::new(
        Transaction::new("Salary", 3000.0, date(2023, 10, 1)),
        car,
    ));
    ledger.add_income(Income::unassigned(Transaction::new(
        "Gift",
        150.0,
        date(2023, 10, 30),
    )));
    ledger.add_expense(Expense::new(
        Transaction::new("Groceries", 80.25, date(2023, 10, 23)),
        food,
    ));
    ledger.add_expense(Expense::new(
        Transaction::new("Lunch", 12.5, date(2023, 10, 30)),
        food,
    ));
    ledger.add_expense(Expense::unassigned(
        Transaction::new("Phone", 30.0, date(2023, 10, 31)).with_recurrence(Recurrence::Monthly),
    ));
    ledger
}
