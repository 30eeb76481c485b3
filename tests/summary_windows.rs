mod common;

use budget_tracker::{
    core::services::SummaryService,
    errors::LedgerError,
    ledger::{DateWindow, Expense, Ledger, SummaryFilter, Transaction, TransactionKind},
};
use common::{date, sample_ledger};

fn ledger_with_expenses_on(days: &[(u32, f64)]) -> Ledger {
    let mut ledger = Ledger::new();
    for (day, amount) in days {
        ledger.add_expense(Expense::unassigned(Transaction::new(
            "Entry",
            *amount,
            date(2023, 10, *day),
        )));
    }
    ledger
}

#[test]
fn day_wins_over_week_and_month() {
    let ledger = ledger_with_expenses_on(&[(23, 1.0), (30, 10.0), (31, 100.0), (31, 1000.0)]);
    let all = SummaryFilter {
        day: true,
        week: true,
        month: true,
    };
    let window = all.window(date(2023, 10, 31));
    let total = SummaryService::total(&ledger, TransactionKind::Expense, window).unwrap();
    assert_eq!(total, 1100.0);
}

#[test]
fn week_runs_monday_to_sunday() {
    let ledger = ledger_with_expenses_on(&[(22, 1.0), (23, 10.0), (29, 100.0), (30, 1000.0)]);
    let week = SummaryFilter {
        week: true,
        month: true,
        ..SummaryFilter::default()
    };
    // 2023-10-25 is a Wednesday; its week is 23..=29.
    let total = SummaryService::total(
        &ledger,
        TransactionKind::Expense,
        week.window(date(2023, 10, 25)),
    )
    .unwrap();
    assert_eq!(total, 110.0);
    assert_eq!(
        DateWindow::week(date(2023, 10, 29)),
        DateWindow::week(date(2023, 10, 23))
    );
}

#[test]
fn month_and_all_time_windows() {
    let mut ledger = ledger_with_expenses_on(&[(1, 1.0), (31, 2.0)]);
    ledger.add_expense(Expense::unassigned(Transaction::new(
        "November",
        4.0,
        date(2023, 11, 1),
    )));

    let month = SummaryFilter {
        month: true,
        ..SummaryFilter::default()
    };
    let reference = date(2023, 10, 15);
    assert_eq!(
        SummaryService::total(&ledger, TransactionKind::Expense, month.window(reference)).unwrap(),
        3.0
    );
    assert_eq!(
        SummaryService::total(
            &ledger,
            TransactionKind::Expense,
            SummaryFilter::default().window(reference)
        )
        .unwrap(),
        7.0
    );
}

#[test]
fn empty_window_is_zero_but_empty_kind_is_an_error() {
    let ledger = ledger_with_expenses_on(&[(1, 5.0)]);
    let day = Some(DateWindow::day(date(2024, 6, 1)));
    assert_eq!(
        SummaryService::total(&ledger, TransactionKind::Expense, day).unwrap(),
        0.0
    );
    assert_eq!(
        SummaryService::total(&ledger, TransactionKind::Income, None),
        Err(LedgerError::NothingToSummarize(TransactionKind::Income))
    );
}

#[test]
fn classification_totals_report_unused_entities_separately() {
    let ledger = sample_ledger();

    let goals = SummaryService::goal_totals(&ledger);
    assert_eq!(
        goals.used,
        vec![
            ("Uncategorised".to_string(), 150.0),
            ("Car".to_string(), 3000.0)
        ]
    );
    assert_eq!(goals.unused, vec!["Holiday".to_string()]);

    let categories = SummaryService::category_totals(&ledger);
    assert_eq!(
        categories.used,
        vec![
            ("Uncategorised".to_string(), 30.0),
            ("Food".to_string(), 92.75)
        ]
    );
    assert_eq!(categories.unused, vec!["Travel".to_string()]);
}
