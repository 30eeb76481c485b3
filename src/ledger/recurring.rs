//! Rolls recurring transactions forward to the current date.

use chrono::NaiveDate;

use super::{
    entry::{Expense, Income},
    ledger::Ledger,
    transaction::Transaction,
};

/// Generates every occurrence of a recurring transaction that has fallen due
/// on or before `today`.
///
/// Each transaction spawns at most one follow-up and is then flagged with
/// `has_generated_next`; the follow-up is examined in turn, so a backlog
/// yields one entry per elapsed period. Running it again is a no-op.
pub fn generate_due_occurrences(ledger: &mut Ledger, today: NaiveDate) -> usize {
    let mut generated = 0;

    let mut index = 0;
    while index < ledger.incomes.len() {
        if let Some(next) = due_follow_up(&mut ledger.incomes[index].transaction, today) {
            let goal_id = ledger.incomes[index].goal_id;
            ledger.add_income(Income::new(next, goal_id));
            generated += 1;
        }
        index += 1;
    }

    let mut index = 0;
    while index < ledger.expenses.len() {
        if let Some(next) = due_follow_up(&mut ledger.expenses[index].transaction, today) {
            let category_id = ledger.expenses[index].category_id;
            ledger.add_expense(Expense::new(next, category_id));
            generated += 1;
        }
        index += 1;
    }

    if generated > 0 {
        tracing::info!(generated, %today, "generated recurring occurrences");
    }
    generated
}

fn due_follow_up(transaction: &mut Transaction, today: NaiveDate) -> Option<Transaction> {
    if transaction.has_generated_next || !transaction.recurrence.is_recurring() {
        return None;
    }
    let next = transaction.next_instance()?;
    if next.date > today {
        return None;
    }
    transaction.has_generated_next = true;
    Some(next)
}
