use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::{DateWindow, Ledger, TransactionKind};

use super::ServiceResult;

/// Totals per goal or category; entities with no entries are kept apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationTotals {
    pub used: Vec<(String, f64)>,
    pub unused: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub description: String,
    pub saved: f64,
    pub target: f64,
}

impl GoalProgress {
    pub fn reached(&self) -> bool {
        self.saved >= self.target
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Sum of `kind` inside `window`, or over all time when no window is set.
    ///
    /// Fails only when there is nothing of `kind` recorded at all; a window
    /// that matches nothing sums to zero.
    pub fn total(
        ledger: &Ledger,
        kind: TransactionKind,
        window: Option<DateWindow>,
    ) -> ServiceResult<f64> {
        let transactions = ledger.transactions(kind);
        if transactions.is_empty() {
            return Err(LedgerError::NothingToSummarize(kind));
        }
        Ok(transactions
            .into_iter()
            .filter(|txn| window.map_or(true, |w| w.contains(txn.date)))
            .map(|txn| txn.amount)
            .sum())
    }

    pub fn goal_totals(ledger: &Ledger) -> ClassificationTotals {
        let sentinel = ledger.uncategorised_goal().description.clone();
        let entities = ledger
            .goals
            .iter()
            .map(|goal| (goal.id, goal.description.clone()));
        let entries = ledger
            .incomes
            .iter()
            .map(|income| (income.goal_id, income.transaction.amount));
        collect_totals(sentinel, entities, entries)
    }

    pub fn category_totals(ledger: &Ledger) -> ClassificationTotals {
        let sentinel = ledger.uncategorised_category().name.clone();
        let entities = ledger
            .categories
            .iter()
            .map(|category| (category.id, category.name.clone()));
        let entries = ledger
            .expenses
            .iter()
            .map(|expense| (expense.category_id, expense.transaction.amount));
        collect_totals(sentinel, entities, entries)
    }

    /// Saved amount against target for every user-defined goal.
    pub fn goal_progress(ledger: &Ledger) -> Vec<GoalProgress> {
        ledger
            .goals
            .iter()
            .map(|goal| GoalProgress {
                description: goal.description.clone(),
                saved: ledger
                    .incomes
                    .iter()
                    .filter(|income| income.goal_id == goal.id)
                    .map(|income| income.transaction.amount)
                    .sum(),
                target: goal.target_amount,
            })
            .collect()
    }
}

fn collect_totals(
    sentinel: String,
    entities: impl Iterator<Item = (Uuid, String)>,
    entries: impl Iterator<Item = (Uuid, f64)>,
) -> ClassificationTotals {
    let entries: Vec<(Uuid, f64)> = entries.collect();
    let sum_for = |id: Uuid| -> Option<f64> {
        let mut matched = false;
        let mut total = 0.0;
        for (entry_id, amount) in &entries {
            if *entry_id == id {
                matched = true;
                total += amount;
            }
        }
        matched.then_some(total)
    };

    let mut totals = ClassificationTotals::default();
    if let Some(total) = sum_for(Uuid::nil()) {
        totals.used.push((sentinel, total));
    }
    for (id, name) in entities {
        match sum_for(id) {
            Some(total) => totals.used.push((name, total)),
            None => totals.unused.push(name),
        }
    }
    totals
}
