use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    category::Category,
    entry::{Expense, Income, TransactionKind},
    goal::Goal,
    transaction::Transaction,
};

/// Ordering applied when transactions are listed and addressed by index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListOrder {
    #[default]
    Insertion,
    Date,
}

/// Authoritative store of goals, categories, incomes and expenses.
///
/// Every income's `goal_id` and every expense's `category_id` resolves either
/// to an entry held here or to the nil id of the `Uncategorised` sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(skip, default = "Goal::uncategorised")]
    uncategorised_goal: Goal,
    #[serde(skip, default = "Category::uncategorised")]
    uncategorised_category: Category,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            goals: Vec::new(),
            categories: Vec::new(),
            incomes: Vec::new(),
            expenses: Vec::new(),
            uncategorised_goal: Goal::uncategorised(),
            uncategorised_category: Category::uncategorised(),
        }
    }

    pub fn uncategorised_goal(&self) -> &Goal {
        &self.uncategorised_goal
    }

    pub fn uncategorised_category(&self) -> &Category {
        &self.uncategorised_category
    }

    pub fn add_goal(&mut self, goal: Goal) -> Uuid {
        let id = goal.id;
        self.goals.push(goal);
        id
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        id
    }

    pub fn add_income(&mut self, income: Income) {
        self.incomes.push(income);
    }

    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn goal(&self, index: usize) -> Option<&Goal> {
        self.goals.get(index)
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn income(&self, index: usize) -> Option<&Income> {
        self.incomes.get(index)
    }

    pub fn expense(&self, index: usize) -> Option<&Expense> {
        self.expenses.get(index)
    }

    pub fn income_mut(&mut self, index: usize) -> Option<&mut Income> {
        self.incomes.get_mut(index)
    }

    pub fn expense_mut(&mut self, index: usize) -> Option<&mut Expense> {
        self.expenses.get_mut(index)
    }

    /// Case-insensitive position of a goal by description.
    pub fn goal_position(&self, name: &str) -> Option<usize> {
        self.goals.iter().position(|goal| goal.matches(name))
    }

    /// Case-insensitive position of a category by name.
    pub fn category_position(&self, name: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|category| category.matches(name))
    }

    /// Resolves a goal id, falling back to the sentinel for the nil id.
    pub fn resolve_goal(&self, id: Uuid) -> Option<&Goal> {
        if id.is_nil() {
            return Some(&self.uncategorised_goal);
        }
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Resolves a category id, falling back to the sentinel for the nil id.
    pub fn resolve_category(&self, id: Uuid) -> Option<&Category> {
        if id.is_nil() {
            return Some(&self.uncategorised_category);
        }
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn goal_name(&self, id: Uuid) -> &str {
        self.resolve_goal(id)
            .map(|goal| goal.description.as_str())
            .unwrap_or(self.uncategorised_goal.description.as_str())
    }

    pub fn category_name(&self, id: Uuid) -> &str {
        self.resolve_category(id)
            .map(|category| category.name.as_str())
            .unwrap_or(self.uncategorised_category.name.as_str())
    }

    pub fn remove_goal_at(&mut self, index: usize) -> Option<Goal> {
        (index < self.goals.len()).then(|| self.goals.remove(index))
    }

    pub fn remove_category_at(&mut self, index: usize) -> Option<Category> {
        (index < self.categories.len()).then(|| self.categories.remove(index))
    }

    pub fn remove_income_at(&mut self, index: usize) -> Option<Income> {
        (index < self.incomes.len()).then(|| self.incomes.remove(index))
    }

    pub fn remove_expense_at(&mut self, index: usize) -> Option<Expense> {
        (index < self.expenses.len()).then(|| self.expenses.remove(index))
    }

    pub fn remove_goal(&mut self, id: Uuid) -> Option<Goal> {
        let index = self.goals.iter().position(|goal| goal.id == id)?;
        self.remove_goal_at(index)
    }

    pub fn remove_category(&mut self, id: Uuid) -> Option<Category> {
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)?;
        self.remove_category_at(index)
    }

    /// Points every income earmarked for `goal_id` at the sentinel goal.
    pub fn unassign_goal_transactions(&mut self, goal_id: Uuid) -> usize {
        let mut moved = 0;
        for income in self.incomes.iter_mut().filter(|i| i.goal_id == goal_id) {
            income.goal_id = Uuid::nil();
            moved += 1;
        }
        moved
    }

    /// Points every expense filed under `category_id` at the sentinel category.
    pub fn unassign_category_transactions(&mut self, category_id: Uuid) -> usize {
        let mut moved = 0;
        for expense in self
            .expenses
            .iter_mut()
            .filter(|e| e.category_id == category_id)
        {
            expense.category_id = Uuid::nil();
            moved += 1;
        }
        moved
    }

    pub fn count(&self, kind: TransactionKind) -> usize {
        match kind {
            TransactionKind::Income => self.incomes.len(),
            TransactionKind::Expense => self.expenses.len(),
        }
    }

    pub fn transactions(&self, kind: TransactionKind) -> Vec<&Transaction> {
        match kind {
            TransactionKind::Income => self.incomes.iter().map(|i| &i.transaction).collect(),
            TransactionKind::Expense => self.expenses.iter().map(|e| &e.transaction).collect(),
        }
    }

    /// Storage positions of `kind` in display order; display index `n`
    /// addresses `positions[n - 1]`.
    pub fn listing_positions(&self, kind: TransactionKind, order: ListOrder) -> Vec<usize> {
        let transactions = self.transactions(kind);
        let mut positions: Vec<usize> = (0..transactions.len()).collect();
        if order == ListOrder::Date {
            positions.sort_by_key(|&index| transactions[index].date);
        }
        positions
    }

    /// Name of the classification attached to the entry at `index`.
    pub fn classification_name(&self, kind: TransactionKind, index: usize) -> Option<&str> {
        match kind {
            TransactionKind::Income => self.income(index).map(|i| self.goal_name(i.goal_id)),
            TransactionKind::Expense => self
                .expense(index)
                .map(|e| self.category_name(e.category_id)),
        }
    }

    /// True when no income or expense references a missing goal or category.
    pub fn is_consistent(&self) -> bool {
        self.incomes
            .iter()
            .all(|income| self.resolve_goal(income.goal_id).is_some())
            && self
                .expenses
                .iter()
                .all(|expense| self.resolve_category(expense.category_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(description: &str, amount: f64, day: u32) -> Transaction {
        Transaction::new(
            description,
            amount,
            NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        )
    }

    #[test]
    fn positional_getters_return_none_out_of_range() {
        let mut ledger = Ledger::new();
        ledger.add_goal(Goal::new("Car", 5000.0));
        assert!(ledger.goal(0).is_some());
        assert!(ledger.goal(1).is_none());
        assert!(ledger.income(0).is_none());
        assert!(ledger.remove_expense_at(3).is_none());
    }

    #[test]
    fn lookup_by_name_ignores_case() {
        let mut ledger = Ledger::new();
        ledger.add_category(Category::new("Food"));
        ledger.add_category(Category::new("Travel"));
        assert_eq!(ledger.category_position("TRAVEL"), Some(1));
        assert_eq!(ledger.category_position("rent"), None);
    }

    #[test]
    fn unassign_moves_only_matching_expenses() {
        let mut ledger = Ledger::new();
        let food = ledger.add_category(Category::new("Food"));
        let travel = ledger.add_category(Category::new("Travel"));
        ledger.add_expense(Expense::new(txn("Lunch", 12.0, 1), food));
        ledger.add_expense(Expense::new(txn("Train", 4.5, 2), travel));
        ledger.add_expense(Expense::new(txn("Dinner", 30.0, 3), food));

        assert_eq!(ledger.unassign_category_transactions(food), 2);
        assert!(ledger.expenses[0].category_id.is_nil());
        assert_eq!(ledger.expenses[1].category_id, travel);
        assert!(ledger.expenses[2].category_id.is_nil());
    }

    #[test]
    fn removing_a_goal_without_unassigning_breaks_consistency() {
        let mut ledger = Ledger::new();
        let car = ledger.add_goal(Goal::new("Car", 100.0));
        ledger.add_income(Income::new(txn("Salary", 2000.0, 1), car));
        assert!(ledger.is_consistent());

        ledger.remove_goal(car);
        assert!(!ledger.is_consistent());
    }

    #[test]
    fn nil_ids_resolve_to_sentinels() {
        let ledger = Ledger::new();
        assert_eq!(ledger.goal_name(Uuid::nil()), "Uncategorised");
        assert_eq!(ledger.category_name(Uuid::nil()), "Uncategorised");
    }

    #[test]
    fn date_order_sorts_stably() {
        let mut ledger = Ledger::new();
        ledger.add_income(Income::unassigned(txn("B", 1.0, 9)));
        ledger.add_income(Income::unassigned(txn("A", 1.0, 2)));
        ledger.add_income(Income::unassigned(txn("C", 1.0, 9)));
        assert_eq!(
            ledger.listing_positions(TransactionKind::Income, ListOrder::Date),
            vec![1, 0, 2]
        );
        assert_eq!(
            ledger.listing_positions(TransactionKind::Income, ListOrder::Insertion),
            vec![0, 1, 2]
        );
    }
}
