use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::Transaction;

/// The two transaction collections a command can address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Capitalised label used in exports and table headers.
    pub fn title(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// Name of the flag that classifies this kind.
    pub fn classification_flag(&self) -> &'static str {
        match self {
            TransactionKind::Income => "goal",
            TransactionKind::Expense => "category",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => f.write_str("income"),
            TransactionKind::Expense => f.write_str("expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(other.to_string()),
        }
    }
}

/// Money coming in, earmarked for a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Income {
    pub transaction: Transaction,
    pub goal_id: Uuid,
}

impl Income {
    pub fn new(transaction: Transaction, goal_id: Uuid) -> Self {
        Self {
            transaction,
            goal_id,
        }
    }

    pub fn unassigned(transaction: Transaction) -> Self {
        Self::new(transaction, Uuid::nil())
    }
}

/// Money going out, filed under a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub transaction: Transaction,
    pub category_id: Uuid,
}

impl Expense {
    pub fn new(transaction: Transaction, category_id: Uuid) -> Self {
        Self {
            transaction,
            category_id,
        }
    }

    pub fn unassigned(transaction: Transaction) -> Self {
        Self::new(transaction, Uuid::nil())
    }
}
