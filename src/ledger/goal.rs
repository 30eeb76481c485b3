use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{same_name, UNCATEGORISED};

/// Savings target that incomes are earmarked for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub description: String,
    pub target_amount: f64,
}

impl Goal {
    pub fn new(description: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            target_amount,
        }
    }

    /// The fallback goal every unassigned income points at.
    pub fn uncategorised() -> Self {
        Self {
            id: Uuid::nil(),
            description: UNCATEGORISED.into(),
            target_amount: 0.0,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        same_name(&self.description, name)
    }
}
