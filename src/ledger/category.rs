use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name shared by the fallback goal and the fallback category.
pub const UNCATEGORISED: &str = "Uncategorised";

/// Classifies expenses for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// The fallback category every unclassified expense points at.
    pub fn uncategorised() -> Self {
        Self {
            id: Uuid::nil(),
            name: UNCATEGORISED.into(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }
}

/// Case-insensitive name comparison used for goals and categories.
pub fn same_name(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

/// True when `name` refers to the protected fallback entity.
pub fn is_uncategorised_name(name: &str) -> bool {
    same_name(name, UNCATEGORISED)
}
