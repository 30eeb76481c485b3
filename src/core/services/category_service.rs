use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::{is_uncategorised_name, Category, Ledger};

use super::ServiceResult;

const KIND: &str = "category";

pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, name: &str) -> ServiceResult<Uuid> {
        let name = name.trim();
        Self::ensure_not_protected(name)?;
        if ledger.category_position(name).is_some() {
            return Err(LedgerError::AlreadyExists {
                kind: KIND,
                name: name.to_string(),
            });
        }
        let id = ledger.add_category(Category::new(name));
        tracing::debug!(%id, name, "category added");
        Ok(id)
    }

    /// Removes a category after moving its expenses to `Uncategorised`.
    pub fn remove(ledger: &mut Ledger, name: &str) -> ServiceResult<Category> {
        let name = name.trim();
        Self::ensure_not_protected(name)?;
        let index = ledger
            .category_position(name)
            .ok_or_else(|| LedgerError::NotFound {
                kind: KIND,
                name: name.to_string(),
            })?;
        let id = ledger.categories[index].id;

        // Dependents first: the entity must outlive every reference to it.
        let moved = ledger.unassign_category_transactions(id);
        let removed = ledger
            .remove_category(id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: KIND,
                name: name.to_string(),
            })?;
        tracing::debug!(%id, moved, "category removed");
        Ok(removed)
    }

    /// Id of the named category, creating it when it is not known yet.
    pub fn find_or_create(ledger: &mut Ledger, name: &str) -> Uuid {
        let name = name.trim();
        if is_uncategorised_name(name) {
            return Uuid::nil();
        }
        match ledger.category_position(name) {
            Some(index) => ledger.categories[index].id,
            None => {
                tracing::debug!(name, "creating category on the fly");
                ledger.add_category(Category::new(name))
            }
        }
    }

    pub fn list(ledger: &Ledger) -> Vec<&Category> {
        ledger.categories.iter().collect()
    }

    fn ensure_not_protected(name: &str) -> ServiceResult<()> {
        if is_uncategorised_name(name) {
            Err(LedgerError::Protected { kind: KIND })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Expense, Transaction};
    use chrono::NaiveDate;

    fn expense(category_id: Uuid) -> Expense {
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        Expense::new(Transaction::new("Lunch", 12.5, date), category_id)
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut ledger = Ledger::new();
        CategoryService::add(&mut ledger, "Food").unwrap();
        let err = CategoryService::add(&mut ledger, "FOOD").unwrap_err();
        assert_eq!(
            err,
            LedgerError::AlreadyExists {
                kind: "category",
                name: "FOOD".into()
            }
        );
    }

    #[test]
    fn sentinel_cannot_be_added_or_removed() {
        let mut ledger = Ledger::new();
        assert_eq!(
            CategoryService::add(&mut ledger, "uncategorised").unwrap_err(),
            LedgerError::Protected { kind: "category" }
        );
        assert_eq!(
            CategoryService::remove(&mut ledger, "Uncategorised").unwrap_err(),
            LedgerError::Protected { kind: "category" }
        );
    }

    #[test]
    fn removing_unknown_category_fails() {
        let mut ledger = Ledger::new();
        let err = CategoryService::remove(&mut ledger, "Travel").unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[test]
    fn remove_cascades_to_uncategorised() {
        let mut ledger = Ledger::new();
        let food = CategoryService::add(&mut ledger, "Food").unwrap();
        ledger.add_expense(expense(food));
        ledger.add_expense(expense(food));

        let removed = CategoryService::remove(&mut ledger, "food").unwrap();
        assert_eq!(removed.id, food);
        assert!(ledger.categories.is_empty());
        assert!(ledger.expenses.iter().all(|e| e.category_id.is_nil()));
        assert!(ledger.is_consistent());
    }

    #[test]
    fn find_or_create_reuses_existing_entries() {
        let mut ledger = Ledger::new();
        let first = CategoryService::find_or_create(&mut ledger, "Books");
        let second = CategoryService::find_or_create(&mut ledger, "books");
        assert_eq!(first, second);
        assert_eq!(ledger.categories.len(), 1);
        assert!(CategoryService::find_or_create(&mut ledger, "Uncategorised").is_nil());
    }
}
