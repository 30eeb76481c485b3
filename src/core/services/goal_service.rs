use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::{is_uncategorised_name, Goal, Ledger};

use super::ServiceResult;

const KIND: &str = "goal";

pub struct GoalService;

impl GoalService {
    pub fn add(ledger: &mut Ledger, description: &str, target_amount: f64) -> ServiceResult<Uuid> {
        let description = description.trim();
        Self::ensure_not_protected(description)?;
        if ledger.goal_position(description).is_some() {
            return Err(LedgerError::AlreadyExists {
                kind: KIND,
                name: description.to_string(),
            });
        }
        let id = ledger.add_goal(Goal::new(description, target_amount));
        tracing::debug!(%id, description, target_amount, "goal added");
        Ok(id)
    }

    /// Removes a goal after moving its incomes to `Uncategorised`.
    pub fn remove(ledger: &mut Ledger, description: &str) -> ServiceResult<Goal> {
        let description = description.trim();
        Self::ensure_not_protected(description)?;
        let id = Self::find(ledger, description)?;

        // Dependents first: the entity must outlive every reference to it.
        let moved = ledger.unassign_goal_transactions(id);
        let removed = ledger.remove_goal(id).ok_or_else(|| LedgerError::NotFound {
            kind: KIND,
            name: description.to_string(),
        })?;
        tracing::debug!(%id, moved, "goal removed");
        Ok(removed)
    }

    /// Id of an existing goal; the sentinel name resolves to the nil id.
    /// Goals are never created implicitly.
    pub fn find(ledger: &Ledger, description: &str) -> ServiceResult<Uuid> {
        let description = description.trim();
        if is_uncategorised_name(description) {
            return Ok(Uuid::nil());
        }
        ledger
            .goal_position(description)
            .map(|index| ledger.goals[index].id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: KIND,
                name: description.to_string(),
            })
    }

    fn ensure_not_protected(description: &str) -> ServiceResult<()> {
        if is_uncategorised_name(description) {
            Err(LedgerError::Protected { kind: KIND })
        } else {
            Ok(())
        }
    }
}
