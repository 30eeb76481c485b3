//! Ledger domain models and classification-integrity rules.

pub mod category;
pub mod entry;
pub mod goal;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod recurring;
pub mod time_window;
pub mod transaction;

pub use category::{is_uncategorised_name, Category, UNCATEGORISED};
pub use entry::{Expense, Income, TransactionKind};
pub use goal::Goal;
pub use ledger::{Ledger, ListOrder};
pub use recurring::generate_due_occurrences;
pub use time_window::{DateWindow, SummaryFilter};
pub use transaction::{parse_amount, Recurrence, Transaction};
