pub mod category_service;
pub mod goal_service;
pub mod summary_service;

pub use category_service::CategoryService;
pub use goal_service::GoalService;
pub use summary_service::{ClassificationTotals, GoalProgress, SummaryService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;
