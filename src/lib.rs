#![doc(test(attr(deny(warnings))))]

//! Budget tracker is a line-oriented personal-finance ledger: incomes filed
//! under savings goals, expenses filed under categories, date-window
//! summaries and CSV persistence.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget tracker tracing initialized.");
    });
}
