pub mod commands;
pub mod core;
pub mod format;
pub mod help;
pub mod output;
pub mod parser;
pub mod registry;
mod shell;

pub use shell::{run_cli, SCRIPT_ENV};
