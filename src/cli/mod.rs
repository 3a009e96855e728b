//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod auth;
pub mod budget;
pub mod expense;
pub mod export;
pub mod history;
pub mod stats;

pub use auth::{handle_login, handle_logout, handle_register, handle_whoami, PASSWORD_ENV};
pub use budget::{handle_budget_command, BudgetCommands};
pub use expense::{handle_expense_command, ExpenseCommands, FilterArgs};
pub use export::{handle_export_command, ExportCommands};
pub use history::handle_history;
pub use stats::{handle_dashboard, handle_stats_command, StatsCommands};
