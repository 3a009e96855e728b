//! expense-cli - Personal expense tracker for the terminal
//!
//! Record what you spend, see where it goes by category, month and day of
//! week, and keep an eye on a monthly budget. Every user's data is private to
//! their account.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, drafts, categories, money, users)
//! - `storage`: JSON file storage layer with change subscriptions
//! - `auth`: Password hashing, sessions and the identity seam
//! - `services`: Business logic layer
//! - `reports`: Summary statistics and breakdowns
//! - `audit`: Audit logging system
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_cli::config::{ExpensePaths, Settings};
//! use expense_cli::reports::{StatsContext, SummaryStats};
//!
//! let paths = ExpensePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let stats = SummaryStats::aggregate(&expenses, &StatsContext::current(&settings));
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
