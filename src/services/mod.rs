//! Service layer for expense-cli
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, ownership checks, audit logging and the live expense feed.

pub mod auth;
pub mod budget;
pub mod expense;
pub mod feed;
pub mod filter;
pub mod import;

pub use auth::AuthService;
pub use budget::BudgetService;
pub use expense::ExpenseService;
pub use feed::{ExpenseFeed, FeedEvent};
pub use filter::{ExpenseFilter, SortDirection, SortKey};
pub use import::{ColumnMapping, ImportResult, ImportRowError, ImportService};
