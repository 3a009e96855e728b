//! Core data models for expense-cli
//!
//! Expense records, the drafts they are created from, categories, money and
//! the per-user budget.

pub mod budget;
pub mod category;
pub mod draft;
pub mod expense;
pub mod ids;
pub mod money;
pub mod user;

pub use budget::{BudgetLevel, BudgetStatus};
pub use category::{Category, UnknownCategory};
pub use draft::{ExpenseDraft, ExpensePatch, NewExpense};
pub use expense::Expense;
pub use ids::{ExpenseId, OwnerId};
pub use money::{Money, MoneyParseError, MAX_AMOUNT};
pub use user::{UserAccount, UserProfile};
