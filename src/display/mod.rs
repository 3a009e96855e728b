//! Display formatting for terminal output
//!
//! Tables and detail views for expenses, the budget status panel and
//! validation messages. Report views format themselves (see
//! [`crate::reports`]).

pub mod budget;
pub mod expense;

pub use budget::format_budget_status;
pub use expense::{format_expense_details, format_expense_short, format_expense_table};

use crate::error::ValidationErrors;

/// One line per rejected field
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut output = String::from("Please fix the following:\n");
    for error in errors.iter() {
        output.push_str(&format!("  - {}: {}\n", error.field, error.message));
    }
    output
}
