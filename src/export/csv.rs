//! CSV export of expense lists
//!
//! Writes the records the user is currently looking at (already filtered and
//! sorted) as `Date,Description,Category,Amount`. Descriptions are always
//! quoted; categories are written as their display label.

use std::io::Write;

use chrono::NaiveDate;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;

pub const CSV_HEADER: &str = "Date,Description,Category,Amount";

/// Export `expenses` in the given order
pub fn export_expenses_csv<W: Write + ?Sized>(expenses: &[Expense], writer: &mut W) -> ExpenseResult<()> {
    writeln!(writer, "{}", CSV_HEADER).map_err(|e| ExpenseError::Export(e.to_string()))?;

    for expense in expenses {
        writeln!(
            writer,
            "{},{},{},{}",
            expense.date.format("%Y-%m-%d"),
            quote(&expense.description),
            expense.category.label(),
            expense.amount.format_with_symbol("")
        )
        .map_err(|e| ExpenseError::Export(e.to_string()))?;
    }

    Ok(())
}

/// `expenses-YYYY-MM-DD.csv` for the given day
pub fn default_filename(date: NaiveDate) -> String {
    format!("expenses-{}.csv", date.format("%Y-%m-%d"))
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
