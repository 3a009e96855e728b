//! Expense display formatting
//!
//! Formats expenses for terminal output in table and detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::Expense;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl ExpenseRow {
    fn new(expense: &Expense, currency: &str, date_format: &str) -> Self {
        Self {
            id: expense.id.short(),
            date: expense.date.format(date_format).to_string(),
            description: truncate(&expense.description, 32),
            category: expense.category.label(),
            amount: expense.amount.format_with_symbol(currency),
        }
    }
}

/// Format expenses as a table, in the order given
pub fn format_expense_table(expenses: &[Expense], currency: &str, date_format: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let rows: Vec<ExpenseRow> = expenses
        .iter()
        .map(|e| ExpenseRow::new(e, currency, date_format))
        .collect();

    let total: crate::models::Money = expenses.iter().map(|e| e.amount).sum();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::single(4)).with(Alignment::right()));

    format!(
        "{}\n{} expense(s), total {}",
        table,
        expenses.len(),
        total.format_with_symbol(currency)
    )
}

/// Format one expense with every field
pub fn format_expense_details(expense: &Expense, currency: &str, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id.short()));
    output.push_str(&format!("ID:          {}\n", expense.id.as_uuid()));
    output.push_str(&format!("Date:        {}\n", expense.date.format(date_format)));
    output.push_str(&format!(
        "Amount:      {}\n",
        expense.amount.format_with_symbol(currency)
    ));
    output.push_str(&format!("Description: {}\n", expense.description));
    output.push_str(&format!("Category:    {}\n", expense.category));
    if !expense.notes.is_empty() {
        output.push_str(&format!("Notes:       {}\n", expense.notes));
    }
    output.push_str(&format!(
        "Created:     {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M")
    ));
    if expense.updated_at != expense.created_at {
        output.push_str(&format!(
            "Updated:     {}\n",
            expense.updated_at.format("%Y-%m-%d %H:%M")
        ));
    }

    output
}

/// One-line confirmation, e.g. after adding or deleting
pub fn format_expense_short(expense: &Expense, currency: &str) -> String {
    format!(
        "{} {} {} [{}] {}",
        expense.id.short(),
        expense.date.format("%Y-%m-%d"),
        expense.description,
        expense.category,
        expense.amount.format_with_symbol(currency)
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
