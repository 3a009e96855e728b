//! Budget status display

use crate::models::{BudgetLevel, BudgetStatus};

const BAR_WIDTH: usize = 30;

pub fn format_budget_status(status: &BudgetStatus, currency: &str) -> String {
    if status.level == BudgetLevel::Unset {
        return format!(
            "No monthly budget set. Spent this month: {}\nSet one with 'expense budget set <amount>'.\n",
            status.spent.format_with_symbol(currency)
        );
    }

    let filled = ((status.progress() / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));

    let mut output = String::new();
    output.push_str("Monthly budget\n");
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "{:<12} {:>27}\n",
        "Budget:",
        status.budget.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "{:<12} {:>27}\n",
        "Spent:",
        status.spent.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "{:<12} {:>27}\n",
        "Remaining:",
        status.remaining.format_with_symbol(currency)
    ));
    output.push_str(&format!("{} {:.1}%\n", bar, status.percentage));

    let marker = match status.level {
        BudgetLevel::Exceeded => "!! ",
        BudgetLevel::Warning => "! ",
        _ => "",
    };
    output.push_str(&format!("{}{}\n", marker, status.level));
    output
}
