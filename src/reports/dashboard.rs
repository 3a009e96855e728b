//! Dashboard overview: headline totals and the latest expenses

use serde::Serialize;

use super::summary::SummaryStats;
use super::StatsContext;
use crate::models::{Category, Expense, Money};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total: Money,
    pub count: usize,
    pub today_total: Money,
    pub month_total: Money,
    pub top_category: Option<(Category, Money)>,
    /// Newest first
    pub recent: Vec<Expense>,
}

impl DashboardSummary {
    pub fn build(records: &[Expense], ctx: &StatsContext, recent_limit: usize) -> Self {
        let stats = SummaryStats::aggregate(records, ctx);

        let today_total = records
            .iter()
            .filter(|e| e.date == ctx.today)
            .map(Expense::counted_amount)
            .sum();

        let mut recent: Vec<Expense> = records.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        recent.truncate(recent_limit);

        Self {
            total: stats.total,
            count: stats.count,
            today_total,
            month_total: stats.monthly_total,
            top_category: stats.top_category().map(|(c, s)| (c, s.total)),
            recent,
        }
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Dashboard\n");
        output.push_str(&"=".repeat(48));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>26}\n",
            "Total spent:",
            self.total.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "{:<20} {:>26}\n",
            "Today:",
            self.today_total.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "{:<20} {:>26}\n",
            "This month:",
            self.month_total.format_with_symbol(currency)
        ));
        let top = match &self.top_category {
            Some((category, total)) => {
                format!("{} ({})", category, total.format_with_symbol(currency))
            }
            None => "N/A".to_string(),
        };
        output.push_str(&format!("{:<20} {:>26}\n", "Top category:", top));

        output.push_str("\nRecent expenses\n");
        output.push_str(&"-".repeat(48));
        output.push('\n');
        if self.recent.is_empty() {
            output.push_str("No expenses yet. Add one with 'expense add'.\n");
        }
        for expense in &self.recent {
            output.push_str(&format!(
                "{}  {:<20} {:>14}\n",
                expense.date,
                truncate(&expense.description, 20),
                expense.amount.format_with_symbol(currency)
            ));
        }

        output
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}
