//! Month-by-month spending for one calendar year

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Expense, Money};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    /// 1-based month number
    pub month: u32,
    pub label: &'static str,
    pub total: Money,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBreakdown {
    pub year: i32,
    /// Always twelve rows, January first
    pub months: Vec<MonthRow>,
    pub total: Money,
}

impl MonthlyBreakdown {
    pub fn for_year(records: &[Expense], year: i32) -> Self {
        let mut months: Vec<MonthRow> = MONTH_LABELS
            .iter()
            .enumerate()
            .map(|(i, &label)| MonthRow {
                month: i as u32 + 1,
                label,
                total: Money::zero(),
                count: 0,
            })
            .collect();

        for expense in records.iter().filter(|e| e.date.year() == year) {
            let row = &mut months[expense.date.month0() as usize];
            row.total += expense.counted_amount();
            row.count += 1;
        }

        let total = months.iter().map(|m| m.total).sum();
        Self {
            year,
            months,
            total,
        }
    }

    /// The month with the highest spending, if anything was spent
    pub fn peak(&self) -> Option<&MonthRow> {
        self.months
            .iter()
            .filter(|m| m.total.is_positive())
            .fold(None, |best: Option<&MonthRow>, m| match best {
                Some(b) if b.total >= m.total => Some(b),
                _ => Some(m),
            })
    }

    /// Bar chart of the twelve months, scaled to `width` characters
    pub fn format_terminal(&self, currency: &str, width: usize) -> String {
        let mut output = String::new();
        output.push_str(&format!("Monthly spending {}\n", self.year));
        output.push_str(&"=".repeat(width + 22));
        output.push('\n');

        let max = self.peak().map(|m| m.total).unwrap_or_else(Money::zero);
        for row in &self.months {
            let bar_len = if max.is_zero() {
                0
            } else {
                (row.total.cents() as f64 / max.cents() as f64 * width as f64).round() as usize
            };
            output.push_str(&format!(
                "{:<4} {:<width$} {:>14}\n",
                row.label,
                "#".repeat(bar_len),
                row.total.format_with_symbol(currency),
                width = width
            ));
        }

        output.push_str(&format!(
            "{:<4} {:<width$} {:>14}\n",
            "",
            "Total",
            self.total.format_with_symbol(currency),
            width = width
        ));
        output
    }
}
