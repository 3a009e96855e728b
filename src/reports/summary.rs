//! Summary statistics
//!
//! Totals, this month's and this week's spending, a daily average and a
//! per-category breakdown. Aggregation never fails: an empty list yields
//! all-zero statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use super::StatsContext;
use crate::models::{Category, Expense, Money};

/// Fixed divisor for the daily average, regardless of month length
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub total: Money,
    pub count: usize,
    /// Share of the overall total, 0 when the overall total is zero
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    pub total: Money,
    pub count: usize,
    /// Spending from the first of this month through today
    pub monthly_total: Money,
    /// Spending from the start of this week through today
    pub weekly_total: Money,
    /// `monthly_total / 30`, in currency units
    pub daily_average: f64,
    /// Only categories with at least one record appear
    pub categories: BTreeMap<Category, CategoryStat>,
}

impl SummaryStats {
    /// Aggregate a user's records
    ///
    /// Records with a non-positive amount still count toward `count` but add
    /// nothing to any total.
    pub fn aggregate(records: &[Expense], ctx: &StatsContext) -> Self {
        let mut stats = Self {
            count: records.len(),
            ..Self::default()
        };

        for expense in records {
            let amount = expense.counted_amount();
            stats.total += amount;

            if ctx.in_current_month(expense.date) {
                stats.monthly_total += amount;
            }
            if ctx.in_current_week(expense.date) {
                stats.weekly_total += amount;
            }

            let entry = stats
                .categories
                .entry(expense.category)
                .or_insert(CategoryStat {
                    total: Money::zero(),
                    count: 0,
                    percentage: 0.0,
                });
            entry.total += amount;
            entry.count += 1;
        }

        for stat in stats.categories.values_mut() {
            stat.percentage = stat.total.percent_of(stats.total);
        }

        stats.daily_average = stats.monthly_total.as_f64() / DAYS_PER_MONTH;
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean amount per record, in currency units
    pub fn average_per_expense(&self) -> f64 {
        self.total.as_f64() / self.count.max(1) as f64
    }

    /// Category with the highest total; ties go to the earlier category
    pub fn top_category(&self) -> Option<(Category, &CategoryStat)> {
        let mut top: Option<(Category, &CategoryStat)> = None;
        for (category, stat) in &self.categories {
            match top {
                Some((_, best)) if stat.total <= best.total => {}
                _ => top = Some((*category, stat)),
            }
        }
        top
    }

    /// Categories ordered by total, largest first
    pub fn categories_by_total(&self) -> Vec<(Category, &CategoryStat)> {
        let mut rows: Vec<_> = self.categories.iter().map(|(c, s)| (*c, s)).collect();
        rows.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        rows
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Expense Summary\n");
        output.push_str(&"=".repeat(48));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>22}\n",
            "Total spent:",
            self.total.format_with_symbol(currency)
        ));
        output.push_str(&format!("{:<24} {:>22}\n", "Expenses:", self.count));
        output.push_str(&format!(
            "{:<24} {:>22}\n",
            "This month:",
            self.monthly_total.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "{:<24} {:>22}\n",
            "This week:",
            self.weekly_total.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "{:<24} {:>21.2}\n",
            format!("Daily average ({}):", currency),
            self.daily_average
        ));
        output.push_str(&format!(
            "{:<24} {:>21.2}\n",
            format!("Per expense ({}):", currency),
            self.average_per_expense()
        ));

        if let Some((category, stat)) = self.top_category() {
            output.push_str(&format!(
                "{:<24} {:>22}\n",
                "Top category:",
                format!("{} ({:.1}%)", category, stat.percentage)
            ));
        }

        output
    }

    /// Format the per-category breakdown for terminal display
    pub fn format_categories(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<16} {:>14} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(49));
        output.push('\n');

        for (category, stat) in self.categories_by_total() {
            output.push_str(&format!(
                "{:<16} {:>14} {:>8} {:>7.1}%\n",
                category.label(),
                stat.total.format_with_symbol(currency),
                stat.count,
                stat.percentage
            ));
        }

        output.push_str(&"-".repeat(49));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>14} {:>8}\n",
            "TOTAL",
            self.total.format_with_symbol(currency),
            self.count
        ));

        output
    }
}
