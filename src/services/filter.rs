//! Filtering and sorting of expense lists
//!
//! [`ExpenseFilter::apply`] never mutates its input. Sorting is stable in
//! both directions: records with equal keys keep their input order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::{Category, Expense};

/// Field to sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    /// By category label, case-insensitive
    Category,
    Description,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            "description" => Ok(Self::Description),
            other => Err(format!(
                "Unknown sort key '{}'. Expected date, amount, category or description",
                other
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Amount => write!(f, "amount"),
            Self::Category => write!(f, "category"),
            Self::Description => write!(f, "description"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Search, category and date-range criteria plus sort order
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive substring matched against description and category label
    pub search: Option<String>,
    pub category: Option<Category>,
    /// Inclusive
    pub start_date: Option<NaiveDate>,
    /// Inclusive
    pub end_date: Option<NaiveDate>,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    /// Match everything, newest first
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn sort_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = key;
        self.direction = direction;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a single record passes the search, category and date criteria
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(term) = &self.search {
            let term = term.trim().to_lowercase();
            let in_description = expense.description.to_lowercase().contains(&term);
            let in_category = expense.category.label().to_lowercase().contains(&term);
            if !in_description && !in_category {
                return false;
            }
        }

        if self.category.is_some_and(|c| c != expense.category) {
            return false;
        }
        if self.start_date.is_some_and(|start| expense.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| expense.date > end) {
            return false;
        }

        true
    }

    /// Filtered, sorted copy of `records`
    pub fn apply(&self, records: &[Expense]) -> Vec<Expense> {
        let mut result: Vec<Expense> = records.iter().filter(|e| self.matches(e)).cloned().collect();

        result.sort_by(|a, b| {
            let ordering = compare(self.sort, a, b);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        if let Some(limit) = self.limit {
            result.truncate(limit);
        }
        result
    }
}

fn compare(key: SortKey, a: &Expense, b: &Expense) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Amount => a.amount.cmp(&b.amount),
        SortKey::Category => a
            .category
            .label()
            .to_lowercase()
            .cmp(&b.category.label().to_lowercase()),
        SortKey::Description => a.description.to_lowercase().cmp(&b.description.to_lowercase()),
    }
}
