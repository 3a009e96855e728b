//! Expense record model
//!
//! One spending event owned by one user. `id`, `owner_id` and `created_at` are
//! fixed when the record is created; every edit bumps `updated_at`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::draft::NewExpense;
use super::ids::{ExpenseId, OwnerId};
use super::money::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier, assigned by the store
    pub id: ExpenseId,

    /// The user who owns this record
    pub owner_id: OwnerId,

    /// Amount spent (positive)
    #[serde(default)]
    pub amount: Money,

    /// Short free-text label
    #[serde(default)]
    pub description: String,

    /// Category tag; unknown stored values load as `Other`
    #[serde(default)]
    pub category: Category,

    /// The day the expense applies to
    pub date: NaiveDate,

    /// Optional notes
    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Build a new record from validated input
    pub fn new(owner_id: OwnerId, input: NewExpense) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            owner_id,
            amount: input.amount,
            description: input.description,
            category: input.category,
            date: input.date,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, keeping identity and creation time
    pub fn apply(&mut self, input: NewExpense) {
        self.amount = input.amount;
        self.description = input.description;
        self.category = input.category;
        self.date = input.date;
        self.notes = input.notes;
        self.updated_at = Utc::now();
    }

    /// Amount as counted by statistics: non-positive amounts count as zero
    pub fn counted_amount(&self) -> Money {
        if self.amount.is_positive() {
            self.amount
        } else {
            Money::zero()
        }
    }

    /// Label for audit entries and confirmations
    pub fn summary_label(&self) -> String {
        format!("{} {}", self.date, self.description)
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.category,
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(amount: i64, description: &str) -> NewExpense {
        NewExpense {
            amount: Money::from_cents(amount),
            description: description.to_string(),
            category: Category::Food,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_new_expense() {
        let owner = OwnerId::new();
        let expense = Expense::new(owner, input(5000, "Lunch"));

        assert_eq!(expense.owner_id, owner);
        assert_eq!(expense.amount.cents(), 5000);
        assert_eq!(expense.created_at, expense.updated_at);
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut expense = Expense::new(OwnerId::new(), input(5000, "Lunch"));
        let (id, owner, created) = (expense.id, expense.owner_id, expense.created_at);

        expense.apply(input(7500, "Dinner"));

        assert_eq!(expense.id, id);
        assert_eq!(expense.owner_id, owner);
        assert_eq!(expense.created_at, created);
        assert_eq!(expense.description, "Dinner");
        assert!(expense.updated_at >= created);
    }

    #[test]
    fn test_lenient_deserialization() {
        let json = format!(
            r#"{{"id":"{}","owner_id":"{}","date":"2024-01-05","category":"alquiler",
                "created_at":"2024-01-05T10:00:00Z","updated_at":"2024-01-05T10:00:00Z"}}"#,
            ExpenseId::new().as_uuid(),
            OwnerId::new().as_uuid()
        );
        let expense: Expense = serde_json::from_str(&json).unwrap();

        assert_eq!(expense.amount, Money::zero());
        assert_eq!(expense.category, Category::Other);
        assert!(expense.description.is_empty());
        assert_eq!(expense.counted_amount(), Money::zero());
    }

    #[test]
    fn test_display() {
        let expense = Expense::new(OwnerId::new(), input(5000, "Lunch"));
        assert_eq!(expense.to_string(), "2024-01-05 Lunch [Food] $50.00");
    }
}
