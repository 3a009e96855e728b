//! User-submitted expense drafts and their validation
//!
//! A draft holds raw form text. [`ExpenseDraft::validate`] checks every field
//! independently and either returns all violations or a [`NewExpense`] with
//! typed values ready for the store.

use chrono::NaiveDate;

use super::category::Category;
use super::expense::Expense;
use super::money::{Money, MAX_AMOUNT};
use crate::error::ValidationErrors;

/// Date format accepted for drafts
pub const DRAFT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw expense input as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub amount: String,
    pub description: String,
    pub category: String,
    pub date: Option<String>,
    pub notes: Option<String>,
}

/// Validated, normalized expense fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub amount: Money,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    pub notes: String,
}

impl ExpenseDraft {
    pub fn new(
        amount: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            description: description.into(),
            category: category.into(),
            date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Pre-fill a draft from an existing record (edit form)
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            amount: format!("{:.2}", expense.amount.as_f64()),
            description: expense.description.clone(),
            category: expense.category.id().to_string(),
            date: Some(expense.date.format(DRAFT_DATE_FORMAT).to_string()),
            notes: Some(expense.notes.clone()),
        }
    }

    /// Check all fields and normalize them
    ///
    /// Every check runs, so the error lists every bad field at once.
    pub fn validate(&self) -> Result<NewExpense, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let amount = match Money::parse(&self.amount) {
            Ok(amount) if amount > MAX_AMOUNT => {
                errors.push(
                    "amount",
                    format!("Amount cannot exceed {}", MAX_AMOUNT.format_with_symbol("")),
                );
                None
            }
            Ok(amount) if amount.is_positive() => Some(amount),
            Ok(_) => {
                errors.push("amount", "Amount must be greater than 0");
                None
            }
            Err(_) if self.amount.trim().is_empty() => {
                errors.push("amount", "Amount is required");
                None
            }
            Err(e) => {
                errors.push("amount", e.to_string());
                None
            }
        };

        let description = self.description.trim();
        if description.is_empty() {
            errors.push("description", "Description is required");
        }

        let category = if self.category.trim().is_empty() {
            errors.push("category", "Category is required");
            None
        } else {
            match self.category.parse::<Category>() {
                Ok(category) => Some(category),
                Err(e) => {
                    errors.push("category", e.to_string());
                    None
                }
            }
        };

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("date", "Date is required");
                None
            }
            Some(text) => match NaiveDate::parse_from_str(text, DRAFT_DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("date", format!("Invalid date '{}'. Use YYYY-MM-DD", text));
                    None
                }
            },
        };

        match (amount, category, date) {
            (Some(amount), Some(category), Some(date)) if errors.is_empty() => Ok(NewExpense {
                amount,
                description: description.to_string(),
                category,
                date,
                notes: self.notes.as_deref().unwrap_or("").trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// A partial edit; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpensePatch {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }

    /// Overlay this patch on an existing record, producing a full draft
    pub fn merge_into(&self, expense: &Expense) -> ExpenseDraft {
        let mut draft = ExpenseDraft::from_expense(expense);
        if let Some(amount) = &self.amount {
            draft.amount = amount.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(category) = &self.category {
            draft.category = category.clone();
        }
        if let Some(date) = &self.date {
            draft.date = Some(date.clone());
        }
        if let Some(notes) = &self.notes {
            draft.notes = Some(notes.clone());
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OwnerId;

    fn today() -> Option<String> {
        Some(chrono::Local::now().date_naive().format(DRAFT_DATE_FORMAT).to_string())
    }

    #[test]
    fn test_accepts_fully_populated_draft() {
        let draft = ExpenseDraft::new("12.50", "  Lunch  ", "food", Some("2024-01-05".into()))
            .with_notes(" with team ");
        let valid = draft.validate().unwrap();

        assert_eq!(valid.amount.cents(), 1250);
        assert_eq!(valid.description, "Lunch");
        assert_eq!(valid.category, Category::Food);
        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(valid.notes, "with team");
    }

    #[test]
    fn test_zero_amount_rejected_on_amount() {
        let draft = ExpenseDraft::new("0", "x", "food", today());
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["amount"]);
    }

    #[test]
    fn test_negative_and_unparseable_amounts_rejected() {
        for amount in ["-5", "abc", ""] {
            let errors = ExpenseDraft::new(amount, "x", "food", today())
                .validate()
                .unwrap_err();
            assert!(errors.has_field("amount"), "accepted {:?}", amount);
        }
        assert!(ExpenseDraft::new("0.01", "x", "food", today()).validate().is_ok());
    }

    #[test]
    fn test_amount_above_cap_rejected() {
        let errors = ExpenseDraft::new("90000000000000000", "x", "food", today())
            .validate()
            .unwrap_err();
        assert_eq!(errors.fields(), vec!["amount"]);
        assert!(ExpenseDraft::new("1000000000", "x", "food", today()).validate().is_err());

        let valid = ExpenseDraft::new("999999999.99", "x", "food", today())
            .validate()
            .unwrap();
        assert_eq!(valid.amount, MAX_AMOUNT);
    }

    #[test]
    fn test_blank_description_and_category_rejected() {
        let errors = ExpenseDraft::new("5", "   ", "", today()).validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["description", "category"]);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let errors = ExpenseDraft::new("5", "x", "groceries", today())
            .validate()
            .unwrap_err();
        assert_eq!(errors.fields(), vec!["category"]);
    }

    #[test]
    fn test_every_violation_reported_together() {
        let errors = ExpenseDraft::default().validate().unwrap_err();
        assert_eq!(
            errors.fields(),
            vec!["amount", "description", "category", "date"]
        );
    }

    #[test]
    fn test_bad_date_rejected_on_date() {
        let errors = ExpenseDraft::new("5", "x", "food", Some("05/01/2024".into()))
            .validate()
            .unwrap_err();
        assert_eq!(errors.fields(), vec!["date"]);
    }

    #[test]
    fn test_patch_merges_over_existing_record() {
        let original = ExpenseDraft::new("50", "Lunch", "food", Some("2024-01-05".into()))
            .validate()
            .unwrap();
        let expense = Expense::new(OwnerId::new(), original);

        let patch = ExpensePatch {
            amount: Some("75.25".into()),
            category: Some("health".into()),
            ..ExpensePatch::default()
        };
        let merged = patch.merge_into(&expense).validate().unwrap();

        assert_eq!(merged.amount.cents(), 7525);
        assert_eq!(merged.category, Category::Health);
        assert_eq!(merged.description, "Lunch");
        assert_eq!(merged.date, expense.date);
        assert!(!patch.is_empty());
        assert!(ExpensePatch::default().is_empty());
    }
}
