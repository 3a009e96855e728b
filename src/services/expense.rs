//! Expense service
//!
//! Create, read, update and delete the signed-in user's expenses. With no
//! signed-in user, reads return nothing and writes fail with
//! [`ExpenseError::Unauthenticated`]. Another user's records are reported as
//! not found.

use chrono::NaiveDate;
use tracing::debug;

use crate::audit::EntityType;
use crate::auth::IdentityProvider;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, Expense, ExpenseDraft, ExpenseId, ExpensePatch, OwnerId};
use crate::reports::{StatsContext, SummaryStats};
use crate::storage::{ExpenseStore, Storage};

use super::filter::{ExpenseFilter, SortDirection, SortKey};

pub struct ExpenseService<'a> {
    storage: &'a Storage,
    identity: &'a dyn IdentityProvider,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage, identity: &'a dyn IdentityProvider) -> Self {
        Self { storage, identity }
    }

    pub(crate) fn require_owner(&self) -> ExpenseResult<OwnerId> {
        self.identity
            .current_owner()
            .ok_or(ExpenseError::Unauthenticated)
    }

    /// Validate a draft and store it for the signed-in user
    pub fn create(&self, draft: &ExpenseDraft) -> ExpenseResult<Expense> {
        let owner = self.require_owner()?;
        let input = draft.validate()?;

        let expense = self.storage.expenses.create(owner, input)?;
        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.summary_label()),
            &expense,
        );

        debug!(id = %expense.id, "expense recorded");
        Ok(expense)
    }

    /// All of the signed-in user's expenses, newest first
    pub fn list(&self) -> ExpenseResult<Vec<Expense>> {
        match self.identity.current_owner() {
            Some(owner) => self.storage.expenses.list(owner),
            None => Ok(Vec::new()),
        }
    }

    pub fn list_filtered(&self, filter: &ExpenseFilter) -> ExpenseResult<Vec<Expense>> {
        Ok(filter.apply(&self.list()?))
    }

    pub fn list_by_category(&self, category: Category) -> ExpenseResult<Vec<Expense>> {
        self.list_filtered(&ExpenseFilter::new().category(category))
    }

    /// Expenses dated within `[start, end]`, newest first
    pub fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> ExpenseResult<Vec<Expense>> {
        self.list_filtered(
            &ExpenseFilter::new()
                .date_range(Some(start), Some(end))
                .sort_by(SortKey::Date, SortDirection::Descending),
        )
    }

    /// Get one of the signed-in user's expenses by ID
    pub fn get(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let owner = self.require_owner()?;
        match self.storage.expenses.get(id)? {
            Some(expense) if expense.owner_id == owner => Ok(expense),
            _ => Err(ExpenseError::expense_not_found(id.to_string())),
        }
    }

    /// Find an expense by full ID, short ID (`exp-1a2b3c4d`) or ID prefix
    pub fn find(&self, identifier: &str) -> ExpenseResult<Expense> {
        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return self.get(id);
        }

        let owner = self.require_owner()?;
        let mut matches: Vec<Expense> = self
            .storage
            .expenses
            .list(owner)?
            .into_iter()
            .filter(|e| e.id.matches(identifier))
            .collect();

        match matches.len() {
            0 => Err(ExpenseError::expense_not_found(identifier)),
            1 => Ok(matches.remove(0)),
            n => Err(ExpenseError::invalid(
                "id",
                format!("'{}' matches {} expenses; use a longer ID", identifier, n),
            )),
        }
    }

    /// Apply a partial edit, re-validating the merged record
    pub fn update(&self, identifier: &str, patch: &ExpensePatch) -> ExpenseResult<Expense> {
        self.require_owner()?;
        let before = self.find(identifier)?;

        if patch.is_empty() {
            return Err(ExpenseError::invalid("patch", "Nothing to update"));
        }
        let input = patch.merge_into(&before).validate()?;

        let after = self.storage.expenses.update(before.id, input)?;
        self.storage.log_update(
            EntityType::Expense,
            after.id.to_string(),
            Some(after.summary_label()),
            &before,
            &after,
        );

        Ok(after)
    }

    /// Delete an expense, returning the removed record
    pub fn delete(&self, identifier: &str) -> ExpenseResult<Expense> {
        self.require_owner()?;
        let expense = self.find(identifier)?;

        let removed = self.storage.expenses.delete(expense.id)?;
        self.storage.log_delete(
            EntityType::Expense,
            removed.id.to_string(),
            Some(removed.summary_label()),
            &removed,
        );

        Ok(removed)
    }

    /// Summary statistics over all of the signed-in user's expenses
    pub fn stats(&self, ctx: &StatsContext) -> ExpenseResult<SummaryStats> {
        Ok(SummaryStats::aggregate(&self.list()?, ctx))
    }
}
