//! Budget service
//!
//! Reads and writes the signed-in user's monthly budget and compares it
//! against this month's spending.

use serde_json::json;

use crate::audit::EntityType;
use crate::auth::IdentityProvider;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetStatus, Money, OwnerId, UserAccount};
use crate::storage::Storage;

pub struct BudgetService<'a> {
    storage: &'a Storage,
    identity: &'a dyn IdentityProvider,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage, identity: &'a dyn IdentityProvider) -> Self {
        Self { storage, identity }
    }

    fn current_user(&self, owner: OwnerId) -> ExpenseResult<UserAccount> {
        self.storage
            .users
            .get(owner)?
            .ok_or_else(|| ExpenseError::user_not_found(owner.to_string()))
    }

    /// The monthly budget, `None` when unset or nobody is signed in
    pub fn get_monthly_budget(&self) -> ExpenseResult<Option<Money>> {
        match self.identity.current_owner() {
            Some(owner) => Ok(self.current_user(owner)?.monthly_budget),
            None => Ok(None),
        }
    }

    /// Parse and store a new monthly budget; it must be greater than zero
    pub fn set_monthly_budget(&self, text: &str) -> ExpenseResult<Money> {
        let owner = self.identity.current_owner().ok_or(ExpenseError::Unauthenticated)?;

        let amount = Money::parse(text)
            .map_err(|e| ExpenseError::invalid("monthly_budget", e.to_string()))?;
        if !amount.is_positive() {
            return Err(ExpenseError::invalid(
                "monthly_budget",
                "Monthly budget must be greater than 0",
            ));
        }

        self.write_budget(owner, Some(amount))?;
        Ok(amount)
    }

    /// Remove the monthly budget. Returns the previous value.
    pub fn clear_monthly_budget(&self) -> ExpenseResult<Option<Money>> {
        let owner = self.identity.current_owner().ok_or(ExpenseError::Unauthenticated)?;
        self.write_budget(owner, None)
    }

    fn write_budget(&self, owner: OwnerId, budget: Option<Money>) -> ExpenseResult<Option<Money>> {
        let before = self.current_user(owner)?;
        let previous = before.monthly_budget;

        let mut user = before.clone();
        user.set_monthly_budget(budget);
        self.storage.users.update(user)?;

        if let Err(e) = self.storage.users.save() {
            self.storage.users.update(before)?;
            return Err(e);
        }

        self.storage.log_update(
            EntityType::Budget,
            owner.to_string(),
            Some(before.email.clone()),
            &json!({ "monthly_budget": previous }),
            &json!({ "monthly_budget": budget }),
        );
        Ok(previous)
    }

    /// Compare this month's spending with the budget
    pub fn status(&self, monthly_spent: Money, warning_percent: f64) -> ExpenseResult<BudgetStatus> {
        Ok(BudgetStatus::compute(
            self.get_monthly_budget()?,
            monthly_spent,
            warning_percent,
        ))
    }
}
