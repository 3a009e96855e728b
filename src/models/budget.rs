//! Monthly budget tracking
//!
//! Compares this month's spending against the user's monthly budget.

use serde::Serialize;
use std::fmt;

use super::money::Money;

/// How close spending is to the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    /// No budget has been set
    Unset,
    UnderBudget,
    /// At or above the warning threshold
    Warning,
    /// At or above 100%
    Exceeded,
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "No budget set"),
            Self::UnderBudget => write!(f, "On track"),
            Self::Warning => write!(f, "Close to the monthly budget"),
            Self::Exceeded => write!(f, "Monthly budget exceeded"),
        }
    }
}

/// Budget usage for the current month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: Money,
    pub spent: Money,
    /// Budget minus spending; negative once exceeded
    pub remaining: Money,
    /// Spending as a percentage of the budget, 0 when no budget is set
    pub percentage: f64,
    pub level: BudgetLevel,
}

impl BudgetStatus {
    pub fn compute(budget: Option<Money>, spent: Money, warning_percent: f64) -> Self {
        let budget = budget.filter(|b| b.is_positive()).unwrap_or_else(Money::zero);
        let percentage = spent.percent_of(budget);

        let level = if budget.is_zero() {
            BudgetLevel::Unset
        } else if percentage >= 100.0 {
            BudgetLevel::Exceeded
        } else if percentage >= warning_percent {
            BudgetLevel::Warning
        } else {
            BudgetLevel::UnderBudget
        };

        Self {
            budget,
            spent,
            remaining: budget - spent,
            percentage,
            level,
        }
    }

    /// Percentage clamped to 100 for progress bars
    pub fn progress(&self) -> f64 {
        self.percentage.min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_budget() {
        let status = BudgetStatus::compute(None, Money::from_cents(5000), 80.0);
        assert_eq!(status.level, BudgetLevel::Unset);
        assert_eq!(status.percentage, 0.0);
        assert_eq!(status.remaining.cents(), -5000);
    }

    #[test]
    fn test_levels() {
        let budget = Some(Money::from_units(100));
        let under = BudgetStatus::compute(budget, Money::from_units(50), 80.0);
        let warn = BudgetStatus::compute(budget, Money::from_units(80), 80.0);
        let over = BudgetStatus::compute(budget, Money::from_units(120), 80.0);

        assert_eq!(under.level, BudgetLevel::UnderBudget);
        assert_eq!(under.remaining, Money::from_units(50));
        assert_eq!(warn.level, BudgetLevel::Warning);
        assert_eq!(over.level, BudgetLevel::Exceeded);
        assert_eq!(over.progress(), 100.0);
        assert!((over.percentage - 120.0).abs() < 1e-9);
    }
}
