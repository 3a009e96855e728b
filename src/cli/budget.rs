//! Budget CLI commands
//!
//! View, set and clear the monthly budget.

use clap::Subcommand;

use crate::auth::IdentityProvider;
use crate::config::Settings;
use crate::display::format_budget_status;
use crate::error::{ExpenseError, ExpenseResult};
use crate::reports::StatsContext;
use crate::services::{BudgetService, ExpenseService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show this month's spending against the budget
    Show,
    /// Set the monthly budget
    Set {
        /// Amount (e.g., "500" or "500.00")
        amount: String,
    },
    /// Remove the monthly budget
    Clear,
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    identity: &dyn IdentityProvider,
    cmd: BudgetCommands,
) -> ExpenseResult<()> {
    let service = BudgetService::new(storage, identity);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Show => {
            identity.current_owner().ok_or(ExpenseError::Unauthenticated)?;
            let ctx = StatsContext::current(settings);
            let stats = ExpenseService::new(storage, identity).stats(&ctx)?;
            let status = service.status(stats.monthly_total, settings.budget_warning_percent)?;
            print!("{}", format_budget_status(&status, currency));
        }

        BudgetCommands::Set { amount } => {
            let budget = service.set_monthly_budget(&amount)?;
            println!("Monthly budget set to {}", budget.format_with_symbol(currency));
        }

        BudgetCommands::Clear => match service.clear_monthly_budget()? {
            Some(previous) => println!(
                "Monthly budget cleared (was {})",
                previous.format_with_symbol(currency)
            ),
            None => println!("No monthly budget was set."),
        },
    }

    Ok(())
}
