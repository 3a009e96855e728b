//! Statistics CLI commands and the dashboard

use chrono::Datelike;
use clap::Subcommand;

use crate::auth::IdentityProvider;
use crate::config::Settings;
use crate::display::format_budget_status;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::BudgetLevel;
use crate::reports::{DashboardSummary, MonthlyBreakdown, StatsContext, SummaryStats, WeekdayBreakdown};
use crate::services::{BudgetService, ExpenseService};
use crate::storage::Storage;

/// Statistics subcommands
#[derive(Subcommand)]
pub enum StatsCommands {
    /// Totals, this month, this week and daily average
    Summary,
    /// Spending per category with percentages
    Categories,
    /// Month-by-month spending for one year
    Monthly {
        /// Year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Width of the bars
        #[arg(short, long, default_value = "30")]
        width: usize,
    },
    /// Average spending per day of the week
    Weekday,
}

pub fn handle_stats_command(
    storage: &Storage,
    settings: &Settings,
    identity: &dyn IdentityProvider,
    cmd: StatsCommands,
) -> ExpenseResult<()> {
    identity.current_owner().ok_or(ExpenseError::Unauthenticated)?;
    let records = ExpenseService::new(storage, identity).list()?;
    let ctx = StatsContext::current(settings);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        StatsCommands::Summary => {
            print!("{}", SummaryStats::aggregate(&records, &ctx).format_terminal(currency));
        }
        StatsCommands::Categories => {
            let stats = SummaryStats::aggregate(&records, &ctx);
            if stats.is_empty() {
                println!("No expenses yet.");
            } else {
                print!("{}", stats.format_categories(currency));
            }
        }
        StatsCommands::Monthly { year, width } => {
            let year = year.unwrap_or_else(|| ctx.today.year());
            let breakdown = MonthlyBreakdown::for_year(&records, year);
            print!("{}", breakdown.format_terminal(currency, width.max(1)));
            if let Some(peak) = breakdown.peak() {
                println!("\nHighest month: {}", peak.label);
            }
        }
        StatsCommands::Weekday => {
            let breakdown = WeekdayBreakdown::from_records(&records);
            print!("{}", breakdown.format_terminal(currency));
        }
    }

    Ok(())
}

/// Headline numbers, recent expenses and the budget status
pub fn handle_dashboard(
    storage: &Storage,
    settings: &Settings,
    identity: &dyn IdentityProvider,
) -> ExpenseResult<()> {
    identity.current_owner().ok_or(ExpenseError::Unauthenticated)?;
    let records = ExpenseService::new(storage, identity).list()?;
    let ctx = StatsContext::current(settings);
    let currency = settings.currency_symbol.as_str();

    let dashboard = DashboardSummary::build(&records, &ctx, settings.recent_limit);
    print!("{}", dashboard.format_terminal(currency));

    let status = BudgetService::new(storage, identity)
        .status(dashboard.month_total, settings.budget_warning_percent)?;
    if status.level != BudgetLevel::Unset {
        println!();
        print!("{}", format_budget_status(&status, currency));
    }
    Ok(())
}
