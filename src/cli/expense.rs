//! Expense CLI commands
//!
//! Add, list, show, edit, delete and import expenses for the signed-in user.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use crate::auth::IdentityProvider;
use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_short, format_expense_table};
use crate::error::ExpenseResult;
use crate::models::{draft::DRAFT_DATE_FORMAT, Category, ExpenseDraft, ExpensePatch};
use crate::services::{ExpenseFilter, ExpenseService, ImportService, SortDirection, SortKey};
use crate::storage::Storage;

/// Search, filter and sort options shared by `list` and `export csv`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Text to look for in the description or category name
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only this category (food, transport, entertainment, health,
    /// education, shopping, services, other)
    #[arg(short, long)]
    pub category: Option<Category>,

    /// Earliest date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Sort by date, amount, category or description
    #[arg(long, default_value = "date")]
    pub sort: SortKey,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Show at most this many expenses
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ExpenseFilter {
        let direction = if self.asc {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        let mut filter = ExpenseFilter::new()
            .date_range(self.from, self.to)
            .sort_by(self.sort, direction);

        if let Some(search) = &self.search {
            filter = filter.search(search.clone());
        }
        if let Some(category) = self.category {
            filter = filter.category(category);
        }
        if let Some(limit) = self.limit {
            filter = filter.limit(limit);
        }
        filter
    }
}

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g., "12.50")
        amount: String,
        /// What the money was spent on
        description: String,
        /// Category (food, transport, entertainment, health, education,
        /// shopping, services, other)
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List expenses, newest first
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one expense
    Show {
        /// Expense ID (full, short form or prefix)
        id: String,
    },
    /// Change fields of an expense
    Edit {
        /// Expense ID (full, short form or prefix)
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID (full, short form or prefix)
        id: String,
    },
    /// Import expenses from a CSV file (Date, Description, Category, Amount)
    Import {
        /// Path to CSV file
        file: PathBuf,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    identity: &dyn IdentityProvider,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage, identity);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            description,
            category,
            date,
            notes,
        } => {
            let date = date.or_else(|| Some(Local::now().date_naive().format(DRAFT_DATE_FORMAT).to_string()));
            let mut draft = ExpenseDraft::new(amount, description, category.unwrap_or_default(), date);
            if let Some(notes) = notes {
                draft = draft.with_notes(notes);
            }

            let expense = service.create(&draft)?;
            println!("Added: {}", format_expense_short(&expense, currency));
        }

        ExpenseCommands::List { filter } => {
            if identity.current_owner().is_none() {
                eprintln!("Not signed in. Run 'expense login' to see your expenses.");
            }
            let expenses = service.list_filtered(&filter.to_filter())?;
            println!(
                "{}",
                format_expense_table(&expenses, currency, &settings.date_format)
            );
        }

        ExpenseCommands::Show { id } => {
            let expense = service.find(&id)?;
            print!(
                "{}",
                format_expense_details(&expense, currency, &settings.date_format)
            );
        }

        ExpenseCommands::Edit {
            id,
            amount,
            description,
            category,
            date,
            notes,
        } => {
            let patch = ExpensePatch {
                amount,
                description,
                category,
                date,
                notes,
            };
            if patch.is_empty() {
                println!("No changes specified. Use --amount, --description, --category, --date or --notes.");
                return Ok(());
            }

            let updated = service.update(&id, &patch)?;
            println!("Updated: {}", format_expense_short(&updated, currency));
        }

        ExpenseCommands::Delete { id } => {
            let removed = service.delete(&id)?;
            println!("Deleted: {}", format_expense_short(&removed, currency));
        }

        ExpenseCommands::Import { file } => {
            let result = ImportService::new(storage, identity).import_file(&file)?;

            println!("Imported {} expense(s) from {}", result.imported, file.display());
            if result.duplicates_skipped > 0 {
                println!("Skipped {} duplicate(s)", result.duplicates_skipped);
            }
            if result.has_errors() {
                println!("{} row(s) could not be imported:", result.errors.len());
                for error in &result.errors {
                    println!("  line {}: {}", error.line, error.message);
                }
            }
        }
    }

    Ok(())
}
