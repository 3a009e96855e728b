use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use expense_cli::cli::{
    handle_budget_command, handle_dashboard, handle_expense_command, handle_export_command,
    handle_history, handle_login, handle_logout, handle_register, handle_stats_command,
    handle_whoami,
};
use expense_cli::config::{ExpensePaths, Settings};
use expense_cli::display::format_validation_errors;
use expense_cli::reports::weekday::weekday_name;
use expense_cli::services::AuthService;
use expense_cli::storage::Storage;
use expense_cli::{ExpenseError, ExpenseResult};

/// Environment variable holding the log filter
const LOG_ENV: &str = "EXPENSE_LOG";

#[derive(Parser)]
#[command(
    name = "expense",
    author = "Kaylee Beyene",
    version,
    about = "Personal expense tracker",
    long_about = "expense-cli records your expenses, breaks them down by category, \
                  month and day of week, and tracks spending against a monthly budget."
)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = expense_cli::cli::PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in
    Login {
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = expense_cli::cli::PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(expense_cli::cli::ExpenseCommands),

    /// Spending statistics
    #[command(subcommand)]
    Stats(expense_cli::cli::StatsCommands),

    /// Overview of totals, recent expenses and the budget
    Dashboard,

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(expense_cli::cli::BudgetCommands),

    /// Export data to CSV, JSON or YAML
    #[command(subcommand)]
    Export(expense_cli::cli::ExportCommands),

    /// Show recent changes to your data
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => Ok(()),
        Err(ExpenseError::Validation(errors)) => {
            eprint!("{}", format_validation_errors(&errors));
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

fn run(cli: Cli) -> ExpenseResult<()> {
    let paths = ExpensePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths)?;
    storage.load_all()?;

    let session = AuthService::new(&storage).active_session().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable session");
        None
    });

    match cli.command {
        Some(Commands::Register { email, password }) => {
            handle_register(&storage, &email, password)?;
        }
        Some(Commands::Login { email, password }) => {
            handle_login(&storage, &email, password)?;
        }
        Some(Commands::Logout) => handle_logout(&storage)?,
        Some(Commands::Whoami) => handle_whoami(&storage, &settings)?,
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Stats(cmd)) => {
            handle_stats_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Dashboard) => handle_dashboard(&storage, &settings, &session)?,
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::History { limit }) => handle_history(&storage, &session, limit)?,
        Some(Commands::Config) => {
            let paths = storage.paths();
            println!("expense-cli Configuration");
            println!("=========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!(
                "  Week starts on:    {}",
                weekday_name(settings.week_start())
            );
            println!("  Recent expenses:   {}", settings.recent_limit);
            println!("  Budget warning at: {}%", settings.budget_warning_percent);
            println!();
            match &session {
                Some(session) => println!("Signed in as {}", session.email),
                None => println!("Not signed in."),
            }
        }
        None => {
            println!("expense-cli - Personal expense tracker");
            println!();
            println!("Run 'expense --help' for usage information.");
            println!("Run 'expense register <email>' to get started.");
        }
    }

    Ok(())
}
