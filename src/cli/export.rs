//! CLI commands for data export
//!
//! Files go to the exports directory unless `--output` is given; `-o -`
//! writes to standard output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::auth::IdentityProvider;
use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::export::{default_filename, export_expenses_csv, export_full_json, export_full_yaml, FullExport};
use crate::reports::StatsContext;
use crate::services::ExpenseService;
use crate::storage::Storage;

use super::expense::FilterArgs;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the (filtered) expense list to CSV
    Csv {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file path, or "-" for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export profile, budget, statistics and expenses to JSON
    Json {
        /// Output file path, or "-" for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Export profile, budget, statistics and expenses to YAML
    Yaml {
        /// Output file path, or "-" for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    identity: &dyn IdentityProvider,
    cmd: ExportCommands,
) -> ExpenseResult<()> {
    identity.current_owner().ok_or(ExpenseError::Unauthenticated)?;
    let ctx = StatsContext::current(settings);

    match cmd {
        ExportCommands::Csv { filter, output } => {
            let expenses = ExpenseService::new(storage, identity).list_filtered(&filter.to_filter())?;
            let output =
                output.unwrap_or_else(|| storage.paths().export_dir().join(default_filename(ctx.today)));

            write_output(&output, |writer| export_expenses_csv(&expenses, writer))?;
            report(&output, &format!("Exported {} expense(s)", expenses.len()));
        }

        ExportCommands::Json { output, compact } => {
            let export = FullExport::for_current_user(storage, identity, &ctx, settings)?;
            let output = output.unwrap_or_else(|| {
                storage
                    .paths()
                    .export_dir()
                    .join(format!("expenses-{}.json", ctx.today.format("%Y-%m-%d")))
            });

            write_output(&output, |writer| export_full_json(&export, writer, !compact))?;
            report(&output, "Full export written");
        }

        ExportCommands::Yaml { output } => {
            let export = FullExport::for_current_user(storage, identity, &ctx, settings)?;
            let output = output.unwrap_or_else(|| {
                storage
                    .paths()
                    .export_dir()
                    .join(format!("expenses-{}.yaml", ctx.today.format("%Y-%m-%d")))
            });

            write_output(&output, |writer| export_full_yaml(&export, writer))?;
            report(&output, "Full export written");
        }
    }

    Ok(())
}

fn is_stdout(path: &Path) -> bool {
    path == Path::new("-")
}

fn write_output(
    path: &Path,
    write: impl FnOnce(&mut dyn Write) -> ExpenseResult<()>,
) -> ExpenseResult<()> {
    let mut writer: Box<dyn Write> = if is_stdout(path) {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(path).map_err(|e| {
            ExpenseError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        Box::new(BufWriter::new(file))
    };

    write(writer.as_mut())?;
    writer
        .flush()
        .map_err(|e| ExpenseError::Export(e.to_string()))
}

fn report(path: &Path, what: &str) {
    if !is_stdout(path) {
        println!("{} to: {}", what, path.display());
    }
}
