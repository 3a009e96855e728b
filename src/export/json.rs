//! JSON export of a user's data
//!
//! A full snapshot of the signed-in user's profile, budget status, summary
//! statistics and expenses, with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::IdentityProvider;
use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetStatus, Expense, UserProfile};
use crate::reports::{StatsContext, SummaryStats};
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub user: UserProfile,

    /// Budget usage as of the export date
    pub budget: BudgetStatus,

    pub stats: SummaryStats,

    /// Newest first
    pub expenses: Vec<Expense>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub expense_count: usize,

    /// The day the statistics were computed for
    pub as_of: String,

    /// Date range of expenses (earliest)
    pub earliest_expense: Option<String>,

    /// Date range of expenses (latest)
    pub latest_expense: Option<String>,
}

impl FullExport {
    /// Assemble an export from already-loaded data
    pub fn build(
        user: UserProfile,
        expenses: Vec<Expense>,
        ctx: &StatsContext,
        warning_percent: f64,
    ) -> Self {
        let stats = SummaryStats::aggregate(&expenses, ctx);
        let budget = BudgetStatus::compute(user.monthly_budget, stats.monthly_total, warning_percent);

        let metadata = ExportMetadata {
            expense_count: expenses.len(),
            as_of: ctx.today.to_string(),
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user,
            budget,
            stats,
            expenses,
            metadata,
        }
    }

    /// Export for the signed-in user
    pub fn for_current_user(
        storage: &Storage,
        identity: &dyn IdentityProvider,
        ctx: &StatsContext,
        settings: &Settings,
    ) -> ExpenseResult<Self> {
        let owner = identity.current_owner().ok_or(ExpenseError::Unauthenticated)?;
        let user = storage
            .users
            .get(owner)?
            .ok_or_else(|| ExpenseError::user_not_found(owner.to_string()))?;
        let expenses = ExpenseService::new(storage, identity).list()?;

        Ok(Self::build(
            UserProfile::from(&user),
            expenses,
            ctx,
            settings.budget_warning_percent,
        ))
    }
}

pub fn export_full_json<W: Write + ?Sized>(
    export: &FullExport,
    writer: &mut W,
    pretty: bool,
) -> ExpenseResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, export)
    } else {
        serde_json::to_writer(&mut *writer, export)
    }
    .map_err(|e| ExpenseError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| ExpenseError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpensePaths;
    use crate::models::{BudgetLevel, ExpenseDraft, Money, OwnerId, UserAccount};
    use chrono::{NaiveDate, Weekday};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn ctx() -> StatsContext {
        StatsContext::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Weekday::Sun)
    }

    fn seed(storage: &Storage) -> Option<OwnerId> {
        let mut user = UserAccount::new("ana@example.com", "hash");
        user.set_monthly_budget(Some(Money::from_units(100)));
        let owner = Some(user.id);
        storage.users.insert(user).unwrap();

        let service = ExpenseService::new(storage, &owner);
        for (amount, description, category, date) in [
            ("50", "Lunch", "food", "2024-01-05"),
            ("40", "Bus pass", "transport", "2023-12-20"),
        ] {
            service
                .create(&ExpenseDraft::new(amount, description, category, Some(date.into())))
                .unwrap();
        }
        owner
    }

    #[test]
    fn test_full_export() {
        let (_temp, storage) = create_test_storage();
        let owner = seed(&storage);

        let export = FullExport::for_current_user(&storage, &owner, &ctx(), &Settings::default()).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.user.email, "ana@example.com");
        assert_eq!(export.metadata.expense_count, 2);
        assert_eq!(export.metadata.earliest_expense.as_deref(), Some("2023-12-20"));
        assert_eq!(export.stats.total, Money::from_units(90));
        assert_eq!(export.budget.spent, Money::from_units(50));
        assert_eq!(export.budget.level, BudgetLevel::UnderBudget);
    }

    #[test]
    fn test_json_output() {
        let (_temp, storage) = create_test_storage();
        let owner = seed(&storage);
        let export = FullExport::for_current_user(&storage, &owner, &ctx(), &Settings::default()).unwrap();

        let mut output = Vec::new();
        export_full_json(&export, &mut output, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(value["expenses"].as_array().unwrap().len(), 2);
        assert_eq!(value["expenses"][0]["category"], "food");
        assert_eq!(value["budget"]["level"], "under_budget");
        assert!(value["user"].get("password_hash").is_none());
    }

    #[test]
    fn test_requires_sign_in() {
        let (_temp, storage) = create_test_storage();
        let nobody: Option<OwnerId> = None;
        let err = FullExport::for_current_user(&storage, &nobody, &ctx(), &Settings::default()).unwrap_err();
        assert!(matches!(err, ExpenseError::Unauthenticated));
    }
}
