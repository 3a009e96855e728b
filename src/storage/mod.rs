//! Storage layer for expense-cli
//!
//! JSON file repositories with atomic writes, plus the audit log that records
//! every change made through the services.

pub mod expenses;
pub mod file_io;
pub mod users;

pub use expenses::{ExpenseListener, ExpenseRepository, ExpenseStore, Subscription};
pub use file_io::{read_json, write_json_atomic};
pub use users::UserRepository;

use serde::Serialize;
use tracing::warn;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::ExpensePaths;
use crate::error::ExpenseError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: ExpensePaths,
    pub expenses: ExpenseRepository,
    pub users: UserRepository,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: ExpensePaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            users: UserRepository::new(paths.users_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &ExpensePaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), ExpenseError> {
        self.expenses.load()?;
        self.users.load()?;
        Ok(())
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a creation in the audit log
    ///
    /// The change itself is already persisted, so an audit failure is only
    /// logged.
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity);
        self.write_audit(&entry);
    }

    /// Record an update with a summary of the changed fields
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        let entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after, diff);
        self.write_audit(&entry);
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        let entry = AuditEntry::delete(entity_type, entity_id, entity_name, entity);
        self.write_audit(&entry);
    }

    fn write_audit(&self, entry: &AuditEntry) {
        if let Err(e) = self.audit.log(entry) {
            warn!(error = %e, "failed to write audit entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();
        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert_eq!(storage.users.count().unwrap(), 0);
    }

    #[test]
    fn test_audit_helpers() {
        let (_temp, storage) = create_test_storage();

        storage.log_create(EntityType::Expense, "exp-1", None, &json!({"amount": 1}));
        storage.log_update(
            EntityType::Expense,
            "exp-1",
            None,
            &json!({"amount": 1}),
            &json!({"amount": 2}),
        );
        storage.log_delete(EntityType::Expense, "exp-1", None, &json!({"amount": 2}));

        let entries = storage.audit().read_all().unwrap();
        let ops: Vec<_> = entries.iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
        assert_eq!(entries[1].diff_summary.as_deref(), Some("amount: 1 -> 2"));
    }
}
