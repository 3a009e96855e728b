//! Expense repository for JSON storage
//!
//! Keeps every user's expenses in `data/expenses.json`, indexed by owner.
//! Callers can subscribe to one owner's records: the listener receives the
//! current snapshot immediately, then a fresh snapshot after every change
//! (or the error, when persisting a change fails).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock, Weak};

use tracing::{debug, warn};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, NewExpense, OwnerId};

use super::file_io::{read_json, write_json_atomic};

/// Callback receiving an owner's records, newest first, or a storage failure
pub type ExpenseListener = Arc<dyn Fn(Result<&[Expense], &ExpenseError>) + Send + Sync>;

/// Record store for expenses
///
/// `list` returns records ordered by date, newest first. Ownership checks are
/// the caller's job: `update` and `delete` address records by ID alone.
pub trait ExpenseStore {
    fn create(&self, owner: OwnerId, input: NewExpense) -> ExpenseResult<Expense>;

    fn get(&self, id: ExpenseId) -> ExpenseResult<Option<Expense>>;

    fn list(&self, owner: OwnerId) -> ExpenseResult<Vec<Expense>>;

    fn subscribe(&self, owner: OwnerId, listener: ExpenseListener) -> ExpenseResult<Subscription>;

    fn update(&self, id: ExpenseId, input: NewExpense) -> ExpenseResult<Expense>;

    /// Remove a record, returning it
    fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense>;
}

/// On-disk layout. Records are kept as raw JSON so one malformed record
/// doesn't prevent the rest from loading.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<serde_json::Value>,
}

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    entries: HashMap<u64, (OwnerId, ExpenseListener)>,
}

/// Handle for an active subscription; dropping it unsubscribes
pub struct Subscription {
    id: u64,
    registry: Option<Weak<Mutex<ListenerRegistry>>>,
}

impl Subscription {
    /// Stop receiving updates. Calling this twice is a no-op.
    pub fn unsubscribe(&mut self) {
        let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        if let Ok(mut registry) = registry.lock() {
            registry.entries.remove(&self.id);
        };
    }

    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.as_ref().and_then(Weak::upgrade) else {
            return false;
        };
        let active = match registry.lock() {
            Ok(registry) => registry.entries.contains_key(&self.id),
            Err(_) => false,
        };
        active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Repository for expense persistence with an owner index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: owner_id -> expense_ids
    by_owner: RwLock<HashMap<OwnerId, Vec<ExpenseId>>>,
    listeners: Arc<Mutex<ListenerRegistry>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_owner: RwLock::new(HashMap::new()),
            listeners: Arc::new(Mutex::new(ListenerRegistry::default())),
        }
    }

    /// Load expenses from disk and rebuild the owner index
    pub fn load(&self) -> ExpenseResult<()> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_owner = self
            .by_owner
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_owner.clear();

        for (index, raw) in file_data.expenses.into_iter().enumerate() {
            match serde_json::from_value::<Expense>(raw) {
                Ok(expense) => {
                    by_owner.entry(expense.owner_id).or_default().push(expense.id);
                    data.insert(expense.id, expense);
                }
                Err(e) => warn!(record = index, error = %e, "skipping malformed expense record"),
            }
        }

        debug!(count = data.len(), path = %self.path.display(), "loaded expenses");
        Ok(())
    }

    /// Re-read the file and push fresh snapshots to every subscriber
    pub fn reload(&self) -> ExpenseResult<()> {
        let result = self.load();
        for owner in self.subscribed_owners() {
            match &result {
                Ok(()) => self.notify(owner),
                Err(e) => self.notify_error(owner, e),
            }
        }
        result
    }

    /// Save all expenses to disk, newest first
    pub fn save(&self) -> ExpenseResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<&Expense> = data.values().collect();
        sort_newest_first(&mut expenses);

        let file_data = ExpenseData {
            expenses: expenses
                .into_iter()
                .map(serde_json::to_value)
                .collect::<Result<_, _>>()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn count(&self) -> ExpenseResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }

    fn insert(&self, expense: Expense) -> ExpenseResult<Option<Expense>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_owner = self
            .by_owner
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids = by_owner.entry(expense.owner_id).or_default();
        if !ids.contains(&expense.id) {
            ids.push(expense.id);
        }
        Ok(data.insert(expense.id, expense))
    }

    fn remove(&self, id: ExpenseId) -> ExpenseResult<Option<Expense>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_owner = self
            .by_owner
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let removed = data.remove(&id);
        if let Some(expense) = &removed {
            if let Some(ids) = by_owner.get_mut(&expense.owner_id) {
                ids.retain(|other| *other != id);
            }
        }
        Ok(removed)
    }

    /// Persist after an in-memory change; on failure run `undo` and tell the
    /// owner's subscribers
    fn commit(&self, owner: OwnerId, undo: impl FnOnce(&Self) -> ExpenseResult<()>) -> ExpenseResult<()> {
        match self.save() {
            Ok(()) => {
                self.notify(owner);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to persist expenses, rolling back");
                undo(self)?;
                self.notify_error(owner, &e);
                Err(e)
            }
        }
    }

    fn listeners_for(&self, owner: OwnerId) -> Vec<ExpenseListener> {
        match self.listeners.lock() {
            Ok(registry) => registry
                .entries
                .values()
                .filter(|(o, _)| *o == owner)
                .map(|(_, listener)| Arc::clone(listener))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn subscribed_owners(&self) -> Vec<OwnerId> {
        let mut owners: Vec<OwnerId> = match self.listeners.lock() {
            Ok(registry) => registry.entries.values().map(|(o, _)| *o).collect(),
            Err(_) => Vec::new(),
        };
        owners.sort();
        owners.dedup();
        owners
    }

    /// Push the owner's current records. Called with no locks held.
    fn notify(&self, owner: OwnerId) {
        let listeners = self.listeners_for(owner);
        if listeners.is_empty() {
            return;
        }
        match self.list(owner) {
            Ok(snapshot) => listeners.iter().for_each(|l| l(Ok(snapshot.as_slice()))),
            Err(e) => listeners.iter().for_each(|l| l(Err(&e))),
        }
    }

    fn notify_error(&self, owner: OwnerId, error: &ExpenseError) {
        for listener in self.listeners_for(owner) {
            listener(Err(error));
        }
    }
}

impl ExpenseStore for ExpenseRepository {
    fn create(&self, owner: OwnerId, input: NewExpense) -> ExpenseResult<Expense> {
        let expense = Expense::new(owner, input);
        let id = expense.id;
        self.insert(expense.clone())?;
        self.commit(owner, |repo| repo.remove(id).map(|_| ()))?;
        debug!(id = %id, "created expense");
        Ok(expense)
    }

    fn get(&self, id: ExpenseId) -> ExpenseResult<Option<Expense>> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&id).cloned())
    }

    fn list(&self, owner: OwnerId) -> ExpenseResult<Vec<Expense>> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_owner = self
            .by_owner
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_owner.get(&owner).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<&Expense> = ids.iter().filter_map(|id| data.get(id)).collect();
        sort_newest_first(&mut expenses);
        Ok(expenses.into_iter().cloned().collect())
    }

    fn subscribe(&self, owner: OwnerId, listener: ExpenseListener) -> ExpenseResult<Subscription> {
        let id = {
            let mut registry = self
                .listeners
                .lock()
                .map_err(|e| ExpenseError::Storage(format!("Failed to acquire lock: {}", e)))?;
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.insert(id, (owner, Arc::clone(&listener)));
            id
        };

        match self.list(owner) {
            Ok(snapshot) => listener(Ok(snapshot.as_slice())),
            Err(e) => listener(Err(&e)),
        }

        Ok(Subscription {
            id,
            registry: Some(Arc::downgrade(&self.listeners)),
        })
    }

    fn update(&self, id: ExpenseId, input: NewExpense) -> ExpenseResult<Expense> {
        let previous = self
            .get(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))?;

        let mut updated = previous.clone();
        updated.apply(input);
        self.insert(updated.clone())?;
        self.commit(previous.owner_id, move |repo| repo.insert(previous).map(|_| ()))?;
        debug!(id = %id, "updated expense");
        Ok(updated)
    }

    fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let removed = self
            .remove(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))?;

        let restore = removed.clone();
        self.commit(removed.owner_id, move |repo| repo.insert(restore).map(|_| ()))?;
        debug!(id = %id, "deleted expense");
        Ok(removed)
    }
}

fn sort_newest_first(expenses: &mut [&Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn input(cents: i64, description: &str, day: u32) -> NewExpense {
        NewExpense {
            amount: Money::from_cents(cents),
            description: description.to_string(),
            category: Category::Food,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            notes: String::new(),
        }
    }

    /// Listener that records the description lists it receives
    fn recorder() -> (ExpenseListener, Arc<Mutex<Vec<Result<Vec<String>, String>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: ExpenseListener = Arc::new(move |update| {
            let entry: Result<Vec<String>, String> = update
                .map(|list| list.iter().map(|e| e.description.clone()).collect())
                .map_err(|e| e.to_string());
            sink.lock().unwrap().push(entry);
        });
        (listener, seen)
    }

    #[test]
    fn test_create_and_list_newest_first() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();

        repo.create(owner, input(100, "older", 1)).unwrap();
        repo.create(owner, input(200, "newer", 9)).unwrap();
        repo.create(OwnerId::new(), input(300, "someone else", 5)).unwrap();

        let list = repo.list(owner).unwrap();
        let names: Vec<_> = list.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["newer", "older"]);
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_persists_across_reload() {
        let (temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        let created = repo.create(owner, input(5000, "Lunch", 5)).unwrap();

        let repo2 = ExpenseRepository::new(temp.path().join("expenses.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_update_keeps_identity() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        let created = repo.create(owner, input(5000, "Lunch", 5)).unwrap();

        let updated = repo.update(created.id, input(7500, "Dinner", 6)).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.owner_id, owner);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(repo.list(owner).unwrap()[0].description, "Dinner");
    }

    #[test]
    fn test_update_and_delete_missing_are_not_found() {
        let (_temp, repo) = create_test_repo();
        let missing = ExpenseId::new();

        assert!(repo.update(missing, input(1, "x", 1)).unwrap_err().is_not_found());
        assert!(repo.delete(missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_removes_from_owner_index() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        let created = repo.create(owner, input(5000, "Lunch", 5)).unwrap();

        let removed = repo.delete(created.id).unwrap();
        assert_eq!(removed.id, created.id);
        assert!(repo.list(owner).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_records_skipped_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        let owner = OwnerId::new();
        let good = Expense::new(owner, input(5000, "Lunch", 5));
        let file = serde_json::json!({
            "expenses": [good, {"description": "no id or date"}]
        });
        std::fs::write(&path, file.to_string()).unwrap();

        let repo = ExpenseRepository::new(path);
        repo.load().unwrap();
        assert_eq!(repo.list(owner).unwrap(), vec![good]);
    }

    #[test]
    fn test_subscriber_gets_initial_and_updated_snapshots() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        repo.create(owner, input(100, "first", 1)).unwrap();

        let (listener, seen) = recorder();
        let subscription = repo.subscribe(owner, listener).unwrap();
        assert!(subscription.is_active());

        repo.create(owner, input(200, "second", 2)).unwrap();
        repo.create(OwnerId::new(), input(300, "not mine", 3)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Ok(vec!["first".to_string()]));
        assert_eq!(seen[1], Ok(vec!["second".to_string(), "first".to_string()]));
    }

    #[test]
    fn test_unsubscribe_stops_updates() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();

        let (listener, seen) = recorder();
        let mut subscription = repo.subscribe(owner, listener).unwrap();
        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(!subscription.is_active());

        repo.create(owner, input(100, "after", 1)).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_dropped_subscription_unsubscribes() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();

        let (listener, seen) = recorder();
        drop(repo.subscribe(owner, listener).unwrap());

        repo.create(owner, input(100, "after", 1)).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_reload_pushes_external_changes() {
        let (temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        let (listener, seen) = recorder();
        let _subscription = repo.subscribe(owner, listener).unwrap();

        let other_handle = ExpenseRepository::new(temp.path().join("expenses.json"));
        other_handle.load().unwrap();
        other_handle.create(owner, input(100, "from elsewhere", 1)).unwrap();

        repo.reload().unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.last().unwrap(), &Ok(vec!["from elsewhere".to_string()]));
    }

    #[test]
    fn test_failed_save_rolls_back_and_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = temp_dir.path().join("expenses.json");
        std::fs::create_dir_all(path.join("blocker")).unwrap();
        let repo = ExpenseRepository::new(path);
        let owner = OwnerId::new();

        let (listener, seen) = recorder();
        let _subscription = repo.subscribe(owner, listener).unwrap();

        let err = repo.create(owner, input(100, "lost", 1)).unwrap_err();
        assert!(matches!(err, ExpenseError::Storage(_)));
        assert!(repo.list(owner).unwrap().is_empty());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].is_err());
    }
}
