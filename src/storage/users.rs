//! User repository for JSON storage
//!
//! Manages loading and saving user accounts to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{OwnerId, UserAccount};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<UserAccount>,
}

/// Repository for user accounts
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<OwnerId, UserAccount>>,
    /// Index: lowercase email -> user id
    by_email: RwLock<HashMap<String, OwnerId>>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_email: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> ExpenseResult<()> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_email = self
            .by_email
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_email.clear();

        for user in file_data.users {
            by_email.insert(normalize_email(&user.email), user.id);
            data.insert(user.id, user);
        }

        Ok(())
    }

    pub fn save(&self) -> ExpenseResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, id: OwnerId) -> ExpenseResult<Option<UserAccount>> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&id).cloned())
    }

    /// Look up a user by email (case-insensitive)
    pub fn get_by_email(&self, email: &str) -> ExpenseResult<Option<UserAccount>> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_email = self
            .by_email
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_email
            .get(&normalize_email(email))
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// Insert a new user; the email must not already be registered
    pub fn insert(&self, user: UserAccount) -> ExpenseResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_email = self
            .by_email
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let key = normalize_email(&user.email);
        if by_email.contains_key(&key) {
            return Err(ExpenseError::Duplicate {
                entity_type: "User",
                identifier: user.email,
            });
        }

        by_email.insert(key, user.id);
        data.insert(user.id, user);
        Ok(())
    }

    /// Replace an existing user record
    pub fn update(&self, user: UserAccount) -> ExpenseResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.get_mut(&user.id) {
            Some(existing) if existing.has_email(&user.email) => {
                *existing = user;
                Ok(())
            }
            Some(_) => Err(ExpenseError::Storage(
                "Changing a user's email is not supported".into(),
            )),
            None => Err(ExpenseError::user_not_found(user.id.to_string())),
        }
    }

    pub fn count(&self) -> ExpenseResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
