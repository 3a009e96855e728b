//! The signed-in user, persisted between invocations in `session.json`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExpensePaths;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{OwnerId, UserAccount};
use crate::storage::{read_json, write_json_atomic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: OwnerId,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Session file contents; `None` when signed out
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    session: Option<Session>,
}

impl Session {
    pub fn for_user(user: &UserAccount) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            signed_in_at: Utc::now(),
        }
    }

    /// Load the current session, if any
    pub fn load(paths: &ExpensePaths) -> ExpenseResult<Option<Session>> {
        let file: SessionFile = read_json(paths.session_file()).map_err(|e| {
            ExpenseError::Auth(format!("Session file is unreadable, run 'expense logout': {}", e))
        })?;
        Ok(file.session)
    }

    pub fn save(&self, paths: &ExpensePaths) -> ExpenseResult<()> {
        debug!(user = %self.user_id, "saving session");
        write_json_atomic(
            paths.session_file(),
            &SessionFile {
                session: Some(self.clone()),
            },
        )
    }

    /// Remove the session file. Returns whether a session existed.
    pub fn clear(paths: &ExpensePaths) -> ExpenseResult<bool> {
        let path = paths.session_file();
        if !path.exists() {
            return Ok(false);
        }
        let had_session = Self::load(paths).map(|s| s.is_some()).unwrap_or(true);
        std::fs::remove_file(&path)
            .map_err(|e| ExpenseError::Io(format!("Failed to remove session file: {}", e)))?;
        Ok(had_session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_paths() -> (TempDir, ExpensePaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths)
    }

    #[test]
    fn test_no_session_by_default() {
        let (_temp, paths) = test_paths();
        assert!(Session::load(&paths).unwrap().is_none());
        assert!(!Session::clear(&paths).unwrap());
    }

    #[test]
    fn test_save_load_clear() {
        let (_temp, paths) = test_paths();
        let user = UserAccount::new("ana@example.com", "hash");
        let session = Session::for_user(&user);

        session.save(&paths).unwrap();
        assert_eq!(Session::load(&paths).unwrap(), Some(session));

        assert!(Session::clear(&paths).unwrap());
        assert!(Session::load(&paths).unwrap().is_none());
    }
}
