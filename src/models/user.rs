//! User account model
//!
//! Local stand-in for the identity provider's user record plus the per-user
//! profile document (monthly budget).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::OwnerId;
use super::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: OwnerId,

    /// Sign-in email, stored as entered
    pub email: String,

    /// Argon2 PHC string
    pub password_hash: String,

    /// Monthly spending budget, if the user has set one
    #[serde(default)]
    pub monthly_budget: Option<Money>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: OwnerId::new(),
            email: email.into(),
            password_hash: password_hash.into(),
            monthly_budget: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_monthly_budget(&mut self, budget: Option<Money>) {
        self.monthly_budget = budget;
        self.updated_at = Utc::now();
    }

    /// Case-insensitive email comparison
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// The public view of a user, without credentials
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: OwnerId,
    pub email: String,
    pub monthly_budget: Option<Money>,
    pub created_at: DateTime<Utc>,
}

impl From<&UserAccount> for UserProfile {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            monthly_budget: user.monthly_budget,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_match_ignores_case() {
        let user = UserAccount::new("Ana@Example.com", "hash");
        assert!(user.has_email("ana@example.com "));
        assert!(!user.has_email("bob@example.com"));
    }

    #[test]
    fn test_profile_hides_hash() {
        let mut user = UserAccount::new("ana@example.com", "secret-hash");
        user.set_monthly_budget(Some(Money::from_units(500)));
        let profile = UserProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();

        assert!(!json.contains("secret-hash"));
        assert_eq!(profile.monthly_budget, Some(Money::from_units(500)));
    }
}
