//! Identity for expense-cli
//!
//! Services ask an [`IdentityProvider`] who the current user is. With no
//! signed-in user they return empty results and refuse to write.

pub mod password;
pub mod session;

pub use password::{prompt_password, Password, MIN_PASSWORD_LEN};
pub use session::Session;

use crate::models::OwnerId;

/// Source of the current user's identity
pub trait IdentityProvider {
    /// The signed-in user, or `None` when nobody is signed in
    fn current_owner(&self) -> Option<OwnerId>;
}

impl IdentityProvider for Option<OwnerId> {
    fn current_owner(&self) -> Option<OwnerId> {
        *self
    }
}

impl IdentityProvider for Option<Session> {
    fn current_owner(&self) -> Option<OwnerId> {
        self.as_ref().map(|s| s.user_id)
    }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn current_owner(&self) -> Option<OwnerId> {
        (**self).current_owner()
    }
}

/// Basic sign-in email check: non-blank with an `@` between two parts
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !email.contains(' '),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_identities() {
        let owner = OwnerId::new();
        assert_eq!(Some(owner).current_owner(), Some(owner));
        assert_eq!(None::<OwnerId>.current_owner(), None);
        assert_eq!(None::<Session>.current_owner(), None);
    }

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("  ana@example.com "));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@"));
        assert!(!is_valid_email("a na@example.com"));
    }
}
