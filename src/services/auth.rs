//! Account registration and sign-in

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::auth::{is_valid_email, Password, Session};
use crate::error::{ExpenseError, ExpenseResult, ValidationErrors};
use crate::models::{UserAccount, UserProfile};
use crate::storage::Storage;

pub struct AuthService<'a> {
    storage: &'a Storage,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn validate_credentials(email: &str, password: &Password) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_email(email) {
            errors.push("email", "Enter a valid email address");
        }
        if let Err(password_errors) = password.validate() {
            for error in password_errors.iter() {
                errors.push(error.field, error.message.clone());
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Create an account and sign in as it
    pub fn register(&self, email: &str, password: &Password) -> ExpenseResult<UserProfile> {
        Self::validate_credentials(email, password)?;

        let user = UserAccount::new(email.trim(), password.hash()?);
        self.storage.users.insert(user.clone())?;
        self.storage.users.save()?;

        let profile = UserProfile::from(&user);
        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.email.clone()),
            &profile,
        );

        Session::for_user(&user).save(self.storage.paths())?;
        info!(user = %user.id, "registered new user");
        Ok(profile)
    }

    /// Check credentials and start a session
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub fn login(&self, email: &str, password: &Password) -> ExpenseResult<UserProfile> {
        let rejected = || ExpenseError::Auth("Invalid email or password".into());

        let user = self.storage.users.get_by_email(email)?.ok_or_else(rejected)?;
        if !password.verify(&user.password_hash)? {
            return Err(rejected());
        }

        Session::for_user(&user).save(self.storage.paths())?;
        info!(user = %user.id, "signed in");
        Ok(UserProfile::from(&user))
    }

    /// End the session. Returns whether anyone was signed in.
    pub fn logout(&self) -> ExpenseResult<bool> {
        Session::clear(self.storage.paths())
    }

    /// The stored session, provided its user still exists
    pub fn active_session(&self) -> ExpenseResult<Option<Session>> {
        let Some(session) = Session::load(self.storage.paths())? else {
            return Ok(None);
        };
        if self.storage.users.get(session.user_id)?.is_none() {
            warn!(user = %session.user_id, "session refers to an unknown user");
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// The signed-in user's profile, if the session is valid
    pub fn current_user(&self) -> ExpenseResult<Option<UserProfile>> {
        let Some(session) = Session::load(self.storage.paths())? else {
            return Ok(None);
        };
        Ok(self
            .storage
            .users
            .get(session.user_id)?
            .map(|user| UserProfile::from(&user)))
    }
}
