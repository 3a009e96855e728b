//! Account CLI commands: register, login, logout, whoami

use crate::auth::{prompt_password, Password};
use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::services::AuthService;
use crate::storage::Storage;

/// Environment variable read for `--password`
pub const PASSWORD_ENV: &str = "EXPENSE_CLI_PASSWORD";

fn read_password(given: Option<String>, confirm: bool) -> ExpenseResult<Password> {
    if let Some(password) = given {
        return Ok(Password::new(password));
    }

    let password = prompt_password("Password: ")?;
    if confirm {
        let again = prompt_password("Repeat password: ")?;
        if again.as_str() != password.as_str() {
            return Err(ExpenseError::invalid("password", "Passwords do not match"));
        }
    }
    Ok(password)
}

pub fn handle_register(storage: &Storage, email: &str, password: Option<String>) -> ExpenseResult<()> {
    let password = read_password(password, true)?;
    let profile = AuthService::new(storage).register(email, &password)?;

    println!("Registered and signed in as {}", profile.email);
    println!("  ID: {}", profile.id);
    Ok(())
}

pub fn handle_login(storage: &Storage, email: &str, password: Option<String>) -> ExpenseResult<()> {
    let password = read_password(password, false)?;
    let profile = AuthService::new(storage).login(email, &password)?;

    println!("Signed in as {}", profile.email);
    Ok(())
}

pub fn handle_logout(storage: &Storage) -> ExpenseResult<()> {
    if AuthService::new(storage).logout()? {
        println!("Signed out.");
    } else {
        println!("Nobody is signed in.");
    }
    Ok(())
}

pub fn handle_whoami(storage: &Storage, settings: &Settings) -> ExpenseResult<()> {
    let Some(profile) = AuthService::new(storage).current_user()? else {
        println!("Not signed in.");
        return Ok(());
    };

    println!("Email:          {}", profile.email);
    println!("ID:             {}", profile.id);
    println!("Member since:   {}", profile.created_at.format("%Y-%m-%d"));
    match profile.monthly_budget {
        Some(budget) => println!(
            "Monthly budget: {}",
            budget.format_with_symbol(&settings.currency_symbol)
        ),
        None => println!("Monthly budget: (not set)"),
    }
    Ok(())
}
