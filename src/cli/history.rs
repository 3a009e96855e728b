//! Audit history for the signed-in user

use crate::auth::IdentityProvider;
use crate::error::{ExpenseError, ExpenseResult};
use crate::storage::Storage;

pub fn handle_history(
    storage: &Storage,
    identity: &dyn IdentityProvider,
    limit: usize,
) -> ExpenseResult<()> {
    let owner = identity.current_owner().ok_or(ExpenseError::Unauthenticated)?;
    let entries = storage.audit().read_recent_for(owner, limit)?;

    if entries.is_empty() {
        println!("No history yet.");
        return Ok(());
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
