//! Audit trail of data changes
//!
//! Every create, update and delete of an expense, user account or budget is
//! appended to `audit.log` as one JSON line with before/after snapshots.
//! Updates also carry a short summary of the changed fields.
//!
//! ```rust,ignore
//! let logger = AuditLogger::new(paths.audit_log());
//! let diff = generate_diff(&before_json, &after_json);
//! logger.log(&AuditEntry::update(EntityType::Expense, id, name, &before, &after, diff))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
