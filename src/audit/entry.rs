//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::OwnerId;

/// Kind of change recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Kind of record that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Expense,
    User,
    Budget,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Expense => write!(f, "Expense"),
            EntityType::User => write!(f, "User"),
            EntityType::Budget => write!(f, "Budget"),
        }
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Display form of the record ID
    pub entity_id: String,

    /// Short human label, e.g. `2024-01-05 Lunch`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Snapshot before the change (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Snapshot after the change (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id, entity_name)
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::base(Operation::Update, entity_type, entity_id, entity_name)
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Delete, entity_type, entity_id, entity_name)
        }
    }

    /// Whether this entry records a change to `owner`'s data
    ///
    /// Account and budget entries are keyed by the owner's ID; expense
    /// entries carry the owner in their snapshots.
    pub fn concerns_owner(&self, owner: OwnerId) -> bool {
        match self.entity_type {
            EntityType::User | EntityType::Budget => self.entity_id == owner.to_string(),
            EntityType::Expense => {
                let owner = owner.as_uuid().to_string();
                [&self.before, &self.after]
                    .into_iter()
                    .flatten()
                    .any(|snapshot| {
                        snapshot.get("owner_id").and_then(serde_json::Value::as_str)
                            == Some(owner.as_str())
                    })
            }
        }
    }

    /// Single-line rendering used by `expense history`
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_has_only_after() {
        let entry = AuditEntry::create(
            EntityType::Expense,
            "exp-12345678",
            Some("2024-01-05 Lunch".to_string()),
            &json!({"amount": 5000}),
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(json!({"amount": 5000})));
    }

    #[test]
    fn test_update_and_delete_snapshots() {
        let update = AuditEntry::update(
            EntityType::Budget,
            "usr-12345678",
            None,
            &json!({"monthly_budget": null}),
            &json!({"monthly_budget": 50000}),
            Some("monthly_budget: none -> 50000".to_string()),
        );
        assert!(update.before.is_some() && update.after.is_some());

        let delete = AuditEntry::delete(EntityType::Expense, "exp-1", None, &json!({}));
        assert_eq!(delete.operation, Operation::Delete);
        assert!(delete.after.is_none());
    }

    #[test]
    fn test_serialized_names_are_lowercase() {
        let entry = AuditEntry::create(EntityType::User, "usr-1", None, &json!({}));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"operation\":\"create\""));
        assert!(line.contains("\"entity_type\":\"user\""));
        assert!(!line.contains("diff_summary"));
    }

    #[test]
    fn test_concerns_owner() {
        let owner = OwnerId::new();
        let other = OwnerId::new();

        let budget = AuditEntry::create(EntityType::Budget, owner.to_string(), None, &json!({}));
        assert!(budget.concerns_owner(owner));
        assert!(!budget.concerns_owner(other));

        let expense = AuditEntry::delete(
            EntityType::Expense,
            "exp-12345678",
            None,
            &json!({"owner_id": owner.as_uuid().to_string(), "amount": 100}),
        );
        assert!(expense.concerns_owner(owner));
        assert!(!expense.concerns_owner(other));
    }

    #[test]
    fn test_human_readable() {
        let entry = AuditEntry::update(
            EntityType::Expense,
            "exp-12345678",
            Some("2024-01-05 Lunch".to_string()),
            &json!({"amount": 1}),
            &json!({"amount": 2}),
            Some("amount: 1 -> 2".to_string()),
        );

        let text = entry.format_human_readable();
        assert!(text.contains("UPDATE Expense exp-12345678 (2024-01-05 Lunch)"));
        assert!(text.ends_with("Changes: amount: 1 -> 2"));
    }
}
