//! Change summaries for audit entries
//!
//! Compares the top-level fields of two JSON snapshots and renders the changed
//! ones as `field: old -> new`.

use serde_json::Value;

/// Bookkeeping fields that change on every edit and are left out of summaries
const IGNORED_FIELDS: &[&str] = &["updated_at"];

const MAX_TEXT_LEN: usize = 40;

/// Summarize what changed between two snapshots
///
/// Returns `None` when nothing user-visible changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after)
            .then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes = Vec::new();

    for (key, old) in before_obj {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match after_obj.get(key) {
            Some(new) if new != old => changes.push(format!(
                "{}: {} -> {}",
                key,
                format_value(old),
                format_value(new)
            )),
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(old))),
        }
    }

    for (key, new) in after_obj {
        if !before_obj.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: (added) -> {}", key, format_value(new)));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::String(s) if s.chars().count() > MAX_TEXT_LEN => {
            let truncated: String = s.chars().take(MAX_TEXT_LEN - 3).collect();
            format!("\"{}...\"", truncated)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amount_and_category_change() {
        let before = json!({"amount": 5000, "category": "food", "description": "Lunch"});
        let after = json!({"amount": 7525, "category": "health", "description": "Lunch"});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "amount: 5000 -> 7525, category: \"food\" -> \"health\"");
    }

    #[test]
    fn test_updated_at_alone_is_not_a_change() {
        let before = json!({"amount": 100, "updated_at": "2024-01-01T00:00:00Z"});
        let after = json!({"amount": 100, "updated_at": "2024-02-01T00:00:00Z"});
        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_budget_set_from_none() {
        let before = json!({"monthly_budget": null});
        let after = json!({"monthly_budget": 50000});
        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "monthly_budget: none -> 50000"
        );
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"notes": "old"});
        let after = json!({"tag": "new"});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("notes: \"old\" -> (removed)"));
        assert!(diff.contains("tag: (added) -> \"new\""));
    }

    #[test]
    fn test_long_text_truncated() {
        let before = json!({"description": "a".repeat(100)});
        let after = json!({"description": "short"});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
        assert!(diff.len() < 80);
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).unwrap(), "1 -> 2");
        assert!(generate_diff(&json!("x"), &json!("x")).is_none());
    }
}
