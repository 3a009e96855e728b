//! YAML export of a user's data
//!
//! Same content as the JSON export, in a form that is easier to read.

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::export::json::FullExport;

pub fn export_full_yaml<W: Write + ?Sized>(export: &FullExport, writer: &mut W) -> ExpenseResult<()> {
    let header = [
        "# expense-cli export".to_string(),
        format!("# User: {}", export.user.email),
        format!("# Generated: {}", export.exported_at),
        format!("# App Version: {}", export.app_version),
    ];
    for line in &header {
        writeln!(writer, "{}", line).map_err(|e| ExpenseError::Export(e.to_string()))?;
    }
    writeln!(writer).map_err(|e| ExpenseError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| ExpenseError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseDraft, Expense, OwnerId, UserAccount, UserProfile};
    use crate::reports::StatsContext;
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn test_yaml_export() {
        let user = UserAccount::new("ana@example.com", "hash");
        let input = ExpenseDraft::new("12.5", "Cinema", "entertainment", Some("2024-01-05".into()))
            .validate()
            .unwrap();
        let expenses = vec![Expense::new(OwnerId::new(), input)];
        let ctx = StatsContext::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Weekday::Sun);
        let export = FullExport::build(UserProfile::from(&user), expenses, &ctx, 80.0);

        let mut output = Vec::new();
        export_full_yaml(&export, &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert!(yaml.starts_with("# expense-cli export\n# User: ana@example.com\n"));
        assert!(yaml.contains("description: Cinema"));
        assert!(yaml.contains(&format!("category: {}", Category::Entertainment.id())));

        let body: String = yaml
            .lines()
            .filter(|line| !line.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");
        let value: serde_yaml::Value = serde_yaml::from_str(&body).unwrap();
        assert_eq!(value["metadata"]["expense_count"].as_u64(), Some(1));
    }
}
