//! CSV import service
//!
//! Reads files in the format written by `export csv` (Date, Description,
//! Category, Amount and an optional Notes column) back into the signed-in
//! user's expenses. Columns are found by header name, so their order doesn't
//! matter. Each row is validated like a hand-entered expense; bad rows are
//! reported by line and skipped. Rows matching an existing expense (same
//! date, amount and description) are skipped as duplicates.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::auth::IdentityProvider;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{draft::DRAFT_DATE_FORMAT, Expense, ExpenseDraft, Money};
use crate::storage::Storage;

use super::expense::ExpenseService;

/// Alternative date layouts accepted on import, tried after ISO dates
const FALLBACK_DATE_FORMATS: [&str; 4] = ["%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// Header positions of the imported columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub description_column: usize,
    pub category_column: usize,
    pub amount_column: usize,
    pub notes_column: Option<usize>,
}

impl ColumnMapping {
    /// Locate columns by header name (case-insensitive)
    ///
    /// Spanish header names are accepted too.
    pub fn from_headers(headers: &StringRecord) -> ExpenseResult<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };

        let mut missing = Vec::new();
        let mut require = |names: &[&str], label: &'static str| {
            let column = find(names);
            if column.is_none() {
                missing.push(label);
            }
            column.unwrap_or_default()
        };

        let date_column = require(&["date", "fecha"], "Date");
        let description_column = require(&["description", "descripción", "descripcion"], "Description");
        let category_column = require(&["category", "categoría", "categoria"], "Category");
        let amount_column = require(&["amount", "monto"], "Amount");

        if !missing.is_empty() {
            return Err(ExpenseError::Import(format!(
                "Missing column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            date_column,
            description_column,
            category_column,
            amount_column,
            notes_column: find(&["notes", "note", "notas"]),
        })
    }
}

/// A row that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRowError {
    /// 1-based line in the source file
    pub line: u64,
    pub message: String,
}

/// Result of a completed import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    expenses: ExpenseService<'a>,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, identity: &'a dyn IdentityProvider) -> Self {
        Self {
            expenses: ExpenseService::new(storage, identity),
        }
    }

    pub fn import_file(&self, path: &Path) -> ExpenseResult<ImportResult> {
        let file = std::fs::File::open(path)
            .map_err(|e| ExpenseError::Import(format!("Cannot open {}: {}", path.display(), e)))?;
        self.import_reader(file)
    }

    /// Import every row from `source`
    ///
    /// Fails outright only when nobody is signed in or the header is
    /// unusable; row problems end up in [`ImportResult::errors`].
    pub fn import_reader<R: Read>(&self, source: R) -> ExpenseResult<ImportResult> {
        self.expenses.require_owner()?;
        let existing = self.expenses.list()?;
        let mut seen: HashSet<(NaiveDate, Money, String)> = existing.iter().map(duplicate_key).collect();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);
        let headers = reader
            .headers()
            .map_err(|e| ExpenseError::Import(format!("Error reading CSV header: {}", e)))?
            .clone();
        let mapping = ColumnMapping::from_headers(&headers)?;

        let mut result = ImportResult::default();
        for (idx, record) in reader.records().enumerate() {
            // Header is line 1
            let fallback_line = idx as u64 + 2;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                    result.errors.push(ImportRowError {
                        line,
                        message: format!("Error reading CSV record: {}", e),
                    });
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

            let draft = parse_record(&record, &mapping);
            let input = match draft.validate() {
                Ok(input) => input,
                Err(errors) => {
                    result.errors.push(ImportRowError {
                        line,
                        message: errors.to_string(),
                    });
                    continue;
                }
            };

            let key = (input.date, input.amount, input.description.to_lowercase());
            if seen.contains(&key) {
                debug!(line, "skipping duplicate row");
                result.duplicates_skipped += 1;
                continue;
            }

            match self.expenses.create(&draft) {
                Ok(_) => {
                    seen.insert(key);
                    result.imported += 1;
                }
                Err(e) => result.errors.push(ImportRowError {
                    line,
                    message: e.to_string(),
                }),
            }
        }

        info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors.len(),
            "import finished"
        );
        Ok(result)
    }
}

fn duplicate_key(expense: &Expense) -> (NaiveDate, Money, String) {
    (expense.date, expense.amount, expense.description.to_lowercase())
}

fn field(record: &StringRecord, column: usize) -> String {
    record.get(column).unwrap_or("").to_string()
}

/// Turn a CSV row into a draft, normalizing the date to ISO form when it
/// uses one of the fallback layouts
fn parse_record(record: &StringRecord, mapping: &ColumnMapping) -> ExpenseDraft {
    let date = normalize_date(&field(record, mapping.date_column));
    let draft = ExpenseDraft::new(
        field(record, mapping.amount_column),
        field(record, mapping.description_column),
        field(record, mapping.category_column),
        Some(date),
    );
    match mapping.notes_column {
        Some(column) => draft.with_notes(field(record, column)),
        None => draft,
    }
}

fn normalize_date(text: &str) -> String {
    if NaiveDate::parse_from_str(text, DRAFT_DATE_FORMAT).is_ok() {
        return text.to_string();
    }
    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .map(|date| date.format(DRAFT_DATE_FORMAT).to_string())
        .unwrap_or_else(|| text.to_string())
}
