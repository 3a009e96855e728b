//! Export module for expense-cli
//!
//! - CSV: the current expense list, spreadsheet-compatible
//! - JSON: machine-readable snapshot of the signed-in user's data
//! - YAML: the same snapshot, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{default_filename, export_expenses_csv, CSV_HEADER};
pub use json::{export_full_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
