pub mod csv;

use crate::models::AppError;

pub use self::csv::{export_error_report_csv, export_template_csv};

/// Export formats for the import template.
pub fn export_template(format: &str) -> Result<String, AppError> {
    match format.to_uppercase().as_str() {
        "CSV" => export_template_csv(),
        other => Err(AppError::new(format!(
            "Unsupported template format: {}",
            other
        ))),
    }
}
