use std::collections::HashMap;

use csv::WriterBuilder;

use crate::models::{AppError, ParsedRecord, RowErrors};
use crate::utils::header::template_headers;

/// Empty import template: header row only.
pub fn export_template_csv() -> Result<String, AppError> {
    write_rows(vec![template_headers()
        .into_iter()
        .map(str::to_string)
        .collect()])
}

/// One line per invalid row so the sheet can be fixed offline.
pub fn export_error_report_csv(
    records: &[ParsedRecord],
    errors: &[RowErrors],
) -> Result<String, AppError> {
    let by_row: HashMap<usize, &RowErrors> = errors
        .iter()
        .filter(|e| !e.errors.is_empty())
        .map(|e| (e.row, e))
        .collect();

    let mut rows = vec![vec![
        "row".to_string(),
        "name".to_string(),
        "email".to_string(),
        "errors".to_string(),
    ]];

    for record in records {
        if let Some(row_errors) = by_row.get(&record.key) {
            rows.push(vec![
                record.display_row().to_string(),
                record.text("name").unwrap_or_default().into_owned(),
                record.text("email").unwrap_or_default().into_owned(),
                row_errors.errors.join(" "),
            ]);
        }
    }

    write_rows(rows)
}

fn write_rows(rows: Vec<Vec<String>>) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for row in &rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::new(format!("CSV write error: {}", e)))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| AppError::new(format!("CSV buffer error: {}", e)))?;

    let csv_string =
        String::from_utf8(data).map_err(|e| AppError::new(format!("UTF-8 conversion error: {}", e)))?;

    // UTF-8 BOM so spreadsheet tools detect the encoding
    Ok(format!("\u{FEFF}{}", csv_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use std::collections::BTreeMap;

    #[test]
    fn test_template_header_row() {
        let csv = export_template_csv().unwrap();
        assert!(csv.starts_with('\u{FEFF}'));
        assert_eq!(
            csv.trim_start_matches('\u{FEFF}').trim_end(),
            "name,email,password,phone,block_name,room_number,dob,gender,\
             emergency_number_one,emergency_number_two,tariff_id,advance"
        );
    }

    #[test]
    fn test_error_report_lists_invalid_rows_only() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), FieldValue::Text("Ana".to_string()));
        let records = vec![
            ParsedRecord { key: 0, fields: BTreeMap::new() },
            ParsedRecord { key: 1, fields },
        ];
        let errors = vec![RowErrors {
            row: 1,
            errors: vec!["email is required.".to_string(), "phone is required.".to_string()],
        }];

        let csv = export_error_report_csv(&records, &errors).unwrap();
        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "3,Ana,,email is required. phone is required.");
    }
}
