use std::collections::BTreeMap;

use crate::models::{format_number, CellValue, FieldValue, ParsedRecord, RawRow};
use crate::utils::header::{is_phone_like, missing_mandatory_headers, normalize_header};
use crate::utils::text::serial_to_iso_date;

use super::ParseFailure;

pub const EMPTY_FILE_MESSAGE: &str = "File is empty or has no data rows.";

/// Turns a sheet into records, treating the first row as headers.
///
/// # Arguments
/// * `rows` - first sheet, header row first
///
/// # Returns
/// One record per data row in input order, or a structural failure
pub fn build_records(rows: Vec<Vec<CellValue>>) -> Result<Vec<ParsedRecord>, ParseFailure> {
    let mut rows = rows.into_iter();

    let header: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_header).collect(),
        None => return Err(ParseFailure::new(EMPTY_FILE_MESSAGE)),
    };

    // drop fully blank trailing rows
    let mut data_rows: Vec<Vec<CellValue>> = rows.collect();
    while let Some(last_row) = data_rows.last() {
        if is_blank_row(last_row) {
            data_rows.pop();
        } else {
            break;
        }
    }

    if data_rows.is_empty() {
        return Err(ParseFailure::new(EMPTY_FILE_MESSAGE));
    }

    let missing = missing_mandatory_headers(&header);
    if !missing.is_empty() {
        return Err(ParseFailure::new(format!(
            "Missing required columns: {}.",
            missing.join(", ")
        )));
    }

    let records = data_rows
        .into_iter()
        .enumerate()
        .map(|(key, row)| normalize_row(key, to_raw_row(&header, row)))
        .collect();

    Ok(records)
}

fn cell_header(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => normalize_header(s),
        CellValue::Number(n) | CellValue::DateSerial(n) => format_number(*n),
    }
}

/// Column name reserved for the row index.
const ROW_KEY_HEADER: &str = "key";

/// Pairs cells with headers; short rows are padded, blank headers and a
/// `key` column skipped.
fn to_raw_row(header: &[String], row: Vec<CellValue>) -> RawRow {
    let mut cells = row.into_iter();
    header
        .iter()
        .map(|name| (name, cells.next().unwrap_or(CellValue::Empty)))
        .filter(|(name, _)| !name.is_empty() && name.as_str() != ROW_KEY_HEADER)
        .map(|(name, cell)| (name.clone(), cell))
        .collect()
}

fn normalize_row(key: usize, raw: RawRow) -> ParsedRecord {
    let mut fields = BTreeMap::new();

    for (name, cell) in raw {
        let value = if name == "dob" {
            normalize_dob(cell)
        } else if is_phone_like(&name) || name == "email" {
            FieldValue::Text(cell_text(&cell).trim().to_string())
        } else {
            match cell {
                CellValue::Number(n) => FieldValue::Number(n),
                other => FieldValue::Text(cell_text(&other)),
            }
        };

        // first column wins on duplicate headers
        fields.entry(name).or_insert(value);
    }

    ParsedRecord { key, fields }
}

fn normalize_dob(cell: CellValue) -> FieldValue {
    match cell {
        CellValue::Number(serial) | CellValue::DateSerial(serial) => {
            FieldValue::Text(serial_to_iso_date(serial).unwrap_or_else(|| format_number(serial)))
        }
        other => FieldValue::Text(cell_text(&other).trim().to_string()),
    }
}

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) | CellValue::DateSerial(n) => format_number(*n),
    }
}

fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(|cell| match cell {
        CellValue::Empty => true,
        CellValue::Text(s) => s.trim().is_empty(),
        _ => false,
    })
}
