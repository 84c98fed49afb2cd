use std::path::Path;

use calamine::{open_workbook_auto, DataType, Reader};

use crate::models::CellValue;

use super::ParseFailure;

/// Reads the first worksheet only.
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<CellValue>>, ParseFailure> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|err| ParseFailure::new(format!("Failed to read the spreadsheet: {err}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ParseFailure::new("The spreadsheet has no worksheets."))?
        .map_err(|err| ParseFailure::new(format!("Failed to read the first worksheet: {err}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(to_cell_value).collect())
        .collect())
}

fn to_cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(v) => CellValue::Number(*v as f64),
        DataType::Bool(v) => CellValue::Text(v.to_string()),
        DataType::DateTime(serial) => CellValue::DateSerial(*serial),
        DataType::Error(_) => CellValue::Empty,
        _ => CellValue::Text(cell.to_string()),
    }
}
