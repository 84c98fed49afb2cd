use std::path::Path;

use csv::ReaderBuilder;

use crate::models::CellValue;

use super::ParseFailure;

pub fn read_csv_rows(path: &Path) -> Result<Vec<Vec<CellValue>>, ParseFailure> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|err| ParseFailure::new(format!("Failed to read the CSV file: {err}")))?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|err| ParseFailure::new(format!("Failed to parse the CSV file: {err}")))?;
        rows.push(record.iter().map(to_cell_value).collect());
    }

    // spreadsheet tools prefix UTF-8 CSV with a BOM
    if let Some(CellValue::Text(first)) = rows.first_mut().and_then(|row| row.first_mut()) {
        *first = first.trim_start_matches('\u{FEFF}').to_string();
    }

    Ok(rows)
}

fn to_cell_value(cell: &str) -> CellValue {
    if cell.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(cell.to_string())
    }
}
