//! Raw bytes to a row-major grid of cells.
//!
//! Workbooks (xlsx, xlsm, xlsb, xls, ods) go through calamine and are
//! narrowed to one named sheet. Anything else is read as delimited text,
//! which has a single implicit sheet.

use serde::{Deserialize, Serialize};

use crate::dataset::cell::CellValue;
use crate::error::CfsError;
use crate::CfsResult;

/// Row-major grid; blank cells are [`CellValue::Empty`].
pub type Grid = Vec<Vec<CellValue>>;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Container format of the input bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Sniff the magic bytes: zip/OLE containers are workbooks, anything
    /// else is delimited text.
    #[default]
    Auto,
    Xlsx,
    Csv,
}

impl InputFormat {
    /// Resolve `Auto` against the actual bytes.
    pub fn detect(self, bytes: &[u8]) -> InputFormat {
        match self {
            InputFormat::Auto => {
                if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
                    InputFormat::Xlsx
                } else {
                    InputFormat::Csv
                }
            }
            other => other,
        }
    }
}

/// Parse `bytes` into the grid of `sheet_name`.
///
/// `sheet_name` is ignored for delimited text.
pub fn read_grid(
    bytes: &[u8],
    format: InputFormat,
    sheet_name: &str,
    delimiter: u8,
) -> CfsResult<Grid> {
    if bytes.is_empty() {
        return Err(CfsError::EmptyOrMalformedInput(
            "input contains no bytes".into(),
        ));
    }

    match format.detect(bytes) {
        InputFormat::Xlsx => read_workbook_grid(bytes, sheet_name),
        _ => read_delimited_grid(bytes, delimiter),
    }
}

/// Read delimited text (CSV/TSV). Rows may have differing lengths.
pub fn read_delimited_grid(bytes: &[u8], delimiter: u8) -> CfsResult<Grid> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Grid::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(CellValue::from).collect());
    }

    if grid.is_empty() {
        return Err(CfsError::EmptyOrMalformedInput(
            "delimited input has no rows".into(),
        ));
    }
    Ok(grid)
}

#[cfg(feature = "xlsx")]
pub fn read_workbook_grid(bytes: &[u8], sheet_name: &str) -> CfsResult<Grid> {
    use calamine::{open_workbook_auto_from_rs, Reader};
    use std::io::Cursor;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| CfsError::EmptyOrMalformedInput(format!("unreadable workbook: {e}")))?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet_name) {
        return Err(CfsError::SheetNotFound {
            sheet: sheet_name.to_string(),
            available,
        });
    }

    let range = workbook.worksheet_range(sheet_name).map_err(|e| {
        CfsError::EmptyOrMalformedInput(format!("unreadable sheet '{sheet_name}': {e}"))
    })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_from_workbook).collect())
        .collect())
}

#[cfg(not(feature = "xlsx"))]
pub fn read_workbook_grid(_bytes: &[u8], _sheet_name: &str) -> CfsResult<Grid> {
    Err(CfsError::EmptyOrMalformedInput(
        "workbook input requires the `xlsx` feature".into(),
    ))
}

#[cfg(feature = "xlsx")]
fn cell_from_workbook(cell: &calamine::Data) -> CellValue {
    use calamine::Data;

    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(n) => CellValue::from(*n),
        Data::Float(n) => CellValue::from(*n),
        // Dates read as their serial number, the way the sheet stores them.
        Data::DateTime(dt) => CellValue::from(dt.as_f64()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            CellValue::from(s.as_str())
        }
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
