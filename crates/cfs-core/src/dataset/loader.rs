//! Score-sheet loader.
//!
//! The header row is not assumed to be the first row: the sheet usually
//! carries a title block, so the loader scans down for the row holding the
//! identifier label. Every column after that is classified as the
//! identifier, the final-score column, or a numeric metric.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

use crate::dataset::cell::{normalize_with, CellValue, SignPolicy};
use crate::dataset::grid::{self, Grid, InputFormat};
use crate::dataset::record::{CompanyDataset, CompanyRecord};
use crate::error::CfsError;
use crate::CfsResult;

pub const DEFAULT_SHEET_NAME: &str = "Total Score";
pub const DEFAULT_IDENTIFIER_LABEL: &str = "Company";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where to find the data and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Workbook sheet to read (ignored for delimited text)
    pub sheet_name: String,
    /// Exact label of the identifier column; also anchors the header row
    pub identifier_label: String,
    pub sign_policy: SignPolicy,
    pub format: InputFormat,
    /// Field delimiter for delimited text
    pub delimiter: char,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            sheet_name: DEFAULT_SHEET_NAME.into(),
            identifier_label: DEFAULT_IDENTIFIER_LABEL.into(),
            sign_policy: SignPolicy::StripMinus,
            format: InputFormat::Auto,
            delimiter: ',',
        }
    }
}

/// Outcome of a non-fatal load: a dataset (possibly empty) and the error
/// that emptied it, if any.
#[derive(Debug)]
pub struct DatasetLoad {
    pub dataset: CompanyDataset,
    pub error: Option<CfsError>,
}

impl DatasetLoad {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ColumnRole {
    Identifier,
    FinalScore,
    Metric(String),
    Ignored,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load a score sheet, failing on a missing sheet, missing header row or
/// unreadable bytes.
pub fn load(bytes: &[u8], options: &LoaderOptions) -> CfsResult<CompanyDataset> {
    let start = Instant::now();
    let delimiter = delimiter_byte(options.delimiter)?;
    let grid = grid::read_grid(bytes, options.format, &options.sheet_name, delimiter)?;
    let dataset = load_from_grid(&grid, options)?;

    debug!(
        companies = dataset.len(),
        columns = dataset.columns.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "loaded score sheet"
    );
    Ok(dataset)
}

/// Load a score sheet without failing.
///
/// Any loader error is logged and replaced by an empty dataset so the
/// caller can show a "no data" state.
pub fn load_companies(bytes: &[u8], options: &LoaderOptions) -> DatasetLoad {
    match load(bytes, options) {
        Ok(dataset) => DatasetLoad {
            dataset,
            error: None,
        },
        Err(e) => {
            warn!(error = %e, sheet = %options.sheet_name, "score sheet load failed");
            DatasetLoad {
                dataset: CompanyDataset::empty(),
                error: Some(e),
            }
        }
    }
}

/// Build the dataset from an already-parsed grid.
pub fn load_from_grid(grid: &Grid, options: &LoaderOptions) -> CfsResult<CompanyDataset> {
    let label = options.identifier_label.as_str();
    let header_index = find_header_row(grid, label).ok_or_else(|| {
        CfsError::HeaderRowNotFound {
            label: label.to_string(),
        }
    })?;

    let headers: Vec<String> = grid[header_index]
        .iter()
        .map(|cell| normalize_header(&cell.as_text()))
        .collect();
    let roles: Vec<ColumnRole> = headers.iter().map(|h| classify(h, label)).collect();

    let columns = metric_columns(&roles);
    let final_score_column = headers
        .iter()
        .zip(&roles)
        .filter(|(_, role)| **role == ColumnRole::FinalScore)
        .map(|(h, _)| h.clone())
        .last();

    if !roles.contains(&ColumnRole::FinalScore) {
        warn!("no final-score column found; every company scores 0");
    }

    let mut skipped = 0usize;
    let records: Vec<CompanyRecord> = grid[header_index + 1..]
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_blank()))
        .filter_map(|row| {
            let record = build_record(row, &roles, options.sign_policy);
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .collect();

    if skipped > 0 {
        debug!(skipped, "dropped rows without a company name");
    }

    Ok(CompanyDataset::new(records, columns, final_score_column))
}

/// Collapse whitespace runs to one space and trim.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for headers naming the precomputed composite score.
pub fn is_final_score_header(header: &str) -> bool {
    let lower = header.to_lowercase();
    lower.contains("cfs") || (lower.contains("total") && lower.contains("score"))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn delimiter_byte(delimiter: char) -> CfsResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CfsError::InvalidInput {
            field: "delimiter".into(),
            reason: format!("'{delimiter}' is not a single-byte character"),
        })
    }
}

fn find_header_row(grid: &Grid, label: &str) -> Option<usize> {
    grid.iter()
        .position(|row| row.iter().any(|cell| cell.as_text().trim() == label))
}

fn classify(header: &str, identifier_label: &str) -> ColumnRole {
    if header == identifier_label {
        ColumnRole::Identifier
    } else if is_final_score_header(header) {
        ColumnRole::FinalScore
    } else if header.is_empty() {
        ColumnRole::Ignored
    } else {
        ColumnRole::Metric(header.to_string())
    }
}

fn metric_columns(roles: &[ColumnRole]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for role in roles {
        if let ColumnRole::Metric(h) = role {
            if !columns.contains(h) {
                columns.push(h.clone());
            }
        }
    }
    columns
}

fn build_record(
    row: &[CellValue],
    roles: &[ColumnRole],
    policy: SignPolicy,
) -> Option<CompanyRecord> {
    let empty = CellValue::Empty;
    let mut identifier = String::new();
    let mut final_score = rust_decimal::Decimal::ZERO;
    let mut metrics = BTreeMap::new();

    for (i, role) in roles.iter().enumerate() {
        let cell = row.get(i).unwrap_or(&empty);
        match role {
            ColumnRole::Identifier => identifier = cell.as_text().trim().to_string(),
            ColumnRole::FinalScore => final_score = normalize_with(cell, policy),
            ColumnRole::Metric(h) => {
                metrics.insert(h.clone(), normalize_with(cell, policy));
            }
            ColumnRole::Ignored => {}
        }
    }

    if identifier.is_empty() {
        return None;
    }
    Some(CompanyRecord {
        identifier,
        final_score,
        metrics,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
