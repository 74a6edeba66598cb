//! Cleaning service - load the sales CSV into a typed frame
//!
//! Rows are validated one at a time; a bad row is counted and skipped, while
//! a bad file (missing, unparseable, lacking required columns) fails the
//! whole load.

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::config::CsvOptions;
use crate::domain::result::{Error, Result};
use crate::domain::{CleanReport, Column, Sale, SalesFrame};

/// Malformed date literal present in known exports, and its correction
const KNOWN_BAD_DATE: &str = "2E-05-25";
const KNOWN_BAD_DATE_FIX: &str = "2023-05-25";

/// Field values read as missing (pandas' default NA markers)
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A cleaned frame plus what happened to the input rows
#[derive(Debug, Clone)]
pub struct CleanedSales {
    pub frame: SalesFrame,
    pub report: CleanReport,
}

/// Load and clean the file at `path`.
///
/// Never fails: problems are logged and an empty frame is returned.
pub fn load_and_clean(path: &Path) -> SalesFrame {
    match try_load_and_clean(path, &CsvOptions::default()) {
        Ok(cleaned) => cleaned.frame,
        Err(e) => {
            tracing::error!("Failed to load or clean {}: {}", path.display(), e);
            SalesFrame::default()
        }
    }
}

/// Load and clean the file at `path`, reporting file-level failures.
pub fn try_load_and_clean(path: &Path, options: &CsvOptions) -> Result<CleanedSales> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)
        .map_err(|e| Error::unreadable(format!("{}: {}", path.display(), e)))?;

    let cleaned = clean_reader(file, options)?;
    tracing::info!(
        rows_read = cleaned.report.rows_read,
        rows_kept = cleaned.report.rows_kept,
        dropped = cleaned.report.dropped(),
        "Loaded {}",
        path.display()
    );
    Ok(cleaned)
}

/// Clean CSV data from any reader
pub fn clean_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<CleanedSales> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut report = CleanReport::default();
    let mut sales = Vec::new();

    for result in reader.records() {
        let record = result?;
        report.rows_read += 1;
        // Header is line 1
        let line = report.rows_read + 1;

        match clean_row(&record, &layout) {
            Ok(row) => {
                if row.repaired {
                    report.dates_repaired += 1;
                }
                sales.push(row.sale);
            }
            Err(reason) => {
                tracing::debug!(line, reason = reason.as_str(), "Dropped row");
                match reason {
                    DropReason::Missing => report.dropped_missing += 1,
                    DropReason::InvalidDate => report.dropped_invalid_date += 1,
                    DropReason::InvalidNumber => report.dropped_invalid_number += 1,
                    DropReason::NonPositiveQuantity => report.dropped_non_positive += 1,
                }
            }
        }
    }

    report.rows_kept = sales.len();
    Ok(CleanedSales {
        frame: SalesFrame::from_sales(sales),
        report,
    })
}

/// Positions of the required columns in the header
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    date: usize,
    product: usize,
    quantity: usize,
    unit_price: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |column: Column| headers.iter().position(|h| h == column.name());

        let positions: Vec<(Column, Option<usize>)> =
            Column::REQUIRED.iter().map(|c| (*c, find(*c))).collect();

        let missing: Vec<&str> = positions
            .iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(c, _)| c.name())
            .collect();
        if !missing.is_empty() {
            return Err(Error::missing_columns(missing));
        }

        let at = |column: Column| {
            positions
                .iter()
                .find(|(c, _)| *c == column)
                .and_then(|(_, idx)| *idx)
                .unwrap_or_default()
        };

        Ok(Self {
            date: at(Column::Date),
            product: at(Column::Product),
            quantity: at(Column::Quantity),
            unit_price: at(Column::UnitPrice),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    Missing,
    InvalidDate,
    InvalidNumber,
    NonPositiveQuantity,
}

impl DropReason {
    fn as_str(&self) -> &'static str {
        match self {
            DropReason::Missing => "missing field",
            DropReason::InvalidDate => "invalid date",
            DropReason::InvalidNumber => "invalid number",
            DropReason::NonPositiveQuantity => "non-positive quantity",
        }
    }
}

struct CleanRow {
    sale: Sale,
    repaired: bool,
}

fn clean_row(record: &StringRecord, layout: &ColumnLayout) -> std::result::Result<CleanRow, DropReason> {
    let field = |idx: usize| record.get(idx).filter(|v| !is_missing(v));

    let (Some(raw_date), Some(product), Some(raw_quantity), Some(raw_price)) = (
        field(layout.date),
        field(layout.product).filter(|p| !p.trim().is_empty()),
        field(layout.quantity),
        field(layout.unit_price),
    ) else {
        return Err(DropReason::Missing);
    };

    let (date_text, repaired) = repair_date(raw_date);
    let date = parse_date(date_text).ok_or(DropReason::InvalidDate)?;

    let quantity = parse_number(raw_quantity).ok_or(DropReason::InvalidNumber)?;
    let unit_price = parse_number(raw_price).ok_or(DropReason::InvalidNumber)?;

    if quantity <= 0.0 {
        return Err(DropReason::NonPositiveQuantity);
    }

    Ok(CleanRow {
        sale: Sale::new(date, product, quantity, unit_price),
        repaired,
    })
}

fn is_missing(value: &str) -> bool {
    NA_MARKERS.contains(&value)
}

/// Rewrite the one known-bad date literal. Exact match only.
pub fn repair_date(raw: &str) -> (&str, bool) {
    if raw == KNOWN_BAD_DATE {
        (KNOWN_BAD_DATE_FIX, true)
    } else {
        (raw, false)
    }
}

/// Parse a calendar date; a time of day, if present, is discarded
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse a finite number; anything else is a coercion failure
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
