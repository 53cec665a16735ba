// ============================================================
// GSC WORKBOOK READER
// ============================================================
// Locate report sheets in a Search Console export, find the header
// row, map EN/IT header variants, and coerce cell values

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader, Sheets};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::gsc::{GscReportType, GscSheetRow};
use crate::domain::schema::{map_gsc_header, GscField, HEADER_ROW_HINTS};

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

/// A GSC export opened from raw bytes (XLSX or ODS).
pub struct GscWorkbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl GscWorkbook {
    pub fn open(raw: Vec<u8>) -> Result<Self> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(raw))
            .map_err(|e| AppError::ParseError(format!("Failed to open workbook: {}", e)))?;
        let names = sheets.sheet_names().to_vec();
        Ok(Self { sheets, names })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.names
    }

    /// Extract the rows of one report type. A missing sheet is not an error:
    /// GSC exports routinely omit report sheets, so it yields no rows.
    pub fn parse_report(&mut self, report: GscReportType) -> Result<Vec<GscSheetRow>> {
        let Some(sheet_name) = find_sheet_name(&self.names, report) else {
            debug!(?report, "no matching sheet in workbook");
            return Ok(Vec::new());
        };

        let range = self.sheets.worksheet_range(&sheet_name).map_err(|e| {
            AppError::ParseError(format!("Failed to read sheet \"{}\": {}", sheet_name, e))
        })?;

        let rows: Vec<Vec<String>> = range.rows().map(stringify_row).collect();
        Ok(extract_rows(report, &rows))
    }
}

fn stringify_row(row: &[Data]) -> Vec<String> {
    row.iter()
        .map(|cell| {
            cell.as_string()
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("{}", cell))
        })
        .collect()
}

/// First sheet whose trimmed, lowercased name matches one of the report's
/// aliases; alias declaration order wins.
fn find_sheet_name(names: &[String], report: GscReportType) -> Option<String> {
    for alias in report.sheet_aliases() {
        if let Some(name) = names.iter().find(|n| n.trim().to_lowercase() == *alias) {
            return Some(name.clone());
        }
    }
    None
}

/// Scan the first 5 rows for one that contains a header-looking cell; fall
/// back to row 0 so a sheet with unexpected framing still parses best-effort.
pub(crate) fn detect_header_row(rows: &[Vec<String>]) -> usize {
    for (idx, row) in rows.iter().take(5).enumerate() {
        let looks_like_header = row.iter().any(|cell| {
            let lower = cell.to_lowercase();
            HEADER_ROW_HINTS.iter().any(|hint| lower.contains(hint))
        });
        if looks_like_header {
            return idx;
        }
    }
    0
}

pub(crate) fn extract_rows(report: GscReportType, rows: &[Vec<String>]) -> Vec<GscSheetRow> {
    if rows.is_empty() {
        return Vec::new();
    }

    let header_idx = detect_header_row(rows);
    let mut fields: HashMap<GscField, usize> = HashMap::new();
    for (idx, header) in rows[header_idx].iter().enumerate() {
        if let Some(field) = map_gsc_header(report, header) {
            // First occurrence wins; duplicated headers do not steal columns.
            fields.entry(field).or_insert(idx);
        }
    }

    let cell = |row: &[String], field: GscField| -> String {
        fields
            .get(&field)
            .and_then(|&idx| row.get(idx))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let mut out = Vec::new();
    for row in &rows[header_idx + 1..] {
        let (item, filter_value) = if report == GscReportType::Filters {
            let value = cell(row, GscField::FilterValue);
            (
                cell(row, GscField::FilterName),
                (!value.is_empty()).then_some(value),
            )
        } else {
            (cell(row, GscField::Item), None)
        };

        // Summary/subtotal rows must not pollute the analysis.
        if item.is_empty() {
            continue;
        }
        if report != GscReportType::Filters && item.to_lowercase() == "sommario" {
            continue;
        }

        out.push(GscSheetRow {
            item,
            filter_value,
            clicks_current: coerce_count(&cell(row, GscField::ClicksCurrent)),
            clicks_previous: coerce_count(&cell(row, GscField::ClicksPrevious)),
            impressions_current: coerce_count(&cell(row, GscField::ImpressionsCurrent)),
            impressions_previous: coerce_count(&cell(row, GscField::ImpressionsPrevious)),
            ctr_current: coerce_ctr(&cell(row, GscField::CtrCurrent)),
            ctr_previous: coerce_ctr(&cell(row, GscField::CtrPrevious)),
            position_current: coerce_position(&cell(row, GscField::PositionCurrent)),
            position_previous: coerce_position(&cell(row, GscField::PositionPrevious)),
        });
    }

    out
}

/// Clicks/impressions: empty or "-" is 0; otherwise every non-digit character
/// is stripped and the remainder parsed, defaulting to 0.
pub(crate) fn coerce_count(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0;
    }
    NON_DIGIT.replace_all(trimmed, "").parse::<u64>().unwrap_or(0)
}

/// CTR: `%` stripped and decimal comma normalized, then values in (1, 100]
/// are read as percentages and divided by 100. Failures default to 0.
pub(crate) fn coerce_ctr(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }
    let cleaned = trimmed.replace('%', "").replace(',', ".");
    let Ok(value) = cleaned.trim().parse::<f64>() else {
        return 0.0;
    };
    if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value
    }
}

/// Position: empty or "-" is `None` (0 would be a valid-looking but wrong
/// sentinel); decimal comma supported; parse failure is `None`.
pub(crate) fn coerce_position(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}
