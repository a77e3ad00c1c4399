//! Combined CSV export
//!
//! Aggregates every sheet's matched rows into one CSV document, tagging each
//! row with its originating sheet name.

use indexmap::IndexMap;

use crate::response::{SheetResult, cell_text};

/// Suggested file name for the combined export
pub const EXPORT_FILE_NAME: &str = "combined_search_results.csv";

/// Name of the synthetic column carrying the originating sheet
pub const SHEET_COLUMN: &str = "_sheet";

/// Build the combined CSV payload, or `None` when there is nothing to export
///
/// Sheets with zero rows are skipped entirely. The header row is
/// `_sheet` followed by the columns of the first non-empty sheet; later sheets
/// are projected under that header even if their own columns differ. That is
/// inherited behavior, kept as-is pending product clarification; do not
/// silently generalize it to a column union.
///
/// Every field is double-quoted unconditionally, with inner quotes doubled.
/// Rows are joined with a single newline and there is no trailing newline.
/// If no data row was emitted the header alone is not worth a file, so the
/// caller gets `None` and must not offer a download.
pub fn combined_csv(results_by_sheet: &IndexMap<String, SheetResult>) -> Option<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        // Later sheets may have a different column count than the header
        .flexible(true)
        .from_writer(Vec::new());

    let mut wrote_header = false;
    let mut data_rows = 0usize;

    for (sheet_name, sheet) in results_by_sheet {
        if sheet.data.is_empty() {
            continue;
        }

        if !wrote_header {
            let mut header = Vec::with_capacity(sheet.columns.len() + 1);
            header.push(SHEET_COLUMN.to_string());
            header.extend(sheet.columns.iter().cloned());
            writer.write_record(&header).ok()?;
            wrote_header = true;
        }

        for row in &sheet.data {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(sheet_name.clone());
            record.extend(row.iter().map(cell_text));
            writer.write_record(&record).ok()?;
            data_rows += 1;
        }
    }

    if data_rows == 0 {
        return None;
    }

    let bytes = writer.into_inner().ok()?;
    let mut text = String::from_utf8(bytes).ok()?;
    if text.ends_with('\n') {
        text.pop();
    }
    Some(text)
}

/// Holder for the transient export payload
///
/// The payload is scoped to the results it was derived from: the session
/// clears it whenever those results are replaced, so repeated searches do not
/// accumulate stale exports.
#[derive(Debug, Default)]
pub struct ExportState {
    payload: Option<String>,
}

impl ExportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the payload from the given results
    ///
    /// Returns true if there is something to export.
    pub fn prepare(&mut self, results_by_sheet: &IndexMap<String, SheetResult>) -> bool {
        self.payload = combined_csv(results_by_sheet);
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Release the payload once the results behind it are gone
    pub fn clear(&mut self) {
        if self.payload.take().is_some() {
            log::debug!("Released stale CSV export payload");
        }
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod export_tests;
