use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct BulkImportReport {
    pub(crate) total: usize,
    pub(crate) success: usize,
    pub(crate) failed: usize,
    pub(crate) errors: Vec<RowError>,
}

/// `row` is the spreadsheet row number: 1-indexed data row plus one for the
/// header row, so the first data row reports as row 2.
#[derive(Debug, Serialize)]
pub(crate) struct RowError {
    pub(crate) row: usize,
    pub(crate) data: serde_json::Value,
    pub(crate) error: String,
}
