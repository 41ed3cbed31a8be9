use std::path::Path;

use tracing::info;

use super::csv_parser::CsvParser;
use crate::domain::error::Result;
use crate::domain::record::Record;
use crate::domain::records::AllOrgRow;

/// Read the all-organizations export into typed rows.
///
/// Column drift is absorbed by the record layer: unknown headers are
/// ignored and missing ones default to empty.
pub fn read_org_export(path: &Path) -> Result<Vec<AllOrgRow>> {
    let parsed = CsvParser::new().parse_file(path)?;
    let rows: Vec<AllOrgRow> = parsed.rows.into_iter().map(AllOrgRow::from_mapping).collect();
    info!(
        path = %path.display(),
        rows = rows.len(),
        columns = parsed.headers.len(),
        "Loaded all-organizations export"
    );
    Ok(rows)
}
