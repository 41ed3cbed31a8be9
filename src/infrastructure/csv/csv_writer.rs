use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::debug;

use crate::domain::error::{AppError, Result};

/// Write a UTF-8 CSV with every field quoted. Returns the number of data rows.
pub fn write_rows<H, I>(path: &Path, header: &[H], rows: I) -> Result<usize>
where
    H: AsRef<str>,
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| AppError::IoError(format!("Cannot create {}: {}", path.display(), e)))?;

    writer.write_record(header.iter().map(|h| h.as_ref()))?;
    let mut count = 0;
    for row in rows {
        writer.write_record(&row)?;
        count += 1;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = count, "CSV written");
    Ok(count)
}
