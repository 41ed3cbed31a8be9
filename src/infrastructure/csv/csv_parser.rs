// ============================================================
// CSV PARSER
// ============================================================
// Decode legacy-encoded CSV files and map rows by their header

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{Encoding, SHIFT_JIS};
use tracing::{debug, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::record::{FieldValue, RecordMap};

/// Header row plus one external-key mapping per data row
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RecordMap>,
}

/// CSV parser with a fixed source encoding
pub struct CsvParser {
    /// Source encoding (Shift_JIS, which also covers cp932)
    encoding: &'static Encoding,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            encoding: SHIFT_JIS,
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParsedCsv> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.parse_bytes(&bytes)
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedCsv> {
        let (content, actual, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            warn!(
                encoding = actual.name(),
                "CSV contains malformed byte sequences; replaced with U+FFFD"
            );
        }
        self.parse_content(&content)
    }

    /// Parse decoded CSV content. Blank rows are skipped.
    pub fn parse_content(&self, content: &str) -> Result<ParsedCsv> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(self.parse_row(index, &headers, &record));
        }

        Ok(ParsedCsv { headers, rows })
    }

    fn parse_row(&self, index: usize, headers: &[String], record: &StringRecord) -> RecordMap {
        if record.len() != headers.len() {
            debug!(
                row = index + 1,
                expected = headers.len(),
                actual = record.len(),
                "CSV row width differs from header"
            );
        }
        headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = record.get(idx).unwrap_or("").to_string();
                (header.clone(), FieldValue::Text(value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn text(map: &RecordMap, key: &str) -> String {
        map.get(key).map(FieldValue::to_cell).unwrap_or_default()
    }

    #[test]
    fn test_parse_simple_csv() {
        let content = "法人名称,法人番号\nＮＰＯ法人Ａ,111\n\nＮＰＯ法人Ｂ,222";
        let parsed = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(parsed.headers, vec!["法人名称", "法人番号"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(text(&parsed.rows[0], "法人名称"), "ＮＰＯ法人Ａ");
        assert_eq!(text(&parsed.rows[1], "法人番号"), "222");
    }

    #[test]
    fn test_short_row_is_padded() {
        let parsed = CsvParser::new()
            .parse_content("a,b,c\n1\n1,2,3,4")
            .unwrap();
        assert_eq!(text(&parsed.rows[0], "c"), "");
        assert_eq!(parsed.rows[1].len(), 3);
    }

    #[test]
    fn test_decodes_shift_jis_file() {
        let (encoded, _, _) = SHIFT_JIS.encode("法人名称,法人番号\n特定非営利活動法人テスト,123\n");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&encoded).unwrap();

        let parsed = CsvParser::new().parse_file(file.path()).unwrap();
        assert_eq!(parsed.headers[0], "法人名称");
        assert_eq!(text(&parsed.rows[0], "法人名称"), "特定非営利活動法人テスト");
    }

    #[test]
    fn test_malformed_bytes_are_replaced() {
        let mut bytes = SHIFT_JIS.encode("名称,番号\n").0.into_owned();
        bytes.extend_from_slice(&[0x82, b',', b'1', b'\n']);

        let parsed = CsvParser::new().parse_bytes(&bytes).unwrap();
        assert_eq!(text(&parsed.rows[0], "名称"), "\u{FFFD}");
        assert_eq!(text(&parsed.rows[0], "番号"), "1");
    }

    #[test]
    fn test_missing_file() {
        let err = CsvParser::new()
            .parse_file(Path::new("/nonexistent/data.csv"))
            .unwrap_err();
        assert!(matches!(err, AppError::IoError(_)));
    }
}
