// ============================================================
// PDF LEDGER READER
// ============================================================
// Rebuild table rows of the approved ledger from positioned text.
// Cells are placed by x position, so a blank cell stays in its column.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::application::use_cases::tabular_extractor::{RawRow, RawTable, TableDocument};
use crate::domain::error::{AppError, Result};
use crate::domain::record::Record;
use crate::domain::records::ApprovedRow;

/// Baselines closer than this (in user space units) belong to one line
const LINE_TOLERANCE: f32 = 2.0;

/// Text starts closer than this belong to one column
const COLUMN_TOLERANCE: f32 = 3.0;

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn multiply(m1: &Matrix, m2: &Matrix) -> Matrix {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn translation(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

/// A run of text drawn at one position on the page
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl TextFragment {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

fn numbers(operation: &Operation) -> Option<Vec<f32>> {
    operation
        .operands
        .iter()
        .map(|operand| operand.as_float().ok())
        .collect()
}

fn shown_text(operands: &[Object], encoding: Option<&str>, text: &mut String) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&Document::decode_text(encoding, bytes)),
            Object::Array(items) => shown_text(items, encoding, text),
            _ => {}
        }
    }
}

/// Text state machine over a page's content operations
struct TextWalker<'a> {
    encodings: &'a BTreeMap<Vec<u8>, &'a str>,
    encoding: Option<&'a str>,
    ctm: Matrix,
    saved: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
    fragments: Vec<TextFragment>,
}

impl<'a> TextWalker<'a> {
    fn new(encodings: &'a BTreeMap<Vec<u8>, &'a str>) -> Self {
        Self {
            encodings,
            encoding: None,
            ctm: IDENTITY,
            saved: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            leading: 0.0,
            fragments: Vec::new(),
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&translation(tx, ty), &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn show(&mut self, operands: &[Object]) {
        let mut text = String::new();
        shown_text(operands, self.encoding, &mut text);
        if text.is_empty() {
            return;
        }

        let origin = multiply(&self.text_matrix, &self.ctm);
        let (x, y) = (origin[4], origin[5]);
        // Glyph advance is not tracked: consecutive shows at one origin form one run.
        match self.fragments.last_mut() {
            Some(last) if last.x == x && last.y == y => last.text.push_str(&text),
            _ => self.fragments.push(TextFragment::new(x, y, text)),
        }
    }

    fn apply(&mut self, operation: &Operation) {
        match operation.operator.as_str() {
            "q" => self.saved.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.saved.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = numbers(operation).as_deref() {
                    self.ctm = multiply(&[*a, *b, *c, *d, *e, *f], &self.ctm);
                }
            }
            "BT" => {
                self.text_matrix = IDENTITY;
                self.line_matrix = IDENTITY;
            }
            "Tf" => {
                self.encoding = operation
                    .operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| self.encodings.get(name).copied());
            }
            "TL" => {
                if let Some([leading]) = numbers(operation).as_deref() {
                    self.leading = *leading;
                }
            }
            "Td" => {
                if let Some([tx, ty]) = numbers(operation).as_deref() {
                    self.move_line(*tx, *ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers(operation).as_deref() {
                    self.leading = -*ty;
                    self.move_line(*tx, *ty);
                }
            }
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = numbers(operation).as_deref() {
                    self.line_matrix = [*a, *b, *c, *d, *e, *f];
                    self.text_matrix = self.line_matrix;
                }
            }
            "T*" => self.move_line(0.0, -self.leading),
            "Tj" | "TJ" => self.show(&operation.operands),
            "'" => {
                self.move_line(0.0, -self.leading);
                self.show(&operation.operands);
            }
            "\"" => {
                self.move_line(0.0, -self.leading);
                self.show(operation.operands.get(2..).unwrap_or_default());
            }
            _ => {}
        }
    }
}

/// Positioned text runs of a content stream, in drawing order
pub fn text_fragments(
    operations: &[Operation],
    encodings: &BTreeMap<Vec<u8>, &str>,
) -> Vec<TextFragment> {
    let mut walker = TextWalker::new(encodings);
    for operation in operations {
        walker.apply(operation);
    }
    walker.fragments
}

/// Fragments grouped into lines, top of the page first, each line left to right
fn group_lines(mut fragments: Vec<TextFragment>) -> Vec<Vec<TextFragment>> {
    fragments.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<TextFragment>> = Vec::new();
    for fragment in fragments {
        match lines.last_mut() {
            Some(line) if (line[0].y - fragment.y).abs() <= LINE_TOLERANCE => line.push(fragment),
            _ => lines.push(vec![fragment]),
        }
    }
    for line in &mut lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

/// Left edges of the page's columns.
///
/// Text starts are clustered across every line, header included, so a column
/// that is blank in some rows still has an anchor. Surplus clusters (text
/// offset inside a column) are merged at the narrowest gap until
/// `expected_columns` remain.
pub fn column_anchors(lines: &[Vec<TextFragment>], expected_columns: usize) -> Vec<f32> {
    let mut starts: Vec<f32> = lines.iter().flatten().map(|f| f.x).collect();
    starts.sort_by(f32::total_cmp);

    let mut anchors: Vec<f32> = Vec::new();
    let mut last = f32::NEG_INFINITY;
    for x in starts {
        if x - last > COLUMN_TOLERANCE {
            anchors.push(x);
        }
        last = x;
    }

    while expected_columns > 0 && anchors.len() > expected_columns {
        let narrowest = anchors
            .windows(2)
            .enumerate()
            .min_by(|(_, a), (_, b)| (a[1] - a[0]).total_cmp(&(b[1] - b[0])))
            .map(|(idx, _)| idx + 1);
        match narrowest {
            Some(idx) => {
                anchors.remove(idx);
            }
            None => break,
        }
    }
    anchors
}

fn column_of(anchors: &[f32], x: f32) -> usize {
    anchors
        .iter()
        .rposition(|anchor| *anchor <= x + COLUMN_TOLERANCE)
        .unwrap_or(0)
}

fn append_cell(cell: &mut Option<String>, text: &str) {
    match cell {
        Some(existing) => existing.push_str(text),
        None => *cell = Some(text.to_string()),
    }
}

/// Lay a page's text out as one table.
///
/// A line with an empty first column continues the row above it (wrapped
/// cell text) and is folded into that row with a line break.
pub fn fragments_to_table(fragments: Vec<TextFragment>, expected_columns: usize) -> RawTable {
    let lines = group_lines(fragments);
    let anchors = column_anchors(&lines, expected_columns);
    if anchors.len() < expected_columns {
        warn!(
            expected = expected_columns,
            found = anchors.len(),
            "Fewer text columns than ledger columns; blank columns cannot be placed"
        );
    }

    let mut table: RawTable = Vec::new();
    for line in lines {
        let mut row: RawRow = vec![None; anchors.len()];
        for fragment in &line {
            append_cell(&mut row[column_of(&anchors, fragment.x)], fragment.text.trim());
        }

        let continues_previous = row.first().is_some_and(Option::is_none);
        match table.last_mut() {
            Some(previous) if continues_previous => {
                for (cell, continuation) in previous.iter_mut().zip(row) {
                    if let Some(text) = continuation {
                        append_cell(cell, "\n");
                        append_cell(cell, &text);
                    }
                }
            }
            _ => table.push(row),
        }
    }
    table
}

pub struct PdfLedger {
    document: Document,
    columns: usize,
}

impl PdfLedger {
    pub fn load(path: &Path) -> Result<Self> {
        let document = Document::load(path).map_err(|e| {
            AppError::ParseError(format!("Failed to load PDF {}: {}", path.display(), e))
        })?;
        Ok(Self::new(document))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(Document::load_mem(bytes)?))
    }

    fn new(document: Document) -> Self {
        Self {
            document,
            columns: ApprovedRow::FIELDS.len(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    fn page_fragments(&self, page_id: ObjectId) -> Result<Vec<TextFragment>> {
        let encodings: BTreeMap<Vec<u8>, &str> = self
            .document
            .get_page_fonts(page_id)
            .into_iter()
            .map(|(name, font)| (name, font.get_font_encoding()))
            .collect();
        let content = Content::decode(&self.document.get_page_content(page_id)?)?;
        Ok(text_fragments(&content.operations, &encodings))
    }
}

impl TableDocument for PdfLedger {
    fn pages(&self) -> Result<Vec<Vec<RawTable>>> {
        let mut pages = Vec::new();
        for (page_number, page_id) in self.document.get_pages() {
            match self.page_fragments(page_id) {
                Ok(fragments) => {
                    let table = fragments_to_table(fragments, self.columns);
                    debug!(page = page_number, rows = table.len(), "Ledger page read");
                    pages.push(vec![table]);
                }
                Err(e) => {
                    warn!(page = page_number, error = %e, "No readable text on ledger page");
                    pages.push(Vec::new());
                }
            }
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use lopdf::{dictionary, Stream};

    use super::*;
    use crate::application::use_cases::tabular_extractor::{extract_approved_rows, TabularExtractor};

    fn text_at(x: f32, y: f32, text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 9.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]
    }

    fn ledger_pdf(lines: &[(f32, &[(f32, &str)])]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let operations: Vec<_> = lines
            .iter()
            .flat_map(|(y, cells)| cells.iter().flat_map(move |(x, text)| text_at(*x, *y, text)))
            .collect();
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_blank_middle_cell_keeps_its_column() {
        let fragments = vec![
            TextFragment::new(10.0, 500.0, "所轄庁コード"),
            TextFragment::new(60.0, 500.0, "所轄庁"),
            TextFragment::new(110.0, 500.0, "法人番号"),
            TextFragment::new(200.0, 500.0, "認定"),
            TextFragment::new(230.0, 500.0, "特例認定"),
            TextFragment::new(270.0, 500.0, "更新申請中"),
            TextFragment::new(320.0, 500.0, "法人名"),
            TextFragment::new(10.0, 480.0, "13"),
            TextFragment::new(60.0, 480.0, "東京都"),
            TextFragment::new(110.0, 480.0, "1234567890123"),
            TextFragment::new(200.0, 480.0, "○"),
            TextFragment::new(320.0, 480.0, "特定非営利活動法人テスト"),
        ];

        let table = fragments_to_table(fragments, 7);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table[1],
            vec![
                Some("13".to_string()),
                Some("東京都".to_string()),
                Some("1234567890123".to_string()),
                Some("○".to_string()),
                None,
                None,
                Some("特定非営利活動法人テスト".to_string()),
            ]
        );
    }

    #[test]
    fn test_offset_header_text_merges_into_data_column() {
        let lines = vec![
            vec![
                TextFragment::new(10.0, 500.0, "a"),
                TextFragment::new(64.0, 500.0, "b"),
            ],
            vec![
                TextFragment::new(10.0, 480.0, "1"),
                TextFragment::new(60.0, 480.0, "2"),
                TextFragment::new(150.0, 480.0, "3"),
            ],
        ];
        assert_eq!(column_anchors(&lines, 3), vec![10.0, 60.0, 150.0]);
    }

    #[test]
    fn test_wrapped_cell_joins_row_above() {
        let fragments = vec![
            TextFragment::new(10.0, 480.0, "13"),
            TextFragment::new(60.0, 480.0, "特定非営利"),
            TextFragment::new(60.0, 470.0, "活動法人"),
            TextFragment::new(10.0, 450.0, "27"),
            TextFragment::new(60.0, 450.0, "大阪"),
        ];

        let rows = TabularExtractor::for_approved_ledger()
            .extract(&vec![vec![fragments_to_table(fragments, 2)]])
            .unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["13".to_string(), "特定非営利活動法人".to_string()],
                vec!["27".to_string(), "大阪".to_string()],
            ]
        );
    }

    #[test]
    fn test_text_fragments_follow_text_operators() {
        let encodings = BTreeMap::new();
        let operations = vec![
            Operation::new("cm", vec![1.into(), 0.into(), 0.into(), 1.into(), 5.into(), 0.into()]),
            Operation::new("BT", vec![]),
            Operation::new("TL", vec![12.into()]),
            Operation::new("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 10.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("A")]),
            Operation::new("Tj", vec![Object::string_literal("B")]),
            Operation::new("Td", vec![40.into(), 0.into()]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("C"),
                    (-120).into(),
                    Object::string_literal("D"),
                ])],
            ),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("E")]),
            Operation::new("ET", vec![]),
        ];

        assert_eq!(
            text_fragments(&operations, &encodings),
            vec![
                TextFragment::new(15.0, 700.0, "AB"),
                TextFragment::new(55.0, 700.0, "CD"),
                TextFragment::new(55.0, 688.0, "E"),
            ]
        );
    }

    #[test]
    fn test_pdf_rows_map_onto_ledger_fields() {
        let columns: Vec<f32> = (0..17).map(|i| 20.0 + 45.0 * i as f32).collect();
        let mut header: Vec<(f32, &str)> = columns.iter().map(|x| (*x, "H")).collect();
        header[0].1 = "CODE";
        let data = [
            (columns[0], "13"),
            (columns[1], "Tokyo"),
            (columns[2], "1234567890123"),
            (columns[3], "X"),
            (columns[6], "NPO Test"),
            (columns[16], "2027-03-31"),
        ];
        let bytes = ledger_pdf(&[(560.0, &header[..]), (540.0, &data[..])]);

        let ledger = PdfLedger::from_bytes(&bytes).unwrap();
        assert_eq!(ledger.page_count(), 1);

        let rows = extract_approved_rows(&ledger).unwrap();
        assert_eq!(rows.len(), 2);
        let row = &rows[1];
        assert_eq!(row.corporate_number, "1234567890123");
        assert_eq!(row.approved, "X");
        assert_eq!(row.special_approved, "");
        assert_eq!(row.update_application, "");
        assert_eq!(row.corporation_name, "NPO Test");
        assert_eq!(row.special_approved_validity_period_to, "2027-03-31");
    }

    #[test]
    fn test_invalid_pdf_is_a_parse_error() {
        let err = PdfLedger::from_bytes(b"not a pdf").err().unwrap();
        assert!(matches!(err, AppError::ParseError(_)));
    }
}
