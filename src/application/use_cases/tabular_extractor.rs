// ============================================================
// TABULAR EXTRACTOR
// ============================================================
// Flatten paginated table documents (PDF ledger, HTML tables) into rows

use crate::domain::error::Result;
use crate::domain::record::Record;
use crate::domain::records::ApprovedRow;
use crate::shared::text_format::strip_line_breaks;

/// A row as reported by a table engine; `None` is an absent cell
pub type RawRow = Vec<Option<String>>;
pub type RawTable = Vec<RawRow>;

/// A document made of pages, each holding zero or more detected tables.
///
/// Pages, tables and rows are reported in document order.
pub trait TableDocument {
    fn pages(&self) -> Result<Vec<Vec<RawTable>>>;
}

impl TableDocument for Vec<Vec<RawTable>> {
    fn pages(&self) -> Result<Vec<Vec<RawTable>>> {
        Ok(self.clone())
    }
}

/// Decides whether a raw row is a repeated header that must be dropped
pub trait HeaderRowPredicate {
    fn is_header(&self, row: &[Option<String>]) -> bool;
}

impl<F> HeaderRowPredicate for F
where
    F: Fn(&[Option<String>]) -> bool,
{
    fn is_header(&self, row: &[Option<String>]) -> bool {
        self(row)
    }
}

/// Header detection tuned to the visual layout of the approved ledger.
///
/// A row is a header when its first cell is the sentinel text, or when both
/// of its first two cells are absent. This depends on how the PDF is drawn;
/// re-check it whenever the ledger layout changes.
#[derive(Debug, Clone)]
pub struct LayoutHeaderHeuristic {
    sentinel: String,
}

impl LayoutHeaderHeuristic {
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    pub fn approved_ledger() -> Self {
        Self::new(crate::domain::records::LEDGER_HEADER_SENTINEL)
    }
}

impl HeaderRowPredicate for LayoutHeaderHeuristic {
    fn is_header(&self, row: &[Option<String>]) -> bool {
        let cell = |idx: usize| row.get(idx).and_then(|c| c.as_deref());
        cell(0) == Some(self.sentinel.as_str()) || (cell(0).is_none() && cell(1).is_none())
    }
}

/// Remove line breaks inside cells and turn absent cells into empty strings
pub fn clean_row(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|cell| cell.as_deref().map(strip_line_breaks).unwrap_or_default())
        .collect()
}

pub struct TabularExtractor<P = LayoutHeaderHeuristic> {
    predicate: P,
}

impl TabularExtractor {
    /// Extractor configured for the approved ledger
    pub fn for_approved_ledger() -> Self {
        Self::with_predicate(LayoutHeaderHeuristic::approved_ledger())
    }
}

impl<P: HeaderRowPredicate> TabularExtractor<P> {
    pub fn with_predicate(predicate: P) -> Self {
        Self { predicate }
    }

    /// Every non-header row of every table of every page, in source order
    pub fn extract<D: TableDocument + ?Sized>(&self, document: &D) -> Result<Vec<Vec<String>>> {
        let rows = document
            .pages()?
            .into_iter()
            .flatten()
            .flatten()
            .filter(|row| !self.predicate.is_header(row))
            .map(|row| clean_row(&row))
            .collect();
        Ok(rows)
    }

    /// Extract rows and map them positionally onto a record type
    pub fn extract_records<R, D>(&self, document: &D) -> Result<Vec<R>>
    where
        R: Record,
        D: TableDocument + ?Sized,
    {
        Ok(self
            .extract(document)?
            .into_iter()
            .map(R::from_cells)
            .collect())
    }
}

/// Approved ledger rows from a table document
pub fn extract_approved_rows<D: TableDocument + ?Sized>(document: &D) -> Result<Vec<ApprovedRow>> {
    TabularExtractor::for_approved_ledger().extract_records(document)
}
