// ============================================================
// VIEWING DOCUMENT CLASSIFIER
// ============================================================
// Turn labeled rows of a detail page's documents table into typed entries

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::domain::documents::{
    DocumentValue, FinancialActivityReport, LinkDocument, ViewingDocument, ViewingDocumentKind,
    ViewingDocuments,
};
use crate::domain::error::Result;

static FISCAL_YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9０-９]+)年度$").unwrap());

const BYLAWS_MARKER: &str = "定款";

/// Content of one table cell: its text and the hyperlinks inside it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCell {
    pub text: String,
    pub links: Vec<LinkDocument>,
}

impl DocumentCell {
    pub fn new(text: impl Into<String>, links: Vec<LinkDocument>) -> Self {
        Self {
            text: text.into(),
            links,
        }
    }
}

/// Year of an ASCII or full-width `NNNN年度` label
fn fiscal_year(category: &str) -> Option<u32> {
    let digits = FISCAL_YEAR_PATTERN.captures(category)?.get(1)?.as_str();
    match digits.nfkc().collect::<String>().parse() {
        Ok(year) => Some(year),
        Err(e) => {
            warn!(category, error = %e, "Fiscal year label out of range");
            None
        }
    }
}

/// Classify one documents-table row.
///
/// Priority: fiscal-year label, then bylaws marker, then everything else.
pub fn classify(category: &str, cell: &DocumentCell) -> ViewingDocument {
    let kind = if let Some(year) = fiscal_year(category) {
        ViewingDocumentKind::FinancialActivityReport(FinancialActivityReport {
            year,
            documents: cell.links.clone(),
        })
    } else if category.contains(BYLAWS_MARKER) {
        match cell.links.first() {
            Some(link) => ViewingDocumentKind::Bylaws(DocumentValue::Link(link.clone())),
            None => ViewingDocumentKind::Bylaws(DocumentValue::Plain(cell.text.trim().to_string())),
        }
    } else {
        ViewingDocumentKind::OtherReport(cell.text.trim().to_string())
    };

    ViewingDocument {
        category: category.to_string(),
        kind,
    }
}

/// Classify every row of a page; fails when the page lists bylaws twice
pub fn classify_rows<I>(rows: I) -> Result<ViewingDocuments>
where
    I: IntoIterator<Item = (String, DocumentCell)>,
{
    let documents = rows
        .into_iter()
        .map(|(category, cell)| classify(&category, &cell))
        .collect();
    ViewingDocuments::from_classified(documents)
}
