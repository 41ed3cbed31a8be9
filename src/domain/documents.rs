// ============================================================
// VIEWING DOCUMENTS
// ============================================================
// Published documents listed on an organization's detail page

use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// A document published as a titled hyperlink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDocument {
    pub title: String,
    pub url: String,
}

impl LinkDocument {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Render a list of links as newline-joined `title: url` lines
    pub fn render_list(documents: &[LinkDocument]) -> String {
        documents
            .iter()
            .map(|doc| format!("{}: {}", doc.title, doc.url))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A bylaws entry is either linked or described in plain text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentValue {
    Link(LinkDocument),
    Plain(String),
}

/// Business and financial reports for one fiscal year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialActivityReport {
    pub year: u32,
    /// Zero links is valid: nothing was published for that year.
    pub documents: Vec<LinkDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewingDocumentKind {
    FinancialActivityReport(FinancialActivityReport),
    Bylaws(DocumentValue),
    OtherReport(String),
}

/// One classified row of the "viewing documents" table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingDocument {
    /// Row label as printed on the page (e.g. "2023年度", "定款")
    pub category: String,
    pub kind: ViewingDocumentKind,
}

impl ViewingDocument {
    pub fn financial_report(&self) -> Option<&FinancialActivityReport> {
        match &self.kind {
            ViewingDocumentKind::FinancialActivityReport(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_bylaws(&self) -> bool {
        matches!(self.kind, ViewingDocumentKind::Bylaws(_))
    }
}

/// All viewing documents of one detail page, in page order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingDocuments {
    documents: Vec<ViewingDocument>,
}

impl ViewingDocuments {
    /// Build the page collection. A page carries at most one bylaws row.
    pub fn from_classified(documents: Vec<ViewingDocument>) -> Result<Self> {
        let bylaws_count = documents.iter().filter(|doc| doc.is_bylaws()).count();
        if bylaws_count > 1 {
            return Err(AppError::ExtractionError(format!(
                "Multiple bylaws rows found on one page ({})",
                bylaws_count
            )));
        }
        Ok(Self { documents })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewingDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn financial_reports(&self) -> impl Iterator<Item = &FinancialActivityReport> {
        self.documents.iter().filter_map(|doc| doc.financial_report())
    }

    pub fn bylaws(&self) -> Option<&DocumentValue> {
        self.documents.iter().find_map(|doc| match &doc.kind {
            ViewingDocumentKind::Bylaws(value) => Some(value),
            _ => None,
        })
    }

    pub fn other_reports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents.iter().filter_map(|doc| match &doc.kind {
            ViewingDocumentKind::OtherReport(value) => Some((doc.category.as_str(), value.as_str())),
            _ => None,
        })
    }

    pub fn latest_financial_report(&self) -> Option<&FinancialActivityReport> {
        latest_report(self.financial_reports())
    }
}

/// Pick the report with the greatest year.
///
/// Equal years resolve to the last one in iteration order.
pub fn latest_report<'a, I>(reports: I) -> Option<&'a FinancialActivityReport>
where
    I: IntoIterator<Item = &'a FinancialActivityReport>,
{
    reports.into_iter().max_by_key(|report| report.year)
}

/// The two document columns appended to every merged row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub latest_year: String,
    pub document_links: String,
}

impl DocumentSummary {
    pub const HEADER: [&'static str; 2] = ["ドキュメント最新年度", "ドキュメントURL"];

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_report(report: Option<&FinancialActivityReport>) -> Self {
        match report {
            Some(report) => Self {
                latest_year: report.year.to_string(),
                document_links: LinkDocument::render_list(&report.documents),
            },
            None => Self::empty(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![self.latest_year.clone(), self.document_links.clone()]
    }
}
