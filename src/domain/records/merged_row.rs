use super::{AllOrgRow, ApprovedRow, DetailInformation, TokyoInformation};
use crate::domain::documents::DocumentSummary;
use crate::domain::record::Record;

/// One output row per approved organization, built once and never mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedOutputRow {
    pub approved: ApprovedRow,
    pub org: AllOrgRow,
    pub documents: DocumentSummary,
    pub detail: DetailInformation,
    pub jurisdiction: TokyoInformation,
}

impl MergedOutputRow {
    pub fn header() -> Vec<&'static str> {
        let mut header = ApprovedRow::header();
        header.extend(AllOrgRow::header());
        header.extend(DocumentSummary::HEADER);
        header.extend(DetailInformation::header());
        header.extend(TokyoInformation::header());
        header
    }

    pub fn to_row(&self) -> Vec<String> {
        let mut row = self.approved.to_row();
        row.extend(self.org.to_row());
        row.extend(self.documents.to_row());
        row.extend(self.detail.to_row());
        row.extend(self.jurisdiction.to_row());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_row_have_equal_width() {
        let row = MergedOutputRow {
            approved: ApprovedRow::empty_instance(),
            org: AllOrgRow::empty_instance(),
            documents: DocumentSummary::empty(),
            detail: DetailInformation::empty_instance(),
            jurisdiction: TokyoInformation::empty_instance(),
        };
        assert_eq!(MergedOutputRow::header().len(), 17 + 60 + 2 + 23 + 17);
        assert_eq!(row.to_row().len(), MergedOutputRow::header().len());
    }

    #[test]
    fn test_document_summary_follows_org_columns() {
        let header = MergedOutputRow::header();
        assert_eq!(header[17 + 60], "ドキュメント最新年度");
        assert_eq!(header[17 + 60 + 1], "ドキュメントURL");
    }
}
