use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::html::{raw_text, CELL, TR};
use crate::application::use_cases::tabular_extractor::{RawRow, RawTable, TableDocument};
use crate::domain::error::Result;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());

/// Tables of an HTML document, exposed as a single page.
///
/// Cells whose trimmed text is empty are reported as absent.
pub struct HtmlTables {
    document: Html,
}

impl HtmlTables {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

impl TableDocument for HtmlTables {
    fn pages(&self) -> Result<Vec<Vec<RawTable>>> {
        let tables = self
            .document
            .select(&TABLE)
            .map(|table| {
                table
                    .select(&TR)
                    .map(|row| {
                        row.select(&CELL)
                            .map(|cell| {
                                let text = raw_text(cell).trim().to_string();
                                (!text.is_empty()).then_some(text)
                            })
                            .collect::<RawRow>()
                    })
                    .collect::<RawTable>()
            })
            .collect();
        Ok(vec![tables])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::tabular_extractor::TabularExtractor;

    #[test]
    fn test_html_tables_feed_the_extractor() {
        let html = "
            <table>
              <tr><th>所轄庁コード</th><th>所轄庁</th></tr>
              <tr><td>13</td><td>東京都</td></tr>
              <tr><td></td><td> </td><td>注記</td></tr>
            </table>
            <table>
              <tr><td>27</td><td>大阪\n府</td></tr>
            </table>
        ";

        let pages = HtmlTables::parse(html).pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[0][0][2], vec![None, None, Some("注記".to_string())]);

        let rows = TabularExtractor::for_approved_ledger()
            .extract(&HtmlTables::parse(html))
            .unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["13".to_string(), "東京都".to_string()],
                vec!["27".to_string(), "大阪府".to_string()],
            ]
        );
    }
}
