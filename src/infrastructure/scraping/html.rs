use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

pub static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
pub static TH: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
pub static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
pub static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").unwrap());
pub static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Every text node trimmed and concatenated without separators
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Raw text of every descendant text node
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// First `th` and first `td` of a table row, when both exist
pub fn header_and_cell(row: ElementRef<'_>) -> Option<(ElementRef<'_>, ElementRef<'_>)> {
    let th = row.select(&TH).next()?;
    let td = row.select(&TD).next()?;
    Some((th, td))
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    #[test]
    fn test_stripped_text_joins_trimmed_nodes() {
        let html = Html::parse_fragment(
            "<table><tr><td>\n  事業報告書 <br>  活動計算書\n</td></tr></table>",
        );
        let td = html.select(&TD).next().unwrap();
        assert_eq!(stripped_text(td), "事業報告書活動計算書");
        assert!(raw_text(td).contains('\n'));
    }

    #[test]
    fn test_header_and_cell() {
        let html = Html::parse_fragment(
            "<table><tr><th>法人名称</th><td>テスト</td></tr><tr><td>only</td></tr></table>",
        );
        let rows: Vec<_> = html.select(&TR).collect();
        let (th, td) = header_and_cell(rows[0]).unwrap();
        assert_eq!(stripped_text(th), "法人名称");
        assert_eq!(stripped_text(td), "テスト");
        assert!(header_and_cell(rows[1]).is_none());
    }
}
