// ============================================================
// TOKYO DISCLOSURE PAGE
// ============================================================
// Corporation detail published by the Tokyo Metropolitan Government

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::html::{raw_text, LINK};
use crate::application::use_cases::reconciliation::JurisdictionFetcher;
use crate::domain::documents::LinkDocument;
use crate::domain::error::{AppError, Result};
use crate::domain::record::{FieldValue, Record, RecordMap};
use crate::domain::records::TokyoInformation;
use crate::infrastructure::http::HttpClient;
use crate::shared::url::resolve_link;

pub const TOKYO_HOST: &str = "www.seikatubunka.metro.tokyo.lg.jp";
const TOKYO_SCHEME: &str = "https";
const DOCUMENTS_KEY: &str = "閲覧書類";

static DETAIL_LIST: Lazy<Selector> =
    Lazy::new(|| Selector::parse("dl.Corp_detail_dl").unwrap());

pub fn is_tokyo_detail_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            parsed.scheme() == TOKYO_SCHEME
                && parsed.host_str() == Some(TOKYO_HOST)
                && parsed.port().is_none()
        }
        Err(_) => false,
    }
}

/// Each `dt` paired with the first `dd` that follows it
fn term_pairs(list: ElementRef<'_>) -> RecordMap {
    let elements: Vec<ElementRef<'_>> = list
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "dt" | "dd"))
        .collect();

    let mut data = RecordMap::new();
    for (idx, dt) in elements.iter().enumerate() {
        if dt.value().name() != "dt" {
            continue;
        }
        let value = elements[idx + 1..]
            .iter()
            .find(|el| el.value().name() == "dd")
            .map(|dd| raw_text(*dd).trim().to_string())
            .unwrap_or_default();
        data.insert(raw_text(*dt).trim().to_string(), FieldValue::Text(value));
    }
    data
}

fn documents(list: ElementRef<'_>, base: &Url) -> Vec<LinkDocument> {
    list.select(&LINK)
        .map(|a| {
            LinkDocument::new(
                raw_text(a).trim(),
                resolve_link(base, a.value().attr("href").unwrap_or_default()),
            )
        })
        .collect()
}

/// Parse a disclosure page fetched from `page_url`
pub fn parse_tokyo_detail(html: &str, page_url: &str) -> Result<TokyoInformation> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);
    let list = document.select(&DETAIL_LIST).next().ok_or_else(|| {
        AppError::ExtractionError(format!("Corporation detail list not found: {}", page_url))
    })?;

    let mut data = term_pairs(list);
    data.insert(
        DOCUMENTS_KEY.to_string(),
        FieldValue::Links(documents(list, &base)),
    );
    Ok(TokyoInformation::from_mapping(data))
}

pub struct TokyoDetailFetcher {
    http: HttpClient,
}

impl TokyoDetailFetcher {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl JurisdictionFetcher for TokyoDetailFetcher {
    fn supports(&self, url: &str) -> bool {
        is_tokyo_detail_url(url)
    }

    async fn fetch_jurisdiction(&self, url: &str) -> Result<TokyoInformation> {
        let html = self.http.get_text(url).await?;
        parse_tokyo_detail(&html, url)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;

    use super::*;
    use crate::infrastructure::http::RetryPolicy;

    const PAGE_URL: &str =
        "https://www.seikatubunka.metro.tokyo.lg.jp/houjin/npo_houjin/list/ledger/0007570.html";

    const TOKYO_PAGE: &str = r#"
        <html><body>
        <dl class="Corp_detail_dl">
          <dt>法人番号</dt><dd> 1234567890123 </dd>
          <dt>法人・団体名称</dt><dd>特定非営利活動法人テスト</dd>
          <dt>主たる事務所の所在地</dt><dd>東京都新宿区西新宿２－８－１</dd>
          <dt>認定状態</dt><dd>認定</dd>
          <dt>閲覧書類</dt>
          <dd>
            <a href="../files/teikan.pdf"> 定款 </a>
            <a href="https://example.org/report.pdf">事業報告書</a>
          </dd>
        </dl>
        </body></html>
    "#;

    #[test]
    fn test_is_tokyo_detail_url() {
        assert!(is_tokyo_detail_url(PAGE_URL));
        assert!(!is_tokyo_detail_url(
            "http://www.seikatubunka.metro.tokyo.lg.jp/houjin/0001.html"
        ));
        assert!(!is_tokyo_detail_url("https://www.pref.osaka.lg.jp/npo/0001.html"));
        assert!(!is_tokyo_detail_url(
            "https://www.seikatubunka.metro.tokyo.lg.jp:8443/houjin/0001.html"
        ));
        assert!(!is_tokyo_detail_url(""));
        assert!(!is_tokyo_detail_url("not a url"));
    }

    #[test]
    fn test_parse_tokyo_detail() {
        let info = parse_tokyo_detail(TOKYO_PAGE, PAGE_URL).unwrap();
        assert_eq!(info.corporate_number, "1234567890123");
        assert_eq!(info.corporate_name, "特定非営利活動法人テスト");
        assert_eq!(info.approval_status, "認定");
        assert_eq!(info.representative_name, "");
        assert_eq!(
            info.documents,
            vec![
                LinkDocument::new(
                    "定款",
                    "https://www.seikatubunka.metro.tokyo.lg.jp/houjin/npo_houjin/list/files/teikan.pdf"
                ),
                LinkDocument::new("事業報告書", "https://example.org/report.pdf"),
            ]
        );
    }

    #[test]
    fn test_missing_detail_list() {
        let err = parse_tokyo_detail("<html><body></body></html>", PAGE_URL).unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
    }

    #[tokio::test]
    async fn test_fetcher_reads_page_over_http() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/houjin/0001.html");
                then.status(200).body(TOKYO_PAGE);
            })
            .await;
        let http =
            HttpClient::new(Duration::from_secs(5), "test", RetryPolicy::immediate(1)).unwrap();
        let fetcher = TokyoDetailFetcher::new(http);
        let url = server.url("/houjin/0001.html");

        assert!(!fetcher.supports(&url));
        let info = fetcher.fetch_jurisdiction(&url).await.unwrap();
        assert_eq!(info.corporate_number, "1234567890123");
        assert_eq!(
            info.documents[0].url,
            server.url("/files/teikan.pdf")
        );
    }
}
