// ============================================================
// NPO PORTAL DETAIL PAGE
// ============================================================
// Table `summary` attributes are the only stable hooks on this page.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::html::{header_and_cell, raw_text, stripped_text, LINK, TR};
use crate::application::use_cases::reconciliation::{DetailFetcher, DetailPage};
use crate::application::use_cases::viewing_documents::{classify_rows, DocumentCell};
use crate::domain::documents::{LinkDocument, ViewingDocuments};
use crate::domain::error::{AppError, Result};
use crate::domain::record::{FieldValue, Record, RecordMap};
use crate::domain::records::DetailInformation;
use crate::infrastructure::http::HttpClient;
use crate::shared::text_format::clean_text;
use crate::shared::url::extract_embedded_url;

static BASIC_INFO_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"table[summary="基本情報"]"#).unwrap());
static DOCUMENTS_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"table[summary="閲覧書類"]"#).unwrap());

/// Query parameter the portal's redirector uses for the outbound target
const EMBEDDED_URL_PARAM: &str = "url";

/// Label → value pairs of the "basic information" table.
///
/// Cells holding a link contribute the redirector's target URL instead of
/// their text.
pub fn basic_information_mapping(document: &Html) -> Result<RecordMap> {
    let table = document.select(&BASIC_INFO_TABLE).next().ok_or_else(|| {
        AppError::ExtractionError("Basic information table not found".to_string())
    })?;

    let mut data = RecordMap::new();
    for row in table.select(&TR) {
        let Some((th, td)) = header_and_cell(row) else {
            continue;
        };
        let key = clean_text(&raw_text(th));
        let value = match td.select(&LINK).next() {
            Some(link) => extract_embedded_url(
                link.value().attr("href").unwrap_or_default(),
                EMBEDDED_URL_PARAM,
            ),
            None => clean_text(&raw_text(td)),
        };
        data.insert(key, FieldValue::Text(value));
    }
    Ok(data)
}

pub fn parse_information(document: &Html) -> Result<DetailInformation> {
    Ok(DetailInformation::from_mapping(basic_information_mapping(
        document,
    )?))
}

pub fn parse_viewing_documents(document: &Html) -> Result<ViewingDocuments> {
    let table = document.select(&DOCUMENTS_TABLE).next().ok_or_else(|| {
        AppError::ExtractionError("Viewing documents table not found".to_string())
    })?;

    let rows = table.select(&TR).filter_map(header_and_cell).map(|(th, td)| {
        let links = td
            .select(&LINK)
            .map(|a| {
                LinkDocument::new(
                    stripped_text(a),
                    a.value().attr("href").unwrap_or_default(),
                )
            })
            .collect();
        (stripped_text(th), DocumentCell::new(stripped_text(td), links))
    });
    classify_rows(rows)
}

pub fn parse_detail_page(html: &str) -> Result<DetailPage> {
    let document = Html::parse_document(html);
    let documents = parse_viewing_documents(&document)?;
    let information = parse_information(&document)?;
    Ok(DetailPage {
        information,
        documents,
    })
}

pub struct NpoPortalDetailFetcher {
    http: HttpClient,
}

impl NpoPortalDetailFetcher {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DetailFetcher for NpoPortalDetailFetcher {
    async fn fetch_detail(&self, url: &str) -> Result<DetailPage> {
        let html = self.http.get_text(url).await?;
        parse_detail_page(&html)
    }
}
