use scraper::Html;
use tracing::info;
use url::Url;

use super::html::{raw_text, LINK};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::http::HttpClient;
use crate::shared::url::resolve_link;

/// Link text of the nationwide approved-NPO ledger on the certification page
pub const LEDGER_LINK_TEXT: &str = "全国 所轄庁認定・特例認定NPO法人名簿";

/// Absolute URL of the ledger PDF linked from the certification page
pub fn find_ledger_url(html: &str, page_url: &str) -> Result<String> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);

    document
        .select(&LINK)
        .find(|a| raw_text(*a).contains(LEDGER_LINK_TEXT))
        .and_then(|a| a.value().attr("href"))
        .map(|href| resolve_link(&base, href))
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Approved ledger link not found on {}",
                page_url
            ))
        })
}

pub async fn discover_ledger_url(http: &HttpClient, page_url: &str) -> Result<String> {
    let html = http.get_text(page_url).await?;
    let url = find_ledger_url(&html, page_url)?;
    info!(url = %url, "Discovered approved ledger");
    Ok(url)
}
