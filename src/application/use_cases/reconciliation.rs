// ============================================================
// RECONCILIATION ENGINE
// ============================================================
// Join approved ledger rows with the org export and enrich each match
// with its portal detail page and, where supported, its jurisdiction page.
// Per-record failures degrade to empty columns; the batch never aborts.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::org_lookup::OrgLookup;
use super::progress::controlled_enumerate;
use crate::domain::documents::{DocumentSummary, ViewingDocuments};
use crate::domain::error::Result;
use crate::domain::record::Record;
use crate::domain::records::{
    AllOrgRow, ApprovedRow, DetailInformation, MergedOutputRow, TokyoInformation,
};

/// Parsed portal detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    pub information: DetailInformation,
    pub documents: ViewingDocuments,
}

impl DetailPage {
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary::from_report(self.documents.latest_financial_report())
    }
}

#[async_trait]
pub trait DetailFetcher: Send + Sync {
    async fn fetch_detail(&self, url: &str) -> Result<DetailPage>;
}

#[async_trait]
pub trait JurisdictionFetcher: Send + Sync {
    /// Whether `url` belongs to a disclosure site this fetcher can read
    fn supports(&self, url: &str) -> bool;

    async fn fetch_jurisdiction(&self, url: &str) -> Result<TokyoInformation>;
}

#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// `None` processes every approved row
    pub max_records: Option<usize>,
    /// Pause after each record that hit the network
    pub delay: Duration,
    pub log_interval: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_records: None,
            delay: Duration::ZERO,
            log_interval: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub rows: Vec<MergedOutputRow>,
    /// Corporate numbers (or names, when the number is blank) absent from the export
    pub unmatched: Vec<String>,
}

pub struct ReconciliationEngine {
    options: MergeOptions,
}

struct Enrichment {
    documents: DocumentSummary,
    detail: DetailInformation,
    jurisdiction: TokyoInformation,
    fetched: bool,
}

impl ReconciliationEngine {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    pub async fn merge<D, J>(
        &self,
        approved: &[ApprovedRow],
        lookup: &OrgLookup,
        detail_fetcher: &D,
        jurisdiction_fetcher: &J,
    ) -> MergeOutcome
    where
        D: DetailFetcher + ?Sized,
        J: JurisdictionFetcher + ?Sized,
    {
        let mut outcome = MergeOutcome::default();

        for (_, row) in controlled_enumerate(
            approved,
            self.options.log_interval,
            self.options.max_records,
        ) {
            let org = match lookup.find(row) {
                Some(org) => org.clone(),
                None => {
                    info!(
                        name = %row.corporation_name,
                        corporate_number = %row.corporate_number,
                        "Not found in the all-organizations export"
                    );
                    outcome.unmatched.push(unmatched_identifier(row));
                    AllOrgRow::empty_instance()
                }
            };

            let enrichment = self
                .enrich(row, &org, detail_fetcher, jurisdiction_fetcher)
                .await;

            outcome.rows.push(MergedOutputRow {
                approved: row.clone(),
                org,
                documents: enrichment.documents,
                detail: enrichment.detail,
                jurisdiction: enrichment.jurisdiction,
            });

            if enrichment.fetched && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }
        }

        info!(
            merged = outcome.rows.len(),
            unmatched = outcome.unmatched.len(),
            "Merge finished"
        );
        outcome
    }

    async fn enrich<D, J>(
        &self,
        row: &ApprovedRow,
        org: &AllOrgRow,
        detail_fetcher: &D,
        jurisdiction_fetcher: &J,
    ) -> Enrichment
    where
        D: DetailFetcher + ?Sized,
        J: JurisdictionFetcher + ?Sized,
    {
        let mut enrichment = Enrichment {
            documents: DocumentSummary::empty(),
            detail: DetailInformation::empty_instance(),
            jurisdiction: TokyoInformation::empty_instance(),
            fetched: false,
        };

        let detail_url = org.corporate_information_url.trim();
        if detail_url.is_empty() {
            debug!(name = %row.corporation_name, "No detail page URL");
            return enrichment;
        }

        enrichment.fetched = true;
        match detail_fetcher.fetch_detail(detail_url).await {
            Ok(page) => {
                enrichment.documents = page.summary();
                enrichment.detail = page.information;
            }
            Err(e) => {
                error!(
                    name = %row.corporation_name,
                    corporate_number = %row.corporate_number,
                    url = %detail_url,
                    error = %e,
                    "Detail page fetch failed"
                );
                return enrichment;
            }
        }

        let site_url = enrichment.detail.jurisdiction_public_site.trim().to_string();
        if site_url.is_empty() {
            return enrichment;
        }
        if !jurisdiction_fetcher.supports(&site_url) {
            debug!(url = %site_url, "Unsupported jurisdiction site");
            return enrichment;
        }

        match jurisdiction_fetcher.fetch_jurisdiction(&site_url).await {
            Ok(info) => enrichment.jurisdiction = info,
            Err(e) => {
                error!(
                    name = %row.corporation_name,
                    corporate_number = %row.corporate_number,
                    url = %site_url,
                    error = %e,
                    "Jurisdiction page fetch failed"
                );
            }
        }

        enrichment
    }
}

fn unmatched_identifier(row: &ApprovedRow) -> String {
    let number = row.corporate_number.trim();
    if number.is_empty() {
        row.corporation_name.clone()
    } else {
        number.to_string()
    }
}
