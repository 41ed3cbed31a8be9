// ============================================================
// RECONCILIATION PIPELINE
// ============================================================
// Obtain both primary datasets, merge, then write the run's artifacts.
// Failing to obtain either dataset aborts the run before anything is written.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use super::org_lookup::OrgLookup;
use super::reconciliation::{MergeOutcome, ReconciliationEngine};
use super::tabular_extractor::extract_approved_rows;
use crate::domain::error::{AppError, Result};
use crate::domain::record::Record;
use crate::domain::records::{AllOrgRow, ApprovedRow, MergedOutputRow};
use crate::infrastructure::archive::extract_single_csv;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::{read_org_export, write_rows};
use crate::infrastructure::http::HttpClient;
use crate::infrastructure::pdf_ledger::PdfLedger;
use crate::infrastructure::scraping::{
    discover_ledger_url, HtmlTables, NpoPortalDetailFetcher, TokyoDetailFetcher,
};
use crate::infrastructure::storage::{write_json, RunOutputs};

/// Local files used instead of downloading the datasets
#[derive(Debug, Clone, Default)]
pub struct LocalSources {
    /// Approved ledger as PDF (or an HTML page holding the same table)
    pub ledger: Option<PathBuf>,
    /// Org export as the published zip or an already extracted CSV
    pub org_export: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub approved: usize,
    pub merged: usize,
    pub unmatched: usize,
    pub outputs: RunOutputs,
}

fn has_extension(path: &Path, candidates: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| candidates.iter().any(|c| ext.eq_ignore_ascii_case(c)))
}

pub struct Pipeline {
    config: AppConfig,
    http: HttpClient,
}

impl Pipeline {
    pub fn new(config: AppConfig, http: HttpClient) -> Self {
        Self { config, http }
    }

    pub fn from_config(config: AppConfig) -> Result<Self> {
        let http = HttpClient::from_config(&config)?;
        Ok(Self::new(config, http))
    }

    pub async fn load_approved_rows(&self, local: Option<&Path>) -> Result<Vec<ApprovedRow>> {
        let (source, rows) = match local {
            Some(path) if has_extension(path, &["html", "htm"]) => {
                let html = std::fs::read_to_string(path)?;
                (
                    path.display().to_string(),
                    extract_approved_rows(&HtmlTables::parse(&html))?,
                )
            }
            Some(path) => {
                let ledger = PdfLedger::load(path)?;
                info!(pages = ledger.page_count(), "Approved ledger loaded");
                (path.display().to_string(), extract_approved_rows(&ledger)?)
            }
            None => {
                let url = discover_ledger_url(&self.http, &self.config.certification_page_url)
                    .await?;
                let ledger = PdfLedger::from_bytes(&self.http.get_bytes(&url).await?)?;
                info!(url = %url, pages = ledger.page_count(), "Approved ledger downloaded");
                (url, extract_approved_rows(&ledger)?)
            }
        };

        if rows.is_empty() {
            return Err(AppError::ExtractionError(format!(
                "No rows found in approved ledger {}",
                source
            )));
        }
        info!(rows = rows.len(), "Approved ledger rows extracted");
        Ok(rows)
    }

    pub async fn load_org_rows(
        &self,
        local: Option<&Path>,
        work_dir: &Path,
    ) -> Result<Vec<AllOrgRow>> {
        let path = match local {
            Some(path) => path.to_path_buf(),
            None => {
                self.http
                    .download_file(&self.config.all_org_export_url, work_dir)
                    .await?
            }
        };

        let csv_path = if has_extension(&path, &["csv"]) {
            path
        } else {
            extract_single_csv(&path, &work_dir.join("org_export"))?
        };
        read_org_export(&csv_path)
    }

    pub async fn merge(&self, approved: &[ApprovedRow], lookup: &OrgLookup) -> MergeOutcome {
        let engine = ReconciliationEngine::new(self.config.merge_options());
        let detail_fetcher = NpoPortalDetailFetcher::new(self.http.clone());
        let jurisdiction_fetcher = TokyoDetailFetcher::new(self.http.clone());
        engine
            .merge(approved, lookup, &detail_fetcher, &jurisdiction_fetcher)
            .await
    }

    pub async fn run(&self, sources: &LocalSources) -> Result<RunSummary> {
        let started_at = Local::now();
        let work_dir = tempfile::tempdir()?;

        info!("Loading approved ledger");
        let approved = self
            .load_approved_rows(sources.ledger.as_deref())
            .await?;

        info!("Loading all-organizations export");
        let lookup = OrgLookup::from_rows(
            self.load_org_rows(sources.org_export.as_deref(), work_dir.path())
                .await?,
        );
        info!(rows = lookup.len(), "Organization lookup built");

        info!("Merging");
        let outcome = self.merge(&approved, &lookup).await;

        let outputs = RunOutputs::prepare(&self.config.output_dir, &started_at)?;
        write_rows(
            &outputs.approved_ledger,
            &ApprovedRow::header(),
            approved.iter().map(ApprovedRow::to_row),
        )?;
        write_rows(
            &outputs.merged,
            &MergedOutputRow::header(),
            outcome.rows.iter().map(MergedOutputRow::to_row),
        )?;
        write_json(&outputs.unmatched, &outcome.unmatched)?;
        info!(
            ledger = %outputs.approved_ledger.display(),
            merged = %outputs.merged.display(),
            unmatched = %outputs.unmatched.display(),
            "Outputs written"
        );

        Ok(RunSummary {
            approved: approved.len(),
            merged: outcome.rows.len(),
            unmatched: outcome.unmatched.len(),
            outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use encoding_rs::SHIFT_JIS;
    use httpmock::prelude::*;

    use super::*;
    use crate::infrastructure::http::RetryPolicy;

    const DETAIL_PAGE: &str = r#"
        <table summary="基本情報">
          <tr><th>法人名称</th><td>特定非営利活動法人みどり</td></tr>
          <tr><th>法人番号</th><td>1111111111111</td></tr>
        </table>
        <table summary="閲覧書類">
          <tr><th>2023年度</th><td><a href="/files/2023.pdf">事業報告書</a></td></tr>
        </table>
    "#;

    fn ledger_html() -> String {
        let row = |code: &str, number: &str, name: &str| {
            let mut cells = vec![String::new(); ApprovedRow::FIELDS.len()];
            cells[0] = code.to_string();
            cells[1] = "東京都".to_string();
            cells[2] = number.to_string();
            cells[6] = name.to_string();
            format!(
                "<tr>{}</tr>",
                cells
                    .iter()
                    .map(|c| format!("<td>{}</td>", c))
                    .collect::<String>()
            )
        };
        format!(
            "<table><tr><th>所轄庁コード</th><th>所轄庁</th></tr>{}{}</table>",
            row("13", "1111111111111", "特定非営利活動法人みどり"),
            row("13", "2222222222222", "特定非営利活動法人あおぞら"),
        )
    }

    fn org_export_csv(detail_url: &str) -> Vec<u8> {
        let header = AllOrgRow::header();
        let url_idx = header.iter().position(|h| *h == "法人情報URL").unwrap();
        let number_idx = header.iter().position(|h| *h == "法人番号").unwrap();
        let mut row = vec![String::new(); header.len()];
        row[0] = "特定非営利活動法人　みどり".to_string();
        row[number_idx] = "1111111111111".to_string();
        row[url_idx] = detail_url.to_string();

        let content = format!("{}\n{}\n", header.join(","), row.join(","));
        SHIFT_JIS.encode(&content).0.into_owned()
    }

    #[tokio::test]
    async fn test_run_with_local_sources() {
        let server = MockServer::start_async().await;
        let detail_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/detail/1");
                then.status(200).body(DETAIL_PAGE);
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("ledger.html");
        std::fs::write(&ledger_path, ledger_html()).unwrap();
        let export_path = dir.path().join("export.csv");
        std::fs::write(&export_path, org_export_csv(&server.url("/detail/1"))).unwrap();

        let config = AppConfig {
            output_dir: dir.path().join("output"),
            ..AppConfig::default()
        };
        let http =
            HttpClient::new(Duration::from_secs(5), "test", RetryPolicy::immediate(1)).unwrap();
        let pipeline = Pipeline::new(config, http);

        let summary = pipeline
            .run(&LocalSources {
                ledger: Some(ledger_path),
                org_export: Some(export_path),
            })
            .await
            .unwrap();

        detail_mock.assert_async().await;
        assert_eq!(summary.approved, 2);
        assert_eq!(summary.merged, 2);
        assert_eq!(summary.unmatched, 1);

        let unmatched: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&summary.outputs.unmatched).unwrap())
                .unwrap();
        assert_eq!(unmatched, vec!["2222222222222"]);

        let mut reader = csv::Reader::from_path(&summary.outputs.merged).unwrap();
        let header = reader.headers().unwrap().clone();
        assert_eq!(header.len(), MergedOutputRow::header().len());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);

        let year_idx = header.iter().position(|h| h == "ドキュメント最新年度").unwrap();
        assert_eq!(&rows[0][year_idx], "2023");
        assert_eq!(&rows[0][ApprovedRow::FIELDS.len()], "特定非営利活動法人　みどり");
        assert_eq!(&rows[1][year_idx], "");
        assert_eq!(&rows[1][ApprovedRow::FIELDS.len()], "");

        let ledger = std::fs::read_to_string(&summary.outputs.approved_ledger).unwrap();
        assert!(ledger.starts_with("\"所轄庁コード\""));
    }

    #[tokio::test]
    async fn test_missing_dataset_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("ledger.html");
        std::fs::write(&ledger_path, ledger_html()).unwrap();
        let output_dir = dir.path().join("output");

        let config = AppConfig {
            output_dir: output_dir.clone(),
            ..AppConfig::default()
        };
        let http =
            HttpClient::new(Duration::from_secs(5), "test", RetryPolicy::immediate(1)).unwrap();

        let result = Pipeline::new(config, http)
            .run(&LocalSources {
                ledger: Some(ledger_path),
                org_export: Some(dir.path().join("missing.csv")),
            })
            .await;

        assert!(result.is_err());
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn test_empty_ledger_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("ledger.html");
        std::fs::write(&ledger_path, "<table><tr><th>所轄庁コード</th></tr></table>").unwrap();
        let pipeline = Pipeline::from_config(AppConfig::default()).unwrap();

        let err = pipeline
            .load_approved_rows(Some(&ledger_path))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
    }

    #[tokio::test]
    async fn test_downloaded_ledger_is_read_from_memory() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/certification");
                then.status(200).body(
                    r#"<a href="/uploads/ledger.pdf">全国 所轄庁認定・特例認定NPO法人名簿</a>"#,
                );
            })
            .await;
        let ledger_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/uploads/ledger.pdf");
                then.status(200).body("%PDF-1.5 truncated");
            })
            .await;

        let config = AppConfig {
            certification_page_url: server.url("/certification"),
            ..AppConfig::default()
        };
        let http =
            HttpClient::new(Duration::from_secs(5), "test", RetryPolicy::immediate(1)).unwrap();

        let err = Pipeline::new(config, http)
            .load_approved_rows(None)
            .await
            .unwrap_err();
        ledger_mock.assert_async().await;
        assert!(matches!(err, AppError::ParseError(_)));
    }
}
