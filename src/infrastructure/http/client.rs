use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};
use url::Url;

use super::retry::{retry, RetryPolicy};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;

/// GET-only client shared by every scraper and downloader
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: &str, policy: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, policy })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.http_timeout(),
            &config.user_agent,
            config.retry_policy(),
        )
    }

    async fn get_once(&self, url: &str) -> Result<Response> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(AppError::NetworkError(format!("HTTP {}: {}", status, url)));
        }
        Err(AppError::ExtractionError(format!("HTTP {}: {}", status, url)))
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        retry(&self.policy, url, move || async move {
            let response = self.get_once(url).await?;
            Ok(response.bytes().await?.to_vec())
        })
        .await
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        retry(&self.policy, url, move || async move {
            let response = self.get_once(url).await?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Save the body of `url` into `dir`, named after the last path segment
    pub async fn download_file(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let file_name = file_name_from_url(url)?;
        let bytes = self.get_bytes(url).await?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;

        info!(url = %url, path = %path.display(), bytes = bytes.len(), "Downloaded file");
        Ok(path)
    }
}

fn file_name_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::ValidationError(format!("URL has no file name: {}", url)))
}
