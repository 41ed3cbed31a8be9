use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::application::use_cases::reconciliation::MergeOptions;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::http::RetryPolicy;

pub const CONFIG_FILE: &str = "approved-npo.toml";
pub const ENV_PREFIX: &str = "APPROVED_NPO_";

pub const CERTIFICATION_PAGE_URL: &str = "https://www.npo-homepage.go.jp/npoportal/certification";
pub const ALL_ORG_EXPORT_URL: &str =
    "https://www.npo-homepage.go.jp/npoportal/download/zip/gyousei_000.zip";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Unlimited when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records: Option<usize>,
    pub delay_secs: f64,
    pub log_interval: usize,
    pub output_dir: PathBuf,
    pub certification_page_url: String,
    pub all_org_export_url: String,
    pub http_timeout_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_min_wait_secs: f64,
    pub retry_max_wait_secs: f64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_records: None,
            delay_secs: 0.0,
            log_interval: 1,
            output_dir: PathBuf::from("output"),
            certification_page_url: CERTIFICATION_PAGE_URL.to_string(),
            all_org_export_url: ALL_ORG_EXPORT_URL.to_string(),
            http_timeout_secs: 10,
            retry_max_attempts: 3,
            retry_min_wait_secs: 1.0,
            retry_max_wait_secs: 10.0,
            user_agent: concat!("approved-npo/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Values supplied on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_interval: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Defaults, then the TOML file, then `APPROVED_NPO_*` variables
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(AppError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }

        let config: AppConfig = Self::figment(config_path)
            .merge(Serialized::defaults(overrides))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_interval == 0 {
            return Err(AppError::ValidationError(
                "log_interval must be at least 1".to_string(),
            ));
        }
        if self.retry_max_attempts == 0 {
            return Err(AppError::ValidationError(
                "retry_max_attempts must be at least 1".to_string(),
            ));
        }
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            return Err(AppError::ValidationError(format!(
                "delay_secs must be a non-negative number, got {}",
                self.delay_secs
            )));
        }
        for (name, value) in [
            ("retry_min_wait_secs", self.retry_min_wait_secs),
            ("retry_max_wait_secs", self.retry_max_wait_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::ValidationError(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.retry_min_wait_secs > self.retry_max_wait_secs {
            return Err(AppError::ValidationError(format!(
                "retry_min_wait_secs ({}) exceeds retry_max_wait_secs ({})",
                self.retry_min_wait_secs, self.retry_max_wait_secs
            )));
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_secs_f64(self.retry_min_wait_secs),
            Duration::from_secs_f64(self.retry_max_wait_secs),
        )
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            max_records: self.max_records,
            delay: self.delay(),
            log_interval: self.log_interval,
        }
    }
}
