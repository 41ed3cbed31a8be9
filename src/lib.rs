mod app;
mod application;
mod domain;
mod infrastructure;
mod interfaces;
mod shared;

pub use app::run;
pub use application::use_cases::pipeline::{LocalSources, Pipeline, RunSummary};
pub use application::use_cases::reconciliation::{
    DetailFetcher, DetailPage, JurisdictionFetcher, MergeOptions, MergeOutcome,
    ReconciliationEngine,
};
pub use domain::error::{AppError, Result};
pub use infrastructure::config::AppConfig;
