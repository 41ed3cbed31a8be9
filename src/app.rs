use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::pipeline::{Pipeline, RunSummary};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::cli::Cli;
use crate::shared::text_format::format_elapsed;

pub fn run() {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cli = Cli::parse();
    let started = Instant::now();
    let result = execute(&cli);
    info!("Elapsed: {}", format_elapsed(started.elapsed()));

    match result {
        Ok(summary) => info!(
            approved = summary.approved,
            merged = summary.merged,
            unmatched = summary.unmatched,
            output = %summary.outputs.merged.display(),
            "Done"
        ),
        Err(e) => {
            error!(error = %e, "Run aborted");
            std::process::exit(1);
        }
    }
}

fn execute(cli: &Cli) -> Result<RunSummary> {
    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())?;
    info!(
        max_records = ?config.max_records,
        delay_secs = config.delay_secs,
        output_dir = %config.output_dir.display(),
        "Configuration loaded"
    );

    // One worker: records are fetched strictly in sequence.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let pipeline = Pipeline::from_config(config)?;
    runtime.block_on(pipeline.run(&cli.sources()))
}
