use std::path::PathBuf;

use clap::Parser;

use crate::application::use_cases::pipeline::LocalSources;
use crate::infrastructure::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(name = "approved-npo")]
#[command(about = "Reconcile the approved-NPO ledger with the all-organizations export")]
#[command(version)]
pub struct Cli {
    /// TOML config file (default: ./approved-npo.toml when present)
    #[arg(long, short = 'c', env = "APPROVED_NPO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stop after this many approved records
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Seconds to wait after each record that hit the network
    #[arg(long)]
    pub delay: Option<f64>,

    /// Log progress every N records
    #[arg(long)]
    pub log_interval: Option<usize>,

    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Read the approved ledger from a local PDF (or HTML) instead of downloading it
    #[arg(long)]
    pub ledger_pdf: Option<PathBuf>,

    /// Read the org export from a local .zip or .csv instead of downloading it
    #[arg(long)]
    pub org_export: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_records: self.max_records,
            delay_secs: self.delay,
            log_interval: self.log_interval,
            output_dir: self.output_dir.clone(),
        }
    }

    pub fn sources(&self) -> LocalSources {
        LocalSources {
            ledger: self.ledger_pdf.clone(),
            org_export: self.org_export.clone(),
        }
    }
}
