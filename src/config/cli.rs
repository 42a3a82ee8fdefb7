use clap::Parser;
use std::path::PathBuf;

/// Command-line surface. Connection and credential settings come from the
/// environment (see `MonitorConfig::from_env`); flags here only tweak a
/// single invocation.
#[derive(Debug, Clone, Parser)]
#[command(name = "field-monitor")]
#[command(about = "Fetch satellite imagery for a list of fields and store it")]
pub struct Cli {
    /// Override the field list location (CSV_URL)
    #[arg(long)]
    pub csv_url: Option<String>,

    /// Override the local storage root (MEDIA_ROOT)
    #[arg(long)]
    pub media_root: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU/memory statistics for the run")]
    pub monitor: bool,
}
