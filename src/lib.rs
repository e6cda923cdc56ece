// src/lib.rs

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod pager;
pub mod report;

pub use config::{load_reports, ReportConfig};
pub use error::{Result, ScrapeError};
pub use report::{run_report, ReportSummary};

use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG`-driven fmt subscriber on stderr, `info` when unset.
pub fn init_tracing() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

/// One-line operator message for a finished report.
pub fn describe(cfg: &ReportConfig, summary: &ReportSummary) -> String {
    format!(
        "{}: {} records from pages {} to {} written to {}",
        summary.name,
        summary.records,
        cfg.first_page,
        cfg.last_page,
        summary.path.display()
    )
}
