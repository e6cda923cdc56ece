// src/bin/projects.rs
//
// IBRD/IDA project list, pages 1 to 3. Pages that fail are skipped; the file
// is written as long as at least one page returned rows.

use anyhow::{Context, Result};
use wbreports::{describe, run_report, ReportConfig, ScrapeError};

fn main() -> Result<()> {
    wbreports::init_tracing();

    let cfg = ReportConfig::projects();
    match run_report(&cfg) {
        Ok(summary) => {
            println!("{}", describe(&cfg, &summary));
            Ok(())
        }
        Err(ScrapeError::NoData) => {
            println!("No data fetched or an error occurred.");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("running report {}", cfg.name)),
    }
}
