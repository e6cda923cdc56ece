// src/bin/net_projects.rs
//
// IBRD/IDA net financing, pages 1 to 10. The first failed page aborts the run
// and no file is written.

use anyhow::{Context, Result};
use wbreports::{describe, run_report, ReportConfig};

fn main() -> Result<()> {
    wbreports::init_tracing();

    let cfg = ReportConfig::net_projects();
    let summary = run_report(&cfg).with_context(|| format!("running report {}", cfg.name))?;
    println!("{}", describe(&cfg, &summary));
    Ok(())
}
