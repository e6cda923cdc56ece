use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{error, info};
use wbreports::{describe, load_reports, run_report, ReportConfig};

/// Optional report list; the built-in presets run when it is absent.
const REPORTS_FILE: &str = "reports.yaml";

fn main() -> Result<()> {
    wbreports::init_tracing();
    info!("startup");

    let reports = if Path::new(REPORTS_FILE).exists() {
        load_reports(REPORTS_FILE).with_context(|| format!("loading {}", REPORTS_FILE))?
    } else {
        ReportConfig::presets()
    };
    info!(count = reports.len(), "reports to run");

    let mut failed = Vec::new();
    for cfg in &reports {
        match run_report(cfg) {
            Ok(summary) => println!("{}", describe(cfg, &summary)),
            Err(e) => {
                error!(report = %cfg.name, error = %e, "report failed");
                failed.push(cfg.name.as_str());
            }
        }
    }

    if !failed.is_empty() {
        bail!(
            "{} of {} reports failed: {}",
            failed.len(),
            reports.len(),
            failed.join(", ")
        );
    }
    info!("all done");
    Ok(())
}
