// src/report.rs

use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::config::{Layout, ReportConfig};
use crate::error::{Result, ScrapeError};
use crate::extract::{FinancingExtractor, ProjectExtractor, RowExtractor};
use crate::fetch::{PageSource, ReportClient};
use crate::output::write_records;
use crate::pager::{PageErrorPolicy, Pager};

/// What one finished report produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub name: String,
    pub path: PathBuf,
    pub records: usize,
    pub pages_ok: Vec<u32>,
    pub pages_failed: Vec<u32>,
}

/// Pull every page of `cfg` from its endpoint and write the CSV.
pub fn run_report(cfg: &ReportConfig) -> Result<ReportSummary> {
    let client = ReportClient::new(cfg)?;
    run_report_with(cfg, &client)
}

/// Same as [`run_report`] against any page source.
#[instrument(level = "info", skip_all, fields(report = %cfg.name))]
pub fn run_report_with<S: PageSource + ?Sized>(
    cfg: &ReportConfig,
    source: &S,
) -> Result<ReportSummary> {
    cfg.validate()?;
    match cfg.layout {
        Layout::Projects => collect_and_write(cfg, source, ProjectExtractor::new()),
        Layout::Financing => collect_and_write(cfg, source, FinancingExtractor),
    }
}

fn collect_and_write<S, E>(cfg: &ReportConfig, source: &S, mut extractor: E) -> Result<ReportSummary>
where
    S: PageSource + ?Sized,
    E: RowExtractor,
{
    let out = Pager::new(cfg.on_page_error).run(source, &mut extractor, cfg.pages())?;

    // A skip-and-continue run only writes if some page actually returned rows.
    if cfg.on_page_error == PageErrorPolicy::SkipAndContinue && out.raw_rows == 0 {
        warn!(failed = out.pages_failed.len(), "no rows fetched, nothing written");
        return Err(ScrapeError::NoData);
    }

    let path = write_records(&cfg.output, extractor.header(), &out.records)?;
    info!(
        path = %path.display(),
        records = out.records.len(),
        pages_ok = out.pages_ok.len(),
        pages_failed = out.pages_failed.len(),
        "report written"
    );

    Ok(ReportSummary {
        name: cfg.name.clone(),
        path,
        records: out.records.len(),
        pages_ok: out.pages_ok,
        pages_failed: out.pages_failed,
    })
}
