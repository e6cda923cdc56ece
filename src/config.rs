// src/config.rs

use serde::Deserialize;
use std::{fs, ops::RangeInclusive, path::Path, path::PathBuf};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::pager::PageErrorPolicy;

pub const DEFAULT_ENDPOINT: &str = "https://financesapp.worldbank.org/providers/get-report-data/";
pub const DEFAULT_REFERER: &str = "https://financesapp.worldbank.org/summaries/ibrd-ida/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
pub const DEFAULT_COUNT_TYPE: &str = "10";

/// How the request envelope is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    Json,
    Form,
}

/// Which row shape the report returns, and so which extractor applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Seven-column project rows, name/link on the preceding row.
    Projects,
    /// Fiscal year, country, financier in the first three columns.
    Financing,
}

/// One report to pull: where to ask, what to ask for, where the CSV goes.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub report_id: String,
    #[serde(default = "default_count_type")]
    pub count_type: String,
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default = "default_first_page")]
    pub first_page: u32,
    pub last_page: u32,
    pub layout: Layout,
    pub on_page_error: PageErrorPolicy,
    pub output: PathBuf,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_referer() -> String {
    DEFAULT_REFERER.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_count_type() -> String {
    DEFAULT_COUNT_TYPE.to_string()
}

fn default_first_page() -> u32 {
    1
}

impl ReportConfig {
    /// IBRD/IDA project list, pages 1..=3. Failed pages are skipped.
    pub fn projects() -> Self {
        Self {
            name: "projects".to_string(),
            endpoint: default_endpoint(),
            report_id: "ibrd_ida_projects".to_string(),
            count_type: default_count_type(),
            encoding: Encoding::Json,
            referer: default_referer(),
            user_agent: default_user_agent(),
            csrf_token: None,
            first_page: 1,
            last_page: 3,
            layout: Layout::Projects,
            on_page_error: PageErrorPolicy::SkipAndContinue,
            output: PathBuf::from("world_bank_projects.csv"),
            timeout_secs: None,
        }
    }

    /// IBRD/IDA net financing by fiscal year, pages 1..=10. Any failed page aborts.
    pub fn net_projects() -> Self {
        Self {
            name: "net_projects".to_string(),
            endpoint: default_endpoint(),
            report_id: "ibrd_ida_netprojects".to_string(),
            count_type: default_count_type(),
            encoding: Encoding::Form,
            referer: default_referer(),
            user_agent: default_user_agent(),
            csrf_token: None,
            first_page: 1,
            last_page: 10,
            layout: Layout::Financing,
            on_page_error: PageErrorPolicy::AbortAll,
            output: PathBuf::from("world_bank_data_pages_1_10.csv"),
            timeout_secs: None,
        }
    }

    /// Both built-in reports, in the order they are normally run.
    pub fn presets() -> Vec<Self> {
        vec![Self::projects(), Self::net_projects()]
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.first_page..=self.last_page
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(ScrapeError::Config(format!("{}: {}", self.name, msg)));

        if self.first_page == 0 {
            return bad("pages are 1-based, first_page must be >= 1".to_string());
        }
        if self.first_page > self.last_page {
            return bad(format!(
                "empty page range {}..={}",
                self.first_page, self.last_page
            ));
        }
        if self.report_id.trim().is_empty() {
            return bad("report_id is empty".to_string());
        }
        if self.count_type.trim().is_empty() {
            return bad("count_type is empty".to_string());
        }
        if self.output.as_os_str().is_empty() {
            return bad("output path is empty".to_string());
        }
        match Url::parse(&self.endpoint) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(()),
            Ok(u) => bad(format!("unsupported endpoint scheme {:?}", u.scheme())),
            Err(e) => bad(format!("endpoint {:?}: {}", self.endpoint, e)),
        }
    }
}

/// Read a YAML list of reports and validate each one.
pub fn load_reports<P: AsRef<Path>>(path: P) -> Result<Vec<ReportConfig>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| ScrapeError::Config(format!("reading {}: {}", path.display(), e)))?;
    let reports: Vec<ReportConfig> = serde_yaml::from_str(&text)
        .map_err(|e| ScrapeError::Config(format!("parsing {}: {}", path.display(), e)))?;
    for r in &reports {
        r.validate()?;
    }
    Ok(reports)
}
