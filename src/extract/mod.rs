// src/extract/mod.rs

pub mod html;

use serde::{Deserialize, Serialize};
use std::iter;
use tracing::{trace, warn};

use crate::error::{Result, ScrapeError};
use crate::fetch::{Cell, RawRow};
use html::{first_href, strip_tags};

/// Written in place of a link when the name cell carries no `href`.
pub const NO_LINK: &str = "No Link";

/// Column count of a project row; anything else is not a project.
pub const PROJECT_COLUMNS: usize = 7;

pub const PROJECT_HEADER: &[&str] = &[
    "Project Name",
    "Project Link",
    "Country",
    "Status",
    "Approval Date",
];

pub const FINANCING_HEADER: &[&str] = &["Fiscal Year", "Country", "Financier"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(rename = "Project Name")]
    pub name: String,
    #[serde(rename = "Project Link")]
    pub link: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Approval Date")]
    pub approval_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingRecord {
    #[serde(rename = "Fiscal Year")]
    pub fiscal_year: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Financier")]
    pub financier: String,
}

/// Turns the raw rows of one page into output records.
///
/// Extractors see pages in fetch order and may keep state between them.
pub trait RowExtractor {
    type Record: Serialize;

    fn header(&self) -> &'static [&'static str];

    /// A row-level problem is handled inside; an `Err` means the whole page is unusable.
    fn extract_page(&mut self, page: u32, rows: &[RawRow]) -> Result<Vec<Self::Record>>;
}

/// Project rows take their name and link from the row before them.
///
/// The window runs over the concatenation of every page handed in, so the
/// last row of one page is the predecessor of the first row of the next.
#[derive(Debug, Default)]
pub struct ProjectExtractor {
    carry: Option<RawRow>,
}

impl ProjectExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `Ok(None)` when `cur` is not a project row.
fn project_from_window(
    prev: &RawRow,
    cur: &RawRow,
) -> std::result::Result<Option<ProjectRecord>, &'static str> {
    let [_, _, _, _, country, status, approval_date] = cur.columns.as_slice() else {
        return Ok(None);
    };
    let source = prev
        .columns
        .first()
        .ok_or("preceding row has no columns")?
        .text()
        .ok_or("preceding row's name cell has no data")?;
    let field = |cell: &Cell| cell.text().ok_or("project cell has no data");

    Ok(Some(ProjectRecord {
        name: strip_tags(&source),
        link: first_href(&source).unwrap_or(NO_LINK).to_string(),
        country: field(country)?,
        status: field(status)?,
        approval_date: field(approval_date)?,
    }))
}

impl RowExtractor for ProjectExtractor {
    type Record = ProjectRecord;

    fn header(&self) -> &'static [&'static str] {
        PROJECT_HEADER
    }

    fn extract_page(&mut self, page: u32, rows: &[RawRow]) -> Result<Vec<ProjectRecord>> {
        let carried = self.carry.take();
        let predecessors = iter::once(carried.as_ref()).chain(rows.iter().map(Some));

        let mut out = Vec::new();
        for (idx, (prev, cur)) in predecessors.zip(rows).enumerate() {
            let Some(prev) = prev else {
                if cur.len() == PROJECT_COLUMNS {
                    warn!(page, row = idx, "project row has no preceding row, skipped");
                }
                continue;
            };
            match project_from_window(prev, cur) {
                Ok(Some(record)) => out.push(record),
                Ok(None) => trace!(page, row = idx, columns = cur.len(), "not a project row"),
                Err(reason) => warn!(page, row = idx, reason, "skipping project row"),
            }
        }

        self.carry = match rows.last() {
            Some(last) => Some(last.clone()),
            None => carried,
        };
        Ok(out)
    }
}

/// Fiscal year, country and financier from the first three columns of every row.
#[derive(Debug, Default, Clone, Copy)]
pub struct FinancingExtractor;

impl RowExtractor for FinancingExtractor {
    type Record = FinancingRecord;

    fn header(&self) -> &'static [&'static str] {
        FINANCING_HEADER
    }

    fn extract_page(&mut self, page: u32, rows: &[RawRow]) -> Result<Vec<FinancingRecord>> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| match row.columns.as_slice() {
                [fiscal_year, country, financier, ..] => {
                    let field = |col: usize, cell: &Cell| {
                        cell.text().ok_or_else(|| {
                            ScrapeError::parse(page, format!("row {idx} column {col} has no data"))
                        })
                    };
                    Ok(FinancingRecord {
                        fiscal_year: field(0, fiscal_year)?,
                        country: field(1, country)?,
                        financier: field(2, financier)?,
                    })
                }
                _ => Err(ScrapeError::parse(
                    page,
                    format!("row {} has {} columns, need 3", idx, row.len()),
                )),
            })
            .collect()
    }
}
