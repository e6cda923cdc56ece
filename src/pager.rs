// src/pager.rs

use serde::Deserialize;
use std::ops::RangeInclusive;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::extract::RowExtractor;
use crate::fetch::PageSource;

/// What to do when a page cannot be fetched or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageErrorPolicy {
    /// Log the failure, drop the page, keep going.
    #[default]
    SkipAndContinue,
    /// The first failure ends the run.
    AbortAll,
}

/// Everything collected over one page range.
#[derive(Debug)]
pub struct PagerOutput<R> {
    /// In fetch order: ascending page, then row order within the page.
    pub records: Vec<R>,
    /// Raw rows returned by the pages that succeeded.
    pub raw_rows: usize,
    pub pages_ok: Vec<u32>,
    pub pages_failed: Vec<u32>,
}

impl<R> Default for PagerOutput<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            raw_rows: 0,
            pages_ok: Vec::new(),
            pages_failed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pager {
    policy: PageErrorPolicy,
}

impl Pager {
    pub fn new(policy: PageErrorPolicy) -> Self {
        Self { policy }
    }

    /// Fetch and extract every page in `pages`, one after another.
    pub fn run<S, E>(
        &self,
        source: &S,
        extractor: &mut E,
        pages: RangeInclusive<u32>,
    ) -> Result<PagerOutput<E::Record>>
    where
        S: PageSource + ?Sized,
        E: RowExtractor,
    {
        let mut out = PagerOutput::default();

        for page in pages {
            info!(page, "crawling page");
            let result = source.fetch(page).and_then(|payload| {
                let records = extractor.extract_page(page, &payload.rows)?;
                Ok((payload.rows.len(), records))
            });

            match result {
                Ok((rows, records)) => {
                    debug!(page, rows, records = records.len(), "page done");
                    out.raw_rows += rows;
                    out.records.extend(records);
                    out.pages_ok.push(page);
                }
                Err(e) => match self.policy {
                    PageErrorPolicy::SkipAndContinue => {
                        warn!(page, error = %e, "skipping page");
                        out.pages_failed.push(page);
                    }
                    PageErrorPolicy::AbortAll => {
                        error!(page, error = %e, "aborting run");
                        return Err(e);
                    }
                },
            }
        }

        Ok(out)
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::{Reply, ScriptedSource};
    use super::*;
    use crate::error::ScrapeError;
    use crate::extract::{FinancingExtractor, FinancingRecord, ProjectExtractor};
    use crate::fetch::RawRow;

    fn fin(year: &str, country: &str) -> RawRow {
        RawRow::from_cells(&[year, country, "IDA"])
    }

    fn years(out: &PagerOutput<FinancingRecord>) -> Vec<&str> {
        out.records.iter().map(|r| r.fiscal_year.as_str()).collect()
    }

    #[test]
    fn records_follow_page_then_row_order() {
        let source = ScriptedSource::default()
            .with(1, Reply::Rows(vec![fin("2001", "A"), fin("2002", "B")]))
            .with(2, Reply::Rows(vec![fin("2003", "C")]))
            .with(3, Reply::Rows(vec![fin("2004", "D"), fin("2005", "E")]));

        let out = Pager::new(PageErrorPolicy::AbortAll)
            .run(&source, &mut FinancingExtractor, 1..=3)
            .unwrap();

        assert_eq!(*source.calls.borrow(), vec![1, 2, 3]);
        assert_eq!(out.raw_rows, 5);
        assert_eq!(
            years(&out),
            ["2001", "2002", "2003", "2004", "2005"]
        );
        assert_eq!(out.pages_ok, vec![1, 2, 3]);
        assert!(out.pages_failed.is_empty());
    }

    #[test]
    fn skip_policy_keeps_going_after_a_bad_page() {
        let source = ScriptedSource::default()
            .with(1, Reply::Rows(vec![fin("2001", "A")]))
            .with(2, Reply::Status(500))
            .with(3, Reply::Garbage)
            .with(4, Reply::Rows(vec![fin("2004", "D")]));

        let out = Pager::new(PageErrorPolicy::SkipAndContinue)
            .run(&source, &mut FinancingExtractor, 1..=4)
            .unwrap();

        assert_eq!(*source.calls.borrow(), vec![1, 2, 3, 4]);
        assert_eq!(years(&out), ["2001", "2004"]);
        assert_eq!(out.pages_ok, vec![1, 4]);
        assert_eq!(out.pages_failed, vec![2, 3]);
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let source = ScriptedSource::default()
            .with(1, Reply::Rows(vec![fin("2001", "A")]))
            .with(2, Reply::Status(502))
            .with(3, Reply::Rows(vec![fin("2003", "C")]));

        let err = Pager::new(PageErrorPolicy::AbortAll)
            .run(&source, &mut FinancingExtractor, 1..=3)
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Status { page: 2, status: 502 }));
        assert_eq!(*source.calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn abort_policy_treats_short_rows_as_fatal() {
        let source = ScriptedSource::default()
            .with(1, Reply::Rows(vec![RawRow::from_cells(&["2001"])]))
            .with(2, Reply::Rows(vec![fin("2002", "B")]));

        let err = Pager::new(PageErrorPolicy::AbortAll)
            .run(&source, &mut FinancingExtractor, 1..=2)
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Parse { page: 1, .. }));
        assert_eq!(*source.calls.borrow(), vec![1]);
    }

    #[test]
    fn skipped_page_does_not_break_the_project_window() {
        let name = |n: &str| RawRow::from_cells(&[format!("<a href=\"/{n}\">{n}</a>")]);
        let project = |c: &str| RawRow::from_cells(&["", "", "", "", c, "Active", "2020"]);

        let source = ScriptedSource::default()
            .with(1, Reply::Rows(vec![name("a"), project("Chad"), name("b")]))
            .with(2, Reply::Status(500))
            .with(3, Reply::Rows(vec![project("Mali")]));

        let out = Pager::new(PageErrorPolicy::SkipAndContinue)
            .run(&source, &mut ProjectExtractor::new(), 1..=3)
            .unwrap();

        let pairs: Vec<_> = out
            .records
            .iter()
            .map(|r| (r.name.as_str(), r.country.as_str()))
            .collect();
        assert_eq!(pairs, [("a", "Chad"), ("b", "Mali")]);
        assert_eq!(out.raw_rows, 4);
    }
}
