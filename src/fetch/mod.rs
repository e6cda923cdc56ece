// src/fetch/mod.rs

pub mod client;
pub mod payload;

pub use client::{NoSession, ReportClient, SessionTokens, StaticToken};
pub use payload::{Cell, PageRequest, RawRow, RowsPayload};

use crate::error::Result;

/// Anything that can hand back the rows of one report page.
pub trait PageSource {
    fn fetch(&self, page: u32) -> Result<RowsPayload>;
}
