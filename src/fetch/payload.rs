// src/fetch/payload.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, ScrapeError};

/// Filter block of the request envelope. Only the page is ever set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageFilter {
    pub page: u32,
}

/// The envelope POSTed for one page. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRequest {
    pub report_id: String,
    #[serde(rename = "csrfmiddlewaretoken")]
    pub csrf_token: Option<String>,
    pub filters: PageFilter,
    #[serde(rename = "counttype")]
    pub count_type: String,
}

impl PageRequest {
    pub fn new(report_id: &str, csrf_token: Option<String>, page: u32, count_type: &str) -> Self {
        Self {
            report_id: report_id.to_string(),
            csrf_token,
            filters: PageFilter { page },
            count_type: count_type.to_string(),
        }
    }

    pub fn page(&self) -> u32 {
        self.filters.page
    }

    /// Flat key/value pairs for the urlencoded envelope, jQuery-style
    /// bracket notation for the nested filter.
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("report_id", self.report_id.clone()),
            (
                "csrfmiddlewaretoken",
                self.csrf_token.clone().unwrap_or_default(),
            ),
            ("filters[page]", self.filters.page.to_string()),
            ("counttype", self.count_type.clone()),
        ]
    }
}

/// Decoded response body: `{rows: [{columns: [{data}]}]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowsPayload {
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    pub columns: Vec<Cell>,
}

/// One column. A missing `data` key decodes to `None` and only becomes an
/// error when an extractor reads that column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Cell {
    #[serde(default, deserialize_with = "present")]
    pub data: Option<Value>,
}

// Keeps an explicit `null` distinct from an absent key.
fn present<'de, D>(de: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(de).map(Some)
}

impl RowsPayload {
    /// Decode a page body, turning any shape mismatch into `ScrapeError::Parse`.
    pub fn from_json(page: u32, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| ScrapeError::parse(page, e.to_string()))
    }
}

impl RawRow {
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        Self {
            columns: cells
                .iter()
                .map(|c| Cell {
                    data: Some(Value::String(c.as_ref().to_string())),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Text of column `idx`; `None` if the column or its `data` is missing.
    pub fn text(&self, idx: usize) -> Option<String> {
        self.columns.get(idx).and_then(Cell::text)
    }
}

impl Cell {
    /// Strings as-is, `null` as empty, other scalars as their JSON text.
    /// `None` when the cell has no `data`.
    pub fn text(&self) -> Option<String> {
        let text = match self.data.as_ref()? {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Some(text)
    }
}
