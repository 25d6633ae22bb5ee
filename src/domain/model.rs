use crate::utils::error::ExtractionError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// UK postcode split at its internal space, e.g. "CH1" / "1AB".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Postcode {
    pub outward: String,
    pub inward: String,
}

impl Postcode {
    pub fn is_empty(&self) -> bool {
        self.outward.is_empty() && self.inward.is_empty()
    }
}

/// One historical transaction row of a listing.
///
/// Fields whose marker was missing from the row keep their zero value:
/// `0`, `None` and the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub amount: u64,
    pub date: Option<NaiveDate>,
    pub tenure: String,
}

impl SaleRecord {
    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub address: String,
    pub postcode: Postcode,
    pub bedroom_count: u32,
    pub property_type: String,
    pub sales: Vec<SaleRecord>,
}

/// A listing card that was skipped because one of its fields failed to parse.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{page} card {card_index}: {error}")]
pub struct ListingFailure {
    pub page: String,
    /// Zero-based position of the card content block within its page.
    pub card_index: usize,
    /// Address text, when the card's title had already been read.
    pub address: Option<String>,
    #[source]
    pub error: ExtractionError,
}

/// Everything extracted from one saved page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtraction {
    pub page: String,
    pub listings: Vec<Listing>,
    pub failures: Vec<ListingFailure>,
}

impl PageExtraction {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            ..Self::default()
        }
    }

    pub fn sale_count(&self) -> usize {
        self.listings.iter().map(|l| l.sales.len()).sum()
    }
}

/// A rendered output file, ready to be written or bundled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub filename: String,
    pub contents: String,
}

impl OutputArtifact {
    pub fn new(filename: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub listings: Vec<Listing>,
    pub failures: Vec<ListingFailure>,
    pub artifacts: Vec<OutputArtifact>,
}

impl TransformResult {
    pub fn artifact(&self, filename: &str) -> Option<&OutputArtifact> {
        self.artifacts.iter().find(|a| a.filename == filename)
    }
}
