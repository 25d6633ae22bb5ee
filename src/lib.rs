pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::storage::LocalStorage;
pub use core::{etl::EtlEngine, extractor::ListingExtractor, pipeline::ListingPipeline};
pub use domain::markers::MarkerSet;
pub use domain::model::{Listing, ListingFailure, PageExtraction, Postcode, SaleRecord};
pub use domain::settings::{FailurePolicy, OutputFormat};
pub use utils::error::{EtlError, ExtractionError, Result};
