pub mod encoding;
pub mod etl;
pub mod extractor;
pub mod fields;
pub mod output;
pub mod pipeline;

pub use crate::domain::model::{PageExtraction, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
