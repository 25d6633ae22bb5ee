use crate::domain::markers::MarkerSet;
use crate::domain::model::{PageExtraction, TransformResult};
use crate::domain::settings::{FailurePolicy, OutputFilenames, OutputFormat};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_dir(&self) -> &str;
    /// Page files relative to `input_dir`, in the order their listings are emitted.
    fn input_files(&self) -> Vec<String>;
    fn output_path(&self) -> &str;
    fn concurrent_documents(&self) -> usize;
    fn failure_policy(&self) -> FailurePolicy;
    fn output_formats(&self) -> Vec<OutputFormat>;
    fn markers(&self) -> &MarkerSet;
    fn filenames(&self) -> &OutputFilenames;
    /// ZIP archive name when all outputs should be bundled into one file.
    fn bundle_filename(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<PageExtraction>>;
    async fn transform(&self, pages: Vec<PageExtraction>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
