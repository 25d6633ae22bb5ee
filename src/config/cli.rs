use crate::core::ConfigProvider;
use crate::domain::markers::MarkerSet;
use crate::domain::settings::{default_input_files, FailurePolicy, OutputFilenames, OutputFormat};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_path, validate_positive_number, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "house-sales-etl")]
#[command(about = "Extract sold-house listings from saved result pages into JSON and CSV")]
pub struct CliConfig {
    /// Saved result pages, relative to --input-dir. Defaults to rm-pg1.html .. rm-pg9.html
    #[arg(value_name = "PAGE")]
    pub input_files: Vec<String>,

    #[arg(long, default_value = ".")]
    pub input_dir: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Outputs to write (json, csv, encoded-csv). Defaults to all of them
    #[arg(long = "format", value_enum, value_delimiter = ',')]
    pub formats: Vec<OutputFormat>,

    #[arg(long, default_value = "4")]
    pub concurrent_documents: usize,

    #[arg(long, help = "Abort on the first listing that cannot be parsed")]
    pub strict: bool,

    #[arg(long, value_name = "ZIP_NAME", help = "Bundle all outputs into one ZIP archive")]
    pub bundle: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage after each phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(skip)]
    pub markers: MarkerSet,

    #[arg(skip)]
    pub filenames: OutputFilenames,
}

impl ConfigProvider for CliConfig {
    fn input_dir(&self) -> &str {
        &self.input_dir
    }

    fn input_files(&self) -> Vec<String> {
        if self.input_files.is_empty() {
            default_input_files()
        } else {
            self.input_files.clone()
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn concurrent_documents(&self) -> usize {
        self.concurrent_documents
    }

    fn failure_policy(&self) -> FailurePolicy {
        if self.strict {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Skip
        }
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        OutputFormat::selection(&self.formats)
    }

    fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    fn filenames(&self) -> &OutputFilenames {
        &self.filenames
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.bundle.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input_dir", &self.input_dir)?;
        validate_path("output_path", &self.output_path)?;
        validate_positive_number("concurrent_documents", self.concurrent_documents, 1)?;
        validate_file_extensions("input_files", &self.input_files(), &["html", "htm"])?;
        if let Some(bundle) = &self.bundle {
            validate_file_extensions("bundle", std::slice::from_ref(bundle), &["zip"])?;
        }
        self.markers.validate()
    }
}
