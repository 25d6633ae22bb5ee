use crate::core::ConfigProvider;
use crate::domain::markers::MarkerSet;
use crate::domain::settings::{default_input_files, FailurePolicy, OutputFilenames, OutputFormat};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_path, validate_positive_number,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

const DEFAULT_CONCURRENT_DOCUMENTS: usize = 4;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub concurrent_documents: Option<usize>,
    pub on_error: Option<FailurePolicy>,
    #[serde(default)]
    pub markers: MarkerSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Option<Vec<OutputFormat>>,
    pub compression: Option<CompressionConfig>,
    #[serde(default)]
    pub filenames: OutputFilenames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

fn default_input_dir() -> String {
    ".".to_string()
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
                message: format!("cannot read '{}': {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration text, replacing `${VAR}` with environment values first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written so validation can point at them
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_path("source.input_dir", &self.source.input_dir)?;
        if let Some(files) = &self.source.files {
            if files.is_empty() {
                return Err(EtlError::MissingConfigError {
                    field: "source.files".to_string(),
                });
            }
            validate_file_extensions("source.files", files, &["html", "htm"])?;
        }

        validate_path("load.output_path", &self.load.output_path)?;

        if let Some(concurrent) = self.extract.concurrent_documents {
            validate_positive_number("extract.concurrent_documents", concurrent, 1)?;
        }

        if let Some(formats) = &self.load.output_formats {
            if formats.is_empty() {
                return Err(EtlError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: "[]".to_string(),
                    reason: "At least one output format is required".to_string(),
                });
            }
        }

        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validate_file_extensions(
                "load.compression.filename",
                std::slice::from_ref(&compression.filename),
                &["zip"],
            )?;
        }

        self.extract.markers.validate()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_dir(&self) -> &str {
        &self.source.input_dir
    }

    fn input_files(&self) -> Vec<String> {
        self.source.files.clone().unwrap_or_else(default_input_files)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn concurrent_documents(&self) -> usize {
        self.extract
            .concurrent_documents
            .unwrap_or(DEFAULT_CONCURRENT_DOCUMENTS)
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.extract.on_error.unwrap_or_default()
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.load
            .output_formats
            .as_deref()
            .map(OutputFormat::selection)
            .unwrap_or_else(|| OutputFormat::ALL.to_vec())
    }

    fn markers(&self) -> &MarkerSet {
        &self.extract.markers
    }

    fn filenames(&self) -> &OutputFilenames {
        &self.load.filenames
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
