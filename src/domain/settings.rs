use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do when a listing card has a field that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Skip the card, keep going, and report it alongside the outputs.
    #[default]
    Skip,
    /// Abort the whole run on the first malformed card.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    Csv,
    EncodedCsv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Csv, OutputFormat::EncodedCsv];

    /// Requested formats in first-mention order, each once; all formats when none are named.
    pub fn selection(requested: &[OutputFormat]) -> Vec<OutputFormat> {
        if requested.is_empty() {
            return Self::ALL.to_vec();
        }
        let mut formats = Vec::with_capacity(requested.len());
        for format in requested {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
        formats
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::EncodedCsv => "encoded-csv",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFilenames {
    pub json: String,
    pub csv: String,
    pub encoded_csv: String,
    pub failures: String,
}

impl Default for OutputFilenames {
    fn default() -> Self {
        Self {
            json: "house-data.json".to_string(),
            csv: "house-data.csv".to_string(),
            encoded_csv: "encoded-house-data.csv".to_string(),
            failures: "extraction-errors.json".to_string(),
        }
    }
}

/// Pages read when no input files are configured.
pub fn default_input_files() -> Vec<String> {
    (1..=9).map(|n| format!("rm-pg{}.html", n)).collect()
}
