//! Run configuration for a batch.

use std::path::PathBuf;

use crate::parser::TableDetectorConfig;

/// File name of the consolidated report inside the output directory.
pub const REPORT_FILE_NAME: &str = "consolidated_report.csv";

/// Options for processing a folder of PDFs.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory receiving JSON dumps, images and the report
    pub output_dir: PathBuf,

    /// Case-insensitive substring a file name must contain
    pub filter: Option<String>,

    /// File name of the CSV report
    pub report_name: String,

    /// Table detector thresholds
    pub table_config: TableDetectorConfig,
}

impl BatchOptions {
    /// Create options writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            filter: None,
            report_name: REPORT_FILE_NAME.to_string(),
            table_config: TableDetectorConfig::default(),
        }
    }

    /// Only process files whose name contains `keyword` (any case).
    pub fn with_filter(mut self, keyword: impl Into<String>) -> Self {
        self.filter = Some(keyword.into());
        self
    }

    /// Set an optional filter, as it comes from the command line.
    pub fn with_optional_filter(mut self, keyword: Option<String>) -> Self {
        self.filter = keyword;
        self
    }

    /// Use a different report file name.
    pub fn with_report_name(mut self, name: impl Into<String>) -> Self {
        self.report_name = name.into();
        self
    }

    /// Use custom table detector thresholds.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Full path of the report file.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_name)
    }
}
