use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration errors. Every variant is reported before any row is
/// processed; per-row synthesis failures are handled inside the pipeline and
/// never surface here.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("unsupported file extension '{0}' (supported: .csv, .xlsx, .xls)")]
    UnsupportedExtension(String),

    #[error("column '{0}' not found in spreadsheet")]
    ColumnNotFound(String),

    #[error("column index {index} out of range (spreadsheet has {count} columns)")]
    ColumnIndexOutOfRange { index: usize, count: usize },

    #[error("the 'say' backend is only available on macOS")]
    UnsupportedPlatform,

    #[error("the azure backend requires a subscription key and region")]
    MissingAzureCredentials,
}
