//! Custom error types for vrsix

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vrsix operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Unsupported file extension {ext:?} for {path}: expected .vcf, .vcf.gz, or .vcf.bgz")]
    UnsupportedFiletype { path: PathBuf, ext: Option<String> },

    #[error("Invalid BGZF header in {0}: not a gzip-compatible stream")]
    InvalidBgzf(PathBuf),

    #[error("VCF parse error: {0}")]
    VcfParse(String),

    #[error("Unable to open store file {0}: not a valid SQLite database")]
    StoreFile(PathBuf),

    #[error(
        "Found schema mismatch between vrsix library and {path}: expected {expected}, found {found}"
    )]
    SchemaMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for vrsix
pub type Result<T> = std::result::Result<T, Error>;
