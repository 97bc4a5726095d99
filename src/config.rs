//! Store-location resolution
//!
//! The core engine always receives an explicit store path; these helpers let
//! the CLI layer compute the default before calling in.

use std::path::{Path, PathBuf};

/// Environment variable naming an override for the default store location
pub const STORE_ENV_VAR: &str = "VRS_VCF_INDEX";

/// File name used when the caller points at a directory
pub const DEFAULT_STORE_FILENAME: &str = "vrs_vcf_index.db";

/// Default store path: `$VRS_VCF_INDEX` if set, otherwise
/// `<local data dir>/vrsix/vrs_vcf_index.db`
pub fn default_store_path() -> PathBuf {
    if let Ok(path) = std::env::var(STORE_ENV_VAR) {
        return PathBuf::from(path);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vrsix")
        .join(DEFAULT_STORE_FILENAME)
}

/// Resolve a user-supplied `--db-location` argument: a directory maps to
/// `<dir>/vrs_vcf_index.db`, a file path is used as-is, and `None` falls back
/// to [`default_store_path`].
pub fn resolve_store_path(db_location: Option<&Path>) -> PathBuf {
    match db_location {
        Some(path) if path.is_dir() => path.join(DEFAULT_STORE_FILENAME),
        Some(path) => path.to_path_buf(),
        None => default_store_path(),
    }
}
