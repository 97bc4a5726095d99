//! vrsix: index GA4GH VRS-annotated VCFs into a local, queryable store
//!
//! The ingestion engine reads a (possibly compressed) VCF, extracts VRS
//! annotations across historical annotation layouts, and writes them into a
//! versioned SQLite store under transactional, idempotent semantics. The
//! query engine resolves VRS identifiers or chromosome/position ranges back
//! to the originating file coordinates without re-parsing source VCFs.

pub mod config;
pub mod error;
pub mod ingest;
pub mod query;
pub mod store;
pub mod vcf;

pub use error::{Error, Result};
pub use ingest::load_vcf;
pub use query::{fetch_by_range, fetch_by_vrs_ids};
pub use store::VrsLocation;
