//! Transactional VCF ingestion
//!
//! One atomic transaction per file: the provenance row and every extracted
//! entry either all commit or none do. Re-ingesting a file with the same
//! source URI supersedes the earlier provenance row and its entries instead
//! of duplicating them, so repeat loads leave row counts unchanged.

use crate::error::{Error, Result};
use crate::store::IndexDb;
use crate::vcf::annotation::{extract_annotations, extract_file_meta};
use crate::vcf::{check_extension, open_vcf};
use futures::TryStreamExt;
use std::path::Path;
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// Ingest one VRS-annotated VCF into the store at `store_path`.
///
/// `source_uri` overrides the recorded provenance URI; by default the file's
/// resolved filesystem path is recorded as a `file://` URI. Returns the
/// number of variant rows written.
pub async fn load_vcf(
    vcf_path: &Path,
    store_path: &Path,
    source_uri: Option<&str>,
) -> Result<u64> {
    let start = Instant::now();

    // Input checks come before any store interaction
    if !vcf_path.is_file() {
        return Err(Error::InputNotFound(vcf_path.to_path_buf()));
    }
    check_extension(vcf_path)?;

    let uri = match source_uri {
        Some(uri) => uri.to_string(),
        None => file_uri(vcf_path).await?,
    };

    let db = IndexDb::open_or_create(store_path).await?;

    let mut reader = open_vcf(vcf_path).await?;
    let header = reader
        .read_header()
        .await
        .map_err(|e| Error::VcfParse(format!("invalid VCF header: {e}")))?;
    let meta = extract_file_meta(&header);

    let mut tx = db.pool().begin().await?;

    // Supersede any earlier ingest of the same source
    let prior: Option<(i64,)> = sqlx::query_as("SELECT id FROM file_uris WHERE uri = ?")
        .bind(&uri)
        .fetch_optional(&mut *tx)
        .await?;
    if let Some((prior_id,)) = prior {
        debug!("Superseding prior ingest of {uri}");
        sqlx::query("DELETE FROM vrs_locations WHERE file_uri_id = ?")
            .bind(prior_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM file_uris WHERE id = ?")
            .bind(prior_id)
            .execute(&mut *tx)
            .await?;
    }

    let file_uri_id = sqlx::query(
        "INSERT INTO file_uris (uri, producer_tool_version, annotation_schema_version)
         VALUES (?, ?, ?)",
    )
    .bind(&uri)
    .bind(&meta.producer_tool_version)
    .bind(&meta.annotation_schema_version)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let mut records = reader.records();
    let mut count = 0u64;
    while let Some(record) = records
        .try_next()
        .await
        .map_err(|e| Error::VcfParse(format!("invalid VCF record: {e}")))?
    {
        for entry in extract_annotations(&record, &header)? {
            sqlx::query(
                "INSERT INTO vrs_locations
                 (vrs_id, chr, pos, ref_start, ref_end, ref_allele, alt_allele, file_uri_id)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&entry.vrs_id)
            .bind(&entry.chr)
            .bind(entry.pos)
            .bind(entry.start)
            .bind(entry.end)
            .bind(&entry.reference)
            .bind(&entry.alternate)
            .bind(file_uri_id)
            .execute(&mut *tx)
            .await?;
            count += 1;
        }
    }

    tx.commit().await?;

    info!(
        "Indexed {} entries from {} in {:.2?}",
        count,
        vcf_path.display(),
        start.elapsed()
    );
    Ok(count)
}

/// Express the resolved filesystem path as a `file://` URI
async fn file_uri(path: &Path) -> Result<String> {
    let resolved = fs::canonicalize(path).await?;
    Url::from_file_path(&resolved)
        .map(String::from)
        .map_err(|()| {
            Error::Io(std::io::Error::other(format!(
                "cannot express {} as a file URI",
                resolved.display()
            )))
        })
}
