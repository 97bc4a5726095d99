//! Read-only lookups against the index
//!
//! Both operations open a read-only connection scoped to the call and release
//! it on every exit path. No results are cached; every call re-reads the
//! store.

use crate::error::Result;
use crate::store::{IndexDb, VrsLocation};
use crate::vcf::annotation::GA4GH_VA_PREFIX;
use std::path::Path;

/// Point lookup by VRS allele identifier, single or batch.
///
/// Input identifiers are accepted bare or with the `ga4gh:VA.` prefix;
/// returned identifiers always carry the prefix. Unknown identifiers are
/// simply absent from the result. An empty input set returns empty without
/// touching the store.
pub async fn fetch_by_vrs_ids(vrs_ids: &[String], store_path: &Path) -> Result<Vec<VrsLocation>> {
    if vrs_ids.is_empty() {
        return Ok(Vec::new());
    }

    let digests: Vec<&str> = vrs_ids
        .iter()
        .map(|id| id.strip_prefix(GA4GH_VA_PREFIX).unwrap_or(id))
        .collect();

    let db = IndexDb::open_read_only(store_path).await?;

    let placeholders = vec!["?"; digests.len()].join(", ");
    let sql =
        format!("SELECT vrs_id, chr, pos FROM vrs_locations WHERE vrs_id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, VrsLocation>(&sql);
    for digest in &digests {
        query = query.bind(*digest);
    }

    let rows = query.fetch_all(db.pool()).await;
    db.close().await;

    Ok(rows?.into_iter().map(restore_prefix).collect())
}

/// Range lookup by chromosome and position interval, inclusive on both ends.
///
/// Chromosome matching is exact string equality; the store does not
/// normalize `chr` prefixes. An empty or inverted range returns an empty
/// sequence, never an error.
pub async fn fetch_by_range(
    chrom: &str,
    start: i64,
    end: i64,
    store_path: &Path,
) -> Result<Vec<VrsLocation>> {
    let db = IndexDb::open_read_only(store_path).await?;

    let rows = sqlx::query_as::<_, VrsLocation>(
        "SELECT vrs_id, chr, pos FROM vrs_locations WHERE chr = ? AND pos BETWEEN ? AND ?",
    )
    .bind(chrom)
    .bind(start)
    .bind(end)
    .fetch_all(db.pool())
    .await;
    db.close().await;

    Ok(rows?.into_iter().map(restore_prefix).collect())
}

fn restore_prefix(mut row: VrsLocation) -> VrsLocation {
    row.vrs_id = format!("{GA4GH_VA_PREFIX}{}", row.vrs_id);
    row
}
