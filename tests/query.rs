//! Query-engine scenarios against an ingested store

mod common;

use common::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use vrsix::{fetch_by_range, fetch_by_vrs_ids, load_vcf, Error};

async fn ingested_store(dir: &tempfile::TempDir) -> PathBuf {
    let input = dir.path().join("input.vcf");
    let store = dir.path().join("index.db");
    write_plain(&input, &current_vcf_text());
    load_vcf(&input, &store, None).await.unwrap();
    store
}

#[tokio::test]
async fn fetch_by_id_round_trips_the_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let store = ingested_store(&dir).await;

    let bare = fetch_by_vrs_ids(&[DIGESTS[0].to_string()], &store)
        .await
        .unwrap();
    let prefixed = fetch_by_vrs_ids(&[format!("ga4gh:VA.{}", DIGESTS[0])], &store)
        .await
        .unwrap();

    assert_eq!(bare, prefixed);
    assert_eq!(bare.len(), 1);
    assert_eq!(bare[0].vrs_id, format!("ga4gh:VA.{}", DIGESTS[0]));
    assert_eq!(bare[0].chr, "1");
    assert_eq!(bare[0].pos, 783006);
}

#[tokio::test]
async fn fetch_by_id_batch() {
    let dir = tempfile::tempdir().unwrap();
    let store = ingested_store(&dir).await;

    let ids = vec![
        format!("ga4gh:VA.{}", DIGESTS[0]),
        DIGESTS[4].to_string(),
        DIGESTS[9].to_string(),
    ];
    let mut rows = fetch_by_vrs_ids(&ids, &store).await.unwrap();
    rows.sort_by(|a, b| a.pos.cmp(&b.pos));

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].pos, 783006);
    assert_eq!(rows[1].pos, 784860);
    assert_eq!(rows[2].pos, 797392);
    assert!(rows.iter().all(|r| r.vrs_id.starts_with("ga4gh:VA.")));
}

#[tokio::test]
async fn unknown_identifier_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ingested_store(&dir).await;

    let rows = fetch_by_vrs_ids(&["not-a-real-id".to_string()], &store)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn empty_input_never_touches_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("nonexistent.db");

    let rows = fetch_by_vrs_ids(&[], &store).await.unwrap();
    assert!(rows.is_empty());
    assert!(!store.exists());
}

#[tokio::test]
async fn range_is_inclusive_on_both_ends() {
    let dir = tempfile::tempdir().unwrap();
    let store = ingested_store(&dir).await;

    let rows = fetch_by_range("1", 783000, 783200, &store).await.unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.pos == 783006 || r.pos == 783175));

    let at_boundary = fetch_by_range("1", 783175, 783175, &store).await.unwrap();
    assert_eq!(at_boundary.len(), 2);

    let past_boundary = fetch_by_range("1", 783176, 783176, &store).await.unwrap();
    assert!(past_boundary.is_empty());
}

#[tokio::test]
async fn inverted_range_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ingested_store(&dir).await;

    let rows = fetch_by_range("1", 800000, 700000, &store).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn chromosome_matching_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let store = ingested_store(&dir).await;

    let rows = fetch_by_range("chr1", 783000, 800000, &store).await.unwrap();
    assert!(rows.is_empty());

    let rows = fetch_by_range("2", 783000, 800000, &store).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn queries_reject_a_mismatched_store_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("wrong_schema.db");

    // A valid SQLite file with a divergent layout, holding a row a naive
    // read would happily return
    let options = SqliteConnectOptions::new()
        .filename(&store)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE vrs_locations (vrs_id TEXT PRIMARY KEY, chr TEXT, pos INTEGER)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO vrs_locations (vrs_id, chr, pos) VALUES ('stale-digest', '1', 783006)")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let err = fetch_by_range("1", 780000, 790000, &store).await.unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }), "got {err:?}");

    let err = fetch_by_vrs_ids(&["stale-digest".to_string()], &store)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }), "got {err:?}");
}

#[tokio::test]
async fn queries_reject_a_non_sqlite_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("not_a_db.db");
    write_plain(&store, "this is just a text file, not a database\n");

    let err = fetch_by_range("1", 780000, 790000, &store).await.unwrap_err();
    assert!(matches!(err, Error::StoreFile(_)), "got {err:?}");

    let err = fetch_by_vrs_ids(&[DIGESTS[0].to_string()], &store)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StoreFile(_)), "got {err:?}");
}

#[tokio::test]
async fn reingest_then_query_counts_stay_stable() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.vcf");
    let store = dir.path().join("index.db");
    write_plain(&input, &current_vcf_text());

    load_vcf(&input, &store, None).await.unwrap();
    load_vcf(&input, &store, None).await.unwrap();

    let rows = fetch_by_range("1", 780000, 800000, &store).await.unwrap();
    assert_eq!(rows.len(), 10);
}
