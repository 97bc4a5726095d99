//! Shared fixtures for integration tests

#![allow(dead_code)]

use noodles_bgzf as bgzf;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::io::Write;
use std::path::Path;

/// Ten single-allele records spanning chromosome 1
pub const DIGESTS: [&str; 10] = [
    "dwwiZdvVtfAmomu0OBsiHue1O-bw5SpG",
    "MiasxyXMXtOpsZgGelL3c4QgtflCNLHD",
    "5cY2k53xdW7WeHw2WG1HA7jl50iH-r9p",
    "jHaXepIvlbnapfPtH_62y-Qm81hCrBYn",
    "-NGsjBEx0UbPF3uYjStZ_2r-m2LbUtUB",
    "HLinVo6Q-i-PryQOiq8QAtOeC9oQ9Q3p",
    "qdyeeiC3cLfXeT23zxT9-qlJNN64MKVB",
    "cNWXR3OLq9D3L19vQFvbHw-aH0vlA5cN",
    "DVMcfA37Llc9QUOA0XfLJbJ-agKyGpGo",
    "OTiBHLE2WW93M4-4zGVrWSqP2GBj8-qM",
];

pub const POSITIONS: [i64; 10] = [
    783006, 783006, 783175, 783175, 784860, 784860, 785417, 785417, 797392, 797392,
];

pub const REFS: [&str; 10] = ["A", "A", "T", "T", "T", "T", "G", "G", "G", "G"];
pub const STATES: [&str; 10] = ["A", "G", "T", "C", "T", "C", "G", "A", "G", "A"];

const COLUMN_HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO";

fn info_definitions(coordinate_type: &str) -> String {
    format!(
        "##INFO=<ID=VRS_Allele_IDs,Number=.,Type=String,Description=\"GA4GH VRS allele IDs\">\n\
         ##INFO=<ID=VRS_Starts,Number=.,Type={coordinate_type},Description=\"VRS interval starts\">\n\
         ##INFO=<ID=VRS_Ends,Number=.,Type={coordinate_type},Description=\"VRS interval ends\">\n\
         ##INFO=<ID=VRS_States,Number=.,Type=String,Description=\"VRS allele states\">"
    )
}

fn records() -> String {
    (0..10)
        .map(|i| {
            format!(
                "1\t{pos}\t.\t{reference}\t{alt}\t.\t.\tVRS_Allele_IDs=ga4gh:VA.{digest};VRS_Starts={start};VRS_Ends={end};VRS_States={state}",
                pos = POSITIONS[i],
                reference = REFS[i],
                alt = STATES[i],
                digest = DIGESTS[i],
                start = POSITIONS[i] - 1,
                end = POSITIONS[i],
                state = STATES[i],
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Current annotation layout: integer coordinates, producer metadata present
pub fn current_vcf_text() -> String {
    format!(
        "##fileformat=VCFv4.2\n\
         ##VRS_Python_version=2.0.1\n\
         ##VRS_Schema_version=2.1.1\n\
         {}\n{}\n{}\n",
        info_definitions("Integer"),
        COLUMN_HEADER,
        records()
    )
}

/// Legacy annotation layout: string coordinates, no producer metadata
pub fn legacy_vcf_text() -> String {
    format!(
        "##fileformat=VCFv4.2\n{}\n{}\n{}\n",
        info_definitions("String"),
        COLUMN_HEADER,
        records()
    )
}

pub fn write_plain(path: &Path, text: &str) {
    std::fs::write(path, text).unwrap();
}

pub fn write_bgzf(path: &Path, text: &str) {
    let mut writer = bgzf::io::Writer::new(std::fs::File::create(path).unwrap());
    writer.write_all(text.as_bytes()).unwrap();
    writer.finish().unwrap();
}

pub fn write_gzip(path: &Path, text: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

/// Raw pool for asserting directly against store contents
pub async fn raw_pool(store: &Path) -> SqlitePool {
    let options = SqliteConnectOptions::new().filename(store).read_only(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap()
}

pub async fn table_count(store: &Path, table: &str) -> i64 {
    let pool = raw_pool(store).await;
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&pool)
        .await
        .unwrap();
    pool.close().await;
    count
}
