//! SQLite schema definition
//!
//! The layout version is recorded through `PRAGMA user_version` at creation
//! time and checked, together with the actual table layout, on every open.

/// Layout version stamped into `PRAGMA user_version` at store creation
pub const SCHEMA_VERSION: i64 = 1;

/// SQL schema for the variant-location index
pub const SCHEMA_SQL: &str = r#"
-- File URIs: one provenance row per ingested file
CREATE TABLE IF NOT EXISTS file_uris (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uri TEXT NOT NULL UNIQUE,
    producer_tool_version TEXT,
    annotation_schema_version TEXT
);

-- VRS locations: one row per (VRS identifier, allele) observation
CREATE TABLE IF NOT EXISTS vrs_locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vrs_id TEXT NOT NULL,
    chr TEXT NOT NULL,
    pos INTEGER NOT NULL,
    ref_start INTEGER,
    ref_end INTEGER,
    ref_allele TEXT,
    alt_allele TEXT,
    file_uri_id INTEGER NOT NULL REFERENCES file_uris(id)
);

-- Indexes for the two query shapes
CREATE INDEX IF NOT EXISTS idx_vrs_locations_vrs_id ON vrs_locations(vrs_id);
CREATE INDEX IF NOT EXISTS idx_vrs_locations_chr_pos ON vrs_locations(chr, pos);
"#;

/// Expected table layout, alphabetical by table name to match
/// `sqlite_master` enumeration order
pub const EXPECTED_TABLES: &[(&str, &[&str])] = &[
    (
        "file_uris",
        &["id", "uri", "producer_tool_version", "annotation_schema_version"],
    ),
    (
        "vrs_locations",
        &[
            "id",
            "vrs_id",
            "chr",
            "pos",
            "ref_start",
            "ref_end",
            "ref_allele",
            "alt_allele",
            "file_uri_id",
        ],
    ),
];

/// Render a layout as a single comparable, human-readable line
pub fn layout_description(version: i64, tables: &[(String, Vec<String>)]) -> String {
    let tables = tables
        .iter()
        .map(|(name, columns)| format!("{}({})", name, columns.join(", ")))
        .collect::<Vec<_>>()
        .join("; ");
    format!("user_version={version}; {tables}")
}

/// The layout this library expects to find in an existing store
pub fn expected_layout() -> String {
    let tables = EXPECTED_TABLES
        .iter()
        .map(|(name, columns)| {
            (
                name.to_string(),
                columns.iter().map(|c| c.to_string()).collect(),
            )
        })
        .collect::<Vec<_>>();
    layout_description(SCHEMA_VERSION, &tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_layout_is_stable() {
        let layout = expected_layout();
        assert!(layout.starts_with("user_version=1; file_uris(id, uri"));
        assert!(layout.contains("vrs_locations(id, vrs_id, chr, pos"));
    }
}
