//! VRS annotation extraction
//!
//! Pulls VRS INFO fields out of a variant record in a single pass over the
//! annotation block. Two historical annotation layouts are supported,
//! selected by probing the shape of the values actually present rather than
//! by a version flag: the current layout carries coordinates as integers,
//! the legacy layout carries them as strings (or not at all) and has no
//! tool-version metadata in the header.

use crate::error::{Error, Result};
use noodles_vcf::{
    self as vcf,
    header::record::value::Collection,
    variant::record::info::field::{value::Array as InfoArray, Value as InfoValue},
};
use tracing::trace;

/// Namespace prefix applied to VRS allele identifiers at the boundary
pub const GA4GH_VA_PREFIX: &str = "ga4gh:VA.";

/// INFO key holding the VRS allele identifiers
pub const VRS_IDS_KEY: &str = "VRS_Allele_IDs";
/// INFO key holding the zero-based interval starts
pub const VRS_STARTS_KEY: &str = "VRS_Starts";
/// INFO key holding the zero-based interval ends
pub const VRS_ENDS_KEY: &str = "VRS_Ends";
/// INFO key holding the allele states
pub const VRS_STATES_KEY: &str = "VRS_States";

/// Header meta line naming the annotation producer version
pub const PRODUCER_VERSION_KEY: &str = "VRS_Python_version";
/// Header meta line naming the annotation schema version
pub const SCHEMA_VERSION_KEY: &str = "VRS_Schema_version";

/// One extracted (VRS identifier, allele) entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrsAnnotation {
    /// Allele digest with the `ga4gh:VA.` prefix stripped
    pub vrs_id: String,
    /// Chromosome label verbatim from the source record
    pub chr: String,
    /// 1-based VCF position
    pub pos: i64,
    /// 0-based interval start, when the annotation schema provides it
    pub start: Option<i64>,
    /// 0-based interval end
    pub end: Option<i64>,
    /// Reference allele from the record's REF column
    pub reference: Option<String>,
    /// Allele state from the parallel VRS_States entry
    pub alternate: Option<String>,
}

/// Provenance metadata extractable from the file header; absent for
/// legacy inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMeta {
    pub producer_tool_version: Option<String>,
    pub annotation_schema_version: Option<String>,
}

/// Harvest annotation-producer metadata from the VCF header
pub fn extract_file_meta(header: &vcf::Header) -> FileMeta {
    FileMeta {
        producer_tool_version: other_record_value(header, PRODUCER_VERSION_KEY),
        annotation_schema_version: other_record_value(header, SCHEMA_VERSION_KEY),
    }
}

fn other_record_value(header: &vcf::Header, key: &str) -> Option<String> {
    header
        .other_records()
        .iter()
        .find(|(k, _)| k.as_ref() == key)
        .and_then(|(_, collection)| match collection {
            Collection::Unstructured(values) => values.first().cloned(),
            Collection::Structured(_) => None,
        })
}

/// Extract zero or more VRS entries from one variant record.
///
/// Records without a `VRS_Allele_IDs` INFO field yield no entries and are
/// skipped; a record that carries the field but whose annotation sub-fields
/// are structurally invalid is a parse error, which aborts the whole-file
/// ingest.
pub fn extract_annotations(
    record: &vcf::Record,
    header: &vcf::Header,
) -> Result<Vec<VrsAnnotation>> {
    let info = record.info();

    let mut ids: Option<Vec<Option<String>>> = None;
    let mut starts: Option<Vec<Option<i64>>> = None;
    let mut ends: Option<Vec<Option<i64>>> = None;
    let mut states: Option<Vec<Option<String>>> = None;

    for result in info.iter(header) {
        let (key, value) =
            result.map_err(|e| Error::VcfParse(format!("malformed INFO field: {e}")))?;
        match key {
            VRS_IDS_KEY => ids = Some(string_values(key, value)?),
            VRS_STARTS_KEY => starts = Some(integer_values(key, value)?),
            VRS_ENDS_KEY => ends = Some(integer_values(key, value)?),
            VRS_STATES_KEY => states = Some(string_values(key, value)?),
            _ => {}
        }
    }

    let chrom = record.reference_sequence_name();

    let Some(ids) = ids else {
        trace!("No VRS annotation on record at {}; skipping", chrom);
        return Ok(Vec::new());
    };

    let pos = record
        .variant_start()
        .ok_or_else(|| Error::VcfParse(format!("record on {chrom} has no position")))?
        .map_err(|e| Error::VcfParse(format!("invalid position on {chrom}: {e}")))?
        .get() as i64;

    let reference = record.reference_bases().to_string();

    let mut entries = Vec::with_capacity(ids.len());
    for (i, id) in ids.into_iter().enumerate() {
        let Some(id) = id else { continue };
        if id.is_empty() {
            continue;
        }
        let digest = id.strip_prefix(GA4GH_VA_PREFIX).unwrap_or(&id).to_string();
        entries.push(VrsAnnotation {
            vrs_id: digest,
            chr: chrom.to_string(),
            pos,
            start: element(&starts, i),
            end: element(&ends, i),
            reference: Some(reference.clone()),
            alternate: element(&states, i),
        });
    }
    Ok(entries)
}

fn element<T: Clone>(values: &Option<Vec<Option<T>>>, i: usize) -> Option<T> {
    values.as_ref().and_then(|v| v.get(i).cloned().flatten())
}

/// Accept a string value whether encoded as a scalar or an array
fn string_values(key: &str, value: Option<InfoValue<'_>>) -> Result<Vec<Option<String>>> {
    match value {
        Some(InfoValue::String(s)) => Ok(vec![Some(s.to_string())]),
        Some(InfoValue::Array(InfoArray::String(values))) => values
            .iter()
            .map(|v| {
                v.map(|opt| opt.map(|cow| cow.to_string()))
                    .map_err(|e| malformed(key, &e))
            })
            .collect(),
        Some(other) => Err(Error::VcfParse(format!(
            "expected string value(s) for {key}, found {other:?}"
        ))),
        None => Err(Error::VcfParse(format!("{key} carries no value"))),
    }
}

/// Accept a numeric coordinate whether encoded as an integer or an
/// integer-valued string, scalar or array
fn integer_values(key: &str, value: Option<InfoValue<'_>>) -> Result<Vec<Option<i64>>> {
    match value {
        Some(InfoValue::Integer(v)) => Ok(vec![Some(i64::from(v))]),
        Some(InfoValue::String(s)) => Ok(vec![Some(parse_coordinate(key, &s)?)]),
        Some(InfoValue::Array(InfoArray::Integer(values))) => values
            .iter()
            .map(|v| {
                v.map(|opt| opt.map(i64::from))
                    .map_err(|e| malformed(key, &e))
            })
            .collect(),
        Some(InfoValue::Array(InfoArray::String(values))) => values
            .iter()
            .map(|v| match v.map_err(|e| malformed(key, &e))? {
                Some(cow) => Ok(Some(parse_coordinate(key, &cow)?)),
                None => Ok(None),
            })
            .collect(),
        Some(other) => Err(Error::VcfParse(format!(
            "expected integer value(s) for {key}, found {other:?}"
        ))),
        None => Err(Error::VcfParse(format!("{key} carries no value"))),
    }
}

fn parse_coordinate(key: &str, raw: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| {
        Error::VcfParse(format!("unable to parse {key} value {raw:?} as an integer"))
    })
}

fn malformed(key: &str, e: &std::io::Error) -> Error {
    Error::VcfParse(format!("malformed {key} entry: {e}"))
}
