//! VCF container handling
//!
//! Decodes the byte stream of a VCF file into an async record stream,
//! transparently handling plain text, standard gzip, and BGZF compression.
//! The compression format is detected from the file header, not the
//! extension; the extension only decides whether an undecodable header is a
//! container-format error or plain text.

pub mod annotation;

use crate::error::{Error, Result};
use async_compression::tokio::bufread::GzipDecoder;
use noodles_bgzf as bgzf;
use noodles_vcf as vcf;
use std::ffi::OsStr;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncReadExt, AsyncSeekExt, BufReader};
use tracing::debug;

/// Async VCF reader over any supported container encoding
pub type RecordReader = vcf::r#async::io::Reader<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Container encodings recognized by header sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Bgzf,
    Gzip,
    Plain,
}

/// Verify that the path carries a recognized variant-call extension.
/// Checked before any store interaction.
pub fn check_extension(path: &Path) -> Result<()> {
    let ext = path.extension().and_then(OsStr::to_str);
    match ext {
        Some("vcf") | Some("gz") | Some("bgz") => Ok(()),
        _ => Err(Error::UnsupportedFiletype {
            path: path.to_path_buf(),
            ext: ext.map(String::from),
        }),
    }
}

/// Sniff the container encoding from the first bytes of the stream.
///
/// A BGZF member is a gzip member with the FEXTRA flag set and a "BC" extra
/// subfield; anything else with the gzip magic is treated as standard gzip.
pub fn sniff_compression(header: &[u8]) -> Compression {
    if header.len() < 2 || header[0] != 0x1f || header[1] != 0x8b {
        return Compression::Plain;
    }
    if header.len() >= 14 && header[3] & 0x04 != 0 && header[12] == b'B' && header[13] == b'C' {
        return Compression::Bgzf;
    }
    Compression::Gzip
}

fn named_compressed(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("gz") | Some("bgz")
    )
}

async fn read_header_bytes(file: &mut File, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Open a VCF file as a lazy, single-pass async record reader.
///
/// Fails with [`Error::InvalidBgzf`] when the path is named as compressed
/// but the header is not a gzip-compatible stream at all.
pub async fn open_vcf(path: &Path) -> Result<RecordReader> {
    let mut file = File::open(path).await?;

    let mut header = [0u8; 16];
    let n = read_header_bytes(&mut file, &mut header).await?;
    file.seek(SeekFrom::Start(0)).await?;

    let compression = sniff_compression(&header[..n]);
    debug!("Detected {:?} encoding for {:?}", compression, path);

    let inner: Box<dyn AsyncBufRead + Unpin + Send> = match compression {
        Compression::Bgzf => Box::new(bgzf::r#async::io::Reader::new(file)),
        Compression::Gzip => Box::new(BufReader::new(GzipDecoder::new(BufReader::new(file)))),
        Compression::Plain if named_compressed(path) => {
            return Err(Error::InvalidBgzf(path.to_path_buf()));
        }
        Compression::Plain => Box::new(BufReader::new(file)),
    };

    Ok(vcf::r#async::io::Reader::new(inner))
}
