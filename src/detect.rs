//! PDF header sniffing.
//!
//! Files are checked for the `%PDF-x.y` marker before they are handed to
//! lopdf, so that a stray non-PDF file with a `.pdf` extension fails with a
//! clear error instead of a parser message.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header information read from the start of a PDF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// Version declared in the header (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;
const HEADER_PROBE_LEN: u64 = 16;

/// Read and validate the header of the file at `path`.
///
/// Files shorter than the header are reported as [`Error::UnknownFormat`].
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut header = Vec::with_capacity(HEADER_PROBE_LEN as usize);
    File::open(path)?
        .take(HEADER_PROBE_LEN)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Validate a PDF header held in memory.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfHeader> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    let version_bytes = rest.get(..VERSION_LEN).ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_supported_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version })
}

/// Versions 1.0 through 1.9 and 2.0.
fn is_supported_version(version: &str) -> bool {
    match version.as_bytes() {
        [b'1', b'.', minor] => minor.is_ascii_digit(),
        [b'2', b'.', b'0'] => true,
        _ => false,
    }
}
