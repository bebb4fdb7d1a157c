//! Consolidated CSV report.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{PdfResult, TITLE_KEY};

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// The document title from the metadata, not the file name
    #[serde(rename = "File Name")]
    pub file_name: String,
    #[serde(rename = "Number of Tables")]
    pub table_count: usize,
    #[serde(rename = "Number of Paragraphs")]
    pub paragraph_count: usize,
    #[serde(rename = "Number of Images")]
    pub image_count: usize,
}

impl ReportRow {
    /// Column headers, in output order.
    pub const HEADERS: [&'static str; 4] = [
        "File Name",
        "Number of Tables",
        "Number of Paragraphs",
        "Number of Images",
    ];

    /// Reduce a result to its report row.
    ///
    /// Fails with [`Error::MissingMetadata`] when the metadata has no
    /// `title` key at all. A null title becomes an empty cell.
    pub fn from_result(result: &PdfResult) -> Result<Self> {
        let file_name = match result.metadata.get(TITLE_KEY) {
            None => return Err(Error::MissingMetadata(TITLE_KEY.to_string())),
            Some(Value::String(title)) => title.clone(),
            Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };

        Ok(Self {
            file_name,
            table_count: result.table_count(),
            paragraph_count: result.paragraph_count(),
            image_count: result.image_count(),
        })
    }
}

/// Write the report for `results` to `writer`.
///
/// The header row is always written, even when there are no results.
pub fn write_report<W: Write>(results: &[PdfResult], writer: W) -> Result<()> {
    let rows = results
        .iter()
        .map(ReportRow::from_result)
        .collect::<Result<Vec<_>>>()?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(ReportRow::HEADERS)?;
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Write the report for `results` to the file at `path`.
pub fn generate_csv_report<P: AsRef<Path>>(results: &[PdfResult], path: P) -> Result<()> {
    let file = File::create(path)?;
    write_report(results, file)
}
