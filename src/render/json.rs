//! JSON rendering for extraction results.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;
use crate::model::PdfResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 4-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a result to JSON text. Non-ASCII text is kept as UTF-8.
pub fn to_json(result: &PdfResult, format: JsonFormat) -> Result<String> {
    let bytes = match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
            result.serialize(&mut ser)?;
            buf
        }
        JsonFormat::Compact => serde_json::to_vec(result)?,
    };

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a result as pretty JSON to `path`.
pub fn write_json<P: AsRef<Path>>(result: &PdfResult, path: P) -> Result<()> {
    fs::write(path, to_json(result, JsonFormat::Pretty)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, Table};

    fn sample_result() -> PdfResult {
        let mut metadata = Metadata::new();
        metadata.insert("title", "Café menu");
        metadata.insert("page_count", 1);
        PdfResult {
            metadata,
            paragraphs: vec!["Soup of the day".to_string()],
            tables: vec![Table::from_rows(vec![vec![Some("Soup".to_string()), None]])],
            images: vec![],
        }
    }

    #[test]
    fn test_pretty_uses_four_space_indent() {
        let json = to_json(&sample_result(), JsonFormat::Pretty).unwrap();
        assert!(json.starts_with("{\n    \"metadata\": {\n        \"title\": \"Café menu\""));
        assert!(json.contains("\n    \"images\": []"));
    }

    #[test]
    fn test_compact_has_no_newlines() {
        let json = to_json(&sample_result(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_written_json_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu_data.json");
        let result = sample_result();

        write_json(&result, &path).unwrap();
        let parsed: PdfResult =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, result);
    }
}
