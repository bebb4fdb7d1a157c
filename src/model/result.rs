//! Per-file extraction result.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Metadata, Table};

/// Everything extracted from a single PDF file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfResult {
    /// Document information dictionary plus `page_count`
    pub metadata: Metadata,

    /// Full text of each page, in page order
    pub paragraphs: Vec<String>,

    /// Tables from all pages, flattened in page order
    pub tables: Vec<Table>,

    /// Paths of the image files written for this document
    pub images: Vec<PathBuf>,
}

impl PdfResult {
    /// Number of detected tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of page text blocks (one per page).
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Number of extracted images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}
