//! The four per-file extractors.
//!
//! Each extractor opens the PDF on its own and lets it go before returning;
//! nothing is cached between calls. Metadata, text and images go through
//! [`PdfDocument`], tables through the [`PdfBackend`] seam.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{Metadata, Table};
use crate::parser::{
    extract_page_spans, LopdfBackend, PdfBackend, PdfDocument, TableDetector, TableDetectorConfig,
};

/// Read the document information dictionary and inject `page_count`.
pub fn extract_metadata<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    Ok(PdfDocument::open(path)?.metadata())
}

/// Extract the plain text of each page.
///
/// Despite the name there is no paragraph segmentation: element `i` is the
/// whole text of page `i + 1`.
pub fn extract_paragraphs<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    PdfDocument::open(path)?.page_texts()
}

/// Detect tables on every page with the default detector settings.
pub fn extract_tables<P: AsRef<Path>>(path: P) -> Result<Vec<Table>> {
    extract_tables_with_config(path, &TableDetectorConfig::default())
}

/// Detect tables on every page and flatten them in page order.
pub fn extract_tables_with_config<P: AsRef<Path>>(
    path: P,
    config: &TableDetectorConfig,
) -> Result<Vec<Table>> {
    let backend = LopdfBackend::load_file(path)?;
    tables_from_backend(&backend, config)
}

/// Run span extraction and table detection over every page of `backend`.
pub fn tables_from_backend(
    backend: &dyn PdfBackend,
    config: &TableDetectorConfig,
) -> Result<Vec<Table>> {
    let detector = TableDetector::with_config(config.clone());
    let mut tables = Vec::new();

    for (page_num, page_id) in backend.pages() {
        let spans = extract_page_spans(backend, page_id)?;
        let page_tables = detector.extract_tables(&spans);
        log::debug!(
            "page {}: {} spans, {} tables",
            page_num,
            spans.len(),
            page_tables.len()
        );
        tables.extend(page_tables);
    }

    Ok(tables)
}

/// Write every embedded image into `output_dir` and return the written paths.
///
/// Bytes are written exactly as stored in the PDF under a `.png` name,
/// whatever their real encoding. `output_dir` must already exist.
pub fn extract_images<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    output_dir: Q,
) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let output_dir = output_dir.as_ref();
    let doc = PdfDocument::open(path)?;

    let mut written = Vec::new();
    for image in doc.images()? {
        let image_path = output_dir.join(image_file_name(path, image.page, image.index));
        fs::write(&image_path, &image.data)?;
        log::debug!(
            "wrote {} ({}x{}, {} bytes, filter {:?})",
            image_path.display(),
            image.width.unwrap_or(0),
            image.height.unwrap_or(0),
            image.data.len(),
            image.filter
        );
        written.push(image_path);
    }

    Ok(written)
}

/// Output file name for an image: `<pdf file name>_img<page>_<index>.png`.
///
/// `page` and `index` are 1-based. The PDF's full file name, extension
/// included, is the prefix.
pub fn image_file_name(pdf_path: &Path, page: u32, index: usize) -> String {
    let file_name = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    format!("{}_img{}_{}.png", file_name, page, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_name_keeps_extension() {
        let name = image_file_name(Path::new("/data/in/report.pdf"), 2, 3);
        assert_eq!(name, "report.pdf_img2_3.png");
    }

    #[test]
    fn test_image_file_names_are_distinct_per_slot() {
        let path = Path::new("scan.pdf");
        let names: std::collections::HashSet<_> = (1..=3)
            .flat_map(|page| (1..=4).map(move |index| image_file_name(path, page, index)))
            .collect();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_extractors_fail_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");

        assert!(extract_metadata(&missing).is_err());
        assert!(extract_paragraphs(&missing).is_err());
        assert!(extract_tables(&missing).is_err());
        assert!(extract_images(&missing, dir.path()).is_err());
    }
}
