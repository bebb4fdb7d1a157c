//! Per-file and per-folder orchestration.
//!
//! Processing is strictly sequential: one file is fully extracted and
//! written before the next is opened, and the first error ends the run.

mod options;

pub use options::{BatchOptions, REPORT_FILE_NAME};

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::Result;
use crate::extract::{
    extract_images, extract_metadata, extract_paragraphs, extract_tables_with_config,
};
use crate::model::PdfResult;
use crate::parser::TableDetectorConfig;
use crate::render::{generate_csv_report, write_json};

/// What a finished folder run produced.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Results in processing order
    pub results: Vec<PdfResult>,
    /// Where the consolidated report was written
    pub report_path: PathBuf,
}

/// Extract everything from one PDF and write `<stem>_data.json` into
/// `output_dir`.
pub fn process_pdf<P: AsRef<Path>, Q: AsRef<Path>>(path: P, output_dir: Q) -> Result<PdfResult> {
    process_pdf_with_config(path, output_dir, &TableDetectorConfig::default())
}

/// [`process_pdf`] with custom table detector thresholds.
pub fn process_pdf_with_config<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    output_dir: Q,
    table_config: &TableDetectorConfig,
) -> Result<PdfResult> {
    let path = path.as_ref();
    let output_dir = output_dir.as_ref();

    let result = PdfResult {
        metadata: extract_metadata(path)?,
        paragraphs: extract_paragraphs(path)?,
        tables: extract_tables_with_config(path, table_config)?,
        images: extract_images(path, output_dir)?,
    };

    let json_path = output_dir.join(json_file_name(path));
    write_json(&result, &json_path)?;

    log::info!(
        "{}: {} pages, {} tables, {} images -> {}",
        path.display(),
        result.paragraph_count(),
        result.table_count(),
        result.image_count(),
        json_path.display()
    );

    Ok(result)
}

/// Name of the JSON dump for `pdf_path`: `<file stem>_data.json`.
pub fn json_file_name(pdf_path: &Path) -> String {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{}_data.json", stem)
}

/// Whether the file name of `path` contains `filter`, ignoring case.
/// No filter matches everything.
pub fn matches_filter(path: &Path, filter: Option<&str>) -> bool {
    let Some(keyword) = filter else {
        return true;
    };
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_lowercase()
                .contains(&keyword.to_lowercase())
        })
        .unwrap_or(false)
}

/// List the `*.pdf` files directly inside `folder`, sorted by path and
/// narrowed by `filter`.
///
/// The extension match is case-sensitive and hidden files are skipped, as
/// with shell globbing.
pub fn discover_pdfs<P: AsRef<Path>>(folder: P, filter: Option<&str>) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    let pattern = Path::new(&Pattern::escape(&folder.to_string_lossy())).join("*.pdf");
    let match_options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern.to_string_lossy(), match_options)? {
        let path = entry?;
        if path.is_file() && matches_filter(&path, filter) {
            files.push(path);
        }
    }

    log::debug!(
        "{}: {} matching PDF files (filter {:?})",
        folder.display(),
        files.len(),
        filter
    );
    Ok(files)
}

/// Process every matching PDF in `folder` and write the consolidated report.
pub fn process_folder<P: AsRef<Path>>(folder: P, options: &BatchOptions) -> Result<BatchOutcome> {
    process_folder_with(folder, options, |_, _, _| {})
}

/// [`process_folder`], calling `on_file(position, total, path)` before each
/// file is processed. `position` is 1-based.
pub fn process_folder_with<P, F>(
    folder: P,
    options: &BatchOptions,
    mut on_file: F,
) -> Result<BatchOutcome>
where
    P: AsRef<Path>,
    F: FnMut(usize, usize, &Path),
{
    fs::create_dir_all(&options.output_dir)?;

    let files = discover_pdfs(folder, options.filter.as_deref())?;
    let total = files.len();

    let mut results = Vec::with_capacity(total);
    for (i, path) in files.iter().enumerate() {
        on_file(i + 1, total, path);
        results.push(process_pdf_with_config(
            path,
            &options.output_dir,
            &options.table_config,
        )?);
    }

    let report_path = options.report_path();
    generate_csv_report(&results, &report_path)?;
    log::info!("Process completed. Report saved at {}", report_path.display());

    Ok(BatchOutcome {
        results,
        report_path,
    })
}
