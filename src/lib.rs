//! # pdfbatch
//!
//! Batch extraction of PDF content for reporting.
//!
//! Every PDF in a folder is turned into a JSON dump holding its metadata,
//! the text of each page, the tables found on its pages and the paths of
//! its embedded images (written next to the dump). A consolidated CSV
//! report with one row per file closes the run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfbatch::{process_folder, BatchOptions};
//!
//! fn main() -> pdfbatch::Result<()> {
//!     let options = BatchOptions::new("out").with_filter("invoice");
//!     let outcome = process_folder("incoming", &options)?;
//!     println!("{} files, report at {}", outcome.results.len(), outcome.report_path.display());
//!     Ok(())
//! }
//! ```
//!
//! Single files can be handled with [`process_pdf`], and each extractor is
//! available on its own in [`extract`].

pub mod batch;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

pub use batch::{
    discover_pdfs, json_file_name, matches_filter, process_folder, process_folder_with,
    process_pdf, process_pdf_with_config, BatchOptions, BatchOutcome, REPORT_FILE_NAME,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, PdfHeader};
pub use error::{Error, Result};
pub use extract::{
    extract_images, extract_metadata, extract_paragraphs, extract_tables,
    extract_tables_with_config, image_file_name,
};
pub use model::{Metadata, PdfResult, Table, TableRow};
pub use parser::{TableDetector, TableDetectorConfig};
pub use render::{generate_csv_report, to_json, write_json, JsonFormat, ReportRow};
