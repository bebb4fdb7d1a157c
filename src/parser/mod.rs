//! PDF reading: document access, positioned text and table detection.

mod backend;
mod document;
mod layout;
mod table_detector;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use document::{PdfDocument, PdfImage};
pub use layout::{extract_page_spans, TextSpan};
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig, TableRowData};
