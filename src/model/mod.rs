//! Data model for extraction results.
//!
//! A [`PdfResult`] is what one input file turns into: the metadata map, one
//! text block per page, the detected tables and the paths of the images
//! written to disk. It is serialized as the per-file JSON dump and reduced
//! into a row of the consolidated report.

mod metadata;
mod result;
mod table;

pub use metadata::{Metadata, PAGE_COUNT_KEY, TITLE_KEY};
pub use result::PdfResult;
pub use table::{Table, TableRow};
