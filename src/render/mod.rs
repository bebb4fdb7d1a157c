//! Output writers: the per-file JSON dump and the consolidated CSV report.

mod json;
mod report;

pub use json::{to_json, write_json, JsonFormat};
pub use report::{generate_csv_report, write_report, ReportRow};
