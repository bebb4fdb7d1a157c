//! Table detection using text position analysis (stream mode).
//!
//! Tables are found from text alignment alone, without ruling lines: spans
//! are grouped into rows by baseline, column edges are taken from left
//! edges that line up across rows, and runs of consecutive aligned rows
//! become tables.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::{Table, TableRow};

use super::layout::TextSpan;

/// Width of the buckets used to cluster left edges, in points.
const EDGE_BUCKET: f32 = 5.0;

/// How far a span may sit from a column edge and still count as aligned.
const ALIGN_TOLERANCE: f32 = 5.0;

/// A detected table region with its content.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Baseline of the first row (PDF coordinates, larger is higher)
    pub top_y: f32,
    /// Baseline of the last row
    pub bottom_y: f32,
    /// Left X boundary
    pub left_x: f32,
    /// Right X boundary
    pub right_x: f32,
    /// Column left edges, ascending
    pub columns: Vec<f32>,
    /// Rows of text spans grouped by Y position
    pub rows: Vec<TableRowData>,
}

/// A row of text spans in a table.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Y position of this row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects tables in a list of text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables in the spans of one page and convert them to rows of
    /// cells, top to bottom.
    pub fn extract_tables(&self, spans: &[TextSpan]) -> Vec<Table> {
        self.detect(spans)
            .iter()
            .map(|detected| self.to_table_model(detected))
            .collect()
    }

    /// Detect table regions in the given spans, top to bottom.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            log::debug!(
                "TableDetector: not enough spans ({} < {})",
                spans.len(),
                self.config.min_rows * self.config.min_columns
            );
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            log::debug!("TableDetector: not enough rows ({})", rows.len());
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, column edges {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut detected = Vec::new();
        for (start_row, end_row) in self.find_table_regions(&rows, &columns) {
            let table_rows = rows[start_row..=end_row].to_vec();

            // Columns are re-derived per region so that a table does not
            // inherit edges from unrelated text elsewhere on the page.
            let table_columns = self.detect_columns(&table_rows);

            if table_columns.len() < self.config.min_columns {
                continue;
            }
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(&table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }

            let all_spans = || table_rows.iter().flat_map(|r| r.spans.iter());
            let left_x = all_spans().map(|s| s.x).fold(f32::INFINITY, f32::min);
            let right_x = all_spans()
                .map(TextSpan::right)
                .fold(f32::NEG_INFINITY, f32::max);

            detected.push(DetectedTable {
                top_y: table_rows.first().map(|r| r.y).unwrap_or(0.0),
                bottom_y: table_rows.last().map(|r| r.y).unwrap_or(0.0),
                left_x,
                right_x,
                columns: table_columns,
                rows: table_rows,
            });
        }

        detected
    }

    /// Group spans into rows by Y position, top of the page first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        let mut sorted_spans = spans.to_vec();
        sorted_spans.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
        });

        let mut rows: Vec<TableRowData> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted_spans {
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;

            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(finish_row(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }

        if !current.is_empty() {
            rows.push(finish_row(current));
        }

        rows
    }

    /// Detect column boundaries from left edges that recur across rows.
    ///
    /// Rows with two or more spans are the evidence when there are enough
    /// of them; otherwise every row counts.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        let multi_span_rows: Vec<&TableRowData> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();

        let evidence: Vec<&TableRowData> = if multi_span_rows.len() >= self.config.min_rows {
            multi_span_rows
        } else {
            rows.iter().collect()
        };

        if evidence.is_empty() {
            return vec![];
        }

        // Each bucket is counted once per row.
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &evidence {
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|span| (span.x / EDGE_BUCKET).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((evidence.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut column_edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * EDGE_BUCKET)
            .collect();
        column_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in column_edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }

        merged
    }

    /// Find contiguous row regions that form tables.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions: Vec<(usize, usize)> = Vec::new();
        let mut current_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if self.alignment_score(row, columns) >= self.config.min_alignment_ratio {
                current_start.get_or_insert(i);
            } else if let Some(start) = current_start.take() {
                if i - start >= self.config.min_rows {
                    regions.push((start, i - 1));
                }
            }
        }

        if let Some(start) = current_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans that start on a column edge.
    fn alignment_score(&self, row: &TableRowData, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }

        let aligned = row
            .spans
            .iter()
            .filter(|span| {
                columns
                    .iter()
                    .any(|col| (span.x - col).abs() <= ALIGN_TOLERANCE)
            })
            .count();

        aligned as f32 / row.spans.len() as f32
    }

    /// Convert a detected region into rows of cells.
    ///
    /// Every row gets one cell per column; spans falling into the same
    /// column are joined with a space and empty slots become `None`.
    pub fn to_table_model(&self, detected: &DetectedTable) -> Table {
        let columns = &detected.columns;
        let mut table = Table::new();

        for row_data in &detected.rows {
            let mut cell_contents: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];

            for span in &row_data.spans {
                let col_idx = find_column_for_span(span.x, columns, detected.right_x);
                if let Some(cell) = cell_contents.get_mut(col_idx) {
                    cell.push(span.text.trim());
                }
            }

            let row: TableRow = cell_contents
                .into_iter()
                .map(|parts| {
                    let text = parts.join(" ");
                    (!text.is_empty()).then_some(text)
                })
                .collect();
            table.add_row(row);
        }

        table
    }

    /// Check if detected table rows actually represent a numbered or bulleted list.
    ///
    /// A numbered list such as "1. Item" often arrives as two spans at
    /// different X positions, which looks like a two-column table.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;

        for row in rows {
            let first_span = row
                .spans
                .iter()
                .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

            if let Some(span) = first_span {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;

        // Numbered first columns are common in real tables, so numbers only
        // disqualify two-column regions.
        bullet_ratio >= 0.5 || (columns.len() == 2 && total_ratio >= 0.5)
    }
}

/// Close a row: its Y is the mean baseline of its spans.
fn finish_row(spans: Vec<TextSpan>) -> TableRowData {
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    TableRowData { y, spans }
}

/// Find which column a span belongs to based on its left edge.
fn find_column_for_span(span_x: f32, columns: &[f32], right_x: f32) -> usize {
    // 10pt of slack for spans that start slightly before their column edge
    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (span_x - *a)
                .abs()
                .partial_cmp(&(span_x - *b).abs())
                .unwrap_or(Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "□" | "◆" | "◇" | "▶" | "▷" | "➤"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    // "12." or "3)"
    let digits = cleaned.chars().take_while(char::is_ascii_digit).count();
    let suffix = &cleaned[digits..];
    if digits > 0 && (suffix == "." || suffix == ")") {
        return true;
    }

    // "a." or "B)"
    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.' | ')'), None) if letter.is_alphabetic()
    )
}
