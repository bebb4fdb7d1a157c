//! Benchmarks for the pure parts of the pipeline.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfbatch::parser::TextSpan;
use pdfbatch::{Metadata, PdfResult, TableDetector};

/// A page of spans: a heading, `rows` table rows of four columns, a footer.
fn synthetic_page(rows: usize) -> Vec<TextSpan> {
    let span = |text: String, x: f32, y: f32| TextSpan::new(text, x, y, 10.0, "Helvetica".to_string());

    let mut spans = vec![span("Quarterly summary".to_string(), 72.0, 760.0)];
    for row in 0..rows {
        let y = 720.0 - row as f32 * 14.0;
        for (col, x) in [72.0, 180.0, 290.0, 400.0].into_iter().enumerate() {
            spans.push(span(format!("r{}c{}", row, col), x, y));
        }
    }
    spans.push(span("Page 1".to_string(), 300.0, 40.0));
    spans
}

fn bench_format_detection(c: &mut Criterion) {
    let header = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n";
    let non_pdf = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| pdfbatch::detect_format_from_bytes(black_box(header)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| pdfbatch::detect_format_from_bytes(black_box(non_pdf)).is_err());
    });
}

fn bench_table_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_detection");
    let detector = TableDetector::new();

    for rows in [5, 20, 50] {
        let spans = synthetic_page(rows);
        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| detector.extract_tables(black_box(&spans)));
        });
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let results: Vec<PdfResult> = (0..200)
        .map(|i| {
            let mut metadata = Metadata::new();
            metadata.insert("title", format!("Document, number {}", i));
            PdfResult {
                metadata,
                paragraphs: vec![String::new(); 3],
                ..Default::default()
            }
        })
        .collect();

    c.bench_function("csv_report_200_rows", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            pdfbatch::render::write_report(black_box(&results), &mut buf).unwrap();
            buf
        });
    });
}

criterion_group!(benches, bench_format_detection, bench_table_detection, bench_report);
criterion_main!(benches);
