//! Integration tests for folder processing.

use std::fs;
use std::path::Path;

use lopdf::{dictionary, Document, Object, Stream};

use pdfbatch::{process_folder, process_pdf, BatchOptions, Error, PdfResult, REPORT_FILE_NAME};

const JPEG_ONE: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-one\xFF\xD9";
const JPEG_TWO: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-two-longer\xFF\xD9";

/// Minimal in-memory PDF writer for the fixtures below.
struct PdfBuilder {
    doc: Document,
    pages_id: lopdf::ObjectId,
    kids: Vec<Object>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    fn add_object<T: Into<Object>>(&mut self, object: T) -> lopdf::ObjectId {
        self.doc.add_object(object)
    }

    fn add_page(&mut self, content: Option<&str>, resources: lopdf::Dictionary) {
        let contents = content.map(|content| {
            let stream = Stream::new(dictionary! {}, content.as_bytes().to_vec());
            Object::from(self.add_object(stream))
        });
        self.add_page_with_contents(contents, resources);
    }

    /// Page whose `/Contents` is a reference to an array of streams.
    fn add_split_page(&mut self, parts: &[&str], resources: lopdf::Dictionary) {
        let refs: Vec<Object> = parts
            .iter()
            .map(|part| {
                let stream = Stream::new(dictionary! {}, part.as_bytes().to_vec());
                Object::from(self.add_object(stream))
            })
            .collect();
        let array_id = self.add_object(Object::Array(refs));
        self.add_page_with_contents(Some(array_id.into()), resources);
    }

    fn add_page_with_contents(&mut self, contents: Option<Object>, resources: lopdf::Dictionary) {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources,
        };
        if let Some(contents) = contents {
            page.set("Contents", contents);
        }
        let page_id = self.add_object(page);
        self.kids.push(page_id.into());
    }

    fn finish(mut self, title: Option<&str>) -> Vec<u8> {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        if let Some(title) = title {
            let info_id = self.doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            self.doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).unwrap();
        buf
    }
}

fn font_resources() -> lopdf::Dictionary {
    dictionary! {
        "Font" => dictionary! {
            "F1" => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            },
        },
    }
}

fn text_at(text: &str, x: u32, y: u32) -> String {
    format!("BT /F1 12 Tf {} {} Td ({}) Tj ET\n", x, y, text)
}

/// Two pages: a two-column table on the first, one line of prose on the second.
fn table_pdf() -> Vec<u8> {
    let mut table = String::new();
    for (y, left, right) in [(700, "Name", "Age"), (680, "Alice", "30"), (660, "Bob", "25")] {
        table.push_str(&text_at(left, 72, y));
        table.push_str(&text_at(right, 200, y));
    }

    let mut pdf = PdfBuilder::new();
    pdf.add_page(Some(&table), font_resources());
    pdf.add_page(Some(&text_at("Closing remarks", 72, 700)), font_resources());
    pdf.finish(Some("Alpha Report"))
}

/// One page drawing two JPEG image XObjects, no information dictionary.
fn image_pdf() -> Vec<u8> {
    let image = |data: &[u8]| {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 2,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            data.to_vec(),
        )
    };

    let mut pdf = PdfBuilder::new();
    let im1 = pdf.add_object(image(JPEG_ONE));
    let im2 = pdf.add_object(image(JPEG_TWO));
    pdf.add_page(
        Some("q 100 0 0 100 50 50 cm /Im1 Do Q\nq 100 0 0 100 200 50 cm /Im2 Do Q\n"),
        dictionary! {
            "XObject" => dictionary! {
                "Im1" => im1,
                "Im2" => im2,
            },
        },
    );
    pdf.finish(None)
}

/// The table of `table_pdf` split across two content streams behind an
/// indirect array.
fn split_table_pdf() -> Vec<u8> {
    let header = text_at("Name", 72, 700) + &text_at("Age", 200, 700);
    let mut body = String::new();
    for (y, left, right) in [(680, "Alice", "30"), (660, "Bob", "25")] {
        body.push_str(&text_at(left, 72, y));
        body.push_str(&text_at(right, 200, y));
    }

    let mut pdf = PdfBuilder::new();
    pdf.add_split_page(&[&header, &body], font_resources());
    pdf.finish(Some("Split"))
}

/// Pages without content streams.
fn blank_pdf(pages: usize) -> Vec<u8> {
    let mut pdf = PdfBuilder::new();
    for _ in 0..pages {
        pdf.add_page(None, dictionary! {});
    }
    pdf.finish(None)
}

fn write_inputs(dir: &Path) {
    fs::write(dir.join("a.pdf"), table_pdf()).unwrap();
    fs::write(dir.join("b.pdf"), image_pdf()).unwrap();
}

fn report_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_folder_run_writes_dumps_images_and_report() {
    let input = tempfile::tempdir().unwrap();
    write_inputs(input.path());
    let output = input.path().join("out");

    let outcome = process_folder(input.path(), &BatchOptions::new(&output)).unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.report_path, output.join(REPORT_FILE_NAME));

    assert!(output.join("a_data.json").is_file());
    assert!(output.join("b_data.json").is_file());

    let first = output.join("b.pdf_img1_1.png");
    let second = output.join("b.pdf_img1_2.png");
    assert_eq!(fs::read(&first).unwrap(), JPEG_ONE);
    assert_eq!(fs::read(&second).unwrap(), JPEG_TWO);
    assert_eq!(outcome.results[1].images, vec![first, second]);

    assert_eq!(
        report_lines(&outcome.report_path),
        vec![
            "File Name,Number of Tables,Number of Paragraphs,Number of Images",
            "Alpha Report,1,2,0",
            ",0,1,2",
        ]
    );
}

#[test]
fn test_table_and_page_text_contents() {
    let input = tempfile::tempdir().unwrap();
    write_inputs(input.path());
    let output = tempfile::tempdir().unwrap();

    let result = process_pdf(input.path().join("a.pdf"), output.path()).unwrap();

    assert_eq!(result.metadata.title(), Some("Alpha Report"));
    assert_eq!(result.metadata.page_count(), Some(2));
    assert_eq!(result.paragraphs.len(), 2);
    assert!(result.paragraphs[0].contains("Alice"));
    assert!(result.paragraphs[1].contains("Closing remarks"));

    assert_eq!(result.tables.len(), 1);
    let table = &result.tables[0];
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.cell(0, 0), Some("Name"));
    assert_eq!(table.cell(0, 1), Some("Age"));
    assert_eq!(table.cell(2, 0), Some("Bob"));
    assert_eq!(table.cell(2, 1), Some("25"));
    assert!(result.images.is_empty());
}

#[test]
fn test_json_dump_matches_result() {
    let input = tempfile::tempdir().unwrap();
    write_inputs(input.path());
    let output = tempfile::tempdir().unwrap();

    let result = process_pdf(input.path().join("a.pdf"), output.path()).unwrap();

    let json = fs::read_to_string(output.path().join("a_data.json")).unwrap();
    let parsed: PdfResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["metadata", "paragraphs", "tables", "images"]);
    assert_eq!(value["tables"][0][0][0], "Name");
}

#[test]
fn test_filter_is_case_insensitive() {
    let input = tempfile::tempdir().unwrap();
    write_inputs(input.path());
    fs::write(input.path().join("Alpha_notes.pdf"), table_pdf()).unwrap();
    let output = input.path().join("out");

    let options = BatchOptions::new(&output).with_filter("ALPHA");
    let outcome = process_folder(input.path(), &options).unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert!(output.join("Alpha_notes_data.json").is_file());
    assert!(!output.join("a_data.json").exists());
    assert!(!output.join("b.pdf_img1_1.png").exists());
    assert_eq!(report_lines(&outcome.report_path).len(), 2);
}

#[test]
fn test_filter_without_matches_writes_header_only() {
    let input = tempfile::tempdir().unwrap();
    write_inputs(input.path());
    let output = input.path().join("out");

    let options = BatchOptions::new(&output).with_filter("zzz");
    let outcome = process_folder(input.path(), &options).unwrap();

    assert!(outcome.results.is_empty());
    assert_eq!(report_lines(&outcome.report_path).len(), 1);
}

#[test]
fn test_page_without_content() {
    let input = tempfile::tempdir().unwrap();
    let path = input.path().join("blank.pdf");
    fs::write(&path, blank_pdf(3)).unwrap();
    let output = tempfile::tempdir().unwrap();

    let result = process_pdf(&path, output.path()).unwrap();

    assert_eq!(result.paragraphs, vec![String::new(); 3]);
    assert_eq!(result.metadata.page_count(), Some(3));
    assert!(result.tables.is_empty());
    assert!(result.images.is_empty());
    assert_eq!(result.metadata.title(), Some(""));
}

#[test]
fn test_corrupt_file_stops_the_run() {
    let input = tempfile::tempdir().unwrap();
    write_inputs(input.path());
    fs::write(input.path().join("c.pdf"), b"%PDF-1.4\ntruncated").unwrap();
    let output = input.path().join("out");

    let err = process_folder(input.path(), &BatchOptions::new(&output)).unwrap_err();

    assert!(!matches!(err, Error::UnknownFormat), "{err:?}");
    // Files before the failure keep their outputs, but no report is written.
    assert!(output.join("a_data.json").is_file());
    assert!(!output.join(REPORT_FILE_NAME).exists());
}

#[test]
fn test_table_split_across_content_streams() {
    let input = tempfile::tempdir().unwrap();
    let path = input.path().join("split.pdf");
    fs::write(&path, split_table_pdf()).unwrap();
    let output = tempfile::tempdir().unwrap();

    let result = process_pdf(&path, output.path()).unwrap();

    assert_eq!(result.paragraphs.len(), 1);
    assert!(result.paragraphs[0].contains("Bob"));
    assert_eq!(result.tables.len(), 1);
    let table = &result.tables[0];
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.cell(0, 1), Some("Age"));
    assert_eq!(table.cell(1, 0), Some("Alice"));
    assert_eq!(table.cell(2, 1), Some("25"));
}
