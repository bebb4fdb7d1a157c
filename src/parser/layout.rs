//! Positioned text extraction.
//!
//! Walks a page's content stream and records every shown string together
//! with its position and font size. The spans feed the table detector.

use std::collections::HashMap;

use crate::error::Result;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Adjustment (in 1/1000 text space units) inside a `TJ` array that is
/// treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A text span with position and style information.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new span; the width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Text state tracked across text-positioning operators.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // start of the current line, which Td/T* are relative to
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    /// Reset position at `BT`; leading survives across text objects.
    fn begin_text(&mut self) {
        let leading = self.leading;
        *self = Self {
            leading,
            ..Self::default()
        };
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    /// Move along the current line after a string is shown.
    fn advance(&mut self, width: f32) {
        self.e += width;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Extract positioned spans from one page of `backend`.
pub fn extract_page_spans(backend: &dyn PdfBackend, page: PageId) -> Result<Vec<TextSpan>> {
    let fonts: HashMap<Vec<u8>, String> = backend
        .page_fonts(page)?
        .into_iter()
        .map(|f| (f.name, f.base_font))
        .collect();

    let content = backend.page_content(page)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let ops = backend.decode_content(&content)?;

    Ok(SpanCollector::new(backend, page, &fonts).run(&ops))
}

struct SpanCollector<'a> {
    backend: &'a dyn PdfBackend,
    page: PageId,
    fonts: &'a HashMap<Vec<u8>, String>,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    matrix: TextMatrix,
    in_text: bool,
    spans: Vec<TextSpan>,
}

impl<'a> SpanCollector<'a> {
    fn new(backend: &'a dyn PdfBackend, page: PageId, fonts: &'a HashMap<Vec<u8>, String>) -> Self {
        Self {
            backend,
            page,
            fonts,
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            matrix: TextMatrix::default(),
            in_text: false,
            spans: Vec::new(),
        }
    }

    fn run(mut self, ops: &[ContentOp]) -> Vec<TextSpan> {
        for op in ops {
            self.apply(op);
        }
        self.spans
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "BT" => {
                self.in_text = true;
                self.matrix.begin_text();
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.font_name = self
                        .fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    self.font_resource = name.clone();
                }
                self.font_size = op.number(1).unwrap_or(12.0);
            }
            "TL" => self.matrix.leading = op.number(0).unwrap_or(0.0),
            "Td" => {
                self.matrix
                    .translate(op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
            }
            "TD" => {
                let ty = op.number(1).unwrap_or(0.0);
                self.matrix.leading = -ty;
                self.matrix.translate(op.number(0).unwrap_or(0.0), ty);
            }
            "Tm" => {
                self.matrix.set(
                    op.number(0).unwrap_or(1.0),
                    op.number(1).unwrap_or(0.0),
                    op.number(2).unwrap_or(0.0),
                    op.number(3).unwrap_or(1.0),
                    op.number(4).unwrap_or(0.0),
                    op.number(5).unwrap_or(0.0),
                );
            }
            "T*" => self.matrix.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.push(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let text = self.decode_array(items);
                    self.push(text);
                }
            }
            "'" | "\"" => {
                self.matrix.next_line();
                let index = if op.operator == "\"" { 2 } else { 0 };
                if let Some(PdfValue::Str(bytes)) = op.operands.get(index) {
                    let text = self.decode(bytes);
                    self.push(text);
                }
            }
            _ => {}
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.backend
            .decode_text(self.page, &self.font_resource, bytes)
    }

    /// Join the strings of a `TJ` array, turning large negative kerning
    /// adjustments into spaces.
    fn decode_array(&self, items: &[PdfValue]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(bytes)),
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -item.as_number().unwrap_or(0.0);
                    let ends_with_space = combined.ends_with(' ') || combined.ends_with('\u{00A0}');
                    if adjustment > TJ_SPACE_THRESHOLD && !combined.is_empty() && !ends_with_space
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    fn push(&mut self, text: String) {
        if !self.in_text || text.trim().is_empty() {
            return;
        }
        let (x, y) = self.matrix.position();
        let size = self.font_size * self.matrix.scale();
        let span = TextSpan::new(text, x, y, size, self.font_name.clone());
        self.matrix.advance(span.width);
        self.spans.push(span);
    }
}
