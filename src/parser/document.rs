//! PDF document access using lopdf: metadata, page text and images.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};
use serde_json::Value;

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::{Metadata, PAGE_COUNT_KEY, TITLE_KEY};

use super::backend::decode_text_simple;

/// Metadata keys read from the document information dictionary, in the
/// order they appear in the output.
const INFO_FIELDS: &[(&str, &[u8])] = &[
    (TITLE_KEY, b"Title"),
    ("author", b"Author"),
    ("subject", b"Subject"),
    ("keywords", b"Keywords"),
    ("creator", b"Creator"),
    ("producer", b"Producer"),
    ("creationDate", b"CreationDate"),
    ("modDate", b"ModDate"),
    ("trapped", b"Trapped"),
];

/// Guard against malformed page trees with cyclic `/Parent` links.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// An image XObject found on a page.
#[derive(Debug, Clone)]
pub struct PdfImage {
    /// 1-based page number
    pub page: u32,
    /// 1-based position of the image among the page's images
    pub index: usize,
    /// Image bytes as stored (encoded for DCT/JPX, decompressed otherwise)
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: Option<u32>,
    /// Height in pixels
    pub height: Option<u32>,
    /// Last filter in the stream's filter chain, if any
    pub filter: Option<String>,
}

/// An opened PDF file.
pub struct PdfDocument {
    doc: LopdfDocument,
}

impl PdfDocument {
    /// Open a PDF file, checking its header first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Build the metadata map: format, the information dictionary fields
    /// (empty strings when absent), encryption and `page_count`.
    pub fn metadata(&self) -> Metadata {
        let info = self.info_dictionary();
        let mut metadata = Metadata::new();

        metadata.insert("format", format!("PDF {}", self.doc.version));
        for (key, pdf_key) in INFO_FIELDS {
            let value = info
                .and_then(|dict| get_string_from_dict(dict, pdf_key))
                .unwrap_or_default();
            metadata.insert(*key, value);
        }
        metadata.insert(
            "encryption",
            self.encryption().map(Value::from).unwrap_or(Value::Null),
        );
        metadata.insert(PAGE_COUNT_KEY, self.page_count());

        metadata
    }

    /// Plain text of every page, in page order.
    ///
    /// Pages without a content stream produce an empty string.
    pub fn page_texts(&self) -> Result<Vec<String>> {
        let pages = self.doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        for (&page_num, &page_id) in &pages {
            let has_content = self
                .doc
                .get_dictionary(page_id)
                .map(|dict| dict.has(b"Contents"))
                .unwrap_or(false);

            if !has_content {
                texts.push(String::new());
                continue;
            }

            let text = self
                .doc
                .extract_text(&[page_num])
                .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))?;
            log::debug!("page {}: {} chars of text", page_num, text.len());
            texts.push(text);
        }

        Ok(texts)
    }

    /// Every image XObject referenced from each page, page by page.
    ///
    /// Images reached through form XObjects are included; an image object
    /// is reported at most once per page.
    pub fn images(&self) -> Result<Vec<PdfImage>> {
        let mut images = Vec::new();

        for (page_num, page_id) in self.doc.get_pages() {
            let mut seen = HashSet::new();
            let mut image_ids = Vec::new();
            if let Some(resources) = self.page_resources(page_id) {
                self.collect_image_ids(resources, &mut seen, &mut image_ids)?;
            }

            for (i, image_id) in image_ids.into_iter().enumerate() {
                let stream = self.stream(image_id)?;
                images.push(read_image(stream, page_num, i + 1));
            }
        }

        Ok(images)
    }

    /// Document information dictionary, direct or referenced.
    fn info_dictionary(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Security handler description, e.g. "Standard V2 R3".
    fn encryption(&self) -> Option<String> {
        let encrypt = match self.doc.trailer.get(b"Encrypt").ok()? {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok()?,
            Object::Dictionary(d) => d,
            _ => return None,
        };

        let mut parts = vec![get_string_from_dict(encrypt, b"Filter").unwrap_or_default()];
        for key in [b"V", b"R"] {
            if let Ok(n) = encrypt.get(key).and_then(Object::as_i64) {
                parts.push(format!("{}{}", String::from_utf8_lossy(key), n));
            }
        }
        Some(parts.join(" ").trim().to_string())
    }

    /// Resources of a page, following `/Parent` for inherited resources.
    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.doc.get_dictionary(page_id).ok()?;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(res) = node.get(b"Resources") {
                return self.resolve_dict(res);
            }
            let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }

        None
    }

    /// Walk an XObject resource dictionary, descending into forms.
    fn collect_image_ids(
        &self,
        resources: &Dictionary,
        seen: &mut HashSet<ObjectId>,
        image_ids: &mut Vec<ObjectId>,
    ) -> Result<()> {
        let Some(xobjects) = resources.get(b"XObject").ok().and_then(|o| self.resolve_dict(o))
        else {
            return Ok(());
        };

        for (name, obj) in xobjects.iter() {
            let Ok(obj_id) = obj.as_reference() else {
                continue;
            };
            if !seen.insert(obj_id) {
                continue;
            }

            let stream = self.stream(obj_id)?;
            match stream.dict.get(b"Subtype").and_then(Object::as_name) {
                Ok(b"Image") => image_ids.push(obj_id),
                Ok(b"Form") => {
                    if let Some(form_resources) = stream
                        .dict
                        .get(b"Resources")
                        .ok()
                        .and_then(|r| self.resolve_dict(r))
                    {
                        self.collect_image_ids(form_resources, seen, image_ids)?;
                    }
                }
                _ => log::warn!(
                    "skipping XObject /{} with unexpected subtype",
                    String::from_utf8_lossy(name)
                ),
            }
        }

        Ok(())
    }

    fn stream(&self, id: ObjectId) -> Result<&Stream> {
        match self.doc.get_object(id) {
            Ok(Object::Stream(stream)) => Ok(stream),
            Ok(_) => Err(Error::ImageExtract(format!(
                "object {} {} R is not a stream",
                id.0, id.1
            ))),
            Err(e) => Err(Error::ImageExtract(e.to_string())),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

/// Pull the bytes and basic properties out of an image stream.
fn read_image(stream: &Stream, page: u32, index: usize) -> PdfImage {
    let dict = &stream.dict;

    let filters: Vec<String> = match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).to_string()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .collect(),
        _ => Vec::new(),
    };

    let passthrough = matches!(
        filters.as_slice(),
        [only] if only == "DCTDecode" || only == "JPXDecode"
    );

    let data = if passthrough || filters.is_empty() {
        stream.content.clone()
    } else {
        decode_image_stream(stream).unwrap_or_else(|e| {
            log::warn!(
                "page {} image {}: cannot decode {:?} ({}), keeping raw bytes",
                page,
                index,
                filters,
                e
            );
            stream.content.clone()
        })
    };

    PdfImage {
        page,
        index,
        data,
        width: get_dimension(dict, b"Width"),
        height: get_dimension(dict, b"Height"),
        filter: filters.last().cloned(),
    }
}

/// Undo the stream filters of an image XObject.
fn decode_image_stream(stream: &Stream) -> lopdf::Result<Vec<u8>> {
    // lopdf refuses to decode streams whose /Subtype is /Image
    let mut plain = stream.clone();
    plain.dict.remove(b"Subtype");
    plain.decompressed_content()
}

fn get_dimension(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
}

/// Helper to get a string from a PDF dictionary.
///
/// Strings with a UTF-16BE byte order mark are decoded as UTF-16, others as
/// UTF-8 with a Latin-1 fallback. Names are accepted too (`/Trapped /True`).
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}
