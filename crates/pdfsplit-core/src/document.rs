//! Document loading
//!
//! Parses raw bytes into a [`LoadedDocument`]. Loading either fully succeeds
//! or fails with [`PdfSplitError::Format`] / [`PdfSplitError::Unsupported`];
//! there is no reduced-capability fallback.

use crate::copy::copy_pages_into_new;
use crate::error::PdfSplitError;
use lopdf::{Document, ObjectId};
use serde::Serialize;

/// Read access to a document's pages, as needed by the split engine and
/// the packager.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Build a standalone PDF holding the given 0-based pages in exactly
    /// the given order, serialized to bytes.
    fn render_pages(&self, indices: &[usize], compress: bool) -> Result<Vec<u8>, PdfSplitError>;
}

/// Basic facts about a loaded document
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub page_count: usize,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    pub size_bytes: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// A parsed source PDF. Never modified after loading.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    document: Document,
    /// Page object ids, index 0 is the first page
    page_ids: Vec<ObjectId>,
    size_bytes: usize,
}

impl LoadedDocument {
    pub fn load(bytes: &[u8]) -> Result<Self, PdfSplitError> {
        check_header(bytes)?;

        let document = Document::load_mem(bytes).map_err(|e| {
            // lopdf cannot parse some encrypted files at all
            if has_encrypt_entry(bytes) {
                PdfSplitError::Unsupported("document is encrypted".to_string())
            } else {
                PdfSplitError::Format(format!("Failed to parse PDF: {}", e))
            }
        })?;

        if document.is_encrypted() {
            return Err(PdfSplitError::Unsupported(
                "document is encrypted".to_string(),
            ));
        }

        // get_pages is keyed by 1-based page number, so values come out in page order
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();

        tracing::debug!(
            pages = page_ids.len(),
            bytes = bytes.len(),
            version = %document.version,
            "Loaded PDF"
        );

        Ok(Self {
            document,
            page_ids,
            size_bytes: bytes.len(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Copy the given 0-based pages, in order, into a new document.
    ///
    /// The same index may appear more than once; each occurrence becomes
    /// its own page.
    pub fn copy_pages(&self, indices: &[usize]) -> Result<Document, PdfSplitError> {
        let page_count = self.page_count();
        let ids = indices
            .iter()
            .map(|&index| {
                self.page_ids
                    .get(index)
                    .copied()
                    .ok_or(PdfSplitError::PageOutOfBounds { index, page_count })
            })
            .collect::<Result<Vec<_>, _>>()?;

        copy_pages_into_new(&self.document, &ids)
    }

    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            page_count: self.page_count(),
            version: self.document.version.clone(),
            size_bytes: self.size_bytes,
            title: self.info_string(b"Title"),
            author: self.info_string(b"Author"),
        }
    }

    fn info_string(&self, key: &[u8]) -> Option<String> {
        let info_id = self.document.trailer.get(b"Info").ok()?.as_reference().ok()?;
        let value = self.document.get_dictionary(info_id).ok()?.get(key).ok()?;
        let decoded = decode_text_string(value.as_str().ok()?);
        (!decoded.is_empty()).then_some(decoded)
    }
}

impl PageSource for LoadedDocument {
    fn page_count(&self) -> usize {
        LoadedDocument::page_count(self)
    }

    fn render_pages(&self, indices: &[usize], compress: bool) -> Result<Vec<u8>, PdfSplitError> {
        let mut document = self.copy_pages(indices)?;
        if compress {
            document.compress();
        }

        let mut buffer = Vec::new();
        document
            .save_to(&mut buffer)
            .map_err(|e| PdfSplitError::Output(format!("Save failed: {}", e)))?;
        Ok(buffer)
    }
}

/// Cheap structural check without a full parse: header and `%%EOF` marker.
pub fn quick_validate(bytes: &[u8]) -> Result<(), PdfSplitError> {
    check_header(bytes)?;

    let tail = if bytes.len() > 1024 {
        &bytes[bytes.len() - 1024..]
    } else {
        bytes
    };
    if !contains(tail, b"%%EOF") {
        return Err(PdfSplitError::Format(
            "PDF appears truncated (missing %%EOF marker)".to_string(),
        ));
    }

    Ok(())
}

fn check_header(bytes: &[u8]) -> Result<(), PdfSplitError> {
    if bytes.len() < 8 {
        return Err(PdfSplitError::Format(
            "File too small to be a valid PDF".to_string(),
        ));
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err(PdfSplitError::Format(
            "missing %PDF- header".to_string(),
        ));
    }
    Ok(())
}

/// An `/Encrypt` key names the security handler in a trailer or xref stream.
fn has_encrypt_entry(bytes: &[u8]) -> bool {
    bytes.windows(9).any(|w| {
        w.starts_with(b"/Encrypt") && matches!(w[8], b' ' | b'\n' | b'\r' | b'\t' | b'<' | b'0'..=b'9')
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// PDF text strings are UTF-16BE or UTF-8 with a BOM, otherwise PDFDocEncoding.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(utf8).into_owned()
    } else {
        bytes.iter().map(|&b| pdf_doc_char(b)).collect()
    }
}

/// PDFDocEncoding agrees with Latin-1 except in these slots.
const PDF_DOC_0X18: [char; 8] = ['˘', 'ˇ', 'ˆ', '˙', '˝', '˛', '˚', '˜'];
const PDF_DOC_0X80: [char; 32] = [
    '•', '†', '‡', '…', '\u{2014}', '\u{2013}', 'ƒ', '⁄', '‹', '›', '−', '‰', '„', '“', '”', '‘',
    '’', '‚', '™', 'ﬁ', 'ﬂ', 'Ł', 'Œ', 'Š', 'Ÿ', 'Ž', 'ı', 'ł', 'œ', 'š', 'ž', '\u{FFFD}',
];

fn pdf_doc_char(byte: u8) -> char {
    match byte {
        0x18..=0x1F => PDF_DOC_0X18[(byte - 0x18) as usize],
        0x80..=0x9F => PDF_DOC_0X80[(byte - 0x80) as usize],
        0x7F | 0xAD => char::REPLACEMENT_CHARACTER,
        0xA0 => '€',
        other => other as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{create_test_pdf, page_markers};
    use lopdf::{Dictionary, Object, StringFormat};

    #[test]
    fn test_load_reports_page_count() {
        let doc = LoadedDocument::load(&create_test_pdf(7)).unwrap();
        assert_eq!(doc.page_count(), 7);
    }

    #[test]
    fn test_load_rejects_non_pdf() {
        let err = LoadedDocument::load(b"definitely not a pdf").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_load_rejects_tiny_buffer() {
        let err = LoadedDocument::load(b"%PDF").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_load_rejects_corrupt_body() {
        let err = LoadedDocument::load(b"%PDF-1.7\ngarbage without xref or trailer").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_load_rejects_encrypted() {
        let mut doc = Document::load_mem(&create_test_pdf(2)).unwrap();
        let encrypt = Dictionary::from_iter(vec![
            ("Filter", Object::Name(b"Standard".to_vec())),
            ("V", Object::Integer(2)),
            ("R", Object::Integer(3)),
        ]);
        doc.trailer.set("Encrypt", Object::Dictionary(encrypt));
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let err = LoadedDocument::load(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_load_accepts_encrypt_text_in_plain_document() {
        let mut raw = Document::load_mem(&create_test_pdf(1)).unwrap();
        let info_id = raw.add_object(Dictionary::from_iter(vec![(
            "Title",
            Object::String(b"Notes on /Encrypt 5 0 R".to_vec(), StringFormat::Literal),
        )]));
        raw.trailer.set("Info", Object::Reference(info_id));
        let mut bytes = Vec::new();
        raw.save_to(&mut bytes).unwrap();
        assert!(has_encrypt_entry(&bytes));

        let doc = LoadedDocument::load(&bytes).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.info().title.as_deref(), Some("Notes on /Encrypt 5 0 R"));
    }

    #[test]
    fn test_copy_pages_rejects_out_of_bounds() {
        let doc = LoadedDocument::load(&create_test_pdf(3)).unwrap();
        let err = doc.copy_pages(&[0, 3]).unwrap_err();
        assert_eq!(
            err,
            PdfSplitError::PageOutOfBounds {
                index: 3,
                page_count: 3
            }
        );
    }

    #[test]
    fn test_render_pages_round_trip() {
        let doc = LoadedDocument::load(&create_test_pdf(6)).unwrap();
        let bytes = doc.render_pages(&[1, 2, 3], true).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        let reloaded = LoadedDocument::load(&bytes).unwrap();
        assert_eq!(reloaded.page_count(), 3);
        assert_eq!(page_markers(&bytes), vec![2, 3, 4]);
    }

    #[test]
    fn test_render_uncompressed_round_trip() {
        let doc = LoadedDocument::load(&create_test_pdf(2)).unwrap();
        let bytes = doc.render_pages(&[1], false).unwrap();
        assert_eq!(page_markers(&bytes), vec![2]);
    }

    #[test]
    fn test_repeated_splits_from_one_load() {
        let doc = LoadedDocument::load(&create_test_pdf(4)).unwrap();
        let first = doc.render_pages(&[0], true).unwrap();
        let second = doc.render_pages(&[0], true).unwrap();

        assert_eq!(first, second);
        assert_eq!(doc.page_count(), 4);
    }

    #[test]
    fn test_info_reads_metadata() {
        let mut raw = Document::load_mem(&create_test_pdf(1)).unwrap();
        let info_id = raw.add_object(Dictionary::from_iter(vec![
            (
                "Title",
                Object::String(b"Quarterly Report".to_vec(), StringFormat::Literal),
            ),
            (
                "Author",
                Object::String(
                    vec![0xFE, 0xFF, 0x00, b'A', 0x00, b'n', 0x00, b'n'],
                    StringFormat::Hexadecimal,
                ),
            ),
        ]));
        raw.trailer.set("Info", Object::Reference(info_id));
        let mut bytes = Vec::new();
        raw.save_to(&mut bytes).unwrap();

        let info = LoadedDocument::load(&bytes).unwrap().info();
        assert_eq!(info.page_count, 1);
        assert_eq!(info.version, "1.7");
        assert_eq!(info.size_bytes, bytes.len());
        assert_eq!(info.title.as_deref(), Some("Quarterly Report"));
        assert_eq!(info.author.as_deref(), Some("Ann"));
    }

    #[test]
    fn test_decode_text_string_encodings() {
        assert_eq!(decode_text_string(b"Caf\xE9"), "Café");
        assert_eq!(decode_text_string(b"\x93le \x84 \xA0"), "ﬁle \u{2014} €");
        assert_eq!(decode_text_string(b"\xEF\xBB\xBFna\xC3\xAFve"), "naïve");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, b'O', 0x00, b'K']), "OK");
    }

    #[test]
    fn test_quick_validate() {
        assert!(quick_validate(&create_test_pdf(1)).is_ok());
        assert!(quick_validate(b"tiny").is_err());
        assert!(quick_validate(b"%PDF-1.7\nno end marker here").is_err());
    }

    #[test]
    fn test_encrypt_detection_ignores_lookalikes() {
        assert!(has_encrypt_entry(b"trailer << /Encrypt 12 0 R >>"));
        assert!(has_encrypt_entry(b"/Encrypt<</Filter/Standard>>"));
        assert!(!has_encrypt_entry(b"/EncryptMetadata false"));
    }
}
