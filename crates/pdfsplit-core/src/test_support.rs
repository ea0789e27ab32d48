//! Shared PDF fixtures for unit tests

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};
use regex::Regex;

fn marker_content(page_num: u32) -> Vec<u8> {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    format!("Page {}", page_num).into_bytes(),
                    lopdf::StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    content.encode().unwrap()
}

/// Create a PDF with N pages, each drawing "Page n" with a shared font.
pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));

    let mut page_ids = Vec::new();
    for i in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), marker_content(i + 1)));
        let resources = Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
        )]);
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Create a 4-page PDF whose pages sit under two intermediate `Pages` nodes
/// and inherit `MediaBox`, `Rotate` and `Resources` from the root node.
/// Page 1 links to page 4 through a `/Dest` annotation.
pub fn create_nested_test_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let root_pages_id = doc.new_object_id();
    let left_id = doc.new_object_id();
    let right_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Courier".to_vec())),
    ]));

    let mut page_ids = Vec::new();
    for i in 0..4u32 {
        let parent = if i < 2 { left_id } else { right_id };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), marker_content(i + 1)));
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(parent)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let link_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Link".to_vec())),
        (
            "Dest",
            Object::Array(vec![
                Object::Reference(page_ids[3]),
                Object::Name(b"Fit".to_vec()),
            ]),
        ),
    ]));
    if let Ok(Object::Dictionary(first)) = doc.get_object_mut(page_ids[0]) {
        first.set("Annots", Object::Array(vec![Object::Reference(link_id)]));
    }

    for (node_id, kids) in [(left_id, &page_ids[..2]), (right_id, &page_ids[2..])] {
        let node = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Parent", Object::Reference(root_pages_id)),
            ("Count", Object::Integer(kids.len() as i64)),
            (
                "Kids",
                Object::Array(kids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(node_id, Object::Dictionary(node));
    }

    let root_pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(4)),
        (
            "Kids",
            Object::Array(vec![Object::Reference(left_id), Object::Reference(right_id)]),
        ),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ]),
        ),
        ("Rotate", Object::Integer(90)),
        (
            "Resources",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "Font",
                Object::Dictionary(Dictionary::from_iter(vec![(
                    "F1",
                    Object::Reference(font_id),
                )])),
            )])),
        ),
    ]);
    doc.objects
        .insert(root_pages_id, Object::Dictionary(root_pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(root_pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Read the "Page n" markers back out of a serialized PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<u32> {
    let doc = Document::load_mem(bytes).unwrap();
    let marker = Regex::new(r"Page (\d+)").unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            marker
                .captures(&text)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0)
        })
        .collect()
}
