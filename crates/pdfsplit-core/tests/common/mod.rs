//! Fixtures shared by the integration tests

use lopdf::{Dictionary, Document, Object, Stream};

/// Build an N-page PDF where page n draws "(Page n)".
pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let page_ids: Vec<_> = (1..=num_pages)
        .map(|n| {
            let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", n);
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
            doc.add_object(Dictionary::from_iter(vec![
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
                ("Contents", Object::Reference(content_id)),
            ]))
        })
        .collect();

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Page markers of a serialized PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<u32> {
    let doc = Document::load_mem(bytes).unwrap();
    let marker = regex::Regex::new(r"\(Page (\d+)\)").unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let content = doc.get_page_content(id).unwrap();
            marker
                .captures(&String::from_utf8_lossy(&content))
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0)
        })
        .collect()
}
