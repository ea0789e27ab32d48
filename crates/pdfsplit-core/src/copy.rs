//! Page copying into a fresh document
//!
//! Builds a new document "by whitelist": only the selected pages and the
//! objects they reach are copied, each under a newly allocated object id.
//! The source document is only read.
//!
//! The copy:
//! 1. Allocates a new id for every selected page up front, so links between
//!    selected pages survive
//! 2. Clones each page dictionary, filling in attributes it inherits from
//!    ancestor `Pages` nodes
//! 3. Walks every reference reachable from those pages, copying the target
//!    object once and rewriting the reference to its new id
//! 4. Cuts references into the source page tree (`Parent`, or destinations
//!    on pages that were not selected)
//! 5. Builds a single `Pages` node and a `Catalog` for the new document

use crate::error::PdfSplitError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Page attributes that may be inherited from the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic or absurdly deep `Parent` chains.
const MAX_TREE_DEPTH: usize = 64;

/// Copy the given pages of `source` (ids in output order) into a new document.
pub(crate) fn copy_pages_into_new(
    source: &Document,
    page_ids: &[ObjectId],
) -> Result<Document, PdfSplitError> {
    let mut copier = ObjectCopier::new(source);
    let pages_id = copier.dest.new_object_id();

    // Repeated pages get their own page object; references resolve to the first.
    let mut new_page_ids = Vec::with_capacity(page_ids.len());
    for &page_id in page_ids {
        let new_id = copier.dest.new_object_id();
        copier.mapped.entry(page_id).or_insert(new_id);
        new_page_ids.push(new_id);
    }

    for (&page_id, &new_id) in page_ids.iter().zip(&new_page_ids) {
        let page = flattened_page(source, page_id)?;
        let mut page = copier.remap_dictionary(&page);
        page.set("Parent", Object::Reference(pages_id));
        copier.dest.objects.insert(new_id, Object::Dictionary(page));
    }

    copier.drain();

    let mut dest = copier.dest;
    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(new_page_ids.len() as i64)),
        (
            "Kids",
            Object::Array(new_page_ids.iter().map(|&id| Object::Reference(id)).collect()),
        ),
    ]);
    dest.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = dest.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    dest.trailer.set("Root", Object::Reference(catalog_id));

    Ok(dest)
}

/// Clone a page dictionary, pulling inheritable attributes down from its
/// ancestors and dropping the link to the source page tree.
fn flattened_page(source: &Document, page_id: ObjectId) -> Result<Dictionary, PdfSplitError> {
    let mut page = source
        .get_dictionary(page_id)
        .map_err(|e| PdfSplitError::Format(format!("Page object {:?}: {}", page_id, e)))?
        .clone();

    for key in INHERITABLE_KEYS {
        if !page.has(key) {
            if let Some(value) = inherited_attribute(source, &page, key) {
                page.set(key.to_vec(), value.clone());
            }
        }
    }

    page.remove(b"Parent");
    Ok(page)
}

fn inherited_attribute<'a>(
    source: &'a Document,
    page: &Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            return None;
        }
        let node = source.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    None
}

struct ObjectCopier<'a> {
    source: &'a Document,
    dest: Document,
    /// Source id -> destination id
    mapped: BTreeMap<ObjectId, ObjectId>,
    /// Source ids allocated in `mapped` but not yet copied
    pending: Vec<ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            dest: Document::with_version(source.version.clone()),
            mapped: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Copy every object queued by `remap` until nothing new is reached.
    fn drain(&mut self) {
        let source = self.source;
        while let Some(old_id) = self.pending.pop() {
            let copied = match source.get_object(old_id) {
                Ok(object) => self.remap(object),
                // Dangling reference in the source
                Err(_) => Object::Null,
            };
            if let Some(&new_id) = self.mapped.get(&old_id) {
                self.dest.objects.insert(new_id, copied);
            }
        }
    }

    fn remap(&mut self, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.remap_reference(*id),
            Object::Array(items) => Object::Array(items.iter().map(|o| self.remap(o)).collect()),
            Object::Dictionary(dict) => Object::Dictionary(self.remap_dictionary(dict)),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.remap_dictionary(&stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn remap_dictionary(&mut self, dict: &Dictionary) -> Dictionary {
        let mut out = Dictionary::new();
        for (key, value) in dict.iter() {
            out.set(key.clone(), self.remap(value));
        }
        out
    }

    fn remap_reference(&mut self, id: ObjectId) -> Object {
        if let Some(&new_id) = self.mapped.get(&id) {
            return Object::Reference(new_id);
        }
        if is_page_tree_node(self.source, id) {
            return Object::Null;
        }
        let new_id = self.dest.new_object_id();
        self.mapped.insert(id, new_id);
        self.pending.push(id);
        Object::Reference(new_id)
    }
}

fn is_page_tree_node(source: &Document, id: ObjectId) -> bool {
    source
        .get_dictionary(id)
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .map(|name| name == b"Page" || name == b"Pages")
        .unwrap_or(false)
}
