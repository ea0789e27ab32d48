//! Download URL tracking
//!
//! Every object URL handed to the page for a split result is held by a
//! [`UrlRegistry`] until it is released. Dropping the registry revokes
//! whatever is still outstanding, so nothing leaks when the session ends.

use wasm_bindgen::prelude::*;

pub const PDF_MIME: &str = "application/pdf";

/// Creates and revokes object URLs
pub trait ObjectUrlBackend {
    fn create(&mut self, bytes: &[u8], mime: &str) -> Result<String, String>;
    fn revoke(&mut self, url: &str);
}

/// `Blob` + `URL.createObjectURL` in the browser
#[derive(Debug, Default)]
pub struct BrowserUrls;

impl ObjectUrlBackend for BrowserUrls {
    fn create(&mut self, bytes: &[u8], mime: &str) -> Result<String, String> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime);

        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| format!("Failed to create blob: {:?}", e))?;
        web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|e| format!("Failed to create object URL: {:?}", e))
    }

    fn revoke(&mut self, url: &str) {
        if let Err(e) = web_sys::Url::revoke_object_url(url) {
            tracing::warn!(url, error = ?e, "Failed to revoke object URL");
        }
    }
}

/// Owns the object URLs created for results
#[derive(Debug)]
pub struct UrlRegistry<B: ObjectUrlBackend> {
    backend: B,
    active: Vec<String>,
}

impl<B: ObjectUrlBackend> UrlRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: Vec::new(),
        }
    }

    pub fn acquire(&mut self, bytes: &[u8], mime: &str) -> Result<String, String> {
        let url = self.backend.create(bytes, mime)?;
        self.active.push(url.clone());
        Ok(url)
    }

    /// Revoke a URL created by this registry. Returns false for unknown URLs.
    pub fn release(&mut self, url: &str) -> bool {
        match self.active.iter().position(|u| u == url) {
            Some(pos) => {
                let url = self.active.remove(pos);
                self.backend.revoke(&url);
                true
            }
            None => false,
        }
    }

    pub fn release_all(&mut self) -> usize {
        let urls = std::mem::take(&mut self.active);
        for url in &urls {
            self.backend.revoke(url);
        }
        urls.len()
    }

    /// Create a URL for the duration of `f` only.
    pub fn with_url<R>(
        &mut self,
        bytes: &[u8],
        mime: &str,
        f: impl FnOnce(&str) -> R,
    ) -> Result<R, String> {
        let url = self.acquire(bytes, mime)?;
        let out = f(&url);
        self.release(&url);
        Ok(out)
    }

    pub fn is_active(&self, url: &str) -> bool {
        self.active.iter().any(|u| u == url)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl<B: ObjectUrlBackend> Drop for UrlRegistry<B> {
    fn drop(&mut self) {
        let released = self.release_all();
        if released > 0 {
            tracing::debug!(released, "Revoked outstanding download URLs");
        }
    }
}

/// Registry of download links for split results
#[wasm_bindgen]
pub struct DownloadRegistry {
    inner: UrlRegistry<BrowserUrls>,
}

#[wasm_bindgen]
impl DownloadRegistry {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: UrlRegistry::new(BrowserUrls),
        }
    }

    /// Create an object URL for PDF bytes
    #[wasm_bindgen(js_name = createUrl)]
    pub fn create_url(&mut self, bytes: &[u8]) -> Result<String, JsValue> {
        self.inner
            .acquire(bytes, PDF_MIME)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Revoke one URL once it has been downloaded or discarded
    pub fn release(&mut self, url: &str) -> bool {
        self.inner.release(url)
    }

    #[wasm_bindgen(js_name = releaseAll)]
    pub fn release_all(&mut self) -> usize {
        self.inner.release_all()
    }

    #[wasm_bindgen(js_name = activeCount)]
    pub fn active_count(&self) -> usize {
        self.inner.active_count()
    }
}

impl Default for DownloadRegistry {
    fn default() -> Self {
        Self::new()
    }
}
