//! WASM bindings for PDF splitting
//!
//! The document, plan and results live in Rust inside `PdfSplitSession`.
//! JavaScript reads files, forwards form input and triggers downloads.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PdfSplitSession, DownloadRegistry } from './pkg/pdfsplit_wasm.js';
//!
//! await init();
//!
//! const session = new PdfSplitSession();
//! session.setProgressCallback((current, total, msg) => updateUI(current, total, msg));
//! const info = session.loadDocument(file.name, bytes);
//! session.configure("range", "1-3, 5");
//! const summaries = session.execute();
//!
//! const downloads = new DownloadRegistry();
//! summaries.forEach((s, i) => {
//!     const url = downloads.createUrl(session.resultBytes(i));
//!     addLink(url, s.filename);
//! });
//! // later
//! downloads.releaseAll();
//! session.clearResults();
//! ```

pub mod downloads;
pub mod logging;
pub mod session;

use pdfsplit_core::PdfSplitError;
use tracing_subscriber::filter::LevelFilter;
use wasm_bindgen::prelude::*;

pub use downloads::DownloadRegistry;
pub use session::{PdfSplitSession, SessionError};

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init_console_logging(LevelFilter::INFO);
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Cheap header/trailer check before a full load
#[wasm_bindgen(js_name = quickValidate)]
pub fn quick_validate(bytes: &[u8]) -> Result<(), JsValue> {
    pdfsplit_core::quick_validate(bytes).map_err(|e| js_error(&e))
}

/// Get PDF info without creating a session
#[wasm_bindgen(js_name = getPdfInfo)]
pub fn get_pdf_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info = pdfsplit_core::LoadedDocument::load(bytes)
        .map_err(|e| js_error(&e))?
        .info();

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Get page count from PDF bytes (convenience function)
#[wasm_bindgen(js_name = getPageCount)]
pub fn get_page_count(bytes: &[u8]) -> Result<u32, JsValue> {
    pdfsplit_core::get_page_count(bytes)
        .map(|count| count as u32)
        .map_err(|e| js_error(&e))
}

/// Output filename for a split result, e.g. `("Report.PDF", "pages_1-3")`
#[wasm_bindgen(js_name = generateFilename)]
pub fn generate_filename(original_filename: &str, suffix: &str) -> String {
    pdfsplit_core::generate_filename(original_filename, suffix)
}

/// `Error` with the user-facing message and the error kind as its name
fn js_error(err: &PdfSplitError) -> JsValue {
    let js_err = js_sys::Error::new(&err.user_message());
    js_err.set_name(err.kind().as_str());
    js_err.into()
}
