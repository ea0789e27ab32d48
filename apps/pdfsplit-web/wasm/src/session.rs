//! Stateful split session
//!
//! Holds the loaded document, the current plan and the last results in Rust
//! memory. JavaScript only forwards DOM events and file bytes.

use pdfsplit_core::{
    split, DocumentInfo, LoadedDocument, PageGroup, Packager, PdfSplitError, ResultSummary,
    SplitConfig, SplitPlan, SplitResult,
};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("No document loaded")]
    NoDocument,

    #[error("Split options have not been set")]
    NoPlan,

    #[error("No result at index {0}")]
    NoSuchResult(usize),

    #[error(transparent)]
    Split(#[from] PdfSplitError),
}

impl SessionError {
    /// Error name seen by JavaScript, stable across message changes
    pub fn name(&self) -> &'static str {
        match self {
            SessionError::NoDocument => "no_document",
            SessionError::NoPlan => "no_plan",
            SessionError::NoSuchResult(_) => "no_such_result",
            SessionError::Split(e) => e.kind().as_str(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            SessionError::Split(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<SessionError> for JsValue {
    fn from(err: SessionError) -> Self {
        let js_err = js_sys::Error::new(&err.user_message());
        js_err.set_name(err.name());
        js_err.into()
    }
}

struct DocumentEntry {
    name: String,
    document: LoadedDocument,
}

/// What `execute` would produce, without rendering anything
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupPreview {
    pub filename: String,
    pub page_description: String,
    pub page_count: usize,
}

/// Split session: one document, one plan, one result set at a time
#[wasm_bindgen]
pub struct PdfSplitSession {
    document: Option<DocumentEntry>,
    plan: Option<SplitPlan>,
    config: SplitConfig,
    results: Vec<SplitResult>,
    progress_callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl PdfSplitSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            document: None,
            plan: None,
            config: SplitConfig::default(),
            results: Vec::new(),
            progress_callback: None,
        }
    }

    /// Set a progress callback function
    /// Callback signature: (current: number, total: number, message: string) => void
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&mut self, callback: js_sys::Function) {
        self.progress_callback = Some(callback);
    }

    /// Load (or replace) the document. Returns document info.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, name: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let info = self.load_document_internal(name, bytes)?;
        to_js(&info)
    }

    #[wasm_bindgen(js_name = clearDocument)]
    pub fn clear_document(&mut self) {
        self.document = None;
        self.results.clear();
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.document
            .as_ref()
            .map(|d| d.document.page_count())
            .unwrap_or(0)
    }

    /// Set the split mode ("pages" | "range" | "extract") and its option text
    pub fn configure(&mut self, mode: &str, text: &str) -> Result<(), JsValue> {
        Ok(self.configure_internal(mode, text)?)
    }

    /// Set the plan from JSON, e.g. `{"mode":"range","ranges":[{"start":1,"end":3}]}`
    #[wasm_bindgen(js_name = configureJson)]
    pub fn configure_json(&mut self, json: &str) -> Result<(), JsValue> {
        let plan = SplitPlan::from_json(json).map_err(SessionError::from)?;
        self.plan = Some(plan);
        Ok(())
    }

    #[wasm_bindgen(js_name = setCompressOutput)]
    pub fn set_compress_output(&mut self, compress: bool) {
        self.config.compress_output = compress;
    }

    /// Name used for outputs when the loaded file's name has no stem
    #[wasm_bindgen(js_name = setFallbackBaseName)]
    pub fn set_fallback_base_name(&mut self, name: &str) {
        self.config = self.config.clone().with_fallback_base_name(name);
    }

    #[wasm_bindgen(js_name = canExecute)]
    pub fn can_execute(&self) -> bool {
        self.document.is_some() && self.plan.is_some()
    }

    /// Filenames and descriptions the current plan would produce
    pub fn preview(&self) -> Result<JsValue, JsValue> {
        let previews = self.preview_internal()?;
        to_js(&previews)
    }

    /// Run the split. Returns result summaries; bytes are fetched with `resultBytes`.
    pub fn execute(&mut self) -> Result<JsValue, JsValue> {
        let summaries = self.execute_internal()?;
        to_js(&summaries)
    }

    #[wasm_bindgen(js_name = resultCount)]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    #[wasm_bindgen(js_name = resultBytes)]
    pub fn result_bytes(&self, index: usize) -> Result<js_sys::Uint8Array, JsValue> {
        let result = self
            .results
            .get(index)
            .ok_or(SessionError::NoSuchResult(index))?;

        let array = js_sys::Uint8Array::new_with_length(result.bytes.len() as u32);
        array.copy_from(&result.bytes);
        Ok(array)
    }

    #[wasm_bindgen(js_name = resultSummaries)]
    pub fn result_summaries(&self) -> Result<JsValue, JsValue> {
        let summaries: Vec<ResultSummary> = self.results.iter().map(SplitResult::summary).collect();
        to_js(&summaries)
    }

    /// Drop held result bytes once the page no longer needs them
    #[wasm_bindgen(js_name = clearResults)]
    pub fn clear_results(&mut self) {
        self.results.clear();
    }
}

impl PdfSplitSession {
    fn load_document_internal(
        &mut self,
        name: &str,
        bytes: &[u8],
    ) -> Result<DocumentInfo, SessionError> {
        let document = LoadedDocument::load(bytes).map_err(|e| {
            tracing::warn!(kind = e.kind().as_str(), error = %e, "Rejected document");
            e
        })?;
        let info = document.info();

        self.document = Some(DocumentEntry {
            name: name.to_string(),
            document,
        });
        self.results.clear();

        Ok(info)
    }

    fn configure_internal(&mut self, mode: &str, text: &str) -> Result<(), SessionError> {
        self.plan = Some(SplitPlan::from_text(mode, text)?);
        Ok(())
    }

    fn ready(&self) -> Result<(&DocumentEntry, &SplitPlan), SessionError> {
        let entry = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        let plan = self.plan.as_ref().ok_or(SessionError::NoPlan)?;
        Ok((entry, plan))
    }

    fn packager(&self) -> Packager {
        Packager::with_config(self.config.clone())
    }

    fn preview_internal(&self) -> Result<Vec<GroupPreview>, SessionError> {
        let (entry, plan) = self.ready()?;
        let groups = split(&entry.document, plan)?;
        let packager = self.packager();

        Ok(groups
            .iter()
            .map(|group| GroupPreview {
                filename: packager.filename_for(group, &entry.name),
                page_description: group.label.description(),
                page_count: group.indices.len(),
            })
            .collect())
    }

    fn execute_internal(&mut self) -> Result<Vec<ResultSummary>, SessionError> {
        let (entry, plan) = self.ready()?;

        self.report_progress(0, 100, "Starting...");
        let groups: Vec<PageGroup> = split(&entry.document, plan)?;
        let packager = self.packager();

        let total = groups.len();
        let mut results = Vec::with_capacity(total);
        for (i, group) in groups.iter().enumerate() {
            self.report_progress(
                (i * 100 / total.max(1)) as u32,
                100,
                &format!("Creating file {}/{}...", i + 1, total),
            );
            results.extend(packager.package(
                &entry.document,
                std::slice::from_ref(group),
                &entry.name,
            )?);
        }

        self.report_progress(100, 100, "Complete");

        let summaries = results.iter().map(SplitResult::summary).collect();
        self.results = results;
        Ok(summaries)
    }

    /// Report progress to JavaScript callback
    fn report_progress(&self, current: u32, total: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            let this = JsValue::null();
            let _ = callback.call3(
                &this,
                &JsValue::from(current),
                &JsValue::from(total),
                &JsValue::from_str(message),
            );
        }
    }
}

impl Default for PdfSplitSession {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
