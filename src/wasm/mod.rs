//! WASM bindings for the add-on host
//!
//! Documents, selections and requests cross the boundary as JSON strings.
//! Server actions are applied by calling same-named methods on a JS handler
//! object (`highlightText`, `linkText`, `showSidebar`, ...).

use crate::address::{self, Address, HostSelection, LocatorConfig};
use crate::document::{Document, DocumentTree, NodeSnapshot};
use crate::error::{AddressError, ProtocolError};
use crate::protocol::{
    ActionHandler, Bookmark, DispatchOutcome, Outbound, RequestContext, Response, TableType,
    TextRange,
};
use crate::{BookmarkRequest, Session};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Request handed back to JS for posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRequest {
    pub resource: String,
    pub body: String,
}

impl WireRequest {
    fn from_outbound<T: Serialize>(outbound: &Outbound<T>) -> Result<Self, ProtocolError> {
        Ok(Self {
            resource: outbound.resource.to_string(),
            body: outbound.body_json()?,
        })
    }

    fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn wire<T: Serialize>(outbound: &Outbound<T>) -> Result<String, ProtocolError> {
    WireRequest::from_outbound(outbound)?.to_json()
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exposed session wrapper
#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
    document: Document,
}

#[wasm_bindgen]
impl WasmSession {
    #[wasm_bindgen(constructor)]
    pub fn new(document_id: &str, user: &str, user_email: &str) -> Self {
        Self {
            session: Session::new(RequestContext::new(document_id, user, user_email)),
            document: Document::new(),
        }
    }

    /// Window size below which paragraph lookup switches to a linear scan
    #[wasm_bindgen(js_name = setBruteForceThreshold)]
    pub fn set_brute_force_threshold(&mut self, threshold: usize) {
        self.session.config = LocatorConfig {
            brute_force_threshold: threshold,
        };
    }

    /// Replace the document with a host snapshot (nested JSON)
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, snapshot_json: &str) -> Result<(), JsValue> {
        self.load(snapshot_json).map_err(to_js)
    }

    /// Number of paragraph-like elements in the loaded document
    #[wasm_bindgen(js_name = paragraphCount)]
    pub fn paragraph_count(&self) -> usize {
        self.document.paragraphs().len()
    }

    /// Resolve the cursor to `{paragraphIndex, offset}` JSON
    #[wasm_bindgen(js_name = resolvePosition)]
    pub fn resolve_position(&self, selection_json: &str) -> Result<Option<String>, JsValue> {
        self.position_json(selection_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = analyzeFromTop)]
    pub fn analyze_from_top(&self) -> Result<String, JsValue> {
        wire(&self.session.analyze_from_top()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = analyzeFromCursor)]
    pub fn analyze_from_cursor(&self, selection_json: &str) -> Result<Option<String>, JsValue> {
        self.cursor_request(selection_json, |session, doc, state| {
            session.analyze_from_cursor(doc, state)
        })
        .map_err(to_js)
    }

    #[wasm_bindgen(js_name = addBySpelling)]
    pub fn add_by_spelling(&self, selection_json: &str) -> Result<Option<String>, JsValue> {
        self.cursor_request(selection_json, |session, doc, state| {
            session.add_by_spelling_from_cursor(doc, state)
        })
        .map_err(to_js)
    }

    #[wasm_bindgen(js_name = addToRepository)]
    pub fn add_to_repository(&self, selection_json: &str) -> Result<Option<String>, JsValue> {
        self.cursor_request(selection_json, |session, doc, state| {
            session.add_selection_to_repository(doc, state)
        })
        .map_err(to_js)
    }

    /// `table_type` is one of `controls`, `measurements`, `parameters`
    #[wasm_bindgen(js_name = createTableTemplate)]
    pub fn create_table_template(
        &self,
        selection_json: &str,
        table_type: &str,
    ) -> Result<Option<String>, JsValue> {
        self.table_request(selection_json, table_type).map_err(to_js)
    }

    #[wasm_bindgen(js_name = reportExperimentStatus)]
    pub fn report_experiment_status(
        &self,
        selection_json: &str,
    ) -> Result<Option<String>, JsValue> {
        self.status_request(selection_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = executeExperiment)]
    pub fn execute_experiment(&self) -> Result<String, JsValue> {
        wire(&self.session.context.execute_experiment()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = calculateSamples)]
    pub fn calculate_samples(&self) -> Result<String, JsValue> {
        wire(&self.session.context.calculate_samples()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateExperimentalResults)]
    pub fn update_experimental_results(&self) -> Result<String, JsValue> {
        wire(&self.session.context.update_experimental_results()).map_err(to_js)
    }

    /// `bookmarks_json` is a list of `{id, text}`
    #[wasm_bindgen(js_name = generateStructuredRequest)]
    pub fn generate_structured_request(&self, bookmarks_json: &str) -> Result<String, JsValue> {
        self.bookmark_request(BookmarkRequest::GenerateStructured, bookmarks_json)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = validateStructuredRequest)]
    pub fn validate_structured_request(&self, bookmarks_json: &str) -> Result<String, JsValue> {
        self.bookmark_request(BookmarkRequest::ValidateStructured, bookmarks_json)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = generateOpilRequest)]
    pub fn generate_opil_request(&self, bookmarks_json: &str) -> Result<String, JsValue> {
        self.bookmark_request(BookmarkRequest::GenerateOpil, bookmarks_json)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = buttonClick)]
    pub fn button_click(&self, button_id: &str) -> Result<String, JsValue> {
        wire(&self.session.context.button_click(button_id)).map_err(to_js)
    }

    #[wasm_bindgen(js_name = submitForm)]
    pub fn submit_form(&self, form_json: &str) -> Result<String, JsValue> {
        self.form_request(form_json).map_err(to_js)
    }

    /// Post for a dialog script to the resource it names
    #[wasm_bindgen(js_name = postFromClient)]
    pub fn post_from_client(
        &self,
        resource: &str,
        data_json: Option<String>,
    ) -> Result<String, JsValue> {
        self.client_request(resource, data_json.as_deref()).map_err(to_js)
    }

    /// Link to the report page for the current document
    #[wasm_bindgen(js_name = documentReportUrl)]
    pub fn document_report_url(&self, server_url: &str) -> String {
        self.session.context.document_report_url(server_url)
    }

    /// Apply a server response through `handler`
    ///
    /// Returns true when the server has more actions queued and the request
    /// should be posted again.
    #[wasm_bindgen(js_name = processResponse)]
    pub fn process_response(&self, body: &str, handler: &js_sys::Object) -> Result<bool, JsValue> {
        let response = Response::from_json(body).map_err(to_js)?;
        let outcome = response.dispatch(&mut JsActionHandler { target: handler })?;
        Ok(outcome == DispatchOutcome::AwaitingMore)
    }
}

impl WasmSession {
    fn load(&mut self, snapshot_json: &str) -> Result<(), ProtocolError> {
        let snapshot: NodeSnapshot = serde_json::from_str(snapshot_json)?;
        self.document = Document::from_snapshot(&snapshot)?;
        Ok(())
    }

    fn position_json(&self, selection_json: &str) -> Result<Option<String>, ProtocolError> {
        let state: HostSelection = serde_json::from_str(selection_json)?;
        let position: Option<Address> =
            address::resolve_current_position(&self.document, &state, &self.session.config)?;
        position
            .map(|address| serde_json::to_string(&address))
            .transpose()
            .map_err(ProtocolError::from)
    }

    fn cursor_request<T, F>(
        &self,
        selection_json: &str,
        build: F,
    ) -> Result<Option<String>, ProtocolError>
    where
        T: Serialize,
        F: FnOnce(
            &Session,
            &Document,
            &HostSelection,
        ) -> Result<Option<Outbound<T>>, AddressError>,
    {
        let state: HostSelection = serde_json::from_str(selection_json)?;
        build(&self.session, &self.document, &state)?
            .map(|outbound| wire(&outbound))
            .transpose()
    }

    fn table_request(
        &self,
        selection_json: &str,
        table_type: &str,
    ) -> Result<Option<String>, ProtocolError> {
        let state: HostSelection = serde_json::from_str(selection_json)?;
        let table_type: TableType =
            serde_json::from_value(serde_json::Value::String(table_type.to_string()))?;
        self.session
            .create_table_template(&self.document, &state, table_type)
            .map(|outbound| wire(&outbound))
            .transpose()
    }

    fn status_request(&self, selection_json: &str) -> Result<Option<String>, ProtocolError> {
        let state: HostSelection = serde_json::from_str(selection_json)?;
        self.session
            .report_experiment_status(&self.document, &state)
            .map(|outbound| wire(&outbound))
            .transpose()
    }

    fn bookmark_request(
        &self,
        kind: BookmarkRequest,
        bookmarks_json: &str,
    ) -> Result<String, ProtocolError> {
        let bookmarks: Vec<Bookmark> = serde_json::from_str(bookmarks_json)?;
        wire(&self.session.bookmark_request(kind, bookmarks))
    }

    fn form_request(&self, form_json: &str) -> Result<String, ProtocolError> {
        let form: serde_json::Value = serde_json::from_str(form_json)?;
        wire(&self.session.context.submit_form(form))
    }

    fn client_request(
        &self,
        resource: &str,
        data_json: Option<&str>,
    ) -> Result<String, ProtocolError> {
        let data = data_json.map(|json| serde_json::from_str(json)).transpose()?;
        wire(&self.session.context.post_from_client(resource, data))
    }
}

/// Forwards each action to a method of a JS object
///
/// Missing methods are skipped, so the host only implements what it supports.
struct JsActionHandler<'a> {
    target: &'a js_sys::Object,
}

impl JsActionHandler<'_> {
    fn call(&self, name: &str, args: &[JsValue]) -> Result<(), JsValue> {
        let callback = js_sys::Reflect::get(self.target, &JsValue::from_str(name))?;
        let Some(function) = callback.dyn_ref::<js_sys::Function>() else {
            tracing::debug!(name, "host has no handler for action");
            return Ok(());
        };
        let args: js_sys::Array = args.iter().collect();
        function.apply(self.target, &args)?;
        Ok(())
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
        let text = serde_json::to_string(value).map_err(to_js)?;
        js_sys::JSON::parse(&text)
    }

    fn range_args(range: TextRange) -> [JsValue; 3] {
        [
            JsValue::from_f64(range.paragraph_index as f64),
            JsValue::from_f64(range.offset as f64),
            JsValue::from_f64(range.end_offset as f64),
        ]
    }
}

impl ActionHandler for JsActionHandler<'_> {
    type Error = JsValue;

    fn highlight_text(&mut self, range: TextRange) -> Result<(), JsValue> {
        self.call("highlightText", &Self::range_args(range))
    }

    fn link_text(&mut self, range: TextRange, url: &str) -> Result<(), JsValue> {
        let [paragraph, offset, end] = Self::range_args(range);
        self.call("linkText", &[paragraph, offset, end, JsValue::from_str(url)])
    }

    fn show_sidebar(&mut self, html: &str) -> Result<(), JsValue> {
        self.call("showSidebar", &[JsValue::from_str(html)])
    }

    fn update_progress(&mut self, progress: &str) -> Result<(), JsValue> {
        self.call("updateProgress", &[JsValue::from_str(progress)])
    }

    fn show_modal_dialog(
        &mut self,
        html: &str,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<(), JsValue> {
        self.call(
            "showModalDialog",
            &[
                JsValue::from_str(html),
                JsValue::from_str(title),
                JsValue::from_f64(width as f64),
                JsValue::from_f64(height as f64),
            ],
        )
    }

    fn add_table(
        &mut self,
        child_index: usize,
        data: &[Vec<String>],
        col_sizes: &[u32],
        table_type: Option<TableType>,
        lab_data: Option<&[Vec<String>]>,
    ) -> Result<(), JsValue> {
        self.call(
            "addTable",
            &[
                JsValue::from_f64(child_index as f64),
                Self::json(data)?,
                Self::json(col_sizes)?,
                Self::json(&table_type)?,
                Self::json(&lab_data)?,
            ],
        )
    }

    fn calculate_samples(
        &mut self,
        table_ids: &[usize],
        sample_indices: &[i64],
        sample_values: &[Vec<String>],
    ) -> Result<(), JsValue> {
        self.call(
            "calculateSamples",
            &[Self::json(table_ids)?, Self::json(sample_indices)?, Self::json(sample_values)?],
        )
    }

    fn update_experiment_results(
        &mut self,
        header_idx: i64,
        content_idx: i64,
        data: &[Vec<String>],
        links: &[Vec<String>],
    ) -> Result<(), JsValue> {
        self.call(
            "updateExperimentResults",
            &[
                JsValue::from_f64(header_idx as f64),
                JsValue::from_f64(content_idx as f64),
                Self::json(data)?,
                Self::json(links)?,
            ],
        )
    }

    fn report_content(&mut self, report: &serde_json::Value) -> Result<(), JsValue> {
        self.call("reportContent", &[Self::json(report)?])
    }
}
