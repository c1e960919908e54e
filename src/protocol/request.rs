//! Outbound request envelopes
//!
//! Every menu action posts a JSON body of the form
//! `{"documentId", "user", "userEmail", "data"?}` to a server resource.

use crate::address::{Address, SelectionAddress};
use crate::error::ProtocolError;
use crate::protocol::action::TableType;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const ANALYZE_DOCUMENT: &str = "/analyzeDocument";
pub const ADD_TO_SYNBIOHUB: &str = "/addToSynBioHub";
pub const ADD_BY_SPELLING: &str = "/addBySpelling";
pub const CREATE_TABLE_TEMPLATE: &str = "/createTableTemplate";
pub const BUTTON_CLICK: &str = "/buttonClick";
pub const SUBMIT_FORM: &str = "/submitForm";
pub const CALCULATE_SAMPLES: &str = "/calculateSamples";
pub const UPDATE_EXPERIMENTAL_RESULTS: &str = "/updateExperimentalResults";
pub const EXECUTE_EXPERIMENT: &str = "/executeExperiment";
pub const REPORT_EXPERIMENT_STATUS: &str = "/reportExperimentStatus";
pub const GENERATE_STRUCTURED_REQUEST: &str = "/generateStructuredRequest";
pub const VALIDATE_STRUCTURED_REQUEST: &str = "/validateStructuredRequest";
pub const GENERATE_OPIL_REQUEST: &str = "/generateOpilRequest";

/// Page serving the analysis report; linked to, not posted
pub const DOCUMENT_REPORT: &str = "/document_report";

/// JSON body of every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope<T> {
    pub document_id: String,
    pub user: String,
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// A request ready to post: target resource plus body
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound<T> {
    pub resource: Cow<'static, str>,
    pub envelope: RequestEnvelope<T>,
}

impl<T: Serialize> Outbound<T> {
    /// Serialize the body
    pub fn body_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(&self.envelope)?)
    }
}

/// `data` of requests that name a top-level body element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildIndex {
    pub child_index: usize,
}

/// `data` of a table template request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableTemplate {
    pub child_index: usize,
    pub table_type: TableType,
}

/// `data` of a button press in a server-rendered dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClick {
    pub button_id: String,
}

/// A named anchor in the document and the text it marks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub text: String,
}

impl Bookmark {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// `data` of the structured-request and OPIL requests
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bookmarks {
    pub bookmarks: Vec<Bookmark>,
}

/// Who is asking, about which document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub document_id: String,
    pub user: String,
    pub user_email: String,
}

impl RequestContext {
    pub fn new(
        document_id: impl Into<String>,
        user: impl Into<String>,
        user_email: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            user: user.into(),
            user_email: user_email.into(),
        }
    }

    /// Wrap `data` in an envelope for `resource`
    pub fn request<T>(
        &self,
        resource: impl Into<Cow<'static, str>>,
        data: Option<T>,
    ) -> Outbound<T> {
        Outbound {
            resource: resource.into(),
            envelope: RequestEnvelope {
                document_id: self.document_id.clone(),
                user: self.user.clone(),
                user_email: self.user_email.clone(),
                data,
            },
        }
    }

    pub fn analyze_from_top(&self) -> Outbound<Address> {
        self.request(ANALYZE_DOCUMENT, None)
    }

    pub fn analyze_from_cursor(&self, cursor: Address) -> Outbound<Address> {
        self.request(ANALYZE_DOCUMENT, Some(cursor))
    }

    pub fn add_by_spelling(&self, cursor: Option<Address>) -> Outbound<Address> {
        self.request(ADD_BY_SPELLING, cursor)
    }

    pub fn add_to_synbiohub(&self, selection: SelectionAddress) -> Outbound<SelectionAddress> {
        self.request(ADD_TO_SYNBIOHUB, Some(selection))
    }

    pub fn create_table_template(
        &self,
        child_index: usize,
        table_type: TableType,
    ) -> Outbound<TableTemplate> {
        self.request(
            CREATE_TABLE_TEMPLATE,
            Some(TableTemplate {
                child_index,
                table_type,
            }),
        )
    }

    pub fn button_click(&self, button_id: impl Into<String>) -> Outbound<ButtonClick> {
        self.request(
            BUTTON_CLICK,
            Some(ButtonClick {
                button_id: button_id.into(),
            }),
        )
    }

    pub fn calculate_samples(&self) -> Outbound<()> {
        self.request(CALCULATE_SAMPLES, None)
    }

    pub fn update_experimental_results(&self) -> Outbound<()> {
        self.request(UPDATE_EXPERIMENTAL_RESULTS, None)
    }

    pub fn execute_experiment(&self) -> Outbound<()> {
        self.request(EXECUTE_EXPERIMENT, None)
    }

    /// Status report for the experiment section at `child_index`
    pub fn report_experiment_status(&self, child_index: usize) -> Outbound<ChildIndex> {
        self.request(REPORT_EXPERIMENT_STATUS, Some(ChildIndex { child_index }))
    }

    pub fn generate_structured_request(&self, bookmarks: Vec<Bookmark>) -> Outbound<Bookmarks> {
        self.request(GENERATE_STRUCTURED_REQUEST, Some(Bookmarks { bookmarks }))
    }

    pub fn validate_structured_request(&self, bookmarks: Vec<Bookmark>) -> Outbound<Bookmarks> {
        self.request(VALIDATE_STRUCTURED_REQUEST, Some(Bookmarks { bookmarks }))
    }

    pub fn generate_opil_request(&self, bookmarks: Vec<Bookmark>) -> Outbound<Bookmarks> {
        self.request(GENERATE_OPIL_REQUEST, Some(Bookmarks { bookmarks }))
    }

    /// Form values from a server-rendered dialog, passed through as-is
    pub fn submit_form(&self, form: serde_json::Value) -> Outbound<serde_json::Value> {
        self.request(SUBMIT_FORM, Some(form))
    }

    /// Post on behalf of a dialog script to a resource it names
    pub fn post_from_client(
        &self,
        resource: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Outbound<serde_json::Value> {
        let resource: String = resource.into();
        self.request(resource, data)
    }

    /// Link to the report page for this document on `server_url`
    pub fn document_report_url(&self, server_url: &str) -> String {
        format!(
            "{}{}?{}",
            server_url.trim_end_matches('/'),
            DOCUMENT_REPORT,
            self.document_id
        )
    }
}
