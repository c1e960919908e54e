//! Wire protocol with the analysis server
//!
//! Requests carry resolved [`Address`](crate::address::Address) values inside
//! a [`RequestEnvelope`]; responses carry a list of [`Action`]s that the host
//! applies through an [`ActionHandler`].

mod action;
mod dispatch;
mod request;

pub use action::{Action, TableType, TextRange};
pub use dispatch::{dispatch, ActionHandler, DispatchOutcome};
pub use request::{
    Bookmark, Bookmarks, ButtonClick, ChildIndex, Outbound, RequestContext, RequestEnvelope,
    TableTemplate, ADD_BY_SPELLING, ADD_TO_SYNBIOHUB, ANALYZE_DOCUMENT, BUTTON_CLICK,
    CALCULATE_SAMPLES, CREATE_TABLE_TEMPLATE, DOCUMENT_REPORT, EXECUTE_EXPERIMENT,
    GENERATE_OPIL_REQUEST, GENERATE_STRUCTURED_REQUEST, REPORT_EXPERIMENT_STATUS, SUBMIT_FORM,
    UPDATE_EXPERIMENTAL_RESULTS, VALIDATE_STRUCTURED_REQUEST,
};

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// Server reply to any request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<serde_json::Value>,
}

impl Response {
    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Apply the response's actions; a response without actions is complete
    pub fn dispatch<H: ActionHandler + ?Sized>(
        &self,
        handler: &mut H,
    ) -> Result<DispatchOutcome, H::Error> {
        match &self.actions {
            Some(actions) => dispatch(actions, handler),
            None => Ok(DispatchOutcome::Complete),
        }
    }
}
