//! Edit instructions sent back by the analysis server

use crate::address::Address;
use serde::{Deserialize, Serialize};

/// A span of text inside one paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub paragraph_index: usize,
    pub offset: usize,
    /// Inclusive end offset
    pub end_offset: usize,
}

impl TextRange {
    pub fn new(paragraph_index: usize, offset: usize, end_offset: usize) -> Self {
        Self {
            paragraph_index,
            offset,
            end_offset,
        }
    }

    pub fn start(&self) -> Address {
        Address::new(self.paragraph_index, self.offset)
    }

    pub fn end(&self) -> Address {
        Address::new(self.paragraph_index, self.end_offset)
    }
}

/// Kind of table template the server can insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    Controls,
    Measurements,
    Parameters,
}

/// One server instruction, tagged by its `action` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Select a span so the user sees it
    HighlightText {
        paragraph_index: usize,
        offset: usize,
        end_offset: usize,
    },
    /// Turn a span into a hyperlink
    LinkText {
        paragraph_index: usize,
        offset: usize,
        end_offset: usize,
        url: String,
    },
    ShowSidebar {
        html: String,
    },
    /// Show a progress sidebar; more actions follow
    ShowProgressbar {
        html: String,
    },
    /// Progress report; more actions follow
    UpdateProgress {
        progress: String,
    },
    ShowModalDialog {
        html: String,
        title: String,
        width: u32,
        height: u32,
    },
    /// Insert a table before the body child at `cursor_child_index`
    #[serde(rename_all = "camelCase")]
    AddTable {
        cursor_child_index: usize,
        table_data: Vec<Vec<String>>,
        col_sizes: Vec<u32>,
        table_type: Option<TableType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_lab: Option<Vec<Vec<String>>>,
    },
    /// Fill the samples column of measurement tables
    #[serde(rename_all = "camelCase")]
    CalculateSamples {
        table_ids: Vec<usize>,
        /// Column index per table, negative when the column must be created
        sample_indices: Vec<i64>,
        sample_values: Vec<Vec<String>>,
    },
    /// Write experiment results, replacing the paragraph at `content_idx`
    /// or appending a new section when either index is -1
    #[serde(rename_all = "camelCase")]
    UpdateExperimentResults {
        header_idx: i64,
        content_idx: i64,
        exp_data: Vec<Vec<String>>,
        exp_links: Vec<Vec<String>>,
    },
    ReportContent {
        report: serde_json::Value,
    },
    /// Any action tag this client does not know
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Span targeted by a text action
    pub fn text_range(&self) -> Option<TextRange> {
        match *self {
            Action::HighlightText {
                paragraph_index,
                offset,
                end_offset,
            }
            | Action::LinkText {
                paragraph_index,
                offset,
                end_offset,
                ..
            } => Some(TextRange::new(paragraph_index, offset, end_offset)),
            _ => None,
        }
    }

    /// Check if this action tells the client to keep polling
    pub fn expects_more(&self) -> bool {
        matches!(self, Action::ShowProgressbar { .. } | Action::UpdateProgress { .. })
    }
}
