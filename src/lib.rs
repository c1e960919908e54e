//! doc-address: paragraph addressing for a document-analysis editor add-on
//!
//! The add-on forwards menu actions to a remote analysis server and replays
//! the server's edit instructions on the open document. Both directions talk
//! about positions as `{paragraphIndex, offset}` pairs. This crate provides:
//! - A read-only document tree interface plus an arena implementation
//! - Path computation and paragraph lookup by binary search
//! - Cursor and selection resolution into addresses
//! - Request envelopes and typed server actions with explicit dispatch
//! - WASM bindings for the JS host

pub mod address;
pub mod document;
pub mod error;
pub mod protocol;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmSession;

// Re-export primary types
pub use address::{
    Address, HostSelection, LocatorConfig, Path, Position, RangeElement, SelectionAddress,
};
pub use document::{Document, DocumentTree, NodeId, NodeKind, NodeSnapshot};
pub use error::{AddressError, DocumentError, NodeFault, ProtocolError};
pub use protocol::{
    Action, ActionHandler, Bookmark, DispatchOutcome, Outbound, RequestContext, Response,
    TableType,
};

/// One user's add-on session on one document
///
/// Each method resolves the host's current cursor or selection and builds the
/// request for the matching menu action. `Ok(None)` means there was nothing
/// to operate on and no request should be sent.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub context: RequestContext,
    pub config: LocatorConfig,
}

impl Session {
    /// Create a session with the default locator configuration
    pub fn new(context: RequestContext) -> Self {
        Self {
            context,
            config: LocatorConfig::default(),
        }
    }

    /// Override the locator configuration
    pub fn with_config(mut self, config: LocatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Analyze the document starting at the cursor
    pub fn analyze_from_cursor<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        state: &HostSelection,
    ) -> Result<Option<Outbound<Address>>, AddressError> {
        let cursor = address::resolve_current_position(tree, state, &self.config)?;
        Ok(cursor.map(|address| self.context.analyze_from_cursor(address)))
    }

    /// Analyze the whole document
    pub fn analyze_from_top(&self) -> Outbound<Address> {
        self.context.analyze_from_top()
    }

    /// Suggest dictionary additions by spelling, starting at the cursor
    pub fn add_by_spelling_from_cursor<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        state: &HostSelection,
    ) -> Result<Option<Outbound<Address>>, AddressError> {
        let cursor = address::resolve_current_position(tree, state, &self.config)?;
        Ok(cursor.map(|address| self.context.add_by_spelling(Some(address))))
    }

    /// Submit the selected text to the repository
    pub fn add_selection_to_repository<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        state: &HostSelection,
    ) -> Result<Option<Outbound<SelectionAddress>>, AddressError> {
        let bounds = address::resolve_selection_bounds(tree, state, &self.config)?;
        Ok(bounds.map(|selection| self.context.add_to_synbiohub(selection)))
    }

    /// Ask for a table template to be inserted at the cursor's body position
    pub fn create_table_template<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        state: &HostSelection,
        table_type: TableType,
    ) -> Option<Outbound<protocol::TableTemplate>> {
        let child_index = address::resolve_body_child_index(tree, state)?;
        Some(self.context.create_table_template(child_index, table_type))
    }

    /// Ask for the status of the experiment at the cursor's body position
    pub fn report_experiment_status<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        state: &HostSelection,
    ) -> Option<Outbound<protocol::ChildIndex>> {
        let child_index = address::resolve_body_child_index(tree, state)?;
        Some(self.context.report_experiment_status(child_index))
    }

    /// Build a structured-request, validation or OPIL request from the
    /// document's bookmarks
    pub fn bookmark_request(
        &self,
        kind: BookmarkRequest,
        bookmarks: Vec<Bookmark>,
    ) -> Outbound<protocol::Bookmarks> {
        match kind {
            BookmarkRequest::GenerateStructured => {
                self.context.generate_structured_request(bookmarks)
            }
            BookmarkRequest::ValidateStructured => {
                self.context.validate_structured_request(bookmarks)
            }
            BookmarkRequest::GenerateOpil => self.context.generate_opil_request(bookmarks),
        }
    }
}

/// Menu actions that send the document's bookmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkRequest {
    GenerateStructured,
    ValidateStructured,
    GenerateOpil,
}
