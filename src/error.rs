//! Error types for document addressing and the wire protocol.
//!
//! A position that simply does not resolve is not an error: lookups return
//! `Ok(None)` for that case and callers treat it as "nothing to operate on".

use crate::document::NodeId;
use thiserror::Error;

/// Why a node's ancestor chain could not be walked to the root.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFault {
    /// The node is not present in the tree at all.
    #[error("node is not part of the document")]
    Unknown,

    /// The parent does not list the node among its children.
    #[error("parent {parent} does not list it as a child")]
    BrokenParentLink { parent: NodeId },

    /// The walk ended at a parentless node other than the document root.
    #[error("ancestor chain ends at {top}, not at the document root")]
    Detached { top: NodeId },

    /// Parent links loop back to a node already visited.
    #[error("ancestor chain loops back to {at}")]
    Cycle { at: NodeId },
}

/// Errors raised while turning document positions into addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AddressError {
    /// The tree invariant was violated while computing a path. This is a
    /// caller bug (holding a node that no longer belongs to the document).
    #[error("invalid node state for {node}: {fault}")]
    InvalidNodeState { node: NodeId, fault: NodeFault },
}

impl AddressError {
    pub(crate) fn invalid(node: NodeId, fault: NodeFault) -> Self {
        AddressError::InvalidNodeState { node, fault }
    }
}

/// Errors raised while building or restoring an in-memory document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    /// Referenced node does not exist.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Tried to add children to a leaf.
    #[error("node {0} cannot hold children")]
    NotAContainer(NodeId),

    /// Tried to set text on something other than a text leaf.
    #[error("node {0} is not a text node")]
    NotText(NodeId),

    /// Child index past the end of the child list.
    #[error("child index {index} out of bounds for {parent} ({len} children)")]
    ChildIndexOutOfBounds {
        parent: NodeId,
        index: usize,
        len: usize,
    },

    /// The document root cannot be removed or detached.
    #[error("cannot remove the document root")]
    RootRemoval,
}

/// Errors raised while encoding or decoding wire messages.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProtocolError {
    /// JSON was malformed or did not match the expected shape.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot could not be turned into a document.
    #[error("invalid document snapshot: {0}")]
    Snapshot(#[from] DocumentError),

    /// Address resolution failed on the received document.
    #[error(transparent)]
    Address(#[from] AddressError),
}
