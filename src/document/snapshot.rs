//! Serializable document snapshots
//!
//! The host hands its element tree over as nested JSON. Node IDs are assigned
//! in pre-order, so the root is always `#0` and the host can name any element
//! by counting in the same order.

use super::node::NodeData;
use super::{Document, NodeId, NodeKind};
use crate::error::DocumentError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One element of a host document and its subtree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Create a childless element
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Create a text leaf
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Add a child, builder style
    pub fn with_child(mut self, child: NodeSnapshot) -> Self {
        self.children.push(child);
        self
    }
}

impl Document {
    /// Rebuild a document from a host snapshot
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> Result<Self, DocumentError> {
        let mut doc = Self {
            nodes: FxHashMap::default(),
            root: NodeId(0),
            version: 0,
            next_node_id: 0,
        };
        doc.root = doc.restore(snapshot, None)?;
        Ok(doc)
    }

    fn restore(
        &mut self,
        snapshot: &NodeSnapshot,
        parent: Option<NodeId>,
    ) -> Result<NodeId, DocumentError> {
        let id = self.allocate(snapshot.kind, parent);

        if !snapshot.text.is_empty() {
            if !snapshot.kind.is_text() {
                return Err(DocumentError::NotText(id));
            }
            if let Some(data) = self.nodes.get_mut(&id) {
                data.text = snapshot.text.clone();
            }
        }

        if !snapshot.children.is_empty() && !snapshot.kind.is_container() {
            return Err(DocumentError::NotAContainer(id));
        }

        for child in &snapshot.children {
            let child_id = self.restore(child, Some(id))?;
            if let Some(data) = self.nodes.get_mut(&id) {
                data.children.push(child_id);
            }
        }

        Ok(id)
    }

    /// Capture the tree under the root as a snapshot
    pub fn to_snapshot(&self) -> NodeSnapshot {
        self.snapshot_of(self.root)
    }

    fn snapshot_of(&self, node: NodeId) -> NodeSnapshot {
        match self.nodes.get(&node) {
            Some(NodeData { kind, children, text, .. }) => NodeSnapshot {
                kind: *kind,
                text: text.clone(),
                children: children.iter().map(|&c| self.snapshot_of(c)).collect(),
            },
            None => NodeSnapshot::new(NodeKind::Other),
        }
    }
}
