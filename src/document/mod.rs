//! Document tree model
//!
//! The host editor owns the real document; this module describes the read-only
//! view the addressing code needs ([`DocumentTree`]) and an arena-backed
//! [`Document`] that implements it for snapshots received from the host and
//! for tests.

mod node;
mod snapshot;

pub use node::{NodeId, NodeKind};
pub use snapshot::NodeSnapshot;

use crate::error::DocumentError;
use node::NodeData;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Read access to a hierarchical document
///
/// Implementations must keep `parent`, `children` and `child_index`
/// consistent with each other; the addressing code reports any disagreement
/// as an invalid node state.
pub trait DocumentTree {
    /// The document root (body)
    fn root(&self) -> NodeId;

    /// Check if a node belongs to this tree
    fn contains(&self, node: NodeId) -> bool;

    /// Kind of a node
    fn kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Parent of a node (None for the root)
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Position of `child` in the child list of `parent`
    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&id| id == child)
    }

    /// Ordered children (empty for leaves)
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Text of a text leaf
    fn text(&self, node: NodeId) -> Option<&str>;

    /// All paragraph-like nodes in document order
    fn paragraphs(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![self.root()];

        while let Some(node) = stack.pop() {
            if self.kind(node).is_some_and(|k| k.is_paragraph()) {
                result.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }

        result
    }
}

/// Arena-backed document tree
#[derive(Debug, Clone)]
pub struct Document {
    /// Node storage
    nodes: FxHashMap<NodeId, NodeData>,
    /// Root body node
    root: NodeId,
    /// Monotonic version counter, bumped on every structural or text change
    version: u64,
    /// Next node ID to assign
    next_node_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the body
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = FxHashMap::default();
        nodes.insert(root, NodeData::new(NodeKind::Body, None));

        Self {
            nodes,
            root,
            version: 0,
            next_node_id: 1,
        }
    }

    /// Create a document with one paragraph per line of `text`
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root;

        for line in text.split('\n') {
            if let Err(err) = doc.append_paragraph(root, line) {
                tracing::warn!(%err, "dropping line while building document");
            }
        }

        doc
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the body has no children
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    fn allocate(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, NodeData::new(kind, parent));
        id
    }

    fn container(&self, node: NodeId) -> Result<&NodeData, DocumentError> {
        let data = self
            .nodes
            .get(&node)
            .ok_or(DocumentError::UnknownNode(node))?;
        if !data.kind.is_container() {
            return Err(DocumentError::NotAContainer(node));
        }
        Ok(data)
    }

    /// Append a new child of the given kind
    pub fn append_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
    ) -> Result<NodeId, DocumentError> {
        let len = self.container(parent)?.children.len();
        self.insert_child(parent, len, kind)
    }

    /// Insert a new child of the given kind at `index`
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        kind: NodeKind,
    ) -> Result<NodeId, DocumentError> {
        let len = self.container(parent)?.children.len();
        if index > len {
            return Err(DocumentError::ChildIndexOutOfBounds { parent, index, len });
        }

        let id = self.allocate(kind, Some(parent));
        if let Some(data) = self.nodes.get_mut(&parent) {
            data.children.insert(index, id);
        }
        self.version += 1;

        Ok(id)
    }

    /// Append a text leaf
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DocumentError> {
        let id = self.append_child(parent, NodeKind::Text)?;
        self.set_text(id, text)?;
        Ok(id)
    }

    /// Append a paragraph holding `text` (no text leaf when empty)
    pub fn append_paragraph(
        &mut self,
        parent: NodeId,
        text: &str,
    ) -> Result<NodeId, DocumentError> {
        let para = self.append_child(parent, NodeKind::Paragraph)?;
        if !text.is_empty() {
            self.append_text(para, text)?;
        }
        Ok(para)
    }

    /// Append a table where every cell holds a single paragraph
    pub fn append_table(
        &mut self,
        parent: NodeId,
        rows: &[&[&str]],
    ) -> Result<NodeId, DocumentError> {
        let table = self.append_child(parent, NodeKind::Table)?;
        for cells in rows {
            let row = self.append_child(table, NodeKind::TableRow)?;
            for cell_text in cells.iter() {
                let cell = self.append_child(row, NodeKind::TableCell)?;
                self.append_paragraph(cell, cell_text)?;
            }
        }
        Ok(table)
    }

    /// Replace the text of a text leaf
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DocumentError> {
        let data = self
            .nodes
            .get_mut(&node)
            .ok_or(DocumentError::UnknownNode(node))?;
        if !data.kind.is_text() {
            return Err(DocumentError::NotText(node));
        }
        data.text.clear();
        data.text.push_str(text);
        self.version += 1;
        Ok(())
    }

    /// Unlink a subtree from its parent, keeping its nodes in the arena
    ///
    /// The detached nodes stay addressable by ID but no longer reach the
    /// root, so computing their path fails.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DocumentError> {
        if node == self.root {
            return Err(DocumentError::RootRemoval);
        }
        let parent = self
            .nodes
            .get_mut(&node)
            .ok_or(DocumentError::UnknownNode(node))?
            .parent
            .take();

        if let Some(parent) = parent {
            if let Some(data) = self.nodes.get_mut(&parent) {
                data.children.retain(|id| *id != node);
            }
        }
        self.version += 1;

        Ok(())
    }

    /// Remove a subtree from the document entirely
    pub fn remove(&mut self, node: NodeId) -> Result<(), DocumentError> {
        self.detach(node)?;

        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(node);
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(&id) {
                stack.extend(data.children);
            }
        }

        Ok(())
    }

    /// Concatenated text of all text leaves under `node`
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];

        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.get(&id) {
                out.push_str(&data.text);
                stack.extend(data.children.iter().rev().copied());
            }
        }

        out
    }

    /// Text of the paragraph at `index` in document order
    pub fn paragraph_text(&self, index: usize) -> Option<String> {
        self.paragraphs()
            .get(index)
            .map(|&para| self.text_content(para))
    }
}

impl DocumentTree for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(&node).map(|data| data.kind)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|data| data.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes
            .get(&node)
            .filter(|data| data.kind.is_text())
            .map(|data| data.text.as_str())
    }
}
