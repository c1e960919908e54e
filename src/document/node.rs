//! Node identifiers and kinds

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Identifier of a node inside one document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a document element, as reported by the host editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Document body (tree root)
    #[serde(rename = "BODY_SECTION")]
    Body,
    HeaderSection,
    FooterSection,
    FootnoteSection,
    #[default]
    Paragraph,
    ListItem,
    Table,
    TableRow,
    TableCell,
    /// Run of text, the only text-bearing leaf
    Text,
    InlineImage,
    HorizontalRule,
    PageBreak,
    Equation,
    /// Anything the host reports that we do not model
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Check if this kind is listed by the host's paragraph enumeration
    pub fn is_paragraph(&self) -> bool {
        matches!(self, NodeKind::Paragraph | NodeKind::ListItem)
    }

    /// Check if this kind carries text directly
    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text)
    }

    /// Check if this kind can hold children
    pub fn is_container(&self) -> bool {
        !matches!(
            self,
            NodeKind::Text | NodeKind::InlineImage | NodeKind::HorizontalRule | NodeKind::PageBreak
        )
    }
}

/// Arena entry for one node
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    /// Parent node (None for the root and for detached fragments)
    pub parent: Option<NodeId>,
    /// Ordered children
    pub children: SmallVec<[NodeId; 4]>,
    /// Text content, only set for text leaves
    pub text: String,
}

impl NodeData {
    pub fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: SmallVec::new(),
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind() {
        assert!(NodeKind::Paragraph.is_paragraph());
        assert!(NodeKind::ListItem.is_paragraph());
        assert!(!NodeKind::TableCell.is_paragraph());

        assert!(NodeKind::Text.is_text());
        assert!(!NodeKind::Text.is_container());
        assert!(NodeKind::TableCell.is_container());
    }

    #[test]
    fn test_node_kind_wire_names() {
        let json = serde_json::to_string(&NodeKind::TableCell).unwrap();
        assert_eq!(json, "\"TABLE_CELL\"");

        let kind: NodeKind = serde_json::from_str("\"LIST_ITEM\"").unwrap();
        assert_eq!(kind, NodeKind::ListItem);

        let kind: NodeKind = serde_json::from_str("\"FOOTNOTE\"").unwrap();
        assert_eq!(kind, NodeKind::Other);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
