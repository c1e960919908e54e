//! Cursor and selection resolution

use crate::address::locator::{locate, LocatorConfig};
use crate::address::path::identify;
use crate::address::{Address, SelectionAddress};
use crate::document::{DocumentTree, NodeId};
use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A point inside a host element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub node: NodeId,
    /// Offset inside the element. Structural elements only report 0 or 1.
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// One element of a host selection
///
/// Offsets are absent when the whole element is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeElement {
    pub node: NodeId,
    #[serde(default)]
    pub start_offset: Option<usize>,
    #[serde(default)]
    pub end_offset_inclusive: Option<usize>,
}

impl RangeElement {
    /// A partially selected element
    pub fn partial(node: NodeId, start_offset: usize, end_offset_inclusive: usize) -> Self {
        Self {
            node,
            start_offset: Some(start_offset),
            end_offset_inclusive: Some(end_offset_inclusive),
        }
    }

    /// A fully selected element
    pub fn whole(node: NodeId) -> Self {
        Self {
            node,
            start_offset: None,
            end_offset_inclusive: None,
        }
    }
}

/// Cursor and selection as reported by the host editor
///
/// The host reports a cursor only when nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSelection {
    #[serde(default)]
    pub cursor: Option<Position>,
    #[serde(default)]
    pub selection: Option<Vec<RangeElement>>,
}

impl HostSelection {
    pub fn cursor(node: NodeId, offset: usize) -> Self {
        Self {
            cursor: Some(Position::new(node, offset)),
            selection: None,
        }
    }

    pub fn range(elements: Vec<RangeElement>) -> Self {
        Self {
            cursor: None,
            selection: Some(elements),
        }
    }

    fn first_element(&self) -> Option<&RangeElement> {
        self.selection.as_ref().and_then(|elements| elements.first())
    }

    fn last_element(&self) -> Option<&RangeElement> {
        self.selection.as_ref().and_then(|elements| elements.last())
    }
}

/// Length of `text` as the host counts it (UTF-16 code units)
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// First text leaf under `node` in depth-first order, `node` included
pub fn find_text_leaf<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> Option<NodeId> {
    if tree.kind(node)?.is_text() {
        return Some(node);
    }

    tree.children(node)
        .iter()
        .find_map(|&child| find_text_leaf(tree, child))
}

/// First text leaf under `node` and the offset of its last character
fn last_char<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> Option<(NodeId, usize)> {
    let leaf = find_text_leaf(tree, node)?;
    let len = tree.text(leaf).map(utf16_len).unwrap_or(0);
    Some((leaf, len.saturating_sub(1)))
}

/// `node` and its ancestors, nearest first; stops early if parent links loop
fn ancestors_or_self<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> SmallVec<[NodeId; 8]> {
    let mut chain = SmallVec::new();
    let mut current = Some(node);
    while let Some(id) = current {
        if chain.contains(&id) {
            break;
        }
        chain.push(id);
        current = tree.parent(id);
    }
    chain
}

/// First paragraph-like node under `node` in document order
fn first_paragraph_within<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> Option<NodeId> {
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        if tree.kind(id).is_some_and(|k| k.is_paragraph()) {
            return Some(id);
        }
        stack.extend(tree.children(id).iter().rev().copied());
    }
    None
}

/// Node whose path is searched for when addressing `node`
///
/// The nearest paragraph-like ancestor-or-self. A container above paragraph
/// level (table, row, cell) is pinned to the first paragraph it holds, since
/// its own path matches every paragraph inside it. Otherwise `node` itself.
fn anchor_of<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> NodeId {
    ancestors_or_self(tree, node)
        .into_iter()
        .find(|&id| tree.kind(id).is_some_and(|k| k.is_paragraph()))
        .or_else(|| first_paragraph_within(tree, node))
        .unwrap_or(node)
}

/// Convert an element and in-element offset into a paragraph address
///
/// Elements inside a paragraph (text runs, inline images) are addressed by
/// that paragraph, containers by the first paragraph they hold. `Ok(None)`
/// means the element does not belong to any paragraph in the current
/// document.
pub fn locate_position<T: DocumentTree + ?Sized>(
    tree: &T,
    position: Position,
    config: &LocatorConfig,
) -> Result<Option<Address>, AddressError> {
    // Validates the ancestor chain before anything else walks it
    let own_path = identify(tree, position.node)?;
    let anchor = anchor_of(tree, position.node);
    let path = if anchor == position.node {
        own_path
    } else {
        identify(tree, anchor)?
    };
    let paragraphs = tree.paragraphs();

    let found = locate(tree, &path, &paragraphs, config)?;
    if found.is_none() {
        tracing::debug!(
            node = %position.node,
            path = %path,
            "position does not resolve to a paragraph"
        );
    }

    Ok(found.map(|paragraph_index| Address::new(paragraph_index, position.offset)))
}

/// Inclusive end of a selected element
///
/// A whole-element selection ends at the last character of the element's
/// first text leaf.
fn element_end<T: DocumentTree + ?Sized>(tree: &T, element: &RangeElement) -> Position {
    match element.end_offset_inclusive {
        Some(offset) => Position::new(element.node, offset),
        None => match last_char(tree, element.node) {
            Some((leaf, offset)) => Position::new(leaf, offset),
            None => Position::new(element.node, 0),
        },
    }
}

/// Resolve the host's current cursor, or the end of the first selected
/// element when a range is selected
///
/// A structural element with a non-zero offset means the caret sits at its
/// end; the offset is then moved to the last character of the element's first
/// text leaf.
pub fn resolve_current_position<T: DocumentTree + ?Sized>(
    tree: &T,
    state: &HostSelection,
    config: &LocatorConfig,
) -> Result<Option<Address>, AddressError> {
    let mut position = match (state.cursor, state.first_element()) {
        (Some(cursor), _) => cursor,
        (None, Some(element)) => {
            tracing::debug!(node = %element.node, "no cursor, using end of selection");
            element_end(tree, element)
        }
        (None, None) => {
            tracing::debug!("no cursor or selection to resolve");
            return Ok(None);
        }
    };

    let is_text = tree.kind(position.node).is_some_and(|k| k.is_text());
    if !is_text && position.offset > 0 {
        if let Some((leaf, offset)) = last_char(tree, position.node) {
            tracing::trace!(node = %position.node, %leaf, offset, "caret at end of element");
            // The offset now belongs to `leaf`, so address its paragraph
            position = Position::new(leaf, offset);
        }
    }

    locate_position(tree, position, config)
}

/// Resolve the start of the first and the inclusive end of the last selected
/// element
pub fn resolve_selection_bounds<T: DocumentTree + ?Sized>(
    tree: &T,
    state: &HostSelection,
    config: &LocatorConfig,
) -> Result<Option<SelectionAddress>, AddressError> {
    let (Some(first), Some(last)) = (state.first_element(), state.last_element()) else {
        return Ok(None);
    };

    let start = Position::new(first.node, first.start_offset.unwrap_or(0));
    let end = element_end(tree, last);

    let Some(start) = locate_position(tree, start, config)? else {
        return Ok(None);
    };
    let Some(end) = locate_position(tree, end, config)? else {
        return Ok(None);
    };

    Ok(Some(SelectionAddress { start, end }))
}

/// Index among the body's children of the top-level element holding the
/// cursor (or the first selected element)
pub fn resolve_body_child_index<T: DocumentTree + ?Sized>(
    tree: &T,
    state: &HostSelection,
) -> Option<usize> {
    let node = match (state.cursor, state.first_element()) {
        (Some(cursor), _) => cursor.node,
        (None, Some(element)) => element.node,
        (None, None) => return None,
    };

    let root = tree.root();
    ancestors_or_self(tree, node)
        .into_iter()
        .find(|&id| tree.parent(id) == Some(root))
        .and_then(|top| tree.child_index(root, top))
}
