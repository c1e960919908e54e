//! Hierarchical node paths and their search ordering

use crate::document::{DocumentTree, NodeId};
use crate::error::{AddressError, NodeFault};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// Root-to-node sequence of child indices
///
/// A path is only valid for the tree state it was computed from: inserting or
/// removing a sibling ahead of any node on the path shifts it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(SmallVec<[usize; 8]>);

impl Path {
    /// Path of the root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Check if `self` is a strict prefix of `other` (an ancestor's path)
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.len() < other.len() && other.0.starts_with(&self.0)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(indices))
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.iter().copied().collect())
    }
}

/// Dotted form, every index followed by a dot: `0.3.1.`
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in &self.0 {
            write!(f, "{idx}.")?;
        }
        Ok(())
    }
}

/// Compute the path from the document root to `node`
///
/// Walks parent links up to the root, recording the node's index within each
/// parent. Fails if the chain is broken or loops rather than returning a
/// partial path.
pub fn identify<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> Result<Path, AddressError> {
    if !tree.contains(node) {
        return Err(AddressError::invalid(node, NodeFault::Unknown));
    }

    let mut indices: SmallVec<[usize; 8]> = SmallVec::new();
    let mut visited: SmallVec<[NodeId; 8]> = SmallVec::new();
    let mut current = node;

    while let Some(parent) = tree.parent(current) {
        visited.push(current);
        if visited.contains(&parent) {
            return Err(AddressError::invalid(node, NodeFault::Cycle { at: parent }));
        }
        let idx = tree
            .child_index(parent, current)
            .ok_or(AddressError::invalid(node, NodeFault::BrokenParentLink { parent }))?;
        indices.push(idx);
        current = parent;
    }

    if current != tree.root() {
        return Err(AddressError::invalid(node, NodeFault::Detached { top: current }));
    }

    indices.reverse();
    Ok(Path(indices))
}

/// Order two paths for paragraph search
///
/// Indices are compared pairwise; the first difference decides. When one path
/// runs out first the result is deliberately asymmetric:
///
/// - `a` is a strict prefix of `b` (`a` is an ancestor): `Equal`
/// - `b` is a strict prefix of `a` (`a` is a descendant): `Less`
///
/// So this is not a total order and `Equal` does not mean the paths are the
/// same; compare lengths as well when that matters.
pub fn compare(a: &Path, b: &Path) -> Ordering {
    for (x, y) in a.0.iter().zip(b.0.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }

    if a.len() > b.len() {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}
