//! Paragraph lookup by path

use crate::address::path::{compare, identify, Path};
use crate::document::{DocumentTree, NodeId};
use crate::error::AddressError;
use std::cmp::Ordering;

/// Below this many candidates the search falls back to a linear scan
pub const BRUTE_FORCE_THRESHOLD: usize = 4;

/// Tuning for paragraph lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorConfig {
    /// Window size under which the binary search stops and scans linearly
    pub brute_force_threshold: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            brute_force_threshold: BRUTE_FORCE_THRESHOLD,
        }
    }
}

impl LocatorConfig {
    /// A window of one cannot be halved, so probing stops at two at the latest
    fn threshold(&self) -> usize {
        self.brute_force_threshold.max(2)
    }
}

/// Find the index of the paragraph matching `target`
///
/// `paragraphs` must be in document order. The search halves the window by
/// probing its middle element until fewer than
/// [`LocatorConfig::brute_force_threshold`] candidates remain, then scans those
/// for the first candidate that compares `Equal` to `target`. `Ok(None)` means
/// no paragraph matched.
pub fn locate<T: DocumentTree + ?Sized>(
    tree: &T,
    target: &Path,
    paragraphs: &[NodeId],
    config: &LocatorConfig,
) -> Result<Option<usize>, AddressError> {
    let threshold = config.threshold();
    let mut start = 0;
    let mut len = paragraphs.len();

    while len >= threshold {
        let middle = len / 2;
        let pivot = identify(tree, paragraphs[start + middle])?;

        tracing::trace!(start, len, middle, pivot = %pivot, "paragraph search step");

        if compare(target, &pivot) == Ordering::Less {
            len = middle;
        } else {
            start += middle;
            len -= middle;
        }
    }

    let found = scan(tree, target, &paragraphs[start..start + len])?;
    Ok(found.map(|idx| start + idx))
}

/// Linear scan over every paragraph, same matching rule as [`locate`]
pub fn locate_linear<T: DocumentTree + ?Sized>(
    tree: &T,
    target: &Path,
    paragraphs: &[NodeId],
) -> Result<Option<usize>, AddressError> {
    scan(tree, target, paragraphs)
}

fn scan<T: DocumentTree + ?Sized>(
    tree: &T,
    target: &Path,
    candidates: &[NodeId],
) -> Result<Option<usize>, AddressError> {
    for (idx, &candidate) in candidates.iter().enumerate() {
        let path = identify(tree, candidate)?;
        if compare(target, &path) == Ordering::Equal {
            return Ok(Some(idx));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, NodeKind};

    fn flat(count: usize) -> Document {
        let text: Vec<String> = (0..count).map(|i| format!("P{i}")).collect();
        Document::from_text(&text.join("\n"))
    }

    fn nested() -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_paragraph(root, "intro").unwrap();
        doc.append_table(root, &[&["a", "b", "c"], &["d", "e", "f"]]).unwrap();
        doc.append_paragraph(root, "middle").unwrap();
        let list = doc.append_child(root, NodeKind::ListItem).unwrap();
        doc.append_text(list, "item").unwrap();
        doc.append_table(root, &[&["g"], &["h"]]).unwrap();
        doc.append_paragraph(root, "outro").unwrap();
        doc
    }

    #[test]
    fn test_five_paragraph_scenario() {
        let doc = flat(5);
        let paragraphs = doc.paragraphs();
        let config = LocatorConfig::default();
        let found = locate(&doc, &Path::from([3]), &paragraphs, &config).unwrap();
        assert_eq!(found, Some(3));
    }

    #[test]
    fn test_round_trip_every_paragraph() {
        for doc in [flat(1), flat(3), flat(4), flat(17), nested()] {
            let paragraphs = doc.paragraphs();
            for (idx, &para) in paragraphs.iter().enumerate() {
                let path = identify(&doc, para).unwrap();
                let found = locate(&doc, &path, &paragraphs, &LocatorConfig::default()).unwrap();
                assert_eq!(found, Some(idx), "paragraph {idx} at {path}");
            }
        }
    }

    #[test]
    fn test_binary_search_matches_linear_scan() {
        let doc = nested();
        let paragraphs = doc.paragraphs();
        assert!(paragraphs.len() >= BRUTE_FORCE_THRESHOLD);

        let mut targets = vec![Path::from([99]), Path::from([3, 0, 7])];
        let mut stack = vec![doc.root()];
        while let Some(node) = stack.pop() {
            if doc.kind(node).is_some_and(|k| k.is_paragraph() || k.is_text()) {
                targets.push(identify(&doc, node).unwrap());
            }
            stack.extend(doc.children(node).iter().copied());
        }

        let config = LocatorConfig::default();
        for target in &targets {
            let fast = locate(&doc, target, &paragraphs, &config).unwrap();
            let slow = locate_linear(&doc, target, &paragraphs).unwrap();
            assert_eq!(fast, slow, "target {target}");
        }
    }

    #[test]
    fn test_container_target_matches_a_descendant() {
        // A table, row or cell path compares Equal to every paragraph inside
        // it, so the two searches may pick different ones. Both must pick one
        // of them.
        let doc = nested();
        let paragraphs = doc.paragraphs();
        let config = LocatorConfig::default();

        let mut stack = vec![doc.root()];
        while let Some(node) = stack.pop() {
            stack.extend(doc.children(node).iter().copied());
            let is_container = doc.kind(node).is_some_and(|k| {
                matches!(k, NodeKind::Table | NodeKind::TableRow | NodeKind::TableCell)
            });
            if !is_container {
                continue;
            }

            let target = identify(&doc, node).unwrap();
            let fast = locate(&doc, &target, &paragraphs, &config).unwrap().unwrap();
            let slow = locate_linear(&doc, &target, &paragraphs).unwrap().unwrap();
            for found in [fast, slow] {
                let path = identify(&doc, paragraphs[found]).unwrap();
                assert!(target.is_ancestor_of(&path), "target {target} matched {path}");
            }
        }
    }

    #[test]
    fn test_small_list_uses_linear_scan() {
        // The root path compares Equal to every paragraph: a scan stops at the
        // first one, a look at the middle would move the window right.
        let doc = flat(3);
        let paragraphs = doc.paragraphs();
        let found = locate(&doc, &Path::root(), &paragraphs, &LocatorConfig::default()).unwrap();
        assert_eq!(found, Some(0));

        let eager = LocatorConfig { brute_force_threshold: 2 };
        let found = locate(&doc, &Path::root(), &paragraphs, &eager).unwrap();
        assert_eq!(found, Some(2));
    }

    #[test]
    fn test_threshold_below_two_still_terminates() {
        let doc = flat(5);
        let paragraphs = doc.paragraphs();
        let config = LocatorConfig { brute_force_threshold: 0 };
        for (idx, &para) in paragraphs.iter().enumerate() {
            let path = identify(&doc, para).unwrap();
            assert_eq!(locate(&doc, &path, &paragraphs, &config).unwrap(), Some(idx));
        }
    }

    #[test]
    fn test_not_found() {
        let doc = flat(6);
        let paragraphs = doc.paragraphs();
        let config = LocatorConfig::default();

        assert_eq!(locate(&doc, &Path::from([42]), &paragraphs, &config).unwrap(), None);
        assert_eq!(locate(&doc, &Path::from([2, 0]), &paragraphs, &config).unwrap(), None);
        assert_eq!(locate(&doc, &Path::from([0]), &[], &config).unwrap(), None);
    }

    #[test]
    fn test_empty_table_cell_not_found() {
        let mut doc = Document::from_text("a\nb\nc\nd");
        let root = doc.root();
        let table = doc.append_child(root, NodeKind::Table).unwrap();
        let row = doc.append_child(table, NodeKind::TableRow).unwrap();
        let cell = doc.append_child(row, NodeKind::TableCell).unwrap();
        doc.append_paragraph(root, "e").unwrap();

        let paragraphs = doc.paragraphs();
        let target = identify(&doc, cell).unwrap();
        assert_eq!(
            locate(&doc, &target, &paragraphs, &LocatorConfig::default()).unwrap(),
            None
        );
    }

    #[test]
    fn test_stale_candidate_is_an_error() {
        let mut doc = flat(8);
        let paragraphs = doc.paragraphs();
        doc.detach(paragraphs[4]).unwrap();

        let result = locate(&doc, &Path::from([6]), &paragraphs, &LocatorConfig::default());
        assert!(matches!(result, Err(AddressError::InvalidNodeState { .. })));
    }
}
