//! Paragraph addressing
//!
//! Converts live positions in a [`DocumentTree`](crate::document::DocumentTree)
//! into `(paragraphIndex, offset)` pairs the analysis server understands:
//!
//! 1. [`identify`] turns a node into its root-to-node [`Path`]
//! 2. [`compare`] orders paths for searching
//! 3. [`locate`] finds a path's index among the document's paragraphs
//! 4. the resolver picks the node and offset out of the host's cursor or
//!    selection and runs the steps above

mod locator;
mod path;
mod resolver;

pub use locator::{locate, locate_linear, LocatorConfig, BRUTE_FORCE_THRESHOLD};
pub use path::{compare, identify, Path};
pub use resolver::{
    find_text_leaf, locate_position, resolve_body_child_index, resolve_current_position,
    resolve_selection_bounds, utf16_len, HostSelection, Position, RangeElement,
};

use serde::{Deserialize, Serialize};

/// Position in paragraph-flattened document order
///
/// `paragraph_index` indexes the document's paragraph list at the moment of
/// resolution; it is not updated by later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Index into the ordered list of all paragraphs
    pub paragraph_index: usize,
    /// Offset inside that paragraph, in UTF-16 code units
    pub offset: usize,
}

impl Address {
    pub fn new(paragraph_index: usize, offset: usize) -> Self {
        Self {
            paragraph_index,
            offset,
        }
    }
}

/// Both ends of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionAddress {
    pub start: Address,
    pub end: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_wire_shape() {
        let json = serde_json::to_string(&Address::new(3, 17)).unwrap();
        assert_eq!(json, r#"{"paragraphIndex":3,"offset":17}"#);

        let parsed: Address = serde_json::from_str(r#"{"offset":2,"paragraphIndex":9}"#).unwrap();
        assert_eq!(parsed, Address::new(9, 2));
    }

    #[test]
    fn test_selection_wire_shape() {
        let selection = SelectionAddress {
            start: Address::new(1, 0),
            end: Address::new(1, 4),
        };
        assert_eq!(
            serde_json::to_string(&selection).unwrap(),
            r#"{"start":{"paragraphIndex":1,"offset":0},"end":{"paragraphIndex":1,"offset":4}}"#
        );
    }

    #[test]
    fn test_address_ordering() {
        assert!(Address::new(0, 9) < Address::new(1, 0));
        assert!(Address::new(2, 3) < Address::new(2, 4));
    }
}
