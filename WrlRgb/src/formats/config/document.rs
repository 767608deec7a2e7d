//! Parsed config block

use super::{CREATED_PREFIX, SOURCE_FILE_PREFIX, VERSION_TAG};
use crate::node::ColorNode;

/// A config block as read back from text.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    /// Version tag following `#START`.
    pub version: String,
    /// Text of each `#COMMENT` line, words joined by single spaces.
    pub comments: Vec<String>,
    /// Value of `#NUM_NODES`; informational only.
    pub declared_count: Option<i64>,
    /// Records in block order.
    pub nodes: Vec<ColorNode>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            version: VERSION_TAG.to_string(),
            comments: Vec::new(),
            declared_count: None,
            nodes: Vec::new(),
        }
    }
}

impl ConfigDocument {
    /// Label of the document the block was extracted from.
    pub fn source_file(&self) -> Option<&str> {
        self.comment_value(SOURCE_FILE_PREFIX)
    }

    /// Creation timestamp text.
    pub fn created(&self) -> Option<&str> {
        self.comment_value(CREATED_PREFIX)
    }

    fn comment_value(&self, prefix: &str) -> Option<&str> {
        self.comments
            .iter()
            .find_map(|c| c.strip_prefix(prefix))
            .map(str::trim)
    }

    /// Whether the declared count disagrees with the records read.
    pub fn count_mismatch(&self) -> bool {
        self.declared_count
            .is_some_and(|n| usize::try_from(n).ok() != Some(self.nodes.len()))
    }
}
