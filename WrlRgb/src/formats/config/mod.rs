//! Node config block format
//!
//! ```text
//! #START V001
//! #COMMENT source file : scene.wrl
//! #COMMENT created : Sun Oct 18 12:00:00 2026
//! #NUM_NODES 1
//! #NODE Box1 0.5 0.5 0.5
//! #END
//! ```
//!
//! The same block is written to companion config files and injected into
//! documents as history by the replace engine.

mod document;
mod reader;
mod writer;

pub use document::ConfigDocument;
pub use reader::{ConfigReader, ConfigState, parse_config, parse_config_str, read_config};
pub use writer::{TIMESTAMP_FORMAT, serialize_config, serialize_config_at, write_config};

/// Opens a block
pub const START: &str = "#START";
/// The only supported format version
pub const VERSION_TAG: &str = "V001";
/// Free text up to the next keyword
pub const COMMENT: &str = "#COMMENT";
/// Declared record count
pub const NUM_NODES: &str = "#NUM_NODES";
/// One record: name, red, green, blue
pub const NODE: &str = "#NODE";
/// Closes a block
pub const END: &str = "#END";
/// Name token standing in for an empty node name
pub const UNNAMED: &str = "-";

/// Comment prefix carrying the source document label
pub const SOURCE_FILE_PREFIX: &str = "source file :";
/// Comment prefix carrying the creation timestamp
pub const CREATED_PREFIX: &str = "created :";
