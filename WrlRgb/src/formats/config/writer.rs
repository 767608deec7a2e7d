//! Config block writing

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDateTime};

use super::{COMMENT, CREATED_PREFIX, END, NODE, NUM_NODES, SOURCE_FILE_PREFIX, START, UNNAMED, VERSION_TAG};
use crate::error::{Error, Result};
use crate::node::ColorNode;

/// `asctime`-style creation timestamp
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Serialize records into a config block stamped with the current local time.
pub fn serialize_config(nodes: &[ColorNode], source_label: &str) -> String {
    serialize_config_at(nodes, source_label, Local::now().naive_local())
}

/// Serialize records into a config block with an explicit timestamp.
///
/// The block ends with `#END` and a blank line.
pub fn serialize_config_at(nodes: &[ColorNode], source_label: &str, created: NaiveDateTime) -> String {
    let mut out = String::new();
    out.push_str(&format!("{START} {VERSION_TAG}\n"));
    out.push_str(&format!("{COMMENT} {SOURCE_FILE_PREFIX} {source_label}\n"));
    out.push_str(&format!("{COMMENT} {CREATED_PREFIX} {}\n", created.format(TIMESTAMP_FORMAT)));
    out.push_str(&format!("{NUM_NODES} {}\n", nodes.len()));
    for node in nodes {
        out.push_str(&format!(
            "{NODE} {} {} {} {}\n",
            name_token(node),
            node.red(),
            node.green(),
            node.blue()
        ));
    }
    out.push_str(END);
    out.push_str("\n\n");
    out
}

/// The name as a single word: [`UNNAMED`] when empty, whitespace replaced
/// by `_` otherwise.
fn name_token(node: &ColorNode) -> String {
    if node.has_portable_name() {
        return node.name().to_string();
    }
    if node.name().is_empty() {
        return UNNAMED.to_string();
    }
    tracing::warn!("Node name \"{}\" contains whitespace; written with underscores", node.name());
    node.name()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Serialize records and write them to `path`, replacing any existing file.
///
/// # Errors
/// Returns [`Error::CannotWriteConfig`] if the file cannot be written.
pub fn write_config<P: AsRef<Path>>(nodes: &[ColorNode], source_label: &str, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, serialize_config(nodes, source_label)).map_err(|source| Error::CannotWriteConfig {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Wrote {} record(s) to {}", nodes.len(), path.display());
    Ok(())
}
