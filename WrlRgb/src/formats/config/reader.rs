//! Config block reading

use std::fs;
use std::path::Path;

use super::document::ConfigDocument;
use super::{COMMENT, END, NODE, NUM_NODES, START, UNNAMED, VERSION_TAG};
use crate::error::{Error, Result};
use crate::formats::vrml::{parse_float, parse_int};
use crate::node::ColorNode;

/// Grammar position of a [`ConfigReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    SeekStart,
    SeekVersion,
    /// Collects `#COMMENT` text until `#NUM_NODES`.
    SeekNumNodesKeyword,
    ReadNumNodes,
    ReadNodeKeywordOrEnd,
    ReadNodeName,
    ReadRed,
    ReadGreen,
    ReadBlue,
    /// Past `#END`; remaining words are ignored.
    Noop,
}

/// Word-level state machine over one config block.
#[derive(Debug)]
pub struct ConfigReader {
    state: ConfigState,
    doc: ConfigDocument,
    current: ColorNode,
    comment: Option<String>,
}

impl Default for ConfigReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error(message: impl Into<String>) -> Error {
    Error::ConfigParse {
        message: message.into(),
    }
}

impl ConfigReader {
    pub fn new() -> Self {
        Self {
            state: ConfigState::SeekStart,
            doc: ConfigDocument::default(),
            current: ColorNode::new(),
            comment: None,
        }
    }

    pub fn state(&self) -> ConfigState {
        self.state
    }

    /// Feed the next word.
    ///
    /// # Errors
    /// Returns [`Error::ConfigParse`] if the block does not open with
    /// `#START V001`, or a color range error for an out-of-range channel.
    pub fn feed(&mut self, word: &str) -> Result<()> {
        match self.state {
            ConfigState::SeekStart => {
                if word != START {
                    return Err(parse_error(format!("expected \"{START}\", found \"{word}\"")));
                }
                self.state = ConfigState::SeekVersion;
            }
            ConfigState::SeekVersion => {
                if word != VERSION_TAG {
                    return Err(parse_error(format!(
                        "unsupported config version \"{word}\", expected \"{VERSION_TAG}\""
                    )));
                }
                self.doc.version = word.to_string();
                self.state = ConfigState::SeekNumNodesKeyword;
            }
            ConfigState::SeekNumNodesKeyword => match word {
                COMMENT => {
                    self.flush_comment();
                    self.comment = Some(String::new());
                }
                NUM_NODES => {
                    self.flush_comment();
                    self.state = ConfigState::ReadNumNodes;
                }
                _ => match &mut self.comment {
                    Some(text) => {
                        if !text.is_empty() {
                            text.push(' ');
                        }
                        text.push_str(word);
                    }
                    None => tracing::debug!("Skipping \"{}\" before {}", word, NUM_NODES),
                },
            },
            ConfigState::ReadNumNodes => {
                self.doc.declared_count = Some(parse_int(word));
                self.state = ConfigState::ReadNodeKeywordOrEnd;
            }
            ConfigState::ReadNodeKeywordOrEnd => match word {
                NODE => {
                    self.current.clear();
                    self.state = ConfigState::ReadNodeName;
                }
                END => self.state = ConfigState::Noop,
                _ => tracing::warn!("Ignoring \"{}\" where {} or {} was expected", word, NODE, END),
            },
            ConfigState::ReadNodeName => {
                if word != UNNAMED {
                    self.current.set_name(word);
                }
                self.state = ConfigState::ReadRed;
            }
            ConfigState::ReadRed => {
                self.current.set_red(parse_float(word))?;
                self.state = ConfigState::ReadGreen;
            }
            ConfigState::ReadGreen => {
                self.current.set_green(parse_float(word))?;
                self.state = ConfigState::ReadBlue;
            }
            ConfigState::ReadBlue => {
                self.current.set_blue(parse_float(word))?;
                self.doc.nodes.push(self.current.clone());
                self.state = ConfigState::ReadNodeKeywordOrEnd;
            }
            ConfigState::Noop => {}
        }
        Ok(())
    }

    fn flush_comment(&mut self) {
        if let Some(text) = self.comment.take() {
            self.doc.comments.push(text);
        }
    }

    /// End of input.
    ///
    /// # Errors
    /// Returns [`Error::ConfigParse`] if the block ended before its first
    /// record or holds no records at all.
    pub fn finish(mut self) -> Result<ConfigDocument> {
        match self.state {
            ConfigState::SeekStart => return Err(parse_error("empty config")),
            ConfigState::SeekVersion | ConfigState::SeekNumNodesKeyword | ConfigState::ReadNumNodes => {
                return Err(parse_error(format!(
                    "config ended before its {NUM_NODES} count was read"
                )));
            }
            ConfigState::ReadNodeKeywordOrEnd => {
                tracing::warn!("Config has no {}; keeping the records read so far", END);
            }
            ConfigState::ReadNodeName
            | ConfigState::ReadRed
            | ConfigState::ReadGreen
            | ConfigState::ReadBlue => {
                tracing::warn!("Config ends inside a {} entry; entry dropped", NODE);
            }
            ConfigState::Noop => {}
        }
        self.flush_comment();

        if self.doc.nodes.is_empty() {
            return Err(parse_error(format!("config has no {NODE} entries")));
        }
        if self.doc.count_mismatch() {
            tracing::warn!(
                "{} declares {:?} record(s) but {} were read",
                NUM_NODES,
                self.doc.declared_count,
                self.doc.nodes.len()
            );
        }
        Ok(self.doc)
    }
}

/// Parse config text.
///
/// # Errors
/// See [`ConfigReader::feed`] and [`ConfigReader::finish`].
pub fn parse_config_str(text: &str) -> Result<ConfigDocument> {
    let mut reader = ConfigReader::new();
    for word in text.split_whitespace() {
        reader.feed(word)?;
    }
    reader.finish()
}

/// Read a config file.
///
/// # Errors
/// Returns [`Error::CannotReadConfig`] if the file cannot be read, or a
/// parse error for its content.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<ConfigDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| Error::CannotReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_str(&content)
}

/// Parse records from either config text or a config file path.
///
/// Input whose first word is `#START` is parsed as text; anything else is
/// taken as a path.
///
/// # Errors
/// Returns [`Error::CannotReadConfig`] for an unreadable path, or a parse
/// error for malformed content.
pub fn parse_config(text_or_path: &str) -> Result<Vec<ColorNode>> {
    let doc = if text_or_path.split_whitespace().next() == Some(START) {
        parse_config_str(text_or_path)?
    } else {
        read_config(text_or_path)?
    };
    Ok(doc.nodes)
}
