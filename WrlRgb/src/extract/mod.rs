//! Color node extraction and verification
//!
//! The extractor walks a document word by word, checks its header and
//! collects one [`ColorNode`] per `diffuseColor` occurrence.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fileio::TokenSource;
use crate::formats::config::{read_config, write_config};
use crate::formats::vrml::keywords::{CHARSET, DEF, DIFFUSE_COLOR, TRANSFORM, VERSION, VRML};
use crate::formats::vrml::{expect_header_word, parse_float};
use crate::node::{Channel, ColorNode};
use crate::settings::Settings;

/// Grammar position of an [`ExtractMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractState {
    VerifyVrml,
    VerifyVrmlVersion,
    VerifyCharset,
    SeekDef,
    /// Remembers the last word; `Transform` names the node from it.
    SeekTransform,
    GetRed,
    GetGreen,
    GetBlue,
}

/// Word-level extraction state machine.
#[derive(Debug)]
pub struct ExtractMachine {
    path: PathBuf,
    state: ExtractState,
    current: ColorNode,
    last_word: String,
    nodes: Vec<ColorNode>,
}

impl ExtractMachine {
    /// `path` labels errors; the machine itself reads nothing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: ExtractState::VerifyVrml,
            current: ColorNode::new(),
            last_word: String::new(),
            nodes: Vec::new(),
        }
    }

    pub fn state(&self) -> ExtractState {
        self.state
    }

    /// Feed the next word.
    ///
    /// # Errors
    /// Returns [`Error::NotAVrmlFile`] on a header mismatch, or a color range
    /// error for an out-of-range value.
    pub fn feed(&mut self, word: &str) -> Result<()> {
        match self.state {
            ExtractState::VerifyVrml => {
                expect_header_word(&self.path, VRML, word)?;
                self.state = ExtractState::VerifyVrmlVersion;
            }
            ExtractState::VerifyVrmlVersion => {
                expect_header_word(&self.path, VERSION, word)?;
                self.state = ExtractState::VerifyCharset;
            }
            ExtractState::VerifyCharset => {
                expect_header_word(&self.path, CHARSET, word)?;
                self.state = ExtractState::SeekDef;
            }
            ExtractState::SeekDef => {
                if word == DEF {
                    self.current.clear();
                    self.last_word.clear();
                    self.state = ExtractState::SeekTransform;
                }
            }
            ExtractState::SeekTransform => match word {
                TRANSFORM => self.current.set_name(self.last_word.clone()),
                DIFFUSE_COLOR => self.state = ExtractState::GetRed,
                _ => word.clone_into(&mut self.last_word),
            },
            ExtractState::GetRed => {
                self.current.set_channel(Channel::Red, parse_float(word))?;
                self.state = ExtractState::GetGreen;
            }
            ExtractState::GetGreen => {
                self.current.set_channel(Channel::Green, parse_float(word))?;
                self.state = ExtractState::GetBlue;
            }
            ExtractState::GetBlue => {
                self.current.set_channel(Channel::Blue, parse_float(word))?;
                tracing::debug!("Extracted {}", self.current);
                self.nodes.push(self.current.clone());
                self.state = ExtractState::SeekTransform;
            }
        }
        Ok(())
    }

    /// End of input.
    ///
    /// # Errors
    /// Returns [`Error::NotAVrmlFile`] if the input ended inside the header
    /// and [`Error::NoRgbValuesFound`] if no node was completed.
    pub fn finish(self) -> Result<Vec<ColorNode>> {
        let missing = match self.state {
            ExtractState::VerifyVrml => Some(VRML),
            ExtractState::VerifyVrmlVersion => Some(VERSION),
            ExtractState::VerifyCharset => Some(CHARSET),
            _ => None,
        };
        if let Some(expected) = missing {
            return Err(Error::NotAVrmlFile {
                path: self.path,
                expected,
                found: String::new(),
            });
        }
        if matches!(
            self.state,
            ExtractState::GetRed | ExtractState::GetGreen | ExtractState::GetBlue
        ) {
            tracing::warn!("{} ends inside a diffuseColor value", self.path.display());
        }
        if self.nodes.is_empty() {
            return Err(Error::NoRgbValuesFound { path: self.path });
        }
        Ok(self.nodes)
    }
}

/// Extracts and verifies color nodes of VRML documents.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    settings: Settings,
}

impl Extractor {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Extract every color node of a document, in document order.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a VRML V2.0 utf8
    /// document, or holds no color nodes.
    pub fn extract_nodes<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ColorNode>> {
        let path = path.as_ref();
        let mut source = TokenSource::new(&self.settings);
        source.open(path, false)?;

        let mut machine = ExtractMachine::new(path);
        while let Some(word) = source.read_word()? {
            machine.feed(&word)?;
        }
        source.close()?;
        machine.finish()
    }

    /// Extract a document's color nodes into a config file.
    ///
    /// Writes to `output` if given, otherwise to the document path plus the
    /// configured config suffix. Returns the path written.
    ///
    /// # Errors
    /// Returns an extraction error or [`Error::CannotWriteConfig`].
    pub fn extract<P: AsRef<Path>>(&self, path: P, output: Option<&Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let nodes = self.extract_nodes(path)?;
        let output = output.map_or_else(|| self.settings.config_path_for(path), Path::to_path_buf);
        write_config(&nodes, &path.display().to_string(), &output)?;
        tracing::info!("Extracted {} node(s) from {} to {}", nodes.len(), path.display(), output.display());
        Ok(output)
    }

    /// Whether a document's color nodes equal a config's, element by element
    /// and in order. Names are not compared.
    ///
    /// # Errors
    /// Returns an extraction error or a config read/parse error.
    pub fn verify<P: AsRef<Path>, Q: AsRef<Path>>(&self, path: P, config: Q) -> Result<bool> {
        let path = path.as_ref();
        let config = config.as_ref();
        let nodes = self.extract_nodes(path)?;
        let expected = read_config(config)?.nodes;
        let matched = nodes == expected;
        tracing::info!(
            "{} {} {}",
            path.display(),
            if matched { "matches" } else { "does not match" },
            config.display()
        );
        Ok(matched)
    }
}

/// Run the extraction machine over in-memory text.
///
/// # Errors
/// Same as [`Extractor::extract_nodes`], minus file errors.
pub fn extract_nodes_from_str(label: impl Into<PathBuf>, text: &str) -> Result<Vec<ColorNode>> {
    let mut machine = ExtractMachine::new(label);
    for word in text.split_whitespace() {
        machine.feed(word)?;
    }
    machine.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const SCENE: &str = "#VRML V2.0 utf8\n\
        DEF Box1 Transform {\n\
          children Shape { appearance Appearance { material Material {\n\
            diffuseColor 0.5 0.25 1\n\
          } } }\n\
        }\n\
        DEF Cone2 Transform { children Shape { appearance Appearance { material Material {\n\
            diffuseColor 0 0.1 0.2 } } } }\n";

    #[test]
    fn test_single_node() {
        let nodes = extract_nodes_from_str("a.wrl", "#VRML V2.0 utf8 DEF Box1 Transform diffuseColor 0.5 0.5 0.5").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name(), "Box1");
        assert_eq!(nodes[0], ColorNode::with_rgb("Box1", 0.5, 0.5, 0.5).unwrap());
    }

    #[test]
    fn test_multiple_nodes_in_order() {
        let nodes = extract_nodes_from_str("scene.wrl", SCENE).unwrap();
        let names: Vec<_> = nodes.iter().map(ColorNode::name).collect();
        assert_eq!(names, vec!["Box1", "Cone2"]);
        assert_eq!(nodes[1], ColorNode::with_rgb("", 0.0, 0.1, 0.2).unwrap());
    }

    #[test]
    fn test_closest_word_names_the_node() {
        let nodes = extract_nodes_from_str("a.wrl", "#VRML V2.0 utf8 DEF Outer Inner Transform diffuseColor 1 1 1").unwrap();
        assert_eq!(nodes[0].name(), "Inner");
    }

    #[test]
    fn test_header_mismatch() {
        let err = extract_nodes_from_str("a.wrl", "#VRML V1.0 utf8 DEF A Transform diffuseColor 1 1 1").unwrap_err();
        assert!(matches!(err, Error::NotAVrmlFile { expected: "V2.0", .. }));

        let err = extract_nodes_from_str("a.wrl", "#VRML V2.0").unwrap_err();
        assert!(matches!(err, Error::NotAVrmlFile { expected: "utf8", .. }));
    }

    #[test]
    fn test_no_color_nodes() {
        let err = extract_nodes_from_str("a.wrl", "#VRML V2.0 utf8 DEF A Transform { }").unwrap_err();
        assert!(matches!(err, Error::NoRgbValuesFound { .. }));
    }

    #[test]
    fn test_out_of_range_value() {
        let err = extract_nodes_from_str("a.wrl", "#VRML V2.0 utf8 DEF A Transform diffuseColor 1 1.5 1").unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_extract_and_verify_files() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("scene.wrl");
        fs::write(&doc, SCENE).unwrap();

        let extractor = Extractor::default();
        let config = extractor.extract(&doc, None).unwrap();
        assert_eq!(config, dir.path().join("scene.wrl_rgb_nodes.txt"));
        assert!(extractor.verify(&doc, &config).unwrap());

        let other = dir.path().join("other.txt");
        fs::write(&other, "#START V001 #NUM_NODES 2 #NODE Box1 0.5 0.25 1 #NODE Cone2 0 0.1 0.3 #END").unwrap();
        assert!(!extractor.verify(&doc, &other).unwrap());

        let short = dir.path().join("short.txt");
        fs::write(&short, "#START V001 #NUM_NODES 1 #NODE Box1 0.5 0.25 1 #END").unwrap();
        assert!(!extractor.verify(&doc, &short).unwrap());
    }

    #[test]
    fn test_extract_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("scene.wrl");
        fs::write(&doc, SCENE).unwrap();
        let out = dir.path().join("colors.txt");

        let written = Extractor::default().extract(&doc, Some(out.as_path())).unwrap();
        assert_eq!(written, out);
        assert!(!dir.path().join("scene.wrl_rgb_nodes.txt").exists());
    }
}
