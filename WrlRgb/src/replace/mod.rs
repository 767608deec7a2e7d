//! In-place color replacement
//!
//! Replacing a document's colors also preserves what they were: the
//! current nodes are serialized as a config block and injected in front of
//! the first `DEF`, where the rollback engine can find them later.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::fileio::{CharTransform, Sink, rewrite_file};
use crate::formats::config::{read_config, serialize_config};
use crate::formats::vrml::keywords::{CHARSET, DEF, VERSION, VRML};
use crate::formats::vrml::{Boundary, Substitution, WordScanner, expect_header_word};
use crate::node::ColorNode;
use crate::settings::Settings;

/// Grammar position of a [`ReplaceMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceState {
    VerifyVrml,
    VerifyVrmlVersion,
    VerifyCharset,
    /// Copying until the first `DEF`, where history is injected.
    SeekDef,
    /// Rewriting `diffuseColor` values; see [`Substitution`].
    Substituting,
}

/// Character-level replacement state machine.
#[derive(Debug)]
pub struct ReplaceMachine {
    path: PathBuf,
    state: ReplaceState,
    scanner: WordScanner,
    history: String,
    substitution: Substitution,
}

impl ReplaceMachine {
    /// `history` is written verbatim in front of the first `DEF`.
    pub fn new(path: impl Into<PathBuf>, history: String, replacements: Vec<ColorNode>) -> Self {
        Self {
            path: path.into(),
            state: ReplaceState::VerifyVrml,
            scanner: WordScanner::new(),
            history,
            substitution: Substitution::new(replacements),
        }
    }

    pub fn state(&self) -> ReplaceState {
        self.state
    }

    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    fn on_boundary<S: Sink>(&mut self, boundary: &Boundary, out: &mut S) -> Result<()> {
        match self.state {
            ReplaceState::VerifyVrml | ReplaceState::VerifyVrmlVersion | ReplaceState::VerifyCharset
                if boundary.is_blank() =>
            {
                boundary.emit_verbatim(out)?;
            }
            ReplaceState::VerifyVrml => {
                expect_header_word(&self.path, VRML, &boundary.word)?;
                boundary.emit_verbatim(out)?;
                self.state = ReplaceState::VerifyVrmlVersion;
            }
            ReplaceState::VerifyVrmlVersion => {
                expect_header_word(&self.path, VERSION, &boundary.word)?;
                boundary.emit_verbatim(out)?;
                self.state = ReplaceState::VerifyCharset;
            }
            ReplaceState::VerifyCharset => {
                expect_header_word(&self.path, CHARSET, &boundary.word)?;
                boundary.emit_verbatim(out)?;
                self.state = ReplaceState::SeekDef;
            }
            ReplaceState::SeekDef => {
                if boundary.is(DEF) {
                    out.emit(&self.history)?;
                    self.state = ReplaceState::Substituting;
                }
                boundary.emit_verbatim(out)?;
            }
            ReplaceState::Substituting => self.substitution.step(boundary, out)?,
        }
        Ok(())
    }

    fn on_end(&self) -> Result<()> {
        let expected = match self.state {
            ReplaceState::VerifyVrml => VRML,
            ReplaceState::VerifyVrmlVersion => VERSION,
            ReplaceState::VerifyCharset => CHARSET,
            ReplaceState::SeekDef => {
                tracing::warn!("No {} found in {}; nothing replaced", DEF, self.path.display());
                return Ok(());
            }
            ReplaceState::Substituting => {
                self.substitution.finish();
                return Ok(());
            }
        };
        Err(Error::NotAVrmlFile {
            path: self.path.clone(),
            expected,
            found: String::new(),
        })
    }
}

impl CharTransform for ReplaceMachine {
    fn step<S: Sink>(&mut self, ch: Option<char>, out: &mut S) -> Result<()> {
        if let Some(boundary) = self.scanner.push(ch) {
            self.on_boundary(&boundary, out)?;
        }
        if ch.is_none() {
            self.on_end()?;
        }
        Ok(())
    }
}

/// Replaces the color nodes of VRML documents in place.
#[derive(Debug, Clone, Default)]
pub struct Replacer {
    settings: Settings,
}

impl Replacer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Replace a document's colors with those of a config file.
    ///
    /// The i-th `diffuseColor` gets the i-th config record. The document's
    /// current nodes are kept as a config block ahead of the first `DEF`.
    ///
    /// # Errors
    /// Returns [`Error::NodesAlreadyMatch`] without touching the document if
    /// it already carries the config's colors, or any extraction, config or
    /// file error. On error the document is left as it was.
    pub fn replace<P: AsRef<Path>, Q: AsRef<Path>>(&self, path: P, config: Q) -> Result<()> {
        let path = path.as_ref();
        let config = config.as_ref();

        let existing = Extractor::new(self.settings.clone()).extract_nodes(path)?;
        let history = serialize_config(&existing, &path.display().to_string());
        let replacements = read_config(config)?.nodes;

        if existing == replacements {
            return Err(Error::NodesAlreadyMatch {
                path: path.to_path_buf(),
                config: config.display().to_string(),
            });
        }
        if existing.len() != replacements.len() {
            tracing::warn!(
                "{} has {} color node(s) but {} has {}",
                path.display(),
                existing.len(),
                config.display(),
                replacements.len()
            );
        }

        let mut machine = ReplaceMachine::new(path, history, replacements);
        rewrite_file(&self.settings, path, &mut machine)?;
        tracing::info!(
            "Replaced {} node(s) in {}",
            machine.substitution().substituted(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileio::rewrite_str;
    use pretty_assertions::assert_eq;

    fn node(name: &str, r: f32, g: f32, b: f32) -> ColorNode {
        ColorNode::with_rgb(name, r, g, b).unwrap()
    }

    #[test]
    fn test_injects_history_and_substitutes() {
        let text = "#VRML V2.0 utf8\nDEF Box1 Transform { diffuseColor 0.5 0.5 0.5 }\n";
        let mut machine = ReplaceMachine::new("a.wrl", "<history>\n".to_string(), vec![node("Box1", 1.0, 0.0, 0.25)]);
        let out = rewrite_str(text, &mut machine).unwrap();
        assert_eq!(
            out,
            "#VRML V2.0 utf8\n<history>\nDEF Box1 Transform { diffuseColor 1 0 0.25 }\n"
        );
        assert_eq!(machine.state(), ReplaceState::Substituting);
        assert_eq!(machine.substitution().substituted(), 1);
    }

    #[test]
    fn test_history_only_before_first_def() {
        let text = "#VRML V2.0 utf8\nDEF A Transform diffuseColor 0 0 0\nDEF B Transform diffuseColor 0 0 0";
        let mut machine = ReplaceMachine::new("a.wrl", "H ".to_string(), vec![node("A", 1.0, 1.0, 1.0), node("B", 0.5, 0.5, 0.5)]);
        let out = rewrite_str(text, &mut machine).unwrap();
        assert_eq!(
            out,
            "#VRML V2.0 utf8\nH DEF A Transform diffuseColor 1 1 1\nDEF B Transform diffuseColor 0.5 0.5 0.5"
        );
    }

    #[test]
    fn test_whitespace_runs_survive() {
        let text = "  #VRML\tV2.0  utf8\n\nDEF A Transform diffuseColor   0.1\t\t0.2  0.3\n";
        let mut machine = ReplaceMachine::new("a.wrl", String::new(), vec![node("A", 1.0, 1.0, 1.0)]);
        let out = rewrite_str(text, &mut machine).unwrap();
        assert_eq!(out, "  #VRML\tV2.0  utf8\n\nDEF A Transform diffuseColor   1\t\t1  1\n");
    }

    #[test]
    fn test_header_mismatch() {
        let mut machine = ReplaceMachine::new("a.wrl", String::new(), vec![node("A", 1.0, 1.0, 1.0)]);
        let err = rewrite_str("#VRML V2.0 utf16 DEF", &mut machine).unwrap_err();
        assert!(matches!(err, Error::NotAVrmlFile { expected: "utf8", .. }));
    }
}
