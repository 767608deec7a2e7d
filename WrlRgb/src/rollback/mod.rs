//! Rollback to the most recent injected config snapshot
//!
//! Every replace leaves a `#START ... #END` block in front of the first
//! `DEF`. Rolling back removes the newest block and writes its values back
//! into the document, so each call undoes exactly one replace.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::fileio::{CharTransform, Sink, rewrite_file};
use crate::formats::config::{END, START, parse_config};
use crate::formats::vrml::keywords::{CHARSET, DEF, VERSION, VRML};
use crate::formats::vrml::{Boundary, Substitution, WordScanner, expect_header_word};
use crate::settings::Settings;

/// Separator restored after each re-emitted older snapshot.
const SNAPSHOT_TERMINATOR: &str = "\n\n";

/// Grammar position of a [`RollbackMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackState {
    VerifyVrml,
    VerifyVrmlVersion,
    VerifyCharset,
    /// Copying until `#START` or the first `DEF`.
    SeekStart,
    /// Inside a snapshot block.
    SeekEnd,
    /// Rewriting `diffuseColor` values from the newest snapshot.
    Substituting,
}

/// Character-level rollback state machine.
#[derive(Debug)]
pub struct RollbackMachine {
    path: PathBuf,
    state: RollbackState,
    scanner: WordScanner,
    snapshots: Vec<String>,
    pending: String,
    substitution: Substitution,
}

impl RollbackMachine {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RollbackState::VerifyVrml,
            scanner: WordScanner::new(),
            snapshots: Vec::new(),
            pending: String::new(),
            substitution: Substitution::new(Vec::new()),
        }
    }

    pub fn state(&self) -> RollbackState {
        self.state
    }

    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    fn on_boundary<S: Sink>(&mut self, boundary: &Boundary, out: &mut S) -> Result<()> {
        match self.state {
            RollbackState::VerifyVrml | RollbackState::VerifyVrmlVersion | RollbackState::VerifyCharset
                if boundary.is_blank() =>
            {
                boundary.emit_verbatim(out)?;
            }
            RollbackState::VerifyVrml => {
                expect_header_word(&self.path, VRML, &boundary.word)?;
                boundary.emit_verbatim(out)?;
                self.state = RollbackState::VerifyVrmlVersion;
            }
            RollbackState::VerifyVrmlVersion => {
                expect_header_word(&self.path, VERSION, &boundary.word)?;
                boundary.emit_verbatim(out)?;
                self.state = RollbackState::VerifyCharset;
            }
            RollbackState::VerifyCharset => {
                expect_header_word(&self.path, CHARSET, &boundary.word)?;
                boundary.emit_verbatim(out)?;
                self.state = RollbackState::SeekStart;
            }
            RollbackState::SeekStart => {
                if boundary.is(START) {
                    self.pending.clear();
                    boundary.append_to(&mut self.pending);
                    self.state = RollbackState::SeekEnd;
                } else if boundary.is(DEF) {
                    self.restore(out)?;
                    boundary.emit_verbatim(out)?;
                } else if boundary.is_blank() && !self.snapshots.is_empty() {
                    // blank lines between snapshot blocks
                } else {
                    boundary.emit_verbatim(out)?;
                }
            }
            RollbackState::SeekEnd => {
                if boundary.is(END) {
                    self.pending.push_str(END);
                    self.snapshots.push(std::mem::take(&mut self.pending));
                    tracing::debug!("Found snapshot {} in {}", self.snapshots.len(), self.path.display());
                    self.state = RollbackState::SeekStart;
                } else if boundary.is(DEF) {
                    tracing::warn!("Discarding a snapshot without {} in {}", END, self.path.display());
                    self.pending.clear();
                    self.restore(out)?;
                    boundary.emit_verbatim(out)?;
                } else {
                    boundary.append_to(&mut self.pending);
                }
            }
            RollbackState::Substituting => self.substitution.step(boundary, out)?,
        }
        Ok(())
    }

    /// Keep older snapshots in the output and load the newest one.
    fn restore<S: Sink>(&mut self, out: &mut S) -> Result<()> {
        let Some(latest) = self.snapshots.pop() else {
            return Err(Error::NothingToRollback {
                path: self.path.clone(),
            });
        };
        for older in &self.snapshots {
            out.emit(older)?;
            out.emit(SNAPSHOT_TERMINATOR)?;
        }
        let nodes = parse_config(&latest)?;
        tracing::debug!(
            "Restoring {} node(s); {} older snapshot(s) kept",
            nodes.len(),
            self.snapshots.len()
        );
        self.substitution = Substitution::new(nodes);
        self.state = RollbackState::Substituting;
        Ok(())
    }

    fn on_end(&self) -> Result<()> {
        let expected = match self.state {
            RollbackState::VerifyVrml => VRML,
            RollbackState::VerifyVrmlVersion => VERSION,
            RollbackState::VerifyCharset => CHARSET,
            RollbackState::SeekStart | RollbackState::SeekEnd if self.snapshots.is_empty() => {
                return Err(Error::NothingToRollback {
                    path: self.path.clone(),
                });
            }
            RollbackState::SeekStart | RollbackState::SeekEnd => {
                return Err(Error::NoRgbValuesFound {
                    path: self.path.clone(),
                });
            }
            RollbackState::Substituting => {
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

impl CharTransform for RollbackMachine {
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

/// Rolls VRML documents back one replace at a time.
#[derive(Debug, Clone, Default)]
pub struct RollbackEngine {
    settings: Settings,
}

impl RollbackEngine {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Restore the colors saved by the most recent replace and drop that
    /// snapshot from the document.
    ///
    /// # Errors
    /// Returns [`Error::NothingToRollback`] if the document has no snapshot,
    /// or any extraction, config or file error. On error the document is
    /// left as it was and no scratch file remains.
    pub fn rollback<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        Extractor::new(self.settings.clone()).extract_nodes(path)?;

        let mut machine = RollbackMachine::new(path);
        rewrite_file(&self.settings, path, &mut machine)?;
        tracing::info!(
            "Rolled back {} node(s) in {}",
            machine.substitution().substituted(),
            path.display()
        );
        Ok(())
    }
}
