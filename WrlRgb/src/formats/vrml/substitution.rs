//! `diffuseColor` value substitution shared by replace and rollback

use std::collections::VecDeque;

use super::keywords::DIFFUSE_COLOR;
use super::scanner::Boundary;
use crate::error::Result;
use crate::fileio::Sink;
use crate::node::{Channel, ColorNode};

/// Where the substitution stands in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionState {
    /// Copying until the next `diffuseColor`.
    SeekDiffuseColor,
    GetRed,
    GetGreen,
    GetBlue,
    /// Records exhausted; copying the rest verbatim.
    Noop,
}

/// Replaces the three values after each `diffuseColor` with the next
/// record, one record per occurrence, in document order.
///
/// Occurrences beyond the last record are copied unchanged. Records beyond
/// the last occurrence are never used.
#[derive(Debug)]
pub struct Substitution {
    state: SubstitutionState,
    records: VecDeque<ColorNode>,
    substituted: usize,
    untouched: usize,
}

impl Substitution {
    pub fn new(records: Vec<ColorNode>) -> Self {
        let state = if records.is_empty() {
            SubstitutionState::Noop
        } else {
            SubstitutionState::SeekDiffuseColor
        };
        Self {
            state,
            records: records.into(),
            substituted: 0,
            untouched: 0,
        }
    }

    pub fn state(&self) -> SubstitutionState {
        self.state
    }

    /// Number of occurrences rewritten so far.
    pub fn substituted(&self) -> usize {
        self.substituted
    }

    /// Number of records not yet consumed.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    /// Handle one word boundary.
    pub fn step<S: Sink>(&mut self, boundary: &Boundary, out: &mut S) -> Result<()> {
        use SubstitutionState as State;

        match self.state {
            State::SeekDiffuseColor => {
                boundary.emit_verbatim(out)?;
                if boundary.is(DIFFUSE_COLOR) {
                    self.state = State::GetRed;
                }
            }
            State::GetRed | State::GetGreen | State::GetBlue if boundary.is_blank() => {
                boundary.emit_verbatim(out)?;
            }
            State::GetRed => {
                self.emit_channel(Channel::Red, boundary, out)?;
                self.state = State::GetGreen;
            }
            State::GetGreen => {
                self.emit_channel(Channel::Green, boundary, out)?;
                self.state = State::GetBlue;
            }
            State::GetBlue => {
                self.emit_channel(Channel::Blue, boundary, out)?;
                if let Some(node) = self.records.pop_front() {
                    tracing::debug!("Substituted {}", node);
                }
                self.substituted += 1;
                self.state = if self.records.is_empty() {
                    State::Noop
                } else {
                    State::SeekDiffuseColor
                };
            }
            State::Noop => {
                if boundary.is(DIFFUSE_COLOR) {
                    self.untouched += 1;
                }
                boundary.emit_verbatim(out)?;
            }
        }
        Ok(())
    }

    fn emit_channel<S: Sink>(&self, channel: Channel, boundary: &Boundary, out: &mut S) -> Result<()> {
        let Some(node) = self.records.front() else {
            return boundary.emit_verbatim(out);
        };
        out.emit(&node.channel(channel).to_string())?;
        boundary.emit_delimiter(out)
    }

    /// Log any mismatch between records and occurrences.
    pub fn finish(&self) {
        if matches!(
            self.state,
            SubstitutionState::GetRed | SubstitutionState::GetGreen | SubstitutionState::GetBlue
        ) {
            tracing::warn!("Input ended inside a diffuseColor value");
        }
        if self.untouched > 0 {
            tracing::warn!(
                "{} diffuseColor occurrence(s) left unchanged: more occurrences than records",
                self.untouched
            );
        }
        if !self.records.is_empty() {
            tracing::warn!(
                "{} record(s) unused: more records than diffuseColor occurrences",
                self.records.len()
            );
        }
    }
}
