//! Transactional token source over one document

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::settings::{with_suffix, Settings};

/// Scratch output opened alongside a source document
struct Scratch {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Source document loaded for reading
struct Session {
    source: PathBuf,
    content: String,
    cursor: usize,
    scratch: Option<Scratch>,
}

enum State {
    Unopened,
    Open(Session),
    /// Handles are released; paths are kept for commit or discard.
    Closed {
        source: PathBuf,
        scratch: Option<PathBuf>,
    },
}

/// Sequential word/char reader over a single document with an optional
/// scratch file for writing.
///
/// Lifecycle: `open` -> reads and writes -> `close` -> `commit` or
/// `discard`. A session can be reopened after it is closed; opening while
/// open is an error.
pub struct TokenSource {
    state: State,
    scratch_suffix: String,
    backup_suffix: String,
}

impl TokenSource {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: State::Unopened,
            scratch_suffix: settings.scratch_suffix.clone(),
            backup_suffix: settings.backup_suffix.clone(),
        }
    }

    /// Open `path` for reading, and create `<path><scratch_suffix>` for
    /// writing when `want_scratch` is set.
    pub fn open<P: AsRef<Path>>(&mut self, path: P, want_scratch: bool) -> Result<()> {
        let path = path.as_ref();
        if let State::Open(session) = &self.state {
            return Err(Error::AlreadyOpen {
                requested: path.to_path_buf(),
                open: session.source.clone(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| Error::CannotOpenSource {
            path: path.to_path_buf(),
            source,
        })?;

        let scratch = if want_scratch {
            let scratch_path = with_suffix(path, &self.scratch_suffix);
            let file = File::create(&scratch_path).map_err(|source| Error::CannotOpenScratch {
                path: scratch_path.clone(),
                source,
            })?;
            tracing::debug!("Opened scratch {}", scratch_path.display());
            Some(Scratch {
                path: scratch_path,
                writer: BufWriter::new(file),
            })
        } else {
            None
        };

        self.state = State::Open(Session {
            source: path.to_path_buf(),
            content,
            cursor: 0,
            scratch,
        });
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// The document this session is (or was last) bound to.
    pub fn source_path(&self) -> Option<&Path> {
        match &self.state {
            State::Unopened => None,
            State::Open(session) => Some(&session.source),
            State::Closed { source, .. } => Some(source),
        }
    }

    /// Read the next whitespace-delimited word, or `None` at end of file.
    pub fn read_word(&mut self) -> Result<Option<String>> {
        let State::Open(session) = &mut self.state else {
            return Err(Error::NotOpen);
        };

        let rest = &session.content[session.cursor..];
        let Some(start) = rest.find(|c: char| !c.is_whitespace()) else {
            session.cursor = session.content.len();
            return Ok(None);
        };
        let word_len = rest[start..]
            .find(char::is_whitespace)
            .unwrap_or(rest.len() - start);
        let word = rest[start..start + word_len].to_string();
        session.cursor += start + word_len;
        Ok(Some(word))
    }

    /// Read the next character, or `None` at end of file.
    pub fn read_char(&mut self) -> Result<Option<char>> {
        let State::Open(session) = &mut self.state else {
            return Err(Error::NotOpen);
        };

        let ch = session.content[session.cursor..].chars().next();
        if let Some(c) = ch {
            session.cursor += c.len_utf8();
        }
        Ok(ch)
    }

    /// Append text to the scratch file.
    pub fn write(&mut self, text: &str) -> Result<()> {
        let scratch = self.scratch_mut()?;
        scratch
            .writer
            .write_all(text.as_bytes())
            .map_err(|source| Error::CannotWriteScratch {
                path: scratch.path.clone(),
                source,
            })
    }

    /// Append one character to the scratch file.
    pub fn write_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write(ch.encode_utf8(&mut buf))
    }

    fn scratch_mut(&mut self) -> Result<&mut Scratch> {
        match &mut self.state {
            State::Open(Session {
                scratch: Some(scratch),
                ..
            }) => Ok(scratch),
            _ => Err(Error::ScratchNotOpen),
        }
    }

    /// Release the read handle and flush the scratch file without committing
    /// or discarding it.
    pub fn close(&mut self) -> Result<()> {
        let session = match std::mem::replace(&mut self.state, State::Unopened) {
            State::Open(session) => session,
            other => {
                self.state = other;
                return Err(Error::NotOpen);
            }
        };

        let scratch_path = session.scratch.map(|mut scratch| {
            let flushed = scratch.writer.flush();
            (scratch.path, flushed)
        });

        match scratch_path {
            Some((path, Err(source))) => {
                self.state = State::Closed {
                    source: session.source,
                    scratch: Some(path.clone()),
                };
                Err(Error::CannotWriteScratch { path, source })
            }
            Some((path, Ok(()))) => {
                self.state = State::Closed {
                    source: session.source,
                    scratch: Some(path),
                };
                Ok(())
            }
            None => {
                self.state = State::Closed {
                    source: session.source,
                    scratch: None,
                };
                Ok(())
            }
        }
    }

    /// Swap the scratch file into the source's place.
    ///
    /// Moves the source to `<source><backup_suffix>`, renames the scratch to
    /// the source path, then deletes the backup. Each step fails with its
    /// own error; a failure after the first step leaves the backup on disk.
    pub fn commit(&mut self) -> Result<()> {
        if self.is_open() {
            self.close()?;
        }

        let (source, scratch) = match &self.state {
            State::Closed {
                source,
                scratch: Some(scratch),
            } => (source.clone(), scratch.clone()),
            State::Closed { scratch: None, .. } => return Err(Error::ScratchNotOpen),
            _ => return Err(Error::NotOpen),
        };
        self.state = State::Unopened;

        let backup = with_suffix(&source, &self.backup_suffix);
        fs::rename(&source, &backup).map_err(|e| Error::CannotRenameSource {
            from: source.clone(),
            to: backup.clone(),
            source: e,
        })?;
        tracing::debug!("Moved {} to {}", source.display(), backup.display());

        fs::rename(&scratch, &source).map_err(|e| Error::CannotRenameScratch {
            from: scratch.clone(),
            to: source.clone(),
            source: e,
        })?;
        tracing::debug!("Moved {} to {}", scratch.display(), source.display());

        fs::remove_file(&backup).map_err(|e| Error::CannotDeleteBackup {
            path: backup.clone(),
            source: e,
        })?;
        tracing::debug!("Committed {}", source.display());
        Ok(())
    }

    /// Close and delete the scratch file, leaving the source untouched.
    /// Does nothing when no scratch file exists.
    pub fn discard(&mut self) {
        let scratch_path = match &mut self.state {
            State::Open(session) => session.scratch.take().map(|scratch| scratch.path),
            State::Closed { scratch, .. } => scratch.take(),
            State::Unopened => None,
        };

        if let Some(path) = scratch_path {
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!("Discarded {}", path.display()),
                Err(e) => tracing::warn!("Failed to remove scratch {}: {}", path.display(), e),
            }
        }
    }
}
