//! File access for the parsing engines
//!
//! [`TokenSource`] reads a document word by word or character by character
//! and optionally mirrors a transformed copy into a scratch file, which is
//! then swapped into place with [`TokenSource::commit`].

mod source;

pub use source::TokenSource;

use std::path::Path;

use crate::error::Result;
use crate::settings::Settings;

/// Destination for transformed document text.
///
/// Implemented by [`TokenSource`] (writes go to its scratch file) and by
/// `String` so the character-level machines can run in memory.
pub trait Sink {
    /// Append text.
    fn emit(&mut self, text: &str) -> Result<()>;

    /// Append a single character.
    fn emit_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.emit(ch.encode_utf8(&mut buf))
    }
}

impl Sink for String {
    fn emit(&mut self, text: &str) -> Result<()> {
        self.push_str(text);
        Ok(())
    }

    fn emit_char(&mut self, ch: char) -> Result<()> {
        self.push(ch);
        Ok(())
    }
}

impl Sink for TokenSource {
    fn emit(&mut self, text: &str) -> Result<()> {
        self.write(text)
    }

    fn emit_char(&mut self, ch: char) -> Result<()> {
        self.write_char(ch)
    }
}

/// A character-level rewriting state machine.
pub trait CharTransform {
    /// Handle the next character, or `None` once at end of input.
    fn step<S: Sink>(&mut self, ch: Option<char>, out: &mut S) -> Result<()>;
}

/// Stream a document through `transform` into a scratch file, then commit
/// the scratch over the document.
///
/// Any failure before the commit deletes the scratch file and leaves the
/// document untouched.
///
/// # Errors
/// Returns the first error raised by the session or the transform.
pub fn rewrite_file<T: CharTransform>(settings: &Settings, path: &Path, transform: &mut T) -> Result<()> {
    let mut source = TokenSource::new(settings);
    source.open(path, true)?;

    if let Err(err) = stream(&mut source, transform).and_then(|()| source.close()) {
        source.discard();
        if source.is_open() {
            source.close().ok();
        }
        tracing::debug!("Discarded rewrite of {}: {}", path.display(), err);
        return Err(err);
    }
    source.commit()
}

fn stream<T: CharTransform>(source: &mut TokenSource, transform: &mut T) -> Result<()> {
    while let Some(ch) = source.read_char()? {
        transform.step(Some(ch), source)?;
    }
    transform.step(None, source)
}

/// Run `transform` over in-memory text.
///
/// # Errors
/// Returns the first error raised by the transform.
pub fn rewrite_str<T: CharTransform>(text: &str, transform: &mut T) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        transform.step(Some(ch), &mut out)?;
    }
    transform.step(None, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use std::fs;

    /// Upper-cases everything; fails on `!`.
    struct Shout;

    impl CharTransform for Shout {
        fn step<S: Sink>(&mut self, ch: Option<char>, out: &mut S) -> Result<()> {
            match ch {
                Some('!') => Err(Error::ScratchNotOpen),
                Some(c) => out.emit(&c.to_uppercase().to_string()),
                None => out.emit("."),
            }
        }
    }

    #[test]
    fn test_rewrite_str() {
        assert_eq!(rewrite_str("abc", &mut Shout).unwrap(), "ABC.");
    }

    #[test]
    fn test_rewrite_file_commits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wrl");
        fs::write(&path, "abc").unwrap();

        rewrite_file(&Settings::default(), &path, &mut Shout).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "ABC.");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_rewrite_file_failure_discards_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wrl");
        fs::write(&path, "ab!c").unwrap();

        assert!(rewrite_file(&Settings::default(), &path, &mut Shout).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "ab!c");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
