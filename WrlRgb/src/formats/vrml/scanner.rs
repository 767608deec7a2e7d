//! Character-level word scanning
//!
//! The rewriting engines read one character at a time so that everything
//! they do not change can be copied out byte for byte. [`WordScanner`]
//! groups those characters back into words without losing the whitespace
//! between them.

use crate::error::Result;
use crate::fileio::Sink;

/// A completed word and the whitespace character that ended it.
///
/// `word` is empty when the delimiter follows another delimiter.
/// `delimiter` is `None` only for the last word of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub word: String,
    pub delimiter: Option<char>,
}

impl Boundary {
    /// A whitespace character with no word in front of it.
    pub fn is_blank(&self) -> bool {
        self.word.is_empty()
    }

    pub fn is(&self, literal: &str) -> bool {
        self.word == literal
    }

    /// Write the word and its delimiter unchanged.
    pub fn emit_verbatim<S: Sink>(&self, out: &mut S) -> Result<()> {
        out.emit(&self.word)?;
        self.emit_delimiter(out)
    }

    /// Write only the delimiter, if any.
    pub fn emit_delimiter<S: Sink>(&self, out: &mut S) -> Result<()> {
        match self.delimiter {
            Some(ch) => out.emit_char(ch),
            None => Ok(()),
        }
    }

    /// Append the word and its delimiter to a string.
    pub fn append_to(&self, text: &mut String) {
        text.push_str(&self.word);
        if let Some(ch) = self.delimiter {
            text.push(ch);
        }
    }
}

/// Accumulates non-whitespace characters into words.
#[derive(Debug, Default)]
pub struct WordScanner {
    word: String,
}

impl WordScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one character, or `None` at end of input.
    ///
    /// Returns a boundary at every whitespace character, and at end of input
    /// when a word is pending.
    pub fn push(&mut self, ch: Option<char>) -> Option<Boundary> {
        match ch {
            Some(c) if c.is_whitespace() => Some(Boundary {
                word: std::mem::take(&mut self.word),
                delimiter: Some(c),
            }),
            Some(c) => {
                self.word.push(c);
                None
            }
            None if self.word.is_empty() => None,
            None => Some(Boundary {
                word: std::mem::take(&mut self.word),
                delimiter: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(text: &str) -> Vec<Boundary> {
        let mut scanner = WordScanner::new();
        text.chars()
            .map(Some)
            .chain(std::iter::once(None))
            .filter_map(|c| scanner.push(c))
            .collect()
    }

    fn boundary(word: &str, delimiter: Option<char>) -> Boundary {
        Boundary { word: word.to_string(), delimiter }
    }

    #[test]
    fn test_words_and_runs() {
        assert_eq!(
            scan("DEF  Box1\n"),
            vec![
                boundary("DEF", Some(' ')),
                boundary("", Some(' ')),
                boundary("Box1", Some('\n')),
            ]
        );
    }

    #[test]
    fn test_last_word_without_delimiter() {
        assert_eq!(scan("a b"), vec![boundary("a", Some(' ')), boundary("b", None)]);
        assert_eq!(scan("a "), vec![boundary("a", Some(' '))]);
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_verbatim_reassembles_input() {
        let text = "#VRML V2.0 utf8\n\n  DEF\tBox1 Transform {}";
        let mut out = String::new();
        for b in scan(text) {
            b.emit_verbatim(&mut out).unwrap();
        }
        assert_eq!(out, text);
    }
}
