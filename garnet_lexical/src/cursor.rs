//! Contains the [`Cursor`], a read position over a source buffer.

use std::sync::Arc;

use garnet_base::source_file::{ByteIndex, SourceFile, Span};

/// Represents something the remaining input can be matched against.
///
/// A match is always anchored at the cursor. The result is the number of bytes matched.
pub trait Pattern {
    /// Gets the length of the match at the start of `input`, if there is one.
    fn match_len(&self, input: &str) -> Option<usize>;
}

impl Pattern for &str {
    fn match_len(&self, input: &str) -> Option<usize> {
        input.starts_with(*self).then_some(self.len())
    }
}

impl Pattern for char {
    fn match_len(&self, input: &str) -> Option<usize> {
        input.starts_with(*self).then_some(self.len_utf8())
    }
}

impl<F> Pattern for F
where
    F: Fn(&str) -> Option<usize>,
{
    fn match_len(&self, input: &str) -> Option<usize> { self(input) }
}

/// Is a struct tracking the read position and line number over a [`SourceFile`].
///
/// The cursor only moves forward, except through [`Cursor::jump`] which is used to come back
/// from a heredoc body to the rest of the line that opened it.
#[derive(Debug, Clone)]
pub struct Cursor {
    source_file: Arc<SourceFile>,
    position: ByteIndex,
    line: usize,
}

impl Cursor {
    /// Creates a cursor at the start of the given source.
    #[must_use]
    pub fn new(source_file: Arc<SourceFile>) -> Self {
        Self {
            source_file,
            position: 0,
            line: 1,
        }
    }

    /// Gets the source the cursor reads from.
    #[must_use]
    pub fn source_file(&self) -> &Arc<SourceFile> { &self.source_file }

    /// Gets the byte offset of the cursor.
    #[must_use]
    pub fn position(&self) -> ByteIndex { self.position }

    /// Gets the line number of the cursor (starts at 1).
    #[must_use]
    pub fn line(&self) -> usize { self.line }

    /// Gets the input that has not been consumed yet.
    #[must_use]
    pub fn remainder(&self) -> &str { &self.source_file.content()[self.position..] }

    /// Checks whether the whole input has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool { self.position >= self.source_file.content().len() }

    /// Checks whether the cursor is at the start of a line.
    #[must_use]
    pub fn is_beginning_of_line(&self) -> bool {
        self.position == 0 || self.source_file.content().as_bytes()[self.position - 1] == b'\n'
    }

    /// Gets the character under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<char> { self.remainder().chars().next() }

    /// Gets the `n`th character after the cursor, where `0` is the character under it.
    #[must_use]
    pub fn nth(&self, n: usize) -> Option<char> { self.remainder().chars().nth(n) }

    /// Gets the text the pattern matches at the cursor without consuming it.
    #[must_use]
    pub fn peek(&self, pattern: impl Pattern) -> Option<&str> {
        let remainder = self.remainder();
        pattern.match_len(remainder).map(|len| &remainder[..len])
    }

    /// Checks whether the pattern matches at the cursor.
    #[must_use]
    pub fn check(&self, pattern: impl Pattern) -> bool { self.peek(pattern).is_some() }

    /// Consumes and returns the text the pattern matches at the cursor.
    pub fn take(&mut self, pattern: impl Pattern) -> Option<String> {
        let text = self.peek(pattern)?.to_owned();
        self.advance(text.len());
        Some(text)
    }

    /// Consumes the text the pattern matches at the cursor, returning whether it matched.
    pub fn skip(&mut self, pattern: impl Pattern) -> bool {
        let Some(len) = pattern.match_len(self.remainder()) else {
            return false;
        };

        self.advance(len);
        true
    }

    /// Consumes one character.
    pub fn bump(&mut self) -> Option<char> {
        let character = self.current()?;
        self.advance(character.len_utf8());
        Some(character)
    }

    /// Moves the cursor forward by `len` bytes, counting the newlines passed.
    pub fn advance(&mut self, len: usize) {
        let end = (self.position + len).min(self.source_file.content().len());
        self.line += self.source_file.content()[self.position..end]
            .bytes()
            .filter(|byte| *byte == b'\n')
            .count();
        self.position = end;
    }

    /// Moves the cursor to the given offset and line.
    pub fn jump(&mut self, position: ByteIndex, line: usize) {
        self.position = position.min(self.source_file.content().len());
        self.line = line;
    }

    /// Gets the byte offset of the end of the current line, past its `\n` if it has one.
    #[must_use]
    pub fn end_of_line(&self) -> ByteIndex {
        self.remainder()
            .find('\n')
            .map_or(self.source_file.content().len(), |index| self.position + index + 1)
    }

    /// Creates a span from `start` to the cursor.
    #[must_use]
    pub fn span_from(&self, start: ByteIndex) -> Span {
        Span::new(
            self.source_file.clone(),
            start.min(self.position),
            self.position,
        )
        .expect("cursor positions always lie on character boundaries")
    }
}

#[cfg(test)]
mod tests;
