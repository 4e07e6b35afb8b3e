//! Contains the code related to the source code input.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    ops::Range,
    path::{Path, PathBuf},
    sync::Arc,
};

use getset::{CopyGetters, Getters};
use thiserror::Error;

/// The name reported for sources that were not loaded from a file.
pub const ANONYMOUS_SOURCE_NAME: &str = "<input>";

/// Represents an error that occurs when loading/creating a source file.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

/// Represents a source buffer handed to the lexer.
///
/// The whole content is held in memory. The optional path is only used for diagnostics.
#[derive(Getters)]
pub struct SourceFile {
    content: String,

    /// Gets the path the source was loaded from, if any.
    #[get = "pub"]
    full_path: Option<PathBuf>,

    lines: Vec<Range<usize>>,
}

impl Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name())
            .field("lines", &self.lines.len())
            .finish()
    }
}

impl SourceFile {
    /// Creates a source file from the given text.
    #[must_use]
    pub fn new(content: impl Into<String>, full_path: Option<PathBuf>) -> Arc<Self> {
        let content = content.into();
        let lines = get_line_byte_positions(&content);

        Arc::new(Self {
            content,
            full_path,
            lines,
        })
    }

    /// Reads the whole file at the given path into memory.
    ///
    /// # Errors
    /// - [`Error::IoError`]: Error occurred when reading the file.
    /// - [`Error::Utf8Error`]: The file is not valid UTF-8.
    pub fn load(path: impl AsRef<Path>) -> Result<Arc<Self>, Error> {
        let bytes = std::fs::read(path.as_ref())?;
        let content = String::from_utf8(bytes)?;

        Ok(Self::new(content, Some(path.as_ref().to_owned())))
    }

    /// Creates a temporary source file and writes the given displayable object to it, then loads
    /// it back.
    ///
    /// # Errors
    /// - [`Error::IoError`]: Error occurred when creating, writing to, or reading the file.
    /// - [`Error::Utf8Error`]: Error occurred when converting the read bytes to a string.
    pub fn temp(display: impl Display) -> Result<Arc<Self>, Error> {
        use std::io::Write;

        let mut tempfile = tempfile::Builder::new()
            .prefix("garnet")
            .suffix(".rb")
            .tempfile()?;

        write!(tempfile.as_file_mut(), "{display}")?;
        tempfile.as_file_mut().flush()?;

        Self::load(tempfile.path())
    }

    /// Gets the content of the source file.
    #[must_use]
    pub fn content(&self) -> &str { &self.content }

    /// Gets the name used in diagnostics: the path if there is one, [`ANONYMOUS_SOURCE_NAME`]
    /// otherwise.
    #[must_use]
    pub fn name(&self) -> String {
        self.full_path.as_ref().map_or_else(
            || ANONYMOUS_SOURCE_NAME.to_string(),
            |path| path.display().to_string(),
        )
    }

    /// Gets the line of the source file at the given line number.
    ///
    /// The line number starts at 1.
    #[must_use]
    pub fn get_line(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }

        self.lines
            .get(line - 1)
            .map(|range| &self.content[range.clone()])
    }

    /// Gets the number of lines in the source file.
    #[must_use]
    pub fn line_number(&self) -> usize { self.lines.len() }

    /// Gets the [`Location`] of the given byte index.
    ///
    /// The index one past the last byte is accepted and maps to the end of the last line.
    #[must_use]
    pub fn get_location(&self, byte_index: ByteIndex) -> Option<Location> {
        if byte_index > self.content.len() || !self.content.is_char_boundary(byte_index) {
            return None;
        }

        let line = if byte_index == self.content.len() {
            self.lines.len() - 1
        } else {
            self.lines
                .binary_search_by(|range| {
                    if range.contains(&byte_index) {
                        Ordering::Equal
                    } else if byte_index < range.start {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                })
                .ok()?
        };

        let line_start = self.lines[line].start;
        let column = self.content[line_start..byte_index].chars().count() + 1;

        Some(Location {
            line: line + 1,
            column,
        })
    }
}

/// Is an unsigned integer that represents a byte index in the source code.
pub type ByteIndex = usize;

/// Represents a range of characters in a source file.
#[derive(Clone, Getters, CopyGetters)]
pub struct Span {
    /// Gets the start byte index of the span.
    #[get_copy = "pub"]
    start: ByteIndex,

    /// Gets the end byte index of the span (exclusive).
    #[get_copy = "pub"]
    end: ByteIndex,

    /// Gets the source file that the span is located in.
    #[get = "pub"]
    source_file: Arc<SourceFile>,
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Span")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("content", &self.str())
            .finish()
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source_file, &other.source_file)
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for Span {}

/// Is a struct pointing to a particular location in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    /// The line number of the location (starts at 1).
    pub line: usize,

    /// The column number of the location (starts at 1).
    pub column: usize,
}

impl Span {
    /// Creates a span from the given start and end byte indices in the source file.
    ///
    /// Returns [`None`] if the indices are out of order, out of bounds, or not on character
    /// boundaries.
    #[must_use]
    pub fn new(source_file: Arc<SourceFile>, start: ByteIndex, end: ByteIndex) -> Option<Self> {
        let content = source_file.content();

        if start > end
            || end > content.len()
            || !content.is_char_boundary(start)
            || !content.is_char_boundary(end)
        {
            return None;
        }

        Some(Self {
            start,
            end,
            source_file,
        })
    }

    /// Gets the string slice of the source code that the span represents.
    #[must_use]
    pub fn str(&self) -> &str { &self.source_file.content()[self.start..self.end] }

    /// Gets the starting [`Location`] of the span.
    #[must_use]
    pub fn start_location(&self) -> Location {
        self.source_file
            .get_location(self.start)
            .unwrap_or_default()
    }

    /// Gets the `filename:line` string of the span's start.
    #[must_use]
    pub fn location_string(&self) -> String {
        format!(
            "{}:{}",
            self.source_file.name(),
            self.start_location().line
        )
    }
}

/// Represents an element that is located within a source file.
pub trait SourceElement {
    /// Gets the span location of the element.
    fn span(&self) -> Span;
}

impl<T: SourceElement> SourceElement for Box<T> {
    fn span(&self) -> Span { self.as_ref().span() }
}

fn get_line_byte_positions(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut results = Vec::new();
    let mut line_start = 0;
    let mut index = 0;

    while index < bytes.len() {
        let line_end = match bytes[index] {
            b'\n' => Some(index + 1),
            b'\r' if bytes.get(index + 1) == Some(&b'\n') => Some(index + 2),
            b'\r' => Some(index + 1),
            _ => None,
        };

        if let Some(line_end) = line_end {
            results.push(line_start..line_end);
            line_start = line_end;
            index = line_end;
        } else {
            index += 1;
        }
    }

    results.push(line_start..text.len());

    results
}

#[cfg(test)]
mod tests;
