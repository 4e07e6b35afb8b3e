//! Contains the errors that stop lexing and the warnings reported along the way.

use std::fmt::Display;

use derive_more::From;
use enum_as_inner::EnumAsInner;
use garnet_base::{
    log::{Message, Severity, SourceCodeDisplay},
    source_file::{SourceElement, Span},
};
use getset::Getters;

/// Is an error raised for malformed source: bad numbers, invalid escapes, unterminated literals
/// and the like.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CompileError {
    /// Gets the message describing the problem.
    #[get = "pub"]
    message: String,

    /// The source range the problem was found at.
    span: Span,
}

impl CompileError {
    /// Creates a new [`CompileError`].
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl SourceElement for CompileError {
    fn span(&self) -> Span { self.span.clone() }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", Message::new(Severity::Error, &self.message))?;
        write!(f, "{}", SourceCodeDisplay::new(&self.span, Option::<i32>::None))
    }
}

/// Is an error raised when no rule of the dispatcher matches the input. It indicates a gap in
/// the rule tables rather than bad source.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ScanFault {
    /// Gets the message naming the unmatched input.
    #[get = "pub"]
    message: String,

    /// The source range the dispatcher stopped at.
    span: Span,
}

impl ScanFault {
    /// Creates a new [`ScanFault`].
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl SourceElement for ScanFault {
    fn span(&self) -> Span { self.span.clone() }
}

impl Display for ScanFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", Message::new(Severity::Error, &self.message))?;
        write!(
            f,
            "{}",
            SourceCodeDisplay::new(&self.span, Some("the lexer has no rule for this input"))
        )
    }
}

/// Is an enumeration containing all kinds of errors that stop lexing.
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner, From, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("{0}")]
    CompileError(CompileError),

    #[error("{0}")]
    ScanFault(ScanFault),
}

impl Error {
    /// Gets the message of the error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::CompileError(error) => error.message(),
            Self::ScanFault(error) => error.message(),
        }
    }

    /// Gets the `filename:line` location the error was raised at.
    #[must_use]
    pub fn location(&self) -> String { self.span().location_string() }
}

impl SourceElement for Error {
    fn span(&self) -> Span {
        match self {
            Self::CompileError(error) => error.span(),
            Self::ScanFault(error) => error.span(),
        }
    }
}

/// Is an enumeration of the situations the lexer warns about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A unary operator after a space in argument position, as in `foo -1`.
    AmbiguousFirstArgument,

    /// `*`, `**` or `&` after a space in argument position, read as a prefix. Holds the
    /// operator.
    ArgumentPrefix(&'static str),

    /// `?` followed by whitespace outside argument position. Holds the letter of the escape
    /// that should be written instead, such as `s` for a space.
    InvalidCharacterSyntax(char),

    /// A space between a method name and its argument parentheses.
    SpaceBeforeParentheses,
}

impl Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmbiguousFirstArgument => f.write_str("ambiguous first argument; make sure"),
            Self::ArgumentPrefix(operator) => {
                write!(f, "`{operator}' interpreted as argument prefix")
            }
            Self::InvalidCharacterSyntax(letter) => {
                write!(f, "invalid character syntax; use ?\\{letter}")
            }
            Self::SpaceBeforeParentheses => {
                f.write_str("don't put space before argument parentheses")
            }
        }
    }
}

/// Is a non-fatal diagnostic reported through a [`garnet_base::diagnostic::Handler`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Warning {
    /// Gets what the warning is about.
    #[get = "pub"]
    kind: WarningKind,

    /// The source range the warning points at.
    span: Span,
}

impl Warning {
    /// Creates a new [`Warning`].
    #[must_use]
    pub fn new(kind: WarningKind, span: Span) -> Self { Self { kind, span } }
}

impl SourceElement for Warning {
    fn span(&self) -> Span { self.span.clone() }
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", Message::new(Severity::Warning, self.kind))?;
        write!(f, "{}", SourceCodeDisplay::new(&self.span, Option::<i32>::None))
    }
}

#[cfg(test)]
mod tests;
