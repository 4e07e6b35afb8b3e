//! Contains the stack of open string-like literals.
//!
//! A literal context is pushed when an opener is read and popped when its closer is found. While
//! the top context is active the lexer reads literal content instead of dispatching ordinary
//! tokens. A context is suspended while the lexer reads the code of an interpolation.

use derive_more::{Deref, DerefMut};
use garnet_base::source_file::ByteIndex;

/// Is an enumeration of the kinds of string-like literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum LiteralKind {
    String,
    Symbol,
    Regex,
    Heredoc,
    XString,
}

/// Is an enumeration of the ways a heredoc body may be indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HeredocIndent {
    /// `<<TAG`: the terminator must start the line.
    #[default]
    None,

    /// `<<-TAG`: the terminator may be indented.
    Dash,

    /// `<<~TAG`: the terminator may be indented and the body is dedented.
    Squiggly,
}

/// Is a struct holding the data specific to a heredoc.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Heredoc {
    /// The terminator tag.
    pub tag: String,

    /// How the body and terminator may be indented.
    pub indent: HeredocIndent,

    /// The number of columns stripped from each body line.
    pub dedent: usize,

    /// The offset right after the opener, where lexing resumes once the body is read.
    pub resume_position: ByteIndex,

    /// The line of [`Heredoc::resume_position`].
    pub resume_line: usize,
}

/// Is an enumeration of the ways a literal can end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Terminator {
    /// A single closing character. Bracket pairs nest: the opener is then recorded.
    Delimiter {
        /// The opening bracket of a nesting pair.
        opener: Option<char>,

        /// The closing character.
        closer: char,
    },

    /// A line holding only the heredoc tag.
    Heredoc(Heredoc),
}

/// Is an enumeration of the reasons a literal context stops being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suspension {
    /// The lexer is reading the code of a `#{}` interpolation. The value is the brace nesting
    /// level at the `#{`.
    Embedded(isize),

    /// The lexer is reading the variable after `#@` or `#$`.
    Variable,
}

/// Represents a string-like literal the lexer is currently inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralContext {
    /// The kind of the literal.
    pub kind: LiteralKind,

    /// How the literal ends.
    pub terminator: Terminator,

    /// Whether `#{}`, `#@` and `#$` interpolate and escapes are decoded.
    pub interpolates: bool,

    /// Whether the content is a whitespace-separated word list.
    pub words: bool,

    /// The number of unclosed nesting openers inside the literal.
    pub nesting: usize,

    /// The word list's closer is next and only the final [`crate::token::TokenKind::StringEnd`]
    /// remains.
    pub finishing: bool,

    /// Why the context is not being read at the moment, if it is not.
    pub suspension: Option<Suspension>,
}

impl LiteralContext {
    /// Creates a context closed by a single character.
    #[must_use]
    pub fn delimited(
        kind: LiteralKind,
        opener: Option<char>,
        closer: char,
        interpolates: bool,
    ) -> Self {
        Self {
            kind,
            terminator: Terminator::Delimiter { opener, closer },
            interpolates,
            words: false,
            nesting: 0,
            finishing: false,
            suspension: None,
        }
    }

    /// Creates a heredoc context.
    #[must_use]
    pub fn heredoc(heredoc: Heredoc, interpolates: bool) -> Self {
        Self {
            kind: LiteralKind::Heredoc,
            terminator: Terminator::Heredoc(heredoc),
            interpolates,
            words: false,
            nesting: 0,
            finishing: false,
            suspension: None,
        }
    }

    /// Turns the context into a word list.
    #[must_use]
    pub fn with_words(mut self) -> Self {
        self.words = true;
        self
    }

    /// Gets the nesting opener, if the delimiters form a bracket pair.
    #[must_use]
    pub fn opener(&self) -> Option<char> {
        match &self.terminator {
            Terminator::Delimiter { opener, .. } => *opener,
            Terminator::Heredoc(_) => None,
        }
    }

    /// Gets the closing character of a delimited literal.
    #[must_use]
    pub fn closer(&self) -> Option<char> {
        match &self.terminator {
            Terminator::Delimiter { closer, .. } => Some(*closer),
            Terminator::Heredoc(_) => None,
        }
    }

    /// Gets the heredoc data, if the context is a heredoc.
    #[must_use]
    pub fn as_heredoc(&self) -> Option<&Heredoc> {
        match &self.terminator {
            Terminator::Heredoc(heredoc) => Some(heredoc),
            Terminator::Delimiter { .. } => None,
        }
    }
}

/// Is a stack of [`LiteralContext`]s, innermost last.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deref, DerefMut)]
pub struct LiteralStack {
    contexts: Vec<LiteralContext>,
}

impl LiteralStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Gets the innermost context.
    #[must_use]
    pub fn top(&self) -> Option<&LiteralContext> { self.contexts.last() }

    /// Gets the innermost context mutably.
    pub fn top_mut(&mut self) -> Option<&mut LiteralContext> { self.contexts.last_mut() }

    /// Checks whether the innermost context is being read, i.e. it exists and is not suspended.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.top()
            .map_or(false, |context| context.suspension.is_none())
    }

    /// Checks whether the innermost context is waiting for the `}` closing an interpolation
    /// opened at the given brace nesting level.
    #[must_use]
    pub fn is_embedded_at(&self, brace_nest: isize) -> bool {
        self.top().map_or(false, |context| {
            context.suspension == Some(Suspension::Embedded(brace_nest))
        })
    }
}

#[cfg(test)]
mod tests;
