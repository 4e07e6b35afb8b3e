//! Contains the table of reserved words.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::{capability::Capabilities, state::LexState};

/// Is an enumeration of the reserved words of the Ruby 1.8 and 1.9 grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum Keyword {
    Alias,
    And,
    Begin,
    UpperBegin,
    Break,
    Case,
    Class,
    Def,
    Defined,
    Do,
    Else,
    Elsif,
    End,
    UpperEnd,
    Ensure,
    False,
    For,
    If,
    In,
    Module,
    Next,
    Nil,
    Not,
    Or,
    Redo,
    Rescue,
    Retry,
    Return,
    SelfValue,
    Super,
    Then,
    True,
    Undef,
    Unless,
    Until,
    When,
    While,
    Yield,
    File,
    Line,
    Encoding,
}

/// Is an error that is returned when a string cannot be parsed into a [`Keyword`] in [`FromStr`]
/// trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of keyword.")]
pub struct KeywordParseError;

impl FromStr for Keyword {
    type Err = KeywordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref STRING_KEYWORD_MAP: HashMap<&'static str, Keyword> = {
                let mut map = HashMap::new();

                for keyword in Keyword::iter() {
                    map.insert(keyword.as_str(), keyword);
                }

                map
            };
        }
        STRING_KEYWORD_MAP.get(s).copied().ok_or(KeywordParseError)
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Keyword {
    /// Gets the string representation of the keyword as a `&str`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::And => "and",
            Self::Begin => "begin",
            Self::UpperBegin => "BEGIN",
            Self::Break => "break",
            Self::Case => "case",
            Self::Class => "class",
            Self::Def => "def",
            Self::Defined => "defined?",
            Self::Do => "do",
            Self::Else => "else",
            Self::Elsif => "elsif",
            Self::End => "end",
            Self::UpperEnd => "END",
            Self::Ensure => "ensure",
            Self::False => "false",
            Self::For => "for",
            Self::If => "if",
            Self::In => "in",
            Self::Module => "module",
            Self::Next => "next",
            Self::Nil => "nil",
            Self::Not => "not",
            Self::Or => "or",
            Self::Redo => "redo",
            Self::Rescue => "rescue",
            Self::Retry => "retry",
            Self::Return => "return",
            Self::SelfValue => "self",
            Self::Super => "super",
            Self::Then => "then",
            Self::True => "true",
            Self::Undef => "undef",
            Self::Unless => "unless",
            Self::Until => "until",
            Self::When => "when",
            Self::While => "while",
            Self::Yield => "yield",
            Self::File => "__FILE__",
            Self::Line => "__LINE__",
            Self::Encoding => "__ENCODING__",
        }
    }

    /// Gets the lexer state entered after reading the keyword.
    #[must_use]
    pub fn state(self) -> LexState {
        match self {
            Self::Alias | Self::Def | Self::Undef => LexState::Fname,
            Self::Break | Self::Next | Self::Rescue | Self::Return => LexState::Mid,
            Self::Class => LexState::Class,
            Self::Defined | Self::Not | Self::Super | Self::Yield => LexState::Arg,
            Self::End
            | Self::False
            | Self::Nil
            | Self::Redo
            | Self::Retry
            | Self::SelfValue
            | Self::True
            | Self::UpperBegin
            | Self::UpperEnd
            | Self::File
            | Self::Line
            | Self::Encoding => LexState::End,
            _ => LexState::Beg,
        }
    }

    /// Checks whether the grammar with the given capabilities reserves the keyword.
    #[must_use]
    pub fn is_reserved(self, capabilities: Capabilities) -> bool {
        self != Self::Encoding || capabilities.encoding_keyword
    }

    /// Checks whether the keyword has a distinct modifier form used after an expression.
    #[must_use]
    pub fn has_modifier_form(self) -> bool {
        matches!(
            self,
            Self::If | Self::Unless | Self::While | Self::Until | Self::Rescue
        )
    }
}
