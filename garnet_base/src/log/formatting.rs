//! Contains the ANSI escape codes used to style console output.

use std::fmt::Display;

/// An ANSI text attribute: either a style or a foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Ansi {
    Bold,
    Underline,
    Red,
    Green,
    Yellow,
    Cyan,
}

impl Ansi {
    fn code(self) -> &'static str {
        match self {
            Self::Bold => "\x1B[1m",
            Self::Underline => "\x1B[4m",
            Self::Red => "\x1B[31m",
            Self::Green => "\x1B[32m",
            Self::Yellow => "\x1B[33m",
            Self::Cyan => "\x1B[36m",
        }
    }

    /// Wraps the given displayable object so that it is printed with this attribute.
    pub fn paint<T>(self, display: T) -> Painted<T> {
        Painted {
            attribute: self,
            display,
        }
    }
}

/// Is a struct implementing [`Display`] that prints its content wrapped in an ANSI attribute and
/// a reset code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Painted<T> {
    /// The attribute applied to the content.
    pub attribute: Ansi,

    /// The content.
    pub display: T,
}

impl<T: Display> Display for Painted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}\x1B[0m", self.attribute.code(), self.display)
    }
}
