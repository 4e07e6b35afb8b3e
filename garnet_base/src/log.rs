//! Provides the functions related to logging/printing messages to the console.

use std::fmt::Display;

use derive_new::new;
use formatting::Ansi;

use crate::source_file::Span;

pub mod formatting;

/// Represents the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
    Info,
    Warning,
}

/// Is a struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header = match self.severity {
            Severity::Error => Ansi::Red.paint("[error]:"),
            Severity::Info => Ansi::Green.paint("[info]:"),
            Severity::Warning => Ansi::Yellow.paint("[warning]:"),
        };

        write!(
            f,
            "{} {}",
            Ansi::Bold.paint(header),
            Ansi::Bold.paint(&self.display)
        )
    }
}

/// Structure implementing [`Display`] that prints the line of source code a span starts on, with
/// the span underlined and an optional help message below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct SourceCodeDisplay<'a, T> {
    /// The span of the source code to be printed.
    pub span: &'a Span,

    /// The help message to be displayed.
    pub help_display: Option<T>,
}

impl<'a, T: Display> Display for SourceCodeDisplay<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let location = self.span.start_location();
        let gutter = " ".repeat(location.line.to_string().len());
        let pipe = Ansi::Bold.paint(Ansi::Cyan.paint("┃"));

        writeln!(
            f,
            "{gutter}{} {}:{}:{}",
            Ansi::Bold.paint(Ansi::Cyan.paint("-->")),
            self.span.source_file().name(),
            location.line,
            location.column
        )?;

        let Some(line) = self.span.source_file().get_line(location.line) else {
            return Ok(());
        };

        write!(
            f,
            "{} {pipe} ",
            Ansi::Bold.paint(Ansi::Cyan.paint(location.line))
        )?;

        // the span may run past the end of its first line; only that line is printed
        let content = self.span.source_file().content();
        let mut offset = line.as_ptr() as usize - content.as_ptr() as usize;

        for character in line.chars() {
            if character == '\n' || character == '\r' {
                break;
            }

            let in_span = offset >= self.span.start() && offset < self.span.end();

            if character == '\t' {
                write!(f, "    ")?;
            } else if in_span {
                write!(
                    f,
                    "{}",
                    Ansi::Underline.paint(Ansi::Bold.paint(Ansi::Red.paint(character)))
                )?;
            } else {
                write!(f, "{character}")?;
            }

            offset += character.len_utf8();
        }

        writeln!(f)?;

        if let Some(help) = &self.help_display {
            writeln!(f, "{gutter} {pipe} {}: {help}", Ansi::Bold.paint("help"))?;
        }

        Ok(())
    }
}
