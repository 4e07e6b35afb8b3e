//! Reads the content of string-like literals: strings, symbols, regular expressions, command
//! strings, word lists and heredocs.

use super::{
    rules::{chars_len, identifier_len},
    Emit, Lexer,
};
use crate::{
    error::Error,
    escape,
    literal::{Heredoc, HeredocIndent, LiteralContext, LiteralKind, Suspension},
    state::LexState,
    token::{Lexeme, TokenKind},
};

/// Is an enumeration of the reasons reading literal content stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Closer,
    Interpolation,
    Whitespace,
    EndOfInput,
}

const REGEXP_OPTIONS: &str = "ixmonesu";

fn is_terminator(line: &str, heredoc: &Heredoc) -> bool {
    let line = line.strip_suffix('\n').unwrap_or(line).trim_end_matches('\r');
    let line = match heredoc.indent {
        HeredocIndent::None => line,
        HeredocIndent::Dash | HeredocIndent::Squiggly => {
            line.trim_start_matches(|character| matches!(character, ' ' | '\t'))
        }
    };

    line == heredoc.tag
}

fn next_column(column: usize, character: char) -> Option<usize> {
    match character {
        ' ' => Some(column + 1),
        '\t' => Some((column / 8 + 1) * 8),
        _ => None,
    }
}

/// Gets the column the first non-blank character of the line sits at. Tabs advance to the next
/// multiple of eight.
fn indentation_width(line: &str) -> usize {
    line.chars()
        .try_fold(0, |column, character| next_column(column, character).ok_or(column))
        .unwrap_or_else(|column| column)
}

/// Gets the number of bytes of leading whitespace that fit in `width` columns.
fn dedent_len(line: &str, width: usize) -> usize {
    let mut column = 0;
    let mut len = 0;

    for character in line.chars() {
        match next_column(column, character) {
            Some(next) if next <= width => {
                column = next;
                len += 1;
            }
            _ => break,
        }
    }

    len
}

fn is_global_start(input: &str) -> bool {
    if let Some(option) = input.strip_prefix('-') {
        return option.chars().next().map_or(false, |next| next != '\n');
    }

    input.starts_with(|next: char| {
        next.is_ascii_alphanumeric() || "_~*$?!@/\\;,.=:<>\"&`'+".contains(next)
    })
}

fn is_instance_start(input: &str) -> bool {
    let name = input.strip_prefix('@').unwrap_or(input);
    name.starts_with(|next: char| next.is_ascii_alphabetic() || next == '_')
}

impl Lexer<'_> {
    /// Produces the next token of the innermost literal.
    pub(super) fn process_string(&mut self) -> Result<Emit, Error> {
        let Some(context) = self.literals.top().cloned() else {
            return Err(self.scan_fault());
        };

        if let Some(heredoc) = context.as_heredoc() {
            return self.process_heredoc(&context, heredoc);
        }

        let Some(closer) = context.closer() else {
            return Err(self.scan_fault());
        };

        if context.finishing {
            self.cursor.skip(closer);
            self.pop_literal();
            return Ok(Emit::text(
                LexState::End,
                TokenKind::StringEnd,
                closer.to_string(),
            ));
        }

        let space = context.words && self.skip_word_separator(&context);

        if context.nesting == 0 && context.words && self.cursor.check(closer) {
            if let Some(top) = self.literals.top_mut() {
                top.finishing = true;
            }

            return Ok(Emit::new(None, TokenKind::Space, Lexeme::None));
        }

        if context.nesting == 0 && self.cursor.skip(closer) {
            return self.close_literal(&context, closer);
        }

        if space {
            return Ok(Emit::new(None, TokenKind::Space, Lexeme::None));
        }

        let mut buffer = String::new();

        if context.interpolates {
            if let Some(emit) = self.interpolation() {
                return Ok(emit);
            }

            if self.cursor.skip('#') {
                buffer.push('#');
            }
        }

        match self.read_content(&context, closer, &mut buffer)? {
            Stop::EndOfInput => Err(self.unterminated(&context)),
            Stop::Closer | Stop::Interpolation | Stop::Whitespace => {
                Ok(Emit::keep(TokenKind::StringContent, buffer))
            }
        }
    }

    pub(super) fn unterminated(&self, context: &LiteralContext) -> Error {
        match (context.kind, context.as_heredoc()) {
            (_, Some(heredoc)) => self.compile_error(format!(
                "can't find string \"{}\" anywhere before EOF",
                heredoc.tag
            )),
            (LiteralKind::Regex, None) => {
                self.compile_error("unterminated regexp meets end of file")
            }
            _ => self.compile_error("unterminated string meets end of file"),
        }
    }

    fn close_literal(&mut self, context: &LiteralContext, closer: char) -> Result<Emit, Error> {
        self.pop_literal();

        if context.kind == LiteralKind::Regex {
            let options = self.regexp_options()?;
            return Ok(Emit::text(LexState::End, TokenKind::RegexpEnd, options));
        }

        let label_possible = (matches!(self.state, LexState::Beg | LexState::EndFn)
            && !self.cond.is_in_state())
            || self.is_arg();

        if self.capabilities.string_labels
            && context.kind == LiteralKind::String
            && matches!(closer, '\'' | '"')
            && label_possible
            && self.is_label_suffix()
        {
            self.cursor.skip(':');
            return Ok(Emit::text(
                LexState::Label,
                TokenKind::LabelEnd,
                closer.to_string(),
            ));
        }

        Ok(Emit::text(
            LexState::End,
            TokenKind::StringEnd,
            closer.to_string(),
        ))
    }

    fn regexp_options(&mut self) -> Result<String, Error> {
        let options = self
            .cursor
            .take(|input: &str| Some(chars_len(input, |character| character.is_ascii_lowercase())))
            .unwrap_or_default();

        let unknown = options
            .chars()
            .filter(|option| !REGEXP_OPTIONS.contains(*option))
            .collect::<String>();

        if !unknown.is_empty() {
            let plural = if unknown.len() > 1 { "s" } else { "" };
            return Err(self.compile_error(format!("unknown regexp option{plural} - {unknown:?}")));
        }

        Ok(options)
    }

    /// Reads `#{`, or the `#` before an interpolated `$global` or `@variable`, suspending the
    /// innermost literal.
    fn interpolation(&mut self) -> Option<Emit> {
        let rest = self.cursor.remainder();

        let suspension = if rest.starts_with("#{") {
            Suspension::Embedded(self.brace_nest)
        } else if rest
            .strip_prefix("#$")
            .map_or(false, is_global_start)
            || rest.strip_prefix("#@").map_or(false, is_instance_start)
        {
            Suspension::Variable
        } else {
            return None;
        };

        if let Some(top) = self.literals.top_mut() {
            top.suspension = Some(suspension);
        }

        if suspension == Suspension::Variable {
            self.cursor.bump();
            return Some(Emit::keep(TokenKind::StringDVar, "#"));
        }

        self.cursor.advance(2);
        self.flags.command_start = true;
        self.cond.push(false);
        self.cmdarg.push(false);

        Some(Emit::text(LexState::Beg, TokenKind::StringDBeg, "#{"))
    }

    /// Reads literal content into the buffer until the closer at nesting level zero, an
    /// interpolation, a word separator or the end of the input.
    fn read_content(
        &mut self,
        context: &LiteralContext,
        closer: char,
        buffer: &mut String,
    ) -> Result<Stop, Error> {
        let opener = context.opener();
        let mut nesting = context.nesting;

        let stop = loop {
            let Some(character) = self.cursor.current() else {
                break Stop::EndOfInput;
            };

            if Some(character) == opener {
                nesting += 1;
            } else if character == closer {
                if nesting == 0 {
                    break Stop::Closer;
                }
                nesting -= 1;
            } else if context.interpolates
                && character == '#'
                && matches!(self.cursor.nth(1), Some('$' | '@' | '{'))
            {
                break Stop::Interpolation;
            } else if context.words && character.is_whitespace() {
                break Stop::Whitespace;
            } else if character == '\\' {
                self.cursor.bump();
                self.read_backslash(context, closer, buffer)?;
                continue;
            } else if character == '\0' && context.kind == LiteralKind::Symbol {
                return Err(self.compile_error("symbol cannot contain '\\0'"));
            }

            self.cursor.bump();
            buffer.push(character);

            if character == '\n' {
                self.leave_line(context);
            }
        };

        if let Some(top) = self.literals.top_mut() {
            top.nesting = nesting;
        }

        Ok(stop)
    }

    /// Continues a literal that spans lines after a heredoc body read from the line just left.
    /// Heredoc bodies themselves never jump.
    fn leave_line(&mut self, context: &LiteralContext) {
        if context.as_heredoc().is_none() {
            self.skip_heredoc_body();
        }
    }

    fn skip_word_separator(&mut self, context: &LiteralContext) -> bool {
        let mut skipped = false;

        while let Some(character) = self.cursor.current().filter(|next| next.is_whitespace()) {
            self.cursor.bump();
            skipped = true;

            if character == '\n' {
                self.leave_line(context);
            }
        }

        skipped
    }

    /// Reads what follows a backslash inside a literal. The backslash has been consumed.
    fn read_backslash(
        &mut self,
        context: &LiteralContext,
        closer: char,
        buffer: &mut String,
    ) -> Result<(), Error> {
        let next = self.cursor.current();

        if context.words {
            if self.cursor.skip('\n') {
                buffer.push('\n');
                self.leave_line(context);
                return Ok(());
            }

            if next.map_or(false, char::is_whitespace) {
                self.cursor.bump();
                buffer.push(' ');
                return Ok(());
            }
        }

        if context.interpolates && self.cursor.skip('\n') {
            self.leave_line(context);
            return Ok(());
        }

        if context.kind == LiteralKind::Regex {
            let len = escape::raw_len(self.cursor.remainder())
                .map_err(|error| self.compile_error(error.to_string()))?;

            buffer.push('\\');
            buffer.push_str(&self.cursor.remainder()[..len]);
            self.cursor.advance(len);
            return Ok(());
        }

        if context.interpolates {
            let decoded = self.read_escape()?;
            buffer.push_str(&decoded);
            return Ok(());
        }

        match next {
            Some('\\') => {
                self.cursor.bump();
                buffer.push('\\');
            }
            Some(next) if next == closer || Some(next) == context.opener() => {
                self.cursor.bump();
                buffer.push(next);
            }
            _ => buffer.push('\\'),
        }

        Ok(())
    }

    /// Reads `<<TAG`, `<<-TAG`, `<<~TAG` or a quoted tag after the `<<` that has been consumed.
    ///
    /// Returns [`None`] when no tag follows, in which case the `<<` is a left shift. Otherwise
    /// the body is checked for its terminator line, a heredoc context is pushed, and lexing
    /// continues at the first line of the body.
    pub(super) fn heredoc_identifier(&mut self) -> Result<Option<Emit>, Error> {
        let remainder = self.cursor.remainder();

        let (indent, marker_len) = match remainder.chars().next() {
            Some('-') => (HeredocIndent::Dash, 1),
            Some('~') => (HeredocIndent::Squiggly, 1),
            _ => (HeredocIndent::None, 0),
        };
        let rest = &remainder[marker_len..];

        let quote = rest
            .chars()
            .next()
            .filter(|first| matches!(first, '\'' | '"' | '`'));

        let (tag, len) = if let Some(quote) = quote {
            let line = &rest[1..rest.find('\n').unwrap_or(rest.len())];
            let Some(close) = line.find(quote) else {
                return Err(self.compile_error("unterminated here document identifier"));
            };

            (line[..close].to_owned(), marker_len + close + 2)
        } else {
            let len = identifier_len(rest);
            if len == 0 {
                return Ok(None);
            }

            (rest[..len].to_owned(), marker_len + len)
        };

        let opener = format!("<<{}", &remainder[..len]);
        self.cursor.advance(len);

        let resume_position = self.cursor.position();
        let resume_line = self.cursor.line();
        let (body_position, body_line) = self
            .heredoc_end
            .take()
            .unwrap_or_else(|| (self.cursor.end_of_line(), resume_line + 1));

        let mut heredoc = Heredoc {
            tag,
            indent,
            dedent: 0,
            resume_position,
            resume_line,
        };

        let source_file = self.cursor.source_file().clone();
        let mut dedent = None::<usize>;
        let mut terminated = false;

        for line in source_file.content()[body_position..].split_inclusive('\n') {
            if is_terminator(line, &heredoc) {
                terminated = true;
                break;
            }

            if indent == HeredocIndent::Squiggly && !line.trim().is_empty() {
                let width = indentation_width(line);
                dedent = Some(dedent.map_or(width, |dedent| dedent.min(width)));
            }
        }

        if !terminated {
            return Err(self.compile_error(format!(
                "can't find string \"{}\" anywhere before EOF",
                heredoc.tag
            )));
        }

        heredoc.dedent = dedent.unwrap_or(0);

        let kind = if quote == Some('`') {
            TokenKind::XStringBeg
        } else {
            TokenKind::StringBeg
        };
        let interpolates = quote.is_none() || quote == Some('"');

        self.push_literal(LiteralContext::heredoc(heredoc, interpolates));
        self.resume = Some((body_position, body_line));

        Ok(Some(Emit::keep(kind, opener)))
    }

    fn current_line_len(&self) -> usize { self.cursor.end_of_line() - self.cursor.position() }

    fn is_at_terminator(&self, heredoc: &Heredoc) -> bool {
        self.cursor.is_beginning_of_line()
            && is_terminator(
                &self.cursor.remainder()[..self.current_line_len()],
                heredoc,
            )
    }

    fn skip_dedent(&mut self, heredoc: &Heredoc) {
        if heredoc.dedent > 0 && self.cursor.is_beginning_of_line() {
            let len = dedent_len(self.cursor.remainder(), heredoc.dedent);
            self.cursor.advance(len);
        }
    }

    fn process_heredoc(
        &mut self,
        context: &LiteralContext,
        heredoc: &Heredoc,
    ) -> Result<Emit, Error> {
        if self.cursor.at_end() {
            return Err(self.unterminated(context));
        }

        if self.is_at_terminator(heredoc) {
            let len = self.current_line_len();
            self.cursor.advance(len);

            self.heredoc_end = Some((self.cursor.position(), self.cursor.line()));
            self.resume = Some((heredoc.resume_position, heredoc.resume_line));
            self.pop_literal();

            return Ok(Emit::text(
                LexState::End,
                TokenKind::StringEnd,
                heredoc.tag.clone(),
            ));
        }

        let mut buffer = String::new();

        if !context.interpolates {
            while !self.is_at_terminator(heredoc) {
                if self.cursor.at_end() {
                    return Err(self.unterminated(context));
                }

                self.skip_dedent(heredoc);
                let len = self.current_line_len();
                buffer.push_str(&self.cursor.remainder()[..len]);
                self.cursor.advance(len);
            }

            return Ok(Emit::keep(TokenKind::StringContent, buffer));
        }

        self.skip_dedent(heredoc);

        if let Some(emit) = self.interpolation() {
            return Ok(emit);
        }

        if self.cursor.skip('#') {
            buffer.push('#');
        }

        loop {
            match self.read_content(context, '\n', &mut buffer)? {
                Stop::EndOfInput => return Err(self.unterminated(context)),
                Stop::Interpolation | Stop::Whitespace => break,
                Stop::Closer => {
                    self.cursor.bump();
                    buffer.push('\n');

                    if self.cursor.at_end() {
                        return Err(self.unterminated(context));
                    }

                    if self.is_at_terminator(heredoc) {
                        break;
                    }

                    self.skip_dedent(heredoc);
                }
            }
        }

        Ok(Emit::keep(TokenKind::StringContent, buffer))
    }

    /// Reads a `%` literal opener after the `%` that has been consumed.
    pub(super) fn parse_quote(&mut self) -> Result<Emit, Error> {
        let type_len = self
            .cursor
            .remainder()
            .bytes()
            .take(2)
            .take_while(u8::is_ascii_alphanumeric)
            .count();

        if type_len == 2 {
            return Err(self.compile_error("unknown type of %string"));
        }

        let literal_type = if type_len == 1 {
            self.cursor.bump()
        } else {
            None
        };

        let Some(begin) = self.cursor.bump() else {
            return Err(self.compile_error("unterminated quoted string meets end of file"));
        };

        if self.cursor.at_end() {
            return Err(self.compile_error("unterminated quoted string meets end of file"));
        }

        let (opener, closer) = match begin {
            '(' => (Some('('), ')'),
            '[' => (Some('['), ']'),
            '{' => (Some('{'), '}'),
            '<' => (Some('<'), '>'),
            other => (None, other),
        };
        let delimited = |kind: LiteralKind, interpolates: bool| {
            LiteralContext::delimited(kind, opener, closer, interpolates)
        };

        let (kind, context) = match literal_type.unwrap_or('Q') {
            'Q' => (TokenKind::StringBeg, delimited(LiteralKind::String, true)),
            'q' => (TokenKind::StringBeg, delimited(LiteralKind::String, false)),
            'W' => (TokenKind::WordsBeg, delimited(LiteralKind::String, true).with_words()),
            'w' => (TokenKind::QWordsBeg, delimited(LiteralKind::String, false).with_words()),
            'x' => (TokenKind::XStringBeg, delimited(LiteralKind::XString, false)),
            'r' => (TokenKind::RegexpBeg, delimited(LiteralKind::Regex, true)),
            's' => (TokenKind::SymbolBeg, delimited(LiteralKind::Symbol, false)),
            'I' => (TokenKind::SymbolsBeg, delimited(LiteralKind::Symbol, true).with_words()),
            'i' => (TokenKind::QSymbolsBeg, delimited(LiteralKind::Symbol, false).with_words()),
            other => {
                return Err(self.compile_error(format!(
                    "Bad %string type. Expected [QqWwIixrs], found '{other}'."
                )))
            }
        };

        if context.words {
            self.skip_word_separator(&context);
        }

        let state = (kind == TokenKind::SymbolBeg).then_some(LexState::Fname);
        let text = match literal_type {
            Some(literal_type) => format!("%{literal_type}{begin}"),
            None => format!("%{begin}"),
        };

        self.push_literal(context);
        Ok(Emit::new(state, kind, Lexeme::Text(text)))
    }
}
