//! Contains the [`Lexer`], which turns source text into tokens one at a time.
//!
//! The lexer is driven by the grammar engine through [`TokenSource::next_token`]. Each call either
//! continues the innermost open string-like literal or dispatches on the leading character to an
//! ordered table of rules (see the `rules` module). The first rule whose guard matches consumes
//! its text and runs its action, which may produce a token, skip the text, push a literal
//! context, or raise an error.

use std::{collections::HashSet, fmt::Debug, sync::Arc};

use garnet_base::{
    diagnostic::Handler,
    source_file::{ByteIndex, SourceFile},
};
use tracing::{debug, trace};

use crate::{
    capability::Capabilities,
    cursor::Cursor,
    error::{CompileError, Error, ScanFault, Warning, WarningKind},
    escape,
    literal::{LiteralContext, LiteralStack, Suspension},
    state::{Flags, LexState, StackState},
    token::{Lexeme, Token, TokenKind},
};

mod rules;
mod string;

pub use rules::is_identifier_char;

/// Represents the pull interface the grammar engine reads tokens through.
pub trait TokenSource {
    /// Produces the next token. [`TokenKind::EndOfInput`] is returned once the input is
    /// exhausted and on every call after that.
    ///
    /// # Errors
    /// - [`Error::CompileError`]: the source is malformed at the current position.
    /// - [`Error::ScanFault`]: no rule of the dispatcher matches the current position.
    fn next_token(&mut self) -> Result<Token, Error>;
}

/// Is what a rule action produces: the kind and value of the token and the state to switch to
/// once the token is built. A state of [`None`] keeps the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Emit {
    state: Option<LexState>,
    kind: TokenKind,
    lexeme: Lexeme,
}

impl Emit {
    fn new(state: Option<LexState>, kind: TokenKind, lexeme: Lexeme) -> Self {
        Self {
            state,
            kind,
            lexeme,
        }
    }

    fn text(state: LexState, kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(Some(state), kind, Lexeme::Text(text.into()))
    }

    fn bare(state: LexState, kind: TokenKind) -> Self { Self::new(Some(state), kind, Lexeme::None) }

    fn keep(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(None, kind, Lexeme::Text(text.into()))
    }
}

/// Is the state machine that splits a source file into tokens.
pub struct Lexer<'h> {
    cursor: Cursor,
    capabilities: Capabilities,
    handler: &'h dyn Handler<Warning>,

    state: LexState,
    last_state: LexState,
    flags: Flags,

    paren_nest: isize,
    brace_nest: isize,
    lpar_beg: Option<isize>,
    cond: StackState,
    cmdarg: StackState,

    literals: LiteralStack,
    heredoc_end: Option<(ByteIndex, usize)>,
    resume: Option<(ByteIndex, usize)>,

    locals: HashSet<String>,
    comments: Vec<String>,

    token_start: ByteIndex,
    token_line: usize,
    finished: bool,
}

impl Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("cursor", &self.cursor)
            .field("capabilities", &self.capabilities)
            .field("state", &self.state)
            .field("last_state", &self.last_state)
            .field("flags", &self.flags)
            .field("paren_nest", &self.paren_nest)
            .field("brace_nest", &self.brace_nest)
            .field("lpar_beg", &self.lpar_beg)
            .field("cond", &self.cond)
            .field("cmdarg", &self.cmdarg)
            .field("literals", &self.literals)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<'h> Lexer<'h> {
    /// Creates a lexer at the start of the given source.
    #[must_use]
    pub fn new(
        source_file: Arc<SourceFile>,
        capabilities: Capabilities,
        handler: &'h dyn Handler<Warning>,
    ) -> Self {
        Self {
            cursor: Cursor::new(source_file),
            capabilities,
            handler,
            state: LexState::Beg,
            last_state: LexState::Beg,
            flags: Flags {
                command_start: true,
                ..Flags::default()
            },
            paren_nest: 0,
            brace_nest: 0,
            lpar_beg: None,
            cond: StackState::new(),
            cmdarg: StackState::new(),
            literals: LiteralStack::new(),
            heredoc_end: None,
            resume: None,
            locals: HashSet::new(),
            comments: Vec::new(),
            token_start: 0,
            token_line: 1,
            finished: false,
        }
    }
}

impl Lexer<'_> {
    /// Gets the source the lexer reads from.
    #[must_use]
    pub fn source_file(&self) -> &Arc<SourceFile> { self.cursor.source_file() }

    /// Gets the capabilities the lexer was created with.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities { self.capabilities }

    /// Gets the line the cursor is on.
    #[must_use]
    pub fn line(&self) -> usize { self.cursor.line() }

    /// Gets the current state.
    #[must_use]
    pub fn state(&self) -> LexState { self.state }

    /// Overrides the current state. Grammar actions use this where the grammar knows more than
    /// the lexer, such as after the name of a method definition.
    pub fn set_state(&mut self, state: LexState) { self.state = state; }

    /// Gets the condition stack.
    #[must_use]
    pub fn cond(&self) -> &StackState { &self.cond }

    /// Gets the condition stack mutably. The grammar pushes onto it around `while`, `until` and
    /// `for` conditions so that `do` reads as [`TokenKind::DoCond`].
    pub fn cond_mut(&mut self) -> &mut StackState { &mut self.cond }

    /// Gets the command argument stack.
    #[must_use]
    pub fn cmdarg(&self) -> &StackState { &self.cmdarg }

    /// Gets the command argument stack mutably.
    pub fn cmdarg_mut(&mut self) -> &mut StackState { &mut self.cmdarg }

    /// Records a local variable name. Known locals are followed by the `End` state, so that
    /// `x -1` subtracts instead of passing `-1` to a method `x`.
    pub fn define_local(&mut self, name: impl Into<String>) { self.locals.insert(name.into()); }

    /// Checks whether the name was recorded with [`Lexer::define_local`].
    #[must_use]
    pub fn is_local(&self, name: &str) -> bool { self.locals.contains(name) }

    /// Gets the comments and embedded documents read so far.
    #[must_use]
    pub fn comments(&self) -> &[String] { &self.comments }

    /// Takes the comments read so far, leaving none behind.
    pub fn take_comments(&mut self) -> Vec<String> { std::mem::take(&mut self.comments) }

    /// Reads tokens up to and including [`TokenKind::EndOfInput`].
    ///
    /// # Errors
    /// Returns the first error [`Lexer::next_token`] raises.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_end = token.kind() == TokenKind::EndOfInput;
            tokens.push(token);

            if is_end {
                return Ok(tokens);
            }
        }
    }

    /// Produces the next token.
    ///
    /// # Errors
    /// - [`Error::CompileError`]: the source is malformed at the current position.
    /// - [`Error::ScanFault`]: no rule of the dispatcher matches the current position.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.mark_token_start();

        if self.finished {
            return Ok(self.build_token(TokenKind::EndOfInput, Lexeme::None));
        }

        if self.literals.is_active() {
            let emit = self.process_string()?;
            return Ok(self.finish_token(emit));
        }

        self.flags.command_state = std::mem::take(&mut self.flags.command_start);
        self.flags.space_seen = false;
        self.last_state = self.state;

        loop {
            self.mark_token_start();

            if self.cursor.at_end() {
                let emit = self.end_of_input()?;
                return Ok(self.finish_token(emit));
            }

            if let Some(emit) = self.dispatch()? {
                return Ok(self.finish_token(emit));
            }
        }
    }

    fn mark_token_start(&mut self) {
        self.token_start = self.cursor.position();
        self.token_line = self.cursor.line();
    }

    fn dispatch(&mut self) -> Result<Option<Emit>, Error> {
        let Some(first) = self.cursor.current() else {
            return self.end_of_input().map(Some);
        };

        self.dispatch_group(rules::rules_for(first))
    }

    fn dispatch_group(&mut self, rules: &'static [rules::Rule]) -> Result<Option<Emit>, Error> {
        for rule in rules {
            let Some(len) = (rule.guard)(self, self.cursor.remainder()) else {
                continue;
            };

            let text = self.cursor.remainder()[..len].to_owned();
            self.cursor.advance(len);
            trace!(rule = rule.name, text = %text, "matched rule");

            return (rule.action)(self, &text);
        }

        Err(self.scan_fault())
    }

    fn end_of_input(&mut self) -> Result<Emit, Error> {
        if let Some(context) = self.literals.top() {
            return Err(self.unterminated(context));
        }

        self.finished = true;
        Ok(Emit::new(None, TokenKind::EndOfInput, Lexeme::None))
    }

    fn finish_token(&mut self, emit: Emit) -> Token {
        if let Some(state) = emit.state {
            self.state = state;
        }

        if emit.kind != TokenKind::StringDVar {
            if let Some(context) = self.literals.top_mut() {
                if context.suspension == Some(Suspension::Variable) {
                    context.suspension = None;
                }
            }
        }

        let token = self.build_token(emit.kind, emit.lexeme);

        if let Some((position, line)) = self.resume.take() {
            self.cursor.jump(position, line);
        }

        trace!(kind = ?token.kind(), state = ?self.state, line = token.line(), "produced token");
        token
    }

    fn build_token(&self, kind: TokenKind, lexeme: Lexeme) -> Token {
        Token::new(
            kind,
            lexeme,
            self.token_line,
            self.cursor.span_from(self.token_start),
        )
    }

    fn push_literal(&mut self, context: LiteralContext) {
        debug!(kind = ?context.kind, closer = ?context.closer(), "opened literal");
        self.literals.push(context);
    }

    fn pop_literal(&mut self) {
        if let Some(context) = self.literals.pop() {
            debug!(kind = ?context.kind, "closed literal");
        }
    }

    /// Jumps past the body of a heredoc opened on the line just finished, if there is one.
    fn skip_heredoc_body(&mut self) {
        if let Some((position, line)) = self.heredoc_end.take() {
            self.cursor.jump(position, line);
        }
    }

    fn compile_error(&self, message: impl Into<String>) -> Error {
        CompileError::new(message, self.cursor.span_from(self.token_start)).into()
    }

    fn scan_fault(&self) -> Error {
        let remainder = self.cursor.remainder();
        let text = remainder.lines().next().unwrap_or(remainder);

        ScanFault::new(
            format!(
                "can not match ({:?}) at {}:{}: '{text}'",
                self.state,
                self.cursor.source_file().name(),
                self.cursor.line(),
            ),
            self.cursor.span_from(self.token_start),
        )
        .into()
    }

    fn warn(&self, kind: WarningKind) {
        self.handler
            .receive(Warning::new(kind, self.cursor.span_from(self.token_start)));
    }

    /// Reads the escape sequence after a backslash the cursor has already passed.
    fn read_escape(&mut self) -> Result<String, Error> {
        if self.cursor.skip('\n') {
            return Ok("\n".to_owned());
        }

        match escape::decode(self.cursor.remainder()) {
            Ok((text, len)) => {
                self.cursor.advance(len);
                Ok(text)
            }
            Err(error) => Err(self.compile_error(error.to_string())),
        }
    }

    fn is_beg(&self) -> bool { self.state.is_beg() }

    fn is_end(&self) -> bool { self.state.is_end() }

    fn is_arg(&self) -> bool { self.state.is_arg() }

    /// Checks whether a space in argument position separates a method name from what looks like
    /// the start of its first argument.
    fn is_space_arg(&self, next: Option<char>) -> bool {
        self.is_arg() && self.flags.space_seen && next.map_or(true, |next| !next.is_whitespace())
    }

    fn is_label_possible(&self) -> bool {
        (matches!(self.state, LexState::Beg | LexState::EndFn | LexState::Label)
            && !self.flags.command_state)
            || self.is_arg()
    }

    /// Checks whether the input continues with the `:` of a label rather than a `::`.
    fn is_label_suffix(&self) -> bool { self.cursor.check(':') && !self.cursor.check("::") }

    fn is_lambda_beginning(&self) -> bool { self.lpar_beg == Some(self.paren_nest) }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Result<Token, Error> { Lexer::next_token(self) }
}
