//! Contains the lexer state machine: the state enumeration, the per-token flags, and the
//! bit stacks tracking conditions and command arguments.

use strum_macros::EnumIter;

/// Is an enumeration of the lexer states.
///
/// The state records what kind of construct the previous token ended and so decides how
/// ambiguous characters such as `(`, `[`, `{`, `*`, `&`, `/`, `%`, `<<`, `?` and `:` are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumIter)]
pub enum LexState {
    /// At the beginning of an expression.
    #[default]
    Beg,

    /// After a complete operand.
    End,

    /// After the end of a method definition's name or a lambda arrow.
    EndFn,

    /// After a closing bracket; a following `{` attaches to the argument.
    EndArg,

    /// After a method name that may take arguments.
    Arg,

    /// After the method name of a command call.
    CmdArg,

    /// After `return`, `break`, `next` and `rescue`.
    Mid,

    /// Reading a method name after `def`, `alias`, `undef` or `:`.
    Fname,

    /// After `.`, `&.` or `::`: operators are read as method names.
    Dot,

    /// After `class`.
    Class,

    /// After a label.
    Label,
}

impl LexState {
    /// Checks whether the state is at the beginning of an expression.
    #[must_use]
    pub fn is_beg(self) -> bool {
        matches!(self, Self::Beg | Self::Mid | Self::Class | Self::Label)
    }

    /// Checks whether the state follows a complete operand.
    #[must_use]
    pub fn is_end(self) -> bool { matches!(self, Self::End | Self::EndArg | Self::EndFn) }

    /// Checks whether the state follows a method name that may take arguments.
    #[must_use]
    pub fn is_arg(self) -> bool { matches!(self, Self::Arg | Self::CmdArg) }

    /// Checks whether operators are read as method names.
    #[must_use]
    pub fn in_arg_state(self) -> bool { matches!(self, Self::Fname | Self::Dot) }

    /// Gets the state entered after an operator: [`LexState::Arg`] when the operator was a
    /// method name, [`LexState::Beg`] otherwise.
    #[must_use]
    pub fn arg_state(self) -> Self {
        if self.in_arg_state() {
            Self::Arg
        } else {
            Self::Beg
        }
    }
}

/// Is a struct holding the whitespace and command flags of the token being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags {
    /// Whitespace was skipped before the current token.
    pub space_seen: bool,

    /// The next token starts a command.
    pub command_start: bool,

    /// The current token started a command; captured from `command_start` when it began.
    pub command_state: bool,
}

/// Is a bit stack recording, per nesting level, whether the lexer is inside a condition or a
/// command argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StackState {
    stack: Vec<bool>,
}

impl StackState {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Pushes a level.
    pub fn push(&mut self, value: bool) { self.stack.push(value); }

    /// Pops the innermost level.
    pub fn pop(&mut self) -> Option<bool> { self.stack.pop() }

    /// Pops the innermost level and folds it into the new top with a logical or.
    pub fn lexpop(&mut self) {
        let Some(popped) = self.stack.pop() else {
            return;
        };

        if let Some(top) = self.stack.last_mut() {
            *top |= popped;
        } else {
            self.stack.push(popped);
        }
    }

    /// Checks whether the innermost level is set.
    #[must_use]
    pub fn is_in_state(&self) -> bool { self.stack.last().copied().unwrap_or(false) }

    /// Gets the number of levels on the stack.
    #[must_use]
    pub fn depth(&self) -> usize { self.stack.len() }
}

#[cfg(test)]
mod tests;
