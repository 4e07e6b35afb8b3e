//! Contains the [`Grammar`] trait the driver hands token sources to.

use std::fmt::{Debug, Display};

use garnet_lexical::{
    error::Error,
    lexer::TokenSource,
    token::{Token, TokenKind},
};

#[cfg(test)]
mod tests;

/// Is a grammar engine pulling tokens from a [`TokenSource`] until the end of input.
///
/// [`Display`] renders what the engine produced from the tokens it consumed.
pub trait Grammar: Debug + Display {
    /// Consumes the whole token stream of the source.
    ///
    /// # Errors
    /// Returns the first error the token source reports.
    fn parse(&mut self, source: &mut dyn TokenSource) -> Result<(), Error>;
}

/// Is a [`Grammar`] that records every token it is handed and renders them one per line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenDump {
    tokens: Vec<Token>,
}

impl TokenDump {
    /// Creates an empty dump.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates an empty dump behind a [`Grammar`] trait object.
    #[must_use]
    pub fn boxed() -> Box<dyn Grammar> { Box::new(Self::new()) }

    /// Gets the tokens recorded so far, the end-of-input token included.
    #[must_use]
    pub fn tokens(&self) -> &[Token] { &self.tokens }
}

impl Grammar for TokenDump {
    fn parse(&mut self, source: &mut dyn TokenSource) -> Result<(), Error> {
        loop {
            let token = source.next_token()?;
            let finished = token.kind() == TokenKind::EndOfInput;
            self.tokens.push(token);

            if finished {
                tracing::debug!(tokens = self.tokens.len(), "token stream exhausted");
                return Ok(());
            }
        }
    }
}

impl Display for TokenDump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for token in &self.tokens {
            writeln!(f, "{token}")?;
        }

        Ok(())
    }
}
