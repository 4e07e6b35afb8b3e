//! This crate implements the lexical analysis phase of the Ruby 1.8 and 1.9 grammars. The phase
//! turns source text into the tokens the grammar engine consumes.
//!
//! Ruby cannot be tokenized without context: whether `/` divides or opens a regular expression,
//! whether `<<` shifts or opens a heredoc, and whether `do` closes a condition or opens a block all
//! depend on what came before. The [`lexer::Lexer`] therefore carries a [`state::LexState`],
//! nesting counters and a stack of open string-like literals, and hands out tokens one at a time
//! through [`lexer::TokenSource`].

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod capability;
pub mod cursor;
pub mod error;
pub mod escape;
pub mod keyword;
pub mod lexer;
pub mod literal;
pub mod numeric;
pub mod state;
pub mod token;
