//! This crate ties the lexer to a grammar engine: it keeps the [`registry::Registry`] of grammar
//! versions, parses the command line and runs the selected pairing over a file.

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

use std::{fmt::Display, path::PathBuf, process::ExitCode};

pub use clap::Parser;
use garnet_base::{
    diagnostic::{Counter, Handler},
    log::{Message, Severity},
    source_file::SourceFile,
};
use registry::{Registry, Version};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod grammar;
pub mod registry;

#[cfg(test)]
mod tests;

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "garnet",
    about = "Tokenizes Ruby 1.8 and 1.9 source files.",
    author = "66011245@kmitl.ac.th"
)]
pub struct Argument {
    /// The input file to tokenize.
    #[clap(required_unless_present = "list_versions")]
    pub file: Option<PathBuf>,

    /// The grammar version to lex the file with, such as `18` or `Ruby19`.
    #[clap(long, default_value = "19")]
    pub grammar: Version,

    /// Prints the supported grammar versions and exits.
    #[clap(long = "list-versions")]
    pub list_versions: bool,
}

/// A struct that implements [`Handler`] but prints all the message to the standard error stream.
#[derive(Debug, Default)]
struct Printer {
    counter: Counter,
}

impl Printer {
    /// Gets the number of messages printed so far.
    fn printed(&self) -> usize { self.counter.count() }
}

impl<E: Display> Handler<E> for Printer {
    fn receive(&self, error: E) {
        eprintln!("{error}");
        self.counter.receive(());
    }
}

/// Installs the `tracing` subscriber when `RUST_LOG` is set.
fn init_tracing() {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        return;
    }

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(EnvFilter::from_default_env())
        .try_init();
}

fn error(display: impl Display) -> ExitCode {
    eprintln!("{}", Message::new(Severity::Error, display));
    ExitCode::FAILURE
}

/// Runs the program with the given arguments.
pub fn run(argument: Argument) -> ExitCode {
    init_tracing();

    let registry = match Registry::standard() {
        Ok(registry) => registry,
        Err(registry_error) => return error(registry_error),
    };

    if argument.list_versions {
        for version in registry.versions() {
            if let Some(pairing) = registry.get(version) {
                println!("{version}\t{}", pairing.name());
            }
        }

        return ExitCode::SUCCESS;
    }

    let Some(path) = argument.file else {
        return error("no input file given");
    };

    let Some(pairing) = registry.get(argument.grammar) else {
        let supported = registry
            .versions()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        return error(format!(
            "grammar version {} is not supported; supported versions: {supported}",
            argument.grammar
        ));
    };

    let source_file = match SourceFile::load(&path) {
        Ok(file) => file,
        Err(source_error) => return error(format!("{}: {source_error}", path.display())),
    };

    tracing::info!(file = %source_file.name(), version = %pairing.version(), "tokenizing");

    let printer = Printer::default();
    let mut lexer = pairing.lexer(source_file, &printer);
    let mut grammar = pairing.grammar();

    let result = grammar.parse(&mut lexer);
    print!("{grammar}");

    tracing::debug!(warnings = printer.printed(), "finished");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(lex_error) => {
            eprintln!("{lex_error}");
            ExitCode::FAILURE
        }
    }
}
