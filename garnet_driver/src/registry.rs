//! Contains the [`Registry`] mapping grammar version numbers to the lexer and grammar pairing
//! that serves them.

use std::{collections::BTreeMap, fmt::Display, str::FromStr, sync::Arc};

use garnet_base::{diagnostic::Handler, source_file::SourceFile};
use garnet_lexical::{capability::Capabilities, error::Warning, lexer::Lexer};

use crate::grammar::{Grammar, TokenDump};

#[cfg(test)]
mod tests;

/// Is an enumeration of the errors raised while building a [`Registry`] or reading a [`Version`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("grammar version {0} is registered twice")]
    DuplicateVersion(Version),

    #[error("`{0}` is not a grammar version; expected a number such as `19`")]
    InvalidVersion(String),
}

/// Is a grammar version number such as `18` for Ruby 1.8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub u32);

impl Version {
    /// The Ruby 1.8 grammar.
    pub const RUBY18: Self = Self(18);

    /// The Ruby 1.9 grammar.
    pub const RUBY19: Self = Self(19);
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl FromStr for Version {
    type Err = Error;

    /// Reads `19`, `V19` or `Ruby19`. The prefixes are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowercase = s.trim().to_ascii_lowercase();
        let digits = lowercase
            .strip_prefix("ruby")
            .or_else(|| lowercase.strip_prefix('v'))
            .unwrap_or(&lowercase);

        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::InvalidVersion(s.to_owned()));
        }

        digits
            .parse()
            .map(Self)
            .map_err(|_| Error::InvalidVersion(s.to_owned()))
    }
}

/// Is a concrete lexer and grammar engine serving one grammar version.
#[derive(Debug, Clone, Copy)]
pub struct Pairing {
    version: Version,
    name: &'static str,
    capabilities: Capabilities,
    grammar: fn() -> Box<dyn Grammar>,
}

impl Pairing {
    /// Creates a pairing whose lexer runs with the given capabilities.
    #[must_use]
    pub fn new(
        version: Version,
        name: &'static str,
        capabilities: Capabilities,
        grammar: fn() -> Box<dyn Grammar>,
    ) -> Self {
        Self {
            version,
            name,
            capabilities,
            grammar,
        }
    }

    /// Gets the version this pairing serves.
    #[must_use]
    pub fn version(&self) -> Version { self.version }

    /// Gets the display name of the grammar, such as `Ruby19`.
    #[must_use]
    pub fn name(&self) -> &'static str { self.name }

    /// Gets the capabilities the lexer of this pairing runs with.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities { self.capabilities }

    /// Creates a fresh lexer over the given source.
    #[must_use]
    pub fn lexer<'h>(
        &self,
        source_file: Arc<SourceFile>,
        handler: &'h dyn Handler<Warning>,
    ) -> Lexer<'h> {
        Lexer::new(source_file, self.capabilities, handler)
    }

    /// Creates a fresh grammar engine.
    #[must_use]
    pub fn grammar(&self) -> Box<dyn Grammar> { (self.grammar)() }
}

/// Gets the pairings every driver run starts with.
fn standard_pairings() -> [Pairing; 2] {
    [
        Pairing::new(Version::RUBY18, "Ruby18", Capabilities::RUBY18, TokenDump::boxed),
        Pairing::new(Version::RUBY19, "Ruby19", Capabilities::RUBY19, TokenDump::boxed),
    ]
}

/// Is the set of [`Pairing`]s the driver can dispatch to, ordered by version.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pairings: BTreeMap<Version, Pairing>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates the registry of the Ruby 1.8 and 1.9 pairings, both driving a [`TokenDump`].
    ///
    /// # Errors
    /// - [`Error::DuplicateVersion`]: two of the standard pairings declare the same version.
    pub fn standard() -> Result<Self, Error> { Self::with_pairings(standard_pairings()) }

    /// Creates a registry from the given pairings.
    ///
    /// # Errors
    /// - [`Error::DuplicateVersion`]: two pairings declare the same version.
    pub fn with_pairings(pairings: impl IntoIterator<Item = Pairing>) -> Result<Self, Error> {
        let mut registry = Self::new();
        for pairing in pairings {
            registry.register(pairing)?;
        }

        Ok(registry)
    }

    /// Adds a pairing to the registry.
    ///
    /// # Errors
    /// - [`Error::DuplicateVersion`]: a pairing for the same version is already registered.
    pub fn register(&mut self, pairing: Pairing) -> Result<(), Error> {
        if self.pairings.contains_key(&pairing.version) {
            return Err(Error::DuplicateVersion(pairing.version));
        }

        tracing::debug!(version = %pairing.version, "registered grammar pairing");
        self.pairings.insert(pairing.version, pairing);
        Ok(())
    }

    /// Gets the registered versions in ascending order.
    #[must_use]
    pub fn versions(&self) -> Vec<Version> { self.pairings.keys().copied().collect() }

    /// Gets the pairing registered for the given version.
    #[must_use]
    pub fn get(&self, version: Version) -> Option<&Pairing> { self.pairings.get(&version) }
}
