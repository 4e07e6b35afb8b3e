//! Contains the [`Capabilities`] distinguishing the grammar versions the lexer serves.

/// Is a set of flags switching the lexing rules that differ between grammar versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities {
    /// `name:` is read as a label in hash literals and keyword arguments.
    pub labels: bool,

    /// `"name":` and `'name':` are read as labels.
    pub string_labels: bool,

    /// `?a` yields a one-character string instead of the character's code.
    pub character_strings: bool,

    /// `(` after a space reads as an argument parenthesis only after a command name, and a
    /// space before argument parentheses is warned about.
    pub command_paren_args: bool,

    /// `__ENCODING__` is a keyword rather than a constant.
    pub encoding_keyword: bool,
}

impl Capabilities {
    /// The rules of the Ruby 1.8 grammar.
    pub const RUBY18: Self = Self {
        labels: false,
        string_labels: false,
        character_strings: false,
        command_paren_args: true,
        encoding_keyword: false,
    };

    /// The rules of the Ruby 1.9 grammar.
    pub const RUBY19: Self = Self {
        labels: true,
        string_labels: false,
        character_strings: true,
        command_paren_args: false,
        encoding_keyword: true,
    };
}
