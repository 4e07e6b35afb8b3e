//! Is a module containing the [`Token`] type and all of its related types.

use std::{collections::HashMap, fmt::Display};

use derive_new::new;
use enum_as_inner::EnumAsInner;
use garnet_base::source_file::{SourceElement, Span};
use getset::{CopyGetters, Getters};
use lazy_static::lazy_static;

use crate::keyword::Keyword;

/// Is an enumeration of every token kind the lexer can hand to the grammar.
///
/// The set is closed: the grammar's terminal symbols map one to one onto these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum TokenKind {
    /// A reserved word in its ordinary form.
    Keyword(Keyword),

    /// The modifier form of `if`, `unless`, `while`, `until` and `rescue`.
    Modifier(Keyword),

    /// `do` opening the condition body of `while`/`until`/`for`.
    DoCond,

    /// `do` opening a block attached to a command call.
    DoBlock,

    /// `do` opening the body of a `->` lambda.
    DoLambda,

    /// A local variable or method name.
    Identifier,

    /// A name starting with an uppercase letter.
    Constant,

    /// A method name ending with `?` or `!`.
    FunctionIdentifier,

    /// An identifier immediately followed by `:` used as a hash key or keyword argument.
    Label,

    /// `@name`
    InstanceVariable,

    /// `@@name`
    ClassVariable,

    /// `$name`
    GlobalVariable,

    /// `$&`, `` $` ``, `$'` and `$+`.
    BackReference,

    /// `$1`, `$2`, ...
    NthReference,

    /// A lone `$`.
    Dollar,

    /// An integer literal.
    Integer,

    /// A floating point literal.
    Float,

    /// A numeric literal with the `r` suffix.
    Rational,

    /// A numeric literal with the `i` or `ri` suffix.
    Imaginary,

    /// A string literal whose whole body was read at once.
    String,

    /// A symbol literal whose whole name was read at once.
    Symbol,

    /// Opens a string literal or a heredoc.
    StringBeg,

    /// Opens a command string.
    XStringBeg,

    /// Opens a regular expression.
    RegexpBeg,

    /// Opens an interpolating word list (`%W`).
    WordsBeg,

    /// Opens a non-interpolating word list (`%w`).
    QWordsBeg,

    /// Opens an interpolating symbol list (`%I`).
    SymbolsBeg,

    /// Opens a non-interpolating symbol list (`%i`).
    QSymbolsBeg,

    /// Opens a quoted symbol (`:"` or `%s`).
    SymbolBeg,

    /// A run of literal text inside a string-like literal.
    StringContent,

    /// `#{` inside an interpolating literal.
    StringDBeg,

    /// `#` preceding an `@ivar`, `@@cvar` or `$gvar` inside an interpolating literal.
    StringDVar,

    /// `}` closing an interpolation.
    StringDEnd,

    /// Closes a string-like literal.
    StringEnd,

    /// Closes a regular expression. The lexeme holds the option letters.
    RegexpEnd,

    /// Closes a string literal that turned out to be a label (`"name":`).
    LabelEnd,

    /// Separates the words of a word list.
    Space,

    /// Unary `+` in a method name (`+@`) or before an operand.
    UPlus,

    /// Unary `-` in a method name (`-@`) or before an operand.
    UMinus,

    /// Unary `-` directly before a numeric literal.
    UMinusNum,

    /// Binary `+`
    Plus,

    /// Binary `-`
    Minus,

    /// Binary `*`
    Multiply,

    /// Prefix `*` in argument or parameter position.
    Splat,

    /// Binary `**`
    Power,

    /// Prefix `**` in argument or parameter position.
    DoubleSplat,

    /// Binary `/`
    Divide,

    /// Binary `%`
    Percent,

    /// `~` and `~@`
    Tilde,

    /// `!`
    Bang,

    /// `!@` as a method name.
    UBang,

    /// `!=`
    NotEqual,

    /// `!~`
    NotMatch,

    /// `==`
    Equal,

    /// `===`
    CaseEqual,

    /// `=~`
    Match,

    /// `=>`
    Assoc,

    /// `=`
    Assign,

    /// `<=>`
    Compare,

    /// `<=`
    LessEqual,

    /// `<`
    Less,

    /// `>=`
    GreaterEqual,

    /// `>`
    Greater,

    /// `<<`
    LeftShift,

    /// `>>`
    RightShift,

    /// `||`
    OrOp,

    /// `&&`
    AndOp,

    /// `|`
    Pipe,

    /// Prefix `&` passing a block argument.
    Amper,

    /// Binary `&`
    Amper2,

    /// `^`
    Caret,

    /// An operator assignment such as `+=`. The lexeme holds the operator without `=`.
    OpAssign,

    /// `.`
    Dot,

    /// `..`
    Dot2,

    /// `...`
    Dot3,

    /// `&.`
    Lonely,

    /// `:`
    Colon,

    /// `::` between a scope and a name.
    Colon2,

    /// `::` at the start of a top level constant path.
    Colon3,

    /// `,`
    Comma,

    /// `;`
    Semicolon,

    /// A newline terminating a statement.
    Newline,

    /// `?` of the ternary operator.
    Question,

    /// `->`
    Lambda,

    /// `{` opening the body of a `->` lambda.
    LambdaBegin,

    /// `(` at the beginning of an expression.
    LParen,

    /// `(` directly after a method name.
    LParen2,

    /// `(` after a space in argument position.
    LParenArg,

    /// `)`
    RParen,

    /// `[` at the beginning of an expression.
    LBrack,

    /// `[` indexing a receiver.
    LBrack2,

    /// `]`
    RBrack,

    /// `[]` as a method name.
    Aref,

    /// `[]=` as a method name.
    Aset,

    /// `{` opening a block.
    LCurly,

    /// `{` opening a hash.
    LBrace,

    /// `{` opening a block attached to a parenthesized argument.
    LBraceArg,

    /// `}`
    RCurly,

    /// `` ` `` as a method name.
    BackRef2,

    /// The end of the input. Repeated calls keep returning it.
    EndOfInput,
}

impl TokenKind {
    /// Gets the kind of the fixed-text operator, if the text is one.
    #[must_use]
    pub fn from_operator(text: &str) -> Option<Self> {
        lazy_static! {
            static ref OPERATORS: HashMap<&'static str, TokenKind> = HashMap::from([
                ("!", TokenKind::Bang),
                ("!=", TokenKind::NotEqual),
                ("!~", TokenKind::NotMatch),
                ("!@", TokenKind::UBang),
                ("%", TokenKind::Percent),
                ("&", TokenKind::Amper2),
                ("&&", TokenKind::AndOp),
                ("&.", TokenKind::Lonely),
                ("**", TokenKind::Power),
                ("+", TokenKind::Plus),
                ("-", TokenKind::Minus),
                ("->", TokenKind::Lambda),
                (".", TokenKind::Dot),
                ("..", TokenKind::Dot2),
                ("...", TokenKind::Dot3),
                ("/", TokenKind::Divide),
                ("::", TokenKind::Colon2),
                ("<", TokenKind::Less),
                ("<<", TokenKind::LeftShift),
                ("<=", TokenKind::LessEqual),
                ("<=>", TokenKind::Compare),
                ("=", TokenKind::Assign),
                ("==", TokenKind::Equal),
                ("===", TokenKind::CaseEqual),
                ("=>", TokenKind::Assoc),
                ("=~", TokenKind::Match),
                (">", TokenKind::Greater),
                (">=", TokenKind::GreaterEqual),
                (">>", TokenKind::RightShift),
                ("^", TokenKind::Caret),
                ("|", TokenKind::Pipe),
                ("||", TokenKind::OrOp),
                ("~", TokenKind::Tilde),
                ("~@", TokenKind::Tilde),
            ]);
        }

        OPERATORS.get(text).copied()
    }

    /// Checks whether the kind opens a string-like literal whose content follows as separate
    /// tokens.
    #[must_use]
    pub fn is_literal_opener(self) -> bool {
        matches!(
            self,
            Self::StringBeg
                | Self::XStringBeg
                | Self::RegexpBeg
                | Self::WordsBeg
                | Self::QWordsBeg
                | Self::SymbolsBeg
                | Self::QSymbolsBeg
                | Self::SymbolBeg
        )
    }
}

/// Is an enumeration of the radixes an integer literal can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Radix {
    Binary = 2,
    Octal = 8,
    Decimal = 10,
    Hexadecimal = 16,
}

impl Radix {
    /// Gets the numeric base of the radix.
    #[must_use]
    pub fn base(self) -> u32 { self as u32 }
}

/// Is an enumeration of the numeric kinds selected by a literal's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NumericKind {
    /// No suffix.
    #[default]
    Plain,

    /// The `r` suffix.
    Rational,

    /// The `i` suffix.
    Imaginary,

    /// The `ri` suffix.
    RationalImaginary,
}

impl NumericKind {
    /// Gets the kind selected by the given suffix, if the suffix is valid.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Self::Plain),
            "r" => Some(Self::Rational),
            "i" => Some(Self::Imaginary),
            "ri" => Some(Self::RationalImaginary),
            _ => None,
        }
    }
}

/// Represents the value of a numeric literal.
///
/// The digits are kept as text with the radix prefix, the sign and the `_` separators removed.
/// Floats keep their fraction and exponent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, CopyGetters, new)]
pub struct NumericLiteral {
    /// Gets the normalized digits of the literal.
    #[get = "pub"]
    digits: String,

    /// Gets the radix the literal was written in. Floats are always decimal.
    #[get_copy = "pub"]
    radix: Radix,

    /// Gets the kind selected by the literal's suffix.
    #[get_copy = "pub"]
    kind: NumericKind,

    /// Checks whether the literal has a fraction or an exponent.
    #[get_copy = "pub"]
    is_float: bool,
}

impl NumericLiteral {
    /// Gets the integer value of the literal.
    ///
    /// Returns [`None`] for floats and for values that do not fit.
    #[must_use]
    pub fn as_integer(&self) -> Option<i128> {
        if self.is_float {
            return None;
        }

        i128::from_str_radix(&self.digits, self.radix.base()).ok()
    }

    /// Gets the floating point value of the literal.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        if self.is_float {
            self.digits.parse().ok()
        } else {
            self.as_integer().map(|value| value as f64)
        }
    }
}

/// Is an enumeration of the semantic values a token can carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, EnumAsInner)]
pub enum Lexeme {
    /// The token carries nothing beyond its kind.
    #[default]
    None,

    /// Text such as a name, an operator or decoded string content.
    Text(String),

    /// A numeric literal.
    Number(NumericLiteral),

    /// A small integer such as the index of `$1` or a character code.
    Integer(i64),
}

impl Display for Lexeme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Number(number) => write!(f, "{}", number.digits),
            Self::Integer(integer) => write!(f, "{integer}"),
        }
    }
}

/// Is a struct pointing to where a token starts: its line number and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// The line number (starts at 1).
    pub line: usize,

    /// The byte offset from the start of the source.
    pub offset: usize,
}

/// Represents a single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters, new)]
pub struct Token {
    /// Gets the kind of the token.
    #[get_copy = "pub"]
    kind: TokenKind,

    /// Gets the semantic value of the token.
    #[get = "pub"]
    lexeme: Lexeme,

    /// Gets the line the token starts on.
    #[get_copy = "pub"]
    line: usize,

    /// Gets the source range the token was read from.
    #[get = "pub"]
    span: Span,
}

impl Token {
    /// Gets the [`Position`] the token starts at.
    #[must_use]
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            offset: self.span.start(),
        }
    }

    /// Gets the lexeme's text, if it carries one.
    #[must_use]
    pub fn text(&self) -> Option<&str> { self.lexeme.as_text().map(String::as_str) }
}

impl SourceElement for Token {
    fn span(&self) -> Span { self.span.clone() }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>4}:{:<4} {:?}", self.line, self.span.start(), self.kind)?;

        if self.lexeme != Lexeme::None {
            write!(f, " {}", self.lexeme)?;
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests;
