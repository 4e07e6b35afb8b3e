use std::{fmt::Display, str::FromStr};

use garnet_base::{diagnostic::Dummy, source_file::SourceFile};
use garnet_test::input::Input;
use lazy_static::lazy_static;
use proptest::{
    prelude::Arbitrary,
    prop_assert_eq, prop_oneof, proptest,
    strategy::{BoxedStrategy, Just, Strategy},
    test_runner::{TestCaseError, TestCaseResult},
};
use strum::IntoEnumIterator;

use super::{Lexeme, NumericKind, NumericLiteral, Radix, TokenKind};
use crate::{capability::Capabilities, keyword::Keyword as KeywordKind, lexer::Lexer};

/// Represents an input for a lowercase [`super::TokenKind::Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    /// The valid identifier string.
    pub string: String,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.string) }
}

impl Arbitrary for Identifier {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        "[a-z_][a-z0-9_]{0,8}"
            .prop_filter_map(
                "filter out identifiers that can be used as a keyword",
                |string| {
                    if KeywordKind::from_str(&string).is_ok() {
                        None
                    } else {
                        Some(Self { string })
                    }
                },
            )
            .boxed()
    }
}

impl Input<&super::Token> for &Identifier {
    fn assert(self, output: &super::Token) -> TestCaseResult {
        prop_assert_eq!(output.kind(), TokenKind::Identifier);
        prop_assert_eq!(output.text(), Some(self.string.as_str()));
        Ok(())
    }
}

/// Represents an input for a [`super::TokenKind::Constant`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Constant {
    /// The valid constant name.
    pub string: String,
}

impl Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.string) }
}

impl Arbitrary for Constant {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        "[A-Z][A-Za-z0-9_]{0,8}"
            .prop_filter_map("filter out BEGIN and END", |string| {
                if KeywordKind::from_str(&string).is_ok() {
                    None
                } else {
                    Some(Self { string })
                }
            })
            .boxed()
    }
}

impl Input<&super::Token> for &Constant {
    fn assert(self, output: &super::Token) -> TestCaseResult {
        prop_assert_eq!(output.kind(), TokenKind::Constant);
        prop_assert_eq!(output.text(), Some(self.string.as_str()));
        Ok(())
    }
}

/// Represents a valid keyword input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keyword {
    /// The kind of keyword.
    pub keyword: KeywordKind,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword.as_str())
    }
}

impl Arbitrary for Keyword {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        lazy_static! {
            static ref KEYWORDS: Vec<KeywordKind> = KeywordKind::iter().collect();
        }

        proptest::sample::select(KEYWORDS.as_slice())
            .prop_map(|keyword| Self { keyword })
            .boxed()
    }
}

impl Input<&super::Token> for &Keyword {
    fn assert(self, output: &super::Token) -> TestCaseResult {
        // every keyword read at the beginning of an expression takes its ordinary form
        prop_assert_eq!(output.kind(), TokenKind::Keyword(self.keyword));
        prop_assert_eq!(output.text(), Some(self.keyword.as_str()));
        Ok(())
    }
}

/// Represents an input for an [`super::TokenKind::Integer`] written in any radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer {
    /// The value of the literal.
    pub value: u64,

    /// The radix the literal is written in.
    pub radix: Radix,
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.radix {
            Radix::Binary => write!(f, "0b{:b}", self.value),
            Radix::Octal => write!(f, "0o{:o}", self.value),
            Radix::Decimal => write!(f, "{}", self.value),
            Radix::Hexadecimal => write!(f, "0x{:x}", self.value),
        }
    }
}

impl Arbitrary for Integer {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let radix = prop_oneof![
            Just(Radix::Binary),
            Just(Radix::Octal),
            Just(Radix::Decimal),
            Just(Radix::Hexadecimal)
        ];

        (proptest::num::u64::ANY, radix)
            .prop_map(|(value, radix)| Self { value, radix })
            .boxed()
    }
}

impl Input<&super::Token> for &Integer {
    fn assert(self, output: &super::Token) -> TestCaseResult {
        prop_assert_eq!(output.kind(), TokenKind::Integer);

        let number = output
            .lexeme()
            .as_number()
            .ok_or_else(|| TestCaseError::fail("expected a numeric lexeme"))?;

        prop_assert_eq!(number.radix(), self.radix);
        prop_assert_eq!(number.as_integer(), Some(i128::from(self.value)));
        Ok(())
    }
}

/// Represents an input for an `@ivar` or a `@@cvar`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    /// The variable including its sigils.
    pub string: String,
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.string) }
}

impl Arbitrary for Variable {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        "@{1,2}[A-Za-z_][A-Za-z0-9_]{0,8}"
            .prop_map(|string| Self { string })
            .boxed()
    }
}

impl Input<&super::Token> for &Variable {
    fn assert(self, output: &super::Token) -> TestCaseResult {
        let expected = if self.string.starts_with("@@") {
            TokenKind::ClassVariable
        } else {
            TokenKind::InstanceVariable
        };

        prop_assert_eq!(output.kind(), expected);
        prop_assert_eq!(output.text(), Some(self.string.as_str()));
        Ok(())
    }
}

/// Represents an input for a plain [`super::TokenKind::Symbol`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    /// The name of the symbol, without the `:`.
    pub name: String,
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self.name)
    }
}

impl Arbitrary for Symbol {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        "[A-Za-z_][A-Za-z0-9_]{0,8}[?!]?"
            .prop_map(|name| Self { name })
            .boxed()
    }
}

impl Input<&super::Token> for &Symbol {
    fn assert(self, output: &super::Token) -> TestCaseResult {
        prop_assert_eq!(output.kind(), TokenKind::Symbol);
        prop_assert_eq!(output.text(), Some(self.name.as_str()));
        Ok(())
    }
}

/// Represents an input that lexes to exactly one token at the beginning of an expression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Token {
    Identifier(Identifier),
    Constant(Constant),
    Keyword(Keyword),
    Integer(Integer),
    Variable(Variable),
    Symbol(Symbol),
}

impl Arbitrary for Token {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Identifier::arbitrary().prop_map(Self::Identifier),
            Constant::arbitrary().prop_map(Self::Constant),
            Keyword::arbitrary().prop_map(Self::Keyword),
            Integer::arbitrary().prop_map(Self::Integer),
            Variable::arbitrary().prop_map(Self::Variable),
            Symbol::arbitrary().prop_map(Self::Symbol),
        ]
        .boxed()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(x) => Display::fmt(x, f),
            Self::Constant(x) => Display::fmt(x, f),
            Self::Keyword(x) => Display::fmt(x, f),
            Self::Integer(x) => Display::fmt(x, f),
            Self::Variable(x) => Display::fmt(x, f),
            Self::Symbol(x) => Display::fmt(x, f),
        }
    }
}

impl Input<&super::Token> for &Token {
    fn assert(self, output: &super::Token) -> TestCaseResult {
        match self {
            Token::Identifier(i) => i.assert(output),
            Token::Constant(i) => i.assert(output),
            Token::Keyword(i) => i.assert(output),
            Token::Integer(i) => i.assert(output),
            Token::Variable(i) => i.assert(output),
            Token::Symbol(i) => i.assert(output),
        }
    }
}

/// Represents a binary operator placed between two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinaryOperator {
    /// The operator text.
    pub operator: &'static str,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a {} b", self.operator)
    }
}

impl Arbitrary for BinaryOperator {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        const OPERATORS: &[&str] = &[
            "==", "===", "!=", "=~", "!~", "<=>", "<=", ">=", "<", ">", "<<", ">>", "+", "-", "*",
            "**", "/", "%", "&", "|", "^", "&&", "||", "..", "...",
        ];

        proptest::sample::select(OPERATORS)
            .prop_map(|operator| Self { operator })
            .boxed()
    }
}

impl Input<&[super::Token]> for &BinaryOperator {
    fn assert(self, output: &[super::Token]) -> TestCaseResult {
        prop_assert_eq!(output.len(), 4);
        prop_assert_eq!(output[0].kind(), TokenKind::Identifier);
        prop_assert_eq!(Some(output[1].kind()), TokenKind::from_operator(self.operator));
        prop_assert_eq!(output[2].kind(), TokenKind::Identifier);
        prop_assert_eq!(output[3].kind(), TokenKind::EndOfInput);
        Ok(())
    }
}

fn tokenize(source: &str) -> Result<Vec<super::Token>, TestCaseError> {
    let source_file = SourceFile::new(source, None);

    Lexer::new(source_file, Capabilities::RUBY19, &Dummy)
        .tokenize()
        .map_err(|error| TestCaseError::fail(format!("lexing {source:?} failed: {error}")))
}

proptest! {
    #[test]
    fn single_token_test(input in Token::arbitrary()) {
        let source = input.to_string();
        let tokens = tokenize(&source)?;

        prop_assert_eq!(tokens.len(), 2);
        input.assert(&tokens[0])?;
        prop_assert_eq!(tokens[0].span().str(), source.as_str());
        prop_assert_eq!(tokens[1].kind(), TokenKind::EndOfInput);
    }

    #[test]
    fn binary_operator_test(input in BinaryOperator::arbitrary()) {
        let tokens = tokenize(&input.to_string())?;
        input.assert(tokens.as_slice())?;
    }
}

#[test]
fn operator_table_test() {
    assert_eq!(TokenKind::from_operator("<=>"), Some(TokenKind::Compare));
    assert_eq!(TokenKind::from_operator("~@"), Some(TokenKind::Tilde));
    assert_eq!(TokenKind::from_operator("&"), Some(TokenKind::Amper2));
    assert_eq!(TokenKind::from_operator("=begin"), None);
}

#[test]
fn literal_opener_test() {
    assert!(TokenKind::StringBeg.is_literal_opener());
    assert!(TokenKind::QSymbolsBeg.is_literal_opener());
    assert!(!TokenKind::StringContent.is_literal_opener());
    assert!(!TokenKind::String.is_literal_opener());
}

#[test]
fn numeric_literal_value_test() {
    let hex = NumericLiteral::new("ff".to_owned(), Radix::Hexadecimal, NumericKind::Plain, false);
    assert_eq!(hex.as_integer(), Some(255));
    assert_eq!(hex.as_float(), Some(255.0));

    let float = NumericLiteral::new("1.5e3".to_owned(), Radix::Decimal, NumericKind::Plain, true);
    assert_eq!(float.as_integer(), None);
    assert_eq!(float.as_float(), Some(1500.0));

    assert_eq!(NumericKind::from_suffix("ri"), Some(NumericKind::RationalImaginary));
    assert_eq!(NumericKind::from_suffix("x"), None);
}

#[test]
fn display_test() {
    let source_file = SourceFile::new("foo", None);
    let tokens = Lexer::new(source_file, Capabilities::RUBY19, &Dummy)
        .tokenize()
        .unwrap();

    assert_eq!(tokens[0].to_string(), "   1:0    Identifier \"foo\"");
    assert_eq!(tokens[1].to_string(), "   1:3    EndOfInput");
    assert_eq!(Lexeme::Integer(42).to_string(), "42");
}
