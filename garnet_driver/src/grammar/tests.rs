use garnet_base::{diagnostic::Dummy, source_file::SourceFile};
use garnet_lexical::token::{Lexeme, Token, TokenKind};

use super::{Grammar, TokenDump};
use crate::registry::{Registry, Version};

fn dump(source: &str, version: Version) -> TokenDump {
    let source_file = SourceFile::temp(source).unwrap();
    let pairing = Registry::standard().unwrap().get(version).copied().unwrap();

    let mut lexer = pairing.lexer(source_file, &Dummy);
    let mut dump = TokenDump::new();
    dump.parse(&mut lexer).unwrap();

    dump
}

#[test]
fn drains_token_stream_test() {
    let dump = dump("1 + 2\nfoo", Version::RUBY19);
    let kinds = dump.tokens().iter().map(Token::kind).collect::<Vec<_>>();

    assert_eq!(kinds, [
        TokenKind::Integer,
        TokenKind::Plus,
        TokenKind::Integer,
        TokenKind::Newline,
        TokenKind::Identifier,
        TokenKind::EndOfInput
    ]);
}

#[test]
fn pairing_selects_capabilities_test() {
    let ruby18 = dump("?a", Version::RUBY18);
    assert_eq!(ruby18.tokens()[0].lexeme(), &Lexeme::Integer(97));

    let ruby19 = dump("?a", Version::RUBY19);
    assert_eq!(ruby19.tokens()[0].kind(), TokenKind::String);
}

#[test]
fn one_token_per_line_test() {
    let dump = dump("foo\n", Version::RUBY19);
    let output = dump.to_string();
    let lines = output.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), dump.tokens().len());
    assert!(lines[0].starts_with("   1:0"), "{output}");
    assert!(lines.last().unwrap().ends_with("EndOfInput"), "{output}");
}

#[test]
fn stops_at_first_error_test() {
    let source_file = SourceFile::temp("\"abc").unwrap();
    let pairing = Registry::standard().unwrap().get(Version::RUBY19).copied().unwrap();

    let mut lexer = pairing.lexer(source_file, &Dummy);
    let mut grammar = pairing.grammar();
    let error = grammar.parse(&mut lexer).unwrap_err();

    assert_eq!(error.message(), "unterminated string meets end of file");
    assert_eq!(grammar.to_string(), "");
}
