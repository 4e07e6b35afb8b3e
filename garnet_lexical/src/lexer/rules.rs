//! Contains the rule tables of the dispatcher and the actions producing ordinary tokens.
//!
//! Rules are grouped by the character they can start with. Within a group the rules are tried
//! in order and the first guard that matches wins, so a group lists longer operators before
//! their prefixes and malformed shapes before the valid shapes they would be mistaken for.

use super::{Emit, Lexer};
use crate::{
    cursor::Pattern,
    error::{Error, WarningKind},
    escape,
    keyword::Keyword,
    literal::{LiteralContext, LiteralKind},
    numeric::{self, Shape},
    state::LexState,
    token::{Lexeme, Radix, TokenKind},
};

type Guard = fn(&Lexer<'_>, &str) -> Option<usize>;

type Action = fn(&mut Lexer<'_>, &str) -> Result<Option<Emit>, Error>;

/// Is an entry of a rule table.
///
/// The guard inspects the lexer and the remaining input and returns the number of bytes the
/// rule consumes. The action receives the consumed text and returns the token to produce, or
/// [`None`] to skip the text and dispatch again.
#[derive(Clone, Copy)]
pub(super) struct Rule {
    pub(super) name: &'static str,
    pub(super) guard: Guard,
    pub(super) action: Action,
}

/// Checks whether the character may appear in an identifier: ASCII letters and digits, `_`, and
/// any non-ASCII character.
#[must_use]
pub fn is_identifier_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_' || !character.is_ascii()
}

fn is_word_char(character: char) -> bool { character.is_alphanumeric() || character == '_' }

fn is_blank(character: char) -> bool { matches!(character, ' ' | '\t' | '\r' | '\x0c' | '\x0b') }

pub(super) fn chars_len(input: &str, predicate: impl Fn(char) -> bool) -> usize {
    input
        .chars()
        .take_while(|character| predicate(*character))
        .map(char::len_utf8)
        .sum()
}

pub(super) fn identifier_len(input: &str) -> usize { chars_len(input, is_identifier_char) }

fn word_len(input: &str) -> usize { chars_len(input, is_word_char) }

fn first_of(input: &str, predicate: impl Fn(char) -> bool) -> Option<usize> {
    input
        .chars()
        .next()
        .filter(|character| predicate(*character))
        .map(char::len_utf8)
}

fn longest(input: &str, candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .filter_map(|candidate| candidate.match_len(input))
        .max()
}

/// Gets the length of the body of a double-quoted string that can be read in one piece: a
/// single line without interpolation and only escapes that decode on their own. `input` starts
/// after the opening quote; the closing quote is not counted.
fn simple_string_len(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut index = 0;

    loop {
        match *bytes.get(index)? {
            b'"' => return Some(index),
            b'\n' => return None,
            b'\\' if bytes.get(index + 1) == Some(&b'\n') => return None,
            b'\\' => index += 1 + escape::simple_len(&input[index + 1..])?,
            b'#' => match *bytes.get(index + 1)? {
                b'\\' => index += 2 + escape::simple_len(&input[index + 2..])?,
                b'{' | b'#' | b'@' | b'$' | b'"' => return None,
                _ => index += 1,
            },
            _ => index += 1,
        }
    }
}

/// Gets the length of the body of a single-quoted string on one line. `input` starts after the
/// opening quote; the closing quote is not counted.
fn single_quoted_len(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut index = 0;

    loop {
        match *bytes.get(index)? {
            b'\'' => return Some(index),
            b'\n' => return None,
            b'\\' if bytes.get(index + 1) == Some(&b'\n') => return None,
            b'\\' if bytes.len() > index + 1 => index += 2,
            _ => index += 1,
        }
    }
}

/// Gets the length of a symbol name after `:`: an identifier optionally ending in `?`, `!` or
/// `=`, where `!=`, `==`, `=~` and `=>` are left for the operators.
fn symbol_name_len(input: &str) -> Option<usize> {
    first_of(input, |character| character.is_ascii_alphabetic() || character == '_')?;

    let len = identifier_len(input);
    let rest = &input[len..];
    let is_operator_start = |text: &str| text.starts_with(|next: char| matches!(next, '=' | '>'));

    let suffix = if rest.starts_with('?')
        || (rest.starts_with('!') && !rest[1..].starts_with('='))
        || rest.starts_with("==>")
        || (rest.starts_with('=') && !is_operator_start(&rest[1..]))
    {
        1
    } else {
        0
    };

    Some(len + suffix)
}

fn label_follows(input: &str) -> bool { input.starts_with(':') && !input.starts_with("::") }

static WHITESPACE: &[Rule] = &[Rule {
    name: "whitespace",
    guard: |_, input| first_of(input, is_blank),
    action: |lexer, _| {
        lexer.flags.space_seen = true;
        Ok(None)
    },
}];

static NEWLINE_OR_COMMENT: &[Rule] = &[
    Rule {
        name: "comment",
        guard: |_, input| '#'.match_len(input),
        action: |lexer, _| lexer.comment(),
    },
    Rule {
        name: "newline",
        guard: |_, input| '\n'.match_len(input),
        action: |lexer, _| lexer.newline(),
    },
];

static CLOSING: &[Rule] = &[Rule {
    name: "closing bracket",
    guard: |_, input| first_of(input, |character| matches!(character, ']' | ')' | '}')),
    action: |lexer, text| Ok(Some(lexer.closing(text))),
}];

static BANG: &[Rule] = &[
    Rule {
        name: "unary bang method",
        guard: |lexer, input| lexer.state.in_arg_state().then(|| "!@".match_len(input)).flatten(),
        action: |_, text| Ok(Some(Emit::text(LexState::Arg, TokenKind::UBang, text))),
    },
    Rule {
        name: "bang",
        guard: |_, input| longest(input, &["!", "!=", "!~"]),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
];

static DOT: &[Rule] = &[
    Rule {
        name: "range",
        guard: |_, input| longest(input, &["..", "..."]),
        action: |lexer, text| lexer.operator(LexState::Beg, text),
    },
    Rule {
        name: "leading dot float",
        guard: |_, input| {
            (input.starts_with('.') && input[1..].starts_with(|next: char| next.is_ascii_digit()))
                .then_some(2)
        },
        action: |lexer, _| {
            Err(lexer.compile_error("no .<digit> floating literal anymore put 0 before dot"))
        },
    },
    Rule {
        name: "dot",
        guard: |_, input| '.'.match_len(input),
        action: |_, text| Ok(Some(Emit::text(LexState::Dot, TokenKind::Dot, text))),
    },
];

static PAREN: &[Rule] = &[Rule {
    name: "parenthesis",
    guard: |_, input| '('.match_len(input),
    action: |lexer, _| Ok(Some(lexer.paren())),
}];

static COMMA: &[Rule] = &[Rule {
    name: "comma",
    guard: |_, input| ','.match_len(input),
    action: |_, text| Ok(Some(Emit::text(LexState::Beg, TokenKind::Comma, text))),
}];

static EQUALS: &[Rule] = &[
    Rule {
        name: "equality",
        guard: |_, input| longest(input, &["===", "==", "=~", "=>"]),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
    Rule {
        name: "embedded document",
        guard: |lexer, input| {
            let begins = lexer.cursor.is_beginning_of_line()
                && input.starts_with("=begin")
                && input[6..].starts_with(char::is_whitespace);
            begins.then_some(6)
        },
        action: |lexer, _| lexer.embedded_document(),
    },
    Rule {
        name: "assign",
        guard: |_, input| '='.match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
];

static DOUBLE_QUOTE: &[Rule] = &[
    Rule {
        name: "string label",
        guard: |lexer, input| {
            if !lexer.capabilities.string_labels || !lexer.is_label_possible() {
                return None;
            }

            let len = simple_string_len(&input[1..])? + 2;
            label_follows(&input[len..]).then_some(len + 1)
        },
        action: |lexer, text| {
            let name = lexer.unescape(&text[1..text.len() - 2])?;
            Ok(Some(Emit::text(LexState::Label, TokenKind::Label, name)))
        },
    },
    Rule {
        name: "simple string",
        guard: |_, input| simple_string_len(&input[1..]).map(|len| len + 2),
        action: |lexer, text| {
            let content = lexer.unescape(&text[1..text.len() - 1])?;
            Ok(Some(Emit::text(LexState::End, TokenKind::String, content)))
        },
    },
    Rule {
        name: "string",
        guard: |_, input| '"'.match_len(input),
        action: |lexer, text| {
            lexer.push_literal(LiteralContext::delimited(LiteralKind::String, None, '"', true));
            Ok(Some(Emit::keep(TokenKind::StringBeg, text)))
        },
    },
];

static AT: &[Rule] = &[
    Rule {
        name: "numbered variable",
        guard: |_, input| {
            let sigils = longest(input, &["@", "@@"])?;
            first_of(&input[sigils..], |character| character.is_ascii_digit())
                .map(|digit| sigils + digit)
        },
        action: |lexer, text| {
            Err(lexer.compile_error(format!("`{text}` is not allowed as a variable name")))
        },
    },
    Rule {
        name: "instance variable",
        guard: |_, input| {
            let sigils = longest(input, &["@", "@@"])?;
            let len = identifier_len(&input[sigils..]);
            (len > 0).then_some(sigils + len)
        },
        action: |_, text| {
            let kind = if text.starts_with("@@") {
                TokenKind::ClassVariable
            } else {
                TokenKind::InstanceVariable
            };

            Ok(Some(Emit::text(LexState::End, kind, text)))
        },
    },
    Rule {
        name: "invalid variable",
        guard: |_, input| '@'.match_len(input),
        action: |lexer, text| Err(lexer.invalid_char(text)),
    },
];

static COLON: &[Rule] = &[
    Rule {
        name: "symbol",
        guard: |lexer, input| {
            if lexer.is_end() {
                return None;
            }

            symbol_name_len(&input[1..]).map(|len| len + 1)
        },
        action: |lexer, text| lexer.symbol(text[1..].to_owned()),
    },
    Rule {
        name: "double-quoted symbol",
        guard: |lexer, input| {
            if lexer.is_end() || !input.starts_with(":\"") {
                return None;
            }

            simple_string_len(&input[2..]).map(|len| len + 3)
        },
        action: |lexer, text| {
            let name = lexer.unescape(&text[2..text.len() - 1])?;
            lexer.symbol(name)
        },
    },
    Rule {
        name: "single-quoted symbol",
        guard: |lexer, input| {
            if lexer.is_end() || !input.starts_with(":'") {
                return None;
            }

            single_quoted_len(&input[2..]).map(|len| len + 3)
        },
        action: |lexer, text| {
            lexer.symbol(escape::unescape_quoted(&text[2..text.len() - 1], '\''))
        },
    },
    Rule {
        name: "scope",
        guard: |_, input| "::".match_len(input),
        action: |lexer, text| Ok(Some(lexer.colon2(text))),
    },
    Rule {
        name: "colon",
        guard: |_, input| ':'.match_len(input),
        action: |lexer, text| Ok(Some(lexer.colon1(text))),
    },
];

static PLUS_MINUS: &[Rule] = &[
    Rule {
        name: "lambda",
        guard: |_, input| "->".match_len(input),
        action: |lexer, _| {
            lexer.paren_nest += 1;
            lexer.lpar_beg = Some(lexer.paren_nest);
            Ok(Some(Emit::bare(LexState::EndFn, TokenKind::Lambda)))
        },
    },
    Rule {
        name: "signed number",
        guard: |lexer, input| {
            let signed = input.starts_with('+')
                && input[1..].starts_with(|next: char| next.is_ascii_digit())
                && !lexer.state.in_arg_state()
                && (lexer.is_beg() || (lexer.is_arg() && lexer.flags.space_seen));

            signed.then_some(0)
        },
        action: |lexer, _| {
            if lexer.is_arg() {
                lexer.warn(WarningKind::AmbiguousFirstArgument);
            }

            lexer.dispatch_group(NUMBER)
        },
    },
    Rule {
        name: "plus or minus",
        guard: |_, input| first_of(input, |character| matches!(character, '+' | '-')),
        action: |lexer, text| Ok(Some(lexer.plus_minus(text))),
    },
];

static NUMBER: &[Rule] = &[
    Rule {
        name: "bare radix prefix",
        guard: |_, input| numeric::bad_prefix(input),
        action: |lexer, _| Err(lexer.compile_error("Invalid numeric format")),
    },
    Rule {
        name: "decimal",
        guard: |_, input| numeric::decimal(input),
        action: |lexer, text| lexer.number(text, Radix::Decimal, false),
    },
    Rule {
        name: "hexadecimal",
        guard: |_, input| numeric::hexadecimal(input),
        action: |lexer, text| lexer.number(text, Radix::Hexadecimal, false),
    },
    Rule {
        name: "binary",
        guard: |_, input| numeric::binary(input),
        action: |lexer, text| lexer.number(text, Radix::Binary, false),
    },
    Rule {
        name: "bad octal",
        guard: |_, input| numeric::bad_octal(input),
        action: |lexer, _| Err(lexer.compile_error("Illegal octal digit.")),
    },
    Rule {
        name: "octal",
        guard: |_, input| numeric::octal(input),
        action: |lexer, text| lexer.number(text, Radix::Octal, false),
    },
    Rule {
        name: "bad float",
        guard: |_, input| numeric::bad_float(input),
        action: |lexer, _| Err(lexer.compile_error("Trailing '_' in number.")),
    },
    Rule {
        name: "float",
        guard: |_, input| numeric::float(input),
        action: |lexer, text| lexer.number(text, Radix::Decimal, true),
    },
    Rule {
        name: "trailing decimal",
        guard: |_, input| numeric::trailing_decimal(input),
        action: |lexer, text| lexer.number(text, Radix::Decimal, false),
    },
    Rule {
        name: "bad number",
        guard: |_, input| first_of(input, |character| character.is_ascii_digit()),
        action: |lexer, _| Err(lexer.compile_error("Bad number format")),
    },
];

static BRACKET: &[Rule] = &[Rule {
    name: "square bracket",
    guard: |_, input| '['.match_len(input),
    action: |lexer, _| Ok(Some(lexer.square_bracket())),
}];

static SINGLE_QUOTE: &[Rule] = &[
    Rule {
        name: "single-quoted string",
        guard: |lexer, input| {
            let len = single_quoted_len(&input[1..])? + 2;
            let is_label = lexer.capabilities.string_labels
                && lexer.is_label_possible()
                && label_follows(&input[len..]);

            Some(len + usize::from(is_label))
        },
        action: |_, text| {
            let emit = if let Some(label) = text.strip_suffix(':') {
                let name = escape::unescape_quoted(&label[1..label.len() - 1], '\'');
                Emit::text(LexState::Label, TokenKind::Label, name)
            } else {
                let content = escape::unescape_quoted(&text[1..text.len() - 1], '\'');
                Emit::text(LexState::End, TokenKind::String, content)
            };

            Ok(Some(emit))
        },
    },
    Rule {
        name: "single quote",
        guard: |_, input| '\''.match_len(input),
        action: |lexer, text| {
            lexer.push_literal(LiteralContext::delimited(LiteralKind::String, None, '\'', false));
            Ok(Some(Emit::keep(TokenKind::StringBeg, text)))
        },
    },
];

static PIPE: &[Rule] = &[
    Rule {
        name: "or assign",
        guard: |_, input| "||=".match_len(input),
        action: |_, _| Ok(Some(Emit::text(LexState::Beg, TokenKind::OpAssign, "||"))),
    },
    Rule {
        name: "or",
        guard: |_, input| "||".match_len(input),
        action: |_, text| Ok(Some(Emit::text(LexState::Beg, TokenKind::OrOp, text))),
    },
    Rule {
        name: "pipe assign",
        guard: |_, input| "|=".match_len(input),
        action: |_, _| Ok(Some(Emit::text(LexState::Beg, TokenKind::OpAssign, "|"))),
    },
    Rule {
        name: "pipe",
        guard: |_, input| '|'.match_len(input),
        action: |lexer, text| {
            Ok(Some(Emit::text(lexer.state.arg_state(), TokenKind::Pipe, text)))
        },
    },
];

static CURLY: &[Rule] = &[Rule {
    name: "curly brace",
    guard: |_, input| '{'.match_len(input),
    action: |lexer, _| Ok(Some(lexer.curly_brace())),
}];

static STAR: &[Rule] = &[
    Rule {
        name: "power assign",
        guard: |_, input| "**=".match_len(input),
        action: |_, _| Ok(Some(Emit::text(LexState::Beg, TokenKind::OpAssign, "**"))),
    },
    Rule {
        name: "power",
        guard: |_, input| "**".match_len(input),
        action: |lexer, _| Ok(Some(lexer.star("**", TokenKind::DoubleSplat, TokenKind::Power))),
    },
    Rule {
        name: "multiply assign",
        guard: |_, input| "*=".match_len(input),
        action: |_, _| Ok(Some(Emit::text(LexState::Beg, TokenKind::OpAssign, "*"))),
    },
    Rule {
        name: "star",
        guard: |_, input| '*'.match_len(input),
        action: |lexer, _| Ok(Some(lexer.star("*", TokenKind::Splat, TokenKind::Multiply))),
    },
];

static LESS: &[Rule] = &[
    Rule {
        name: "compare",
        guard: |_, input| "<=>".match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
    Rule {
        name: "less or equal",
        guard: |_, input| "<=".match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
    Rule {
        name: "left shift assign",
        guard: |_, input| "<<=".match_len(input),
        action: |lexer, _| {
            Ok(Some(Emit::text(lexer.state.arg_state(), TokenKind::OpAssign, "<<")))
        },
    },
    Rule {
        name: "left chevron",
        guard: |_, input| "<<".match_len(input),
        action: |lexer, _| lexer.lchevron().map(Some),
    },
    Rule {
        name: "less",
        guard: |_, input| '<'.match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
];

static GREATER: &[Rule] = &[
    Rule {
        name: "greater or equal",
        guard: |_, input| ">=".match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
    Rule {
        name: "right shift assign",
        guard: |_, input| ">>=".match_len(input),
        action: |lexer, _| {
            Ok(Some(Emit::text(lexer.state.arg_state(), TokenKind::OpAssign, ">>")))
        },
    },
    Rule {
        name: "right shift",
        guard: |_, input| ">>".match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
    Rule {
        name: "greater",
        guard: |_, input| '>'.match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
];

static BACKTICK: &[Rule] = &[
    Rule {
        name: "backtick method definition",
        guard: |lexer, input| {
            (lexer.state == LexState::Fname)
                .then(|| '`'.match_len(input))
                .flatten()
        },
        action: |_, text| Ok(Some(Emit::text(LexState::End, TokenKind::BackRef2, text))),
    },
    Rule {
        name: "backtick method call",
        guard: |lexer, input| {
            (lexer.state == LexState::Dot)
                .then(|| '`'.match_len(input))
                .flatten()
        },
        action: |lexer, text| {
            let state = if lexer.flags.command_state {
                LexState::CmdArg
            } else {
                LexState::Arg
            };

            Ok(Some(Emit::text(state, TokenKind::BackRef2, text)))
        },
    },
    Rule {
        name: "command string",
        guard: |_, input| '`'.match_len(input),
        action: |lexer, text| {
            lexer.push_literal(LiteralContext::delimited(LiteralKind::XString, None, '`', false));
            Ok(Some(Emit::keep(TokenKind::XStringBeg, text)))
        },
    },
];

static QUESTION: &[Rule] = &[Rule {
    name: "question mark",
    guard: |_, input| '?'.match_len(input),
    action: |lexer, _| lexer.questionmark().map(Some),
}];

static AMPER: &[Rule] = &[
    Rule {
        name: "and assign",
        guard: |_, input| "&&=".match_len(input),
        action: |_, _| Ok(Some(Emit::text(LexState::Beg, TokenKind::OpAssign, "&&"))),
    },
    Rule {
        name: "and",
        guard: |_, input| "&&".match_len(input),
        action: |_, text| Ok(Some(Emit::text(LexState::Beg, TokenKind::AndOp, text))),
    },
    Rule {
        name: "bitwise and assign",
        guard: |_, input| "&=".match_len(input),
        action: |_, _| Ok(Some(Emit::text(LexState::Beg, TokenKind::OpAssign, "&"))),
    },
    Rule {
        name: "lonely",
        guard: |_, input| "&.".match_len(input),
        action: |_, text| Ok(Some(Emit::text(LexState::Dot, TokenKind::Lonely, text))),
    },
    Rule {
        name: "ampersand",
        guard: |_, input| '&'.match_len(input),
        action: |lexer, _| Ok(Some(lexer.amper())),
    },
];

static SLASH: &[Rule] = &[Rule {
    name: "slash",
    guard: |_, input| '/'.match_len(input),
    action: |lexer, _| Ok(Some(lexer.slash())),
}];

static CARET: &[Rule] = &[
    Rule {
        name: "caret assign",
        guard: |_, input| "^=".match_len(input),
        action: |_, _| Ok(Some(Emit::text(LexState::Beg, TokenKind::OpAssign, "^"))),
    },
    Rule {
        name: "caret",
        guard: |_, input| '^'.match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
];

static SEMICOLON: &[Rule] = &[Rule {
    name: "semicolon",
    guard: |_, input| ';'.match_len(input),
    action: |lexer, text| {
        lexer.flags.command_start = true;
        Ok(Some(Emit::text(LexState::Beg, TokenKind::Semicolon, text)))
    },
}];

static TILDE: &[Rule] = &[
    Rule {
        name: "tilde method",
        guard: |lexer, input| lexer.state.in_arg_state().then(|| "~@".match_len(input)).flatten(),
        action: |lexer, _| {
            Ok(Some(Emit::text(lexer.state.arg_state(), TokenKind::Tilde, "~")))
        },
    },
    Rule {
        name: "tilde",
        guard: |_, input| '~'.match_len(input),
        action: |lexer, text| lexer.operator(lexer.state.arg_state(), text),
    },
];

static BACKSLASH: &[Rule] = &[
    Rule {
        name: "line continuation",
        guard: |_, input| longest(input, &["\\\n", "\\\r\n"]),
        action: |lexer, _| {
            lexer.flags.space_seen = true;
            lexer.skip_heredoc_body();

            Ok(None)
        },
    },
    Rule {
        name: "bare backslash",
        guard: |_, input| '\\'.match_len(input),
        action: |lexer, _| Err(lexer.compile_error("bare backslash only allowed before newline")),
    },
];

static PERCENT: &[Rule] = &[Rule {
    name: "percent",
    guard: |_, input| '%'.match_len(input),
    action: |lexer, _| lexer.percent().map(Some),
}];

fn global_variable(_: &mut Lexer<'_>, text: &str) -> Result<Option<Emit>, Error> {
    Ok(Some(Emit::text(LexState::End, TokenKind::GlobalVariable, text)))
}

fn back_reference_len(input: &str) -> Option<usize> {
    let rest = input.strip_prefix('$')?;
    first_of(rest, |character| matches!(character, '&' | '`' | '\'' | '+')).map(|len| len + 1)
}

fn nth_reference_len(input: &str) -> Option<usize> {
    let rest = input.strip_prefix('$')?;
    first_of(rest, |character| matches!(character, '1'..='9'))?;
    Some(1 + chars_len(rest, |character| character.is_ascii_digit()))
}

static DOLLAR: &[Rule] = &[
    Rule {
        name: "underscore global",
        guard: |_, input| {
            let len = word_len(input.strip_prefix("$_")?);
            (len > 0).then_some(len + 2)
        },
        action: global_variable,
    },
    Rule {
        name: "last input line",
        guard: |_, input| "$_".match_len(input),
        action: global_variable,
    },
    Rule {
        name: "special global",
        guard: |_, input| {
            let rest = input.strip_prefix('$')?;

            if let Some(option) = rest.strip_prefix('-') {
                return Some(2 + first_of(option, is_word_char).unwrap_or(0));
            }

            first_of(rest, |character| "~*$?!@/\\;,.=:<>\"".contains(character)).map(|len| len + 1)
        },
        action: global_variable,
    },
    Rule {
        name: "back reference method name",
        guard: |lexer, input| {
            (lexer.state == LexState::Fname)
                .then(|| back_reference_len(input))
                .flatten()
        },
        action: global_variable,
    },
    Rule {
        name: "back reference",
        guard: |_, input| back_reference_len(input),
        action: |_, text| {
            Ok(Some(Emit::text(LexState::End, TokenKind::BackReference, &text[1..])))
        },
    },
    Rule {
        name: "nth reference method name",
        guard: |lexer, input| {
            (lexer.state == LexState::Fname)
                .then(|| nth_reference_len(input))
                .flatten()
        },
        action: global_variable,
    },
    Rule {
        name: "nth reference",
        guard: |_, input| nth_reference_len(input),
        action: |lexer, text| {
            let index = text[1..].parse::<i64>().map_err(|_| {
                lexer.compile_error(format!("`{text}' is too big for a number variable"))
            })?;

            Ok(Some(Emit::new(
                Some(LexState::End),
                TokenKind::NthReference,
                Lexeme::Integer(index),
            )))
        },
    },
    Rule {
        name: "program name",
        guard: |_, input| "$0".match_len(input),
        action: global_variable,
    },
    Rule {
        name: "odd global",
        guard: |_, input| {
            let rest = input.strip_prefix('$')?;

            match rest.chars().next() {
                None => Some(1),
                Some(next) if !is_word_char(next) => Some(1 + next.len_utf8()),
                Some(_) => None,
            }
        },
        action: |lexer, text| {
            if text == "$" {
                return Ok(Some(Emit::text(LexState::End, TokenKind::Dollar, text)));
            }

            Err(lexer.compile_error(format!("`{text}` is not allowed as a global variable name")))
        },
    },
    Rule {
        name: "global",
        guard: |_, input| {
            let len = word_len(input.strip_prefix('$')?);
            (len > 0).then_some(len + 1)
        },
        action: global_variable,
    },
];

static UNDERSCORE: &[Rule] = &[
    Rule {
        name: "end of program",
        guard: |lexer, input| {
            if !lexer.cursor.is_beginning_of_line() {
                return None;
            }

            let rest = input.strip_prefix("__END__")?;
            let terminator = if rest.is_empty() {
                Some(0)
            } else {
                longest(rest, &["\n", "\r\n"])
            };

            terminator.map(|len| len + 7)
        },
        action: |lexer, _| lexer.end_of_input().map(Some),
    },
    Rule {
        name: "underscore identifier",
        guard: |_, input| Some(identifier_len(input)),
        action: |lexer, text| Ok(Some(lexer.identifier(text)?)),
    },
];

static IDENTIFIER: &[Rule] = &[Rule {
    name: "identifier",
    guard: |_, input| {
        let len = identifier_len(input);
        (len > 0).then_some(len)
    },
    action: |lexer, text| Ok(Some(lexer.identifier(text)?)),
}];

static END_OF_INPUT: &[Rule] = &[Rule {
    name: "end of input",
    guard: |_, input| first_of(input, |character| matches!(character, '\x04' | '\x1a' | '\0')),
    action: |lexer, _| lexer.end_of_input().map(Some),
}];

static INVALID: &[Rule] = &[Rule {
    name: "invalid character",
    guard: |_, input| first_of(input, |_| true),
    action: |lexer, text| Err(lexer.invalid_char(text)),
}];

/// Gets the rule group for input starting with the given character.
pub(super) fn rules_for(character: char) -> &'static [Rule] {
    match character {
        ' ' | '\t' | '\r' | '\x0c' | '\x0b' => WHITESPACE,
        '\n' | '#' => NEWLINE_OR_COMMENT,
        ']' | ')' | '}' => CLOSING,
        '!' => BANG,
        '.' => DOT,
        '(' => PAREN,
        ',' => COMMA,
        '=' => EQUALS,
        '"' => DOUBLE_QUOTE,
        '@' => AT,
        ':' => COLON,
        '+' | '-' => PLUS_MINUS,
        '0'..='9' => NUMBER,
        '[' => BRACKET,
        '\'' => SINGLE_QUOTE,
        '|' => PIPE,
        '{' => CURLY,
        '*' => STAR,
        '<' => LESS,
        '>' => GREATER,
        '`' => BACKTICK,
        '?' => QUESTION,
        '&' => AMPER,
        '/' => SLASH,
        '^' => CARET,
        ';' => SEMICOLON,
        '~' => TILDE,
        '\\' => BACKSLASH,
        '%' => PERCENT,
        '$' => DOLLAR,
        '_' => UNDERSCORE,
        '\x04' | '\x1a' | '\0' => END_OF_INPUT,
        character if is_identifier_char(character) => IDENTIFIER,
        _ => INVALID,
    }
}

fn whitespace_escape(character: char) -> Option<char> {
    match character {
        ' ' => Some('s'),
        '\n' => Some('n'),
        '\t' => Some('t'),
        '\x0b' => Some('v'),
        '\r' => Some('r'),
        '\x0c' => Some('f'),
        _ => None,
    }
}

impl Lexer<'_> {
    fn operator(&self, state: LexState, text: &str) -> Result<Option<Emit>, Error> {
        TokenKind::from_operator(text)
            .map(|kind| Some(Emit::text(state, kind, text)))
            .ok_or_else(|| self.scan_fault())
    }

    fn invalid_char(&self, text: &str) -> Error {
        self.compile_error(format!("Invalid char {text:?} in expression"))
    }

    fn unescape(&self, text: &str) -> Result<String, Error> {
        escape::unescape(text).map_err(|error| self.compile_error(error.to_string()))
    }

    fn number(&self, text: &str, radix: Radix, is_float: bool) -> Result<Option<Emit>, Error> {
        let (kind, literal) = numeric::literal(text, Shape { radix, is_float })
            .map_err(|message| self.compile_error(message))?;

        Ok(Some(Emit::new(
            Some(LexState::End),
            kind,
            Lexeme::Number(literal),
        )))
    }

    fn symbol(&self, name: String) -> Result<Option<Emit>, Error> {
        if name.contains('\0') {
            return Err(self.compile_error("symbol cannot contain '\\0'"));
        }

        Ok(Some(Emit::text(LexState::End, TokenKind::Symbol, name)))
    }

    fn comment(&mut self) -> Result<Option<Emit>, Error> {
        let body = self
            .cursor
            .take(|input: &str| Some(input.find('\n').unwrap_or(input.len())))
            .unwrap_or_default();
        self.comments.push(format!("#{body}"));

        if self.cursor.skip('\n') {
            self.newline()
        } else {
            Ok(None)
        }
    }

    fn newline(&mut self) -> Result<Option<Emit>, Error> {
        self.skip_heredoc_body();

        self.cursor
            .skip(|input: &str| Some(chars_len(input, |character| character == '\n')));

        if matches!(
            self.state,
            LexState::Beg | LexState::Class | LexState::Fname | LexState::Dot | LexState::Label
        ) {
            return Ok(None);
        }

        let indent = chars_len(self.cursor.remainder(), is_blank);
        let rest = &self.cursor.remainder()[indent..];
        let continues =
            (rest.starts_with('.') && !rest.starts_with("..")) || rest.starts_with("&.");

        if continues {
            self.flags.space_seen |= indent > 0;
            self.cursor.advance(indent);
            return Ok(None);
        }

        self.flags.command_start = true;
        Ok(Some(Emit::bare(LexState::Beg, TokenKind::Newline)))
    }

    fn embedded_document(&mut self) -> Result<Option<Emit>, Error> {
        const MARKER: &str = "\n=end";

        let remainder = self.cursor.remainder();
        let Some(index) = remainder.find(MARKER) else {
            return Err(self.compile_error("embedded document meets end of file"));
        };

        let rest = &remainder[index + MARKER.len()..];
        let len = index + MARKER.len() + rest.find('\n').map_or(rest.len(), |end| end + 1);
        let document = format!("=begin{}", &remainder[..len]);

        self.cursor.advance(len);
        self.comments.push(document);
        Ok(None)
    }

    fn closing(&mut self, text: &str) -> Emit {
        self.cond.lexpop();
        self.cmdarg.lexpop();

        match text {
            "}" if self.literals.is_embedded_at(self.brace_nest) => {
                if let Some(context) = self.literals.top_mut() {
                    context.suspension = None;
                }

                Emit::text(LexState::EndArg, TokenKind::StringDEnd, text)
            }
            "}" => {
                self.brace_nest -= 1;
                Emit::text(LexState::EndArg, TokenKind::RCurly, text)
            }
            "]" => {
                self.paren_nest -= 1;
                Emit::text(LexState::EndArg, TokenKind::RBrack, text)
            }
            _ => {
                self.paren_nest -= 1;
                Emit::text(LexState::EndFn, TokenKind::RParen, text)
            }
        }
    }

    fn open_nesting(&mut self, state: LexState, kind: TokenKind, text: &str) -> Emit {
        self.cond.push(false);
        self.cmdarg.push(false);
        Emit::text(state, kind, text)
    }

    fn paren(&mut self) -> Emit {
        let kind = if self.capabilities.command_paren_args {
            self.command_paren()
        } else if self.is_beg() {
            TokenKind::LParen
        } else if self.is_arg() && self.flags.space_seen {
            TokenKind::LParenArg
        } else {
            TokenKind::LParen2
        };

        self.paren_nest += 1;
        self.open_nesting(LexState::Beg, kind, "(")
    }

    fn command_paren(&mut self) -> TokenKind {
        self.flags.command_start = true;

        if matches!(self.state, LexState::Beg | LexState::Mid) {
            return TokenKind::LParen;
        }

        if self.flags.space_seen {
            match self.state {
                LexState::CmdArg => return TokenKind::LParenArg,
                LexState::Arg => self.warn(WarningKind::SpaceBeforeParentheses),
                _ => {}
            }
        }

        TokenKind::LParen2
    }

    fn square_bracket(&mut self) -> Emit {
        self.paren_nest += 1;

        if self.state.in_arg_state() {
            if self.cursor.skip("]=") {
                self.paren_nest -= 1;
                return Emit::text(LexState::Arg, TokenKind::Aset, "[]=");
            }

            if self.cursor.skip(']') {
                self.paren_nest -= 1;
                return Emit::text(LexState::Arg, TokenKind::Aref, "[]");
            }

            return self.open_nesting(LexState::Beg, TokenKind::LBrack2, "[");
        }

        let kind = if self.is_beg() || (self.is_arg() && self.flags.space_seen) {
            TokenKind::LBrack
        } else {
            TokenKind::LBrack2
        };

        self.open_nesting(LexState::Beg, kind, "[")
    }

    fn curly_brace(&mut self) -> Emit {
        self.brace_nest += 1;

        if self.is_lambda_beginning() {
            self.lpar_beg = None;
            self.paren_nest -= 1;
            return self.open_nesting(LexState::Beg, TokenKind::LambdaBegin, "{");
        }

        let kind = match self.state {
            LexState::Label => TokenKind::LBrace,
            LexState::Arg | LexState::CmdArg | LexState::End | LexState::EndFn => TokenKind::LCurly,
            LexState::EndArg => TokenKind::LBraceArg,
            _ => TokenKind::LBrace,
        };

        if kind != TokenKind::LBrace {
            self.flags.command_start = true;
        }

        self.open_nesting(LexState::Beg, kind, "{")
    }

    fn colon2(&self, text: &str) -> Emit {
        if self.is_beg()
            || self.state == LexState::Class
            || (self.is_arg() && self.flags.space_seen)
        {
            Emit::text(LexState::Beg, TokenKind::Colon3, text)
        } else {
            Emit::text(LexState::Dot, TokenKind::Colon2, text)
        }
    }

    fn colon1(&mut self, text: &str) -> Emit {
        if self.is_end() || self.cursor.current().map_or(false, char::is_whitespace) {
            return Emit::text(LexState::Beg, TokenKind::Colon, text);
        }

        if self.cursor.skip('\'') {
            self.push_literal(LiteralContext::delimited(LiteralKind::Symbol, None, '\'', false));
        } else if self.cursor.skip('"') {
            self.push_literal(LiteralContext::delimited(LiteralKind::Symbol, None, '"', true));
        }

        Emit::text(LexState::Fname, TokenKind::SymbolBeg, text)
    }

    fn plus_minus(&mut self, sign: &str) -> Emit {
        let (unary, binary) = if sign == "+" {
            (TokenKind::UPlus, TokenKind::Plus)
        } else {
            (TokenKind::UMinus, TokenKind::Minus)
        };

        if self.state.in_arg_state() {
            if self.cursor.skip('@') {
                return Emit::text(LexState::Arg, unary, format!("{sign}@"));
            }

            return Emit::text(LexState::Arg, binary, sign);
        }

        if self.cursor.skip('=') {
            return Emit::text(LexState::Beg, TokenKind::OpAssign, sign);
        }

        if self.is_beg() || self.is_space_arg(self.cursor.current()) {
            if self.is_arg() {
                self.warn(WarningKind::AmbiguousFirstArgument);
            }

            let before_digit = self
                .cursor
                .current()
                .map_or(false, |next| next.is_ascii_digit());

            if sign == "-" && before_digit {
                return Emit::text(LexState::Beg, TokenKind::UMinusNum, sign);
            }

            return Emit::text(LexState::Beg, unary, sign);
        }

        Emit::text(LexState::Beg, binary, sign)
    }

    fn star(&self, operator: &'static str, prefix: TokenKind, fallback: TokenKind) -> Emit {
        let kind = if self.is_space_arg(self.cursor.current()) {
            self.warn(WarningKind::ArgumentPrefix(operator));
            prefix
        } else if self.is_beg() {
            prefix
        } else {
            fallback
        };

        Emit::text(self.state.arg_state(), kind, operator)
    }

    fn lchevron(&mut self) -> Result<Emit, Error> {
        let heredoc_possible = !matches!(self.state, LexState::Dot | LexState::Class)
            && !self.is_end()
            && (!self.is_arg() || self.flags.space_seen);

        if heredoc_possible {
            if let Some(emit) = self.heredoc_identifier()? {
                return Ok(emit);
            }
        }

        let state = if self.state.in_arg_state() {
            LexState::Arg
        } else {
            if self.state == LexState::Class {
                self.flags.command_start = true;
            }
            LexState::Beg
        };

        Ok(Emit::text(state, TokenKind::LeftShift, "<<"))
    }

    fn questionmark(&mut self) -> Result<Emit, Error> {
        if self.is_end() {
            return Ok(Emit::text(LexState::Beg, TokenKind::Question, "?"));
        }

        let Some(next) = self.cursor.current() else {
            return Err(self.compile_error("incomplete character syntax"));
        };

        if next.is_whitespace() {
            if !self.is_arg() {
                if let Some(letter) = whitespace_escape(next) {
                    self.warn(WarningKind::InvalidCharacterSyntax(letter));
                }
            }

            return Ok(Emit::text(LexState::Beg, TokenKind::Question, "?"));
        }

        if is_word_char(next) && self.cursor.nth(1).map_or(false, is_word_char) {
            return Ok(Emit::text(LexState::Beg, TokenKind::Question, "?"));
        }

        let character = if self.cursor.skip('\\') {
            self.read_escape()?
        } else {
            self.cursor.bump().map(String::from).unwrap_or_default()
        };

        if self.capabilities.character_strings {
            return Ok(Emit::text(LexState::End, TokenKind::String, character));
        }

        let code = character
            .chars()
            .next()
            .map_or(0, |character| u32::from(character) & 0xFF);

        Ok(Emit::new(
            Some(LexState::End),
            TokenKind::Integer,
            Lexeme::Integer(i64::from(code)),
        ))
    }

    fn amper(&self) -> Emit {
        let kind = if self.is_space_arg(self.cursor.current()) {
            self.warn(WarningKind::ArgumentPrefix("&"));
            TokenKind::Amper
        } else if self.is_beg() {
            TokenKind::Amper
        } else {
            TokenKind::Amper2
        };

        Emit::text(self.state.arg_state(), kind, "&")
    }

    fn slash(&mut self) -> Emit {
        if self.is_beg() {
            return self.open_regexp();
        }

        if self.cursor.skip('=') {
            return Emit::text(LexState::Beg, TokenKind::OpAssign, "/");
        }

        if self.is_space_arg(self.cursor.current()) {
            self.warn(WarningKind::AmbiguousFirstArgument);
            return self.open_regexp();
        }

        Emit::text(self.state.arg_state(), TokenKind::Divide, "/")
    }

    fn open_regexp(&mut self) -> Emit {
        self.push_literal(LiteralContext::delimited(LiteralKind::Regex, None, '/', true));
        Emit::keep(TokenKind::RegexpBeg, "/")
    }

    fn percent(&mut self) -> Result<Emit, Error> {
        if self.is_beg() {
            return self.parse_quote();
        }

        if self.cursor.skip('=') {
            return Ok(Emit::text(LexState::Beg, TokenKind::OpAssign, "%"));
        }

        if self.is_space_arg(self.cursor.current()) {
            return self.parse_quote();
        }

        Ok(Emit::text(self.state.arg_state(), TokenKind::Percent, "%"))
    }

    fn identifier(&mut self, text: &str) -> Result<Emit, Error> {
        let mut name = text.to_owned();
        let mut kind = TokenKind::Identifier;

        let method_suffix = |input: &str| {
            let marked = input.starts_with(|next: char| matches!(next, '!' | '?'))
                && !input[1..].starts_with('=');
            marked.then_some(1)
        };
        let setter_suffix = |input: &str| {
            let rest = input.strip_prefix('=')?;
            let is_operator = rest.starts_with(|next: char| matches!(next, '~' | '>' | '='));
            (!is_operator || rest.starts_with("=>")).then_some(1)
        };

        if let Some(mark) = self.cursor.take(method_suffix) {
            name.push_str(&mark);
            kind = TokenKind::FunctionIdentifier;
        } else if self.state == LexState::Fname && self.cursor.skip(setter_suffix) {
            name.push('=');
        } else if name.starts_with(|first: char| first.is_ascii_uppercase()) {
            kind = TokenKind::Constant;
        }

        if self.capabilities.labels && self.is_label_possible() && self.is_label_suffix() {
            self.cursor.skip(':');
            return Ok(Emit::text(LexState::Label, TokenKind::Label, name));
        }

        if self.state != LexState::Dot {
            if let Some(keyword) = name
                .parse::<Keyword>()
                .ok()
                .filter(|keyword| keyword.is_reserved(self.capabilities))
            {
                return Ok(self.keyword(keyword, name));
            }
        }

        let mut state = if self.is_beg() || self.is_arg() || self.state == LexState::Dot {
            if self.flags.command_state {
                LexState::CmdArg
            } else {
                LexState::Arg
            }
        } else if self.state == LexState::Fname {
            LexState::EndFn
        } else {
            LexState::End
        };

        if kind == TokenKind::Identifier
            && !matches!(self.last_state, LexState::Dot | LexState::Fname)
            && self.is_local(&name)
        {
            state = LexState::End;
        }

        Ok(Emit::text(state, kind, name))
    }

    fn keyword(&mut self, keyword: Keyword, name: String) -> Emit {
        let previous = self.state;
        let state = keyword.state();

        if previous == LexState::Fname {
            return Emit::text(state, TokenKind::Keyword(keyword), name);
        }

        if state == LexState::Beg {
            self.flags.command_start = true;
        }

        if keyword == Keyword::Do {
            let kind = if self.is_lambda_beginning() {
                self.lpar_beg = None;
                self.paren_nest -= 1;
                TokenKind::DoLambda
            } else if self.cond.is_in_state() {
                TokenKind::DoCond
            } else if (self.cmdarg.is_in_state() && previous != LexState::CmdArg)
                || previous == LexState::EndArg
            {
                TokenKind::DoBlock
            } else {
                TokenKind::Keyword(Keyword::Do)
            };

            return Emit::text(state, kind, name);
        }

        if matches!(previous, LexState::Beg | LexState::Label) || !keyword.has_modifier_form() {
            return Emit::text(state, TokenKind::Keyword(keyword), name);
        }

        Emit::text(LexState::Beg, TokenKind::Modifier(keyword), name)
    }
}
