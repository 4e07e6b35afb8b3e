//! Scans numeric literals.
//!
//! Each matcher recognizes one literal shape anchored at the start of its input and returns the
//! matched length. The lexer tries them in a fixed order: the malformed shapes are placed where
//! they shadow the valid shapes they would otherwise be mistaken for.

use crate::token::{NumericKind, NumericLiteral, Radix, TokenKind};

fn is_word(character: u8) -> bool { character.is_ascii_alphanumeric() || character == b'_' }

fn is_boundary(input: &[u8], position: usize) -> bool {
    let before = position
        .checked_sub(1)
        .and_then(|index| input.get(index))
        .map_or(false, |byte| is_word(*byte));
    let after = input.get(position).map_or(false, |byte| is_word(*byte));

    before != after
}

fn sign_len(input: &[u8]) -> usize { usize::from(input.first() == Some(&b'+')) }

fn run_len(input: &[u8], start: usize, predicate: impl Fn(u8) -> bool) -> usize {
    input
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|byte| predicate(**byte)).count())
}

fn is_digit_or_underscore(byte: u8) -> bool { byte.is_ascii_digit() || byte == b'_' }

fn byte_at(input: &[u8], position: usize) -> Option<u8> { input.get(position).copied() }

fn eq_ignore_case(input: &[u8], position: usize, expected: u8) -> bool {
    byte_at(input, position).map_or(false, |byte| byte.eq_ignore_ascii_case(&expected))
}

const SUFFIXES: [&str; 3] = ["ri", "r", "i"];

/// Gets the length of the longest suffix at `position`, with no boundary requirement.
fn suffix_len(input: &[u8], position: usize) -> usize {
    SUFFIXES
        .iter()
        .find(|suffix| input[position..].starts_with(suffix.as_bytes()))
        .map_or(0, |suffix| suffix.len())
}

/// Gets the length of the first suffix at `position` that is followed by a word boundary. The
/// empty suffix is tried last.
fn bounded_suffix_len(input: &[u8], position: usize) -> Option<usize> {
    SUFFIXES
        .iter()
        .map(|suffix| suffix.as_bytes())
        .chain(std::iter::once(&b""[..]))
        .find(|suffix| {
            input[position..].starts_with(suffix) && is_boundary(input, position + suffix.len())
        })
        .map(<[u8]>::len)
}

/// Matches a radix prefix with no digits: `0x`, `0b` or `0d` followed by a word boundary.
#[must_use]
pub fn bad_prefix(input: &str) -> Option<usize> {
    let input = input.as_bytes();
    let start = sign_len(input);

    (byte_at(input, start) == Some(b'0')
        && byte_at(input, start + 1).map_or(false, |byte| {
            matches!(byte.to_ascii_lowercase(), b'x' | b'b' | b'd')
        })
        && is_boundary(input, start + 2))
    .then_some(start + 2)
}

/// Matches a decimal integer that is not the start of a float, or a `0d` integer.
#[must_use]
pub fn decimal(input: &str) -> Option<usize> {
    let input = input.as_bytes();
    let start = sign_len(input);

    match byte_at(input, start) {
        Some(b'1'..=b'9') => {
            let run = run_len(input, start + 1, is_digit_or_underscore);

            (0..=run).rev().find_map(|taken| {
                let end = start + 1 + taken;
                bare_decimal_end(input, end).map(|end| end + suffix_len(input, end))
            })
        }
        Some(b'0') if eq_ignore_case(input, start + 1, b'd') => {
            let run = run_len(input, start + 2, is_digit_or_underscore);
            (run > 0).then(|| {
                let end = start + 2 + run;
                end + suffix_len(input, end)
            })
        }
        Some(b'0') => {
            bare_decimal_end(input, start + 1).map(|end| end + suffix_len(input, end))
        }
        _ => None,
    }
}

/// Checks what may follow the digits of a decimal integer: not a fraction, then an optional
/// suffix and a word boundary.
fn bare_decimal_end(input: &[u8], end: usize) -> Option<usize> {
    let starts_fraction = byte_at(input, end) == Some(b'.')
        && byte_at(input, end + 1).map_or(false, |byte| byte.is_ascii_digit());

    if starts_fraction {
        return None;
    }

    bounded_suffix_len(input, end).map(|len| end + len)
}

fn prefixed(input: &str, marker: u8, digit: impl Fn(u8) -> bool) -> Option<usize> {
    let input = input.as_bytes();
    let start = sign_len(input);

    if byte_at(input, start) != Some(b'0') || !eq_ignore_case(input, start + 1, marker) {
        return None;
    }

    let run = run_len(input, start + 2, |byte| digit(byte) || byte == b'_');
    (run > 0).then(|| {
        let end = start + 2 + run;
        end + suffix_len(input, end)
    })
}

/// Matches a `0x` integer.
#[must_use]
pub fn hexadecimal(input: &str) -> Option<usize> {
    prefixed(input, b'x', |byte| byte.is_ascii_hexdigit())
}

/// Matches a `0b` integer.
#[must_use]
pub fn binary(input: &str) -> Option<usize> {
    prefixed(input, b'b', |byte| matches!(byte, b'0' | b'1'))
}

fn is_octal_or_underscore(byte: u8) -> bool { matches!(byte, b'0'..=b'7' | b'_') }

/// Matches an octal integer up to and including an `8` or `9` digit.
#[must_use]
pub fn bad_octal(input: &str) -> Option<usize> {
    let input = input.as_bytes();
    let mut position = sign_len(input);

    if byte_at(input, position) != Some(b'0') {
        return None;
    }
    position += 1;

    if eq_ignore_case(input, position, b'o') {
        position += 1;
    }

    position += run_len(input, position, is_octal_or_underscore);
    matches!(byte_at(input, position), Some(b'8' | b'9')).then_some(position + 1)
}

/// Matches an octal integer: `0` or `0o` followed by octal digits, or a bare `0o`.
#[must_use]
pub fn octal(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let start = sign_len(bytes);

    if byte_at(bytes, start) != Some(b'0') {
        return None;
    }

    let marker = usize::from(eq_ignore_case(bytes, start + 1, b'o'));
    let run = run_len(bytes, start + 1 + marker, is_octal_or_underscore);

    if run > 0 {
        let end = start + 1 + marker + run;
        return Some(end + suffix_len(bytes, end));
    }

    // a bare `0o` never takes a sign
    (start == 0 && marker == 1).then(|| 2 + suffix_len(bytes, 2))
}

/// Matches digits ending in `_` directly before an exponent or a fraction.
#[must_use]
pub fn bad_float(input: &str) -> Option<usize> {
    let input = input.as_bytes();
    let start = sign_len(input);

    if !byte_at(input, start).map_or(false, |byte| byte.is_ascii_digit()) {
        return None;
    }

    let end = start + 1 + run_len(input, start + 1, is_digit_or_underscore);
    let trailing_underscore = end > start + 1 && input[end - 1] == b'_';
    let followed = byte_at(input, end).map_or(false, |byte| matches!(byte, b'e' | b'E' | b'.'));

    (trailing_underscore && followed).then_some(end + 1)
}

/// Gets the end of an optional exponent starting at `position`.
fn exponent_end(input: &[u8], position: usize) -> Option<usize> {
    if !eq_ignore_case(input, position, b'e') {
        return None;
    }

    let mut end = position + 1;
    if matches!(byte_at(input, end), Some(b'+' | b'-')) {
        end += 1;
    }

    let run = run_len(input, end, is_digit_or_underscore);
    (run > 0).then_some(end + run)
}

/// Gets the end of an optional suffix group that must be followed by a word boundary.
fn optional_bounded_suffix(input: &[u8], position: usize) -> usize {
    position + bounded_suffix_len(input, position).unwrap_or(0)
}

/// Matches a float: digits, a fraction and an optional exponent, or digits and an exponent.
#[must_use]
pub fn float(input: &str) -> Option<usize> {
    let input = input.as_bytes();
    let start = sign_len(input);

    if byte_at(input, start).map_or(false, |byte| byte.is_ascii_digit()) {
        let dot = start + 1 + run_len(input, start + 1, is_digit_or_underscore);
        let fraction = run_len(input, dot + 1, is_digit_or_underscore);

        if byte_at(input, dot) == Some(b'.') && fraction > 0 {
            let end = dot + 1 + fraction;
            let end = exponent_end(input, end).unwrap_or(end);
            return Some(optional_bounded_suffix(input, end));
        }
    }

    let mantissa = run_len(input, start, is_digit_or_underscore);
    if mantissa == 0 {
        return None;
    }

    exponent_end(input, start + mantissa).map(|end| optional_bounded_suffix(input, end))
}

/// Matches the leading digits of a decimal integer that none of the other shapes accepted.
#[must_use]
pub fn trailing_decimal(input: &str) -> Option<usize> {
    let input = input.as_bytes();
    let start = sign_len(input);

    if !byte_at(input, start).map_or(false, |byte| byte.is_ascii_digit()) {
        return None;
    }

    let run = run_len(input, start + 1, is_digit_or_underscore);
    let full = start + 1 + run;

    let end = if eq_ignore_case(input, full, b'e') {
        // give back one digit so the exponent marker is not touched
        if run == 0 {
            return None;
        }
        full - 1
    } else {
        full
    };

    Some(optional_bounded_suffix(input, end))
}

/// Is a description of a scanned numeric literal, before it is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// The radix of the literal. Floats are decimal.
    pub radix: Radix,

    /// Whether the literal was matched as a float.
    pub is_float: bool,
}

/// Converts matched literal text into its token kind and value.
///
/// # Errors
/// Returns the compile error message when the digits contain `__` or end with `_`.
pub fn literal(text: &str, shape: Shape) -> Result<(TokenKind, NumericLiteral), &'static str> {
    if text.contains("__") {
        return Err("Invalid numeric format");
    }

    let unsigned = text.strip_prefix('+').unwrap_or(text);
    let suffix = if unsigned.ends_with("ri") {
        "ri"
    } else if unsigned.ends_with('r') {
        "r"
    } else if unsigned.ends_with('i') {
        "i"
    } else {
        ""
    };
    let body = &unsigned[..unsigned.len() - suffix.len()];

    if body.ends_with('_') {
        return Err("Trailing '_' in number.");
    }

    let kind = NumericKind::from_suffix(suffix).unwrap_or_default();
    let digits = if shape.is_float {
        body.replace('_', "")
    } else {
        let lower = body.to_ascii_lowercase();
        let stripped = match shape.radix {
            Radix::Hexadecimal => lower.strip_prefix("0x"),
            Radix::Binary => lower.strip_prefix("0b"),
            Radix::Octal => lower.strip_prefix("0o"),
            Radix::Decimal => lower.strip_prefix("0d"),
        }
        .map(str::to_owned)
        .unwrap_or(lower)
        .replace('_', "");

        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped
        }
    };

    let token_kind = match kind {
        NumericKind::Plain if shape.is_float => TokenKind::Float,
        NumericKind::Plain => TokenKind::Integer,
        NumericKind::Rational => TokenKind::Rational,
        NumericKind::Imaginary | NumericKind::RationalImaginary => TokenKind::Imaginary,
    };

    Ok((
        token_kind,
        NumericLiteral::new(digits, shape.radix, kind, shape.is_float),
    ))
}

#[cfg(test)]
mod tests;
