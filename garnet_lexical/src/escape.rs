//! Decodes backslash escape sequences.
//!
//! Every function here takes the input that follows the backslash.

use thiserror::Error;

/// Is an error returned when an escape sequence is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("Invalid escape character syntax")]
pub struct InvalidEscape;

fn byte(value: u32) -> char { char::from(u8::try_from(value & 0xFF).unwrap_or(u8::MAX)) }

fn run_len(input: &str, max: usize, predicate: impl Fn(u8) -> bool) -> usize {
    input
        .bytes()
        .take(max)
        .take_while(|byte| predicate(*byte))
        .count()
}

fn octal_len(input: &str) -> usize { run_len(input, 3, |byte| (b'0'..=b'7').contains(&byte)) }

fn hex_len(input: &str, max: usize) -> usize {
    run_len(input, max, |byte| byte.is_ascii_hexdigit())
}

/// Decodes one escape sequence.
///
/// Returns the decoded text and the number of bytes of `input` the sequence occupies. An
/// escaped newline decodes to nothing.
///
/// # Errors
/// [`InvalidEscape`]: the sequence is incomplete or malformed, such as `\x` without hex digits,
/// a bare `\M`, `\C` or `\c`, `\u` with fewer than four hex digits, `\8` or `\9`.
pub fn decode(input: &str) -> Result<(String, usize), InvalidEscape> {
    let first = input.chars().next().ok_or(InvalidEscape)?;

    let named = match first {
        '\\' => Some('\\'),
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'f' => Some('\x0c'),
        'v' => Some('\x0b'),
        'a' => Some('\x07'),
        'e' => Some('\x1b'),
        'b' => Some('\x08'),
        's' => Some(' '),
        _ => None,
    };

    if let Some(character) = named {
        return Ok((character.to_string(), 1));
    }

    match first {
        '\n' => Ok((String::new(), 1)),
        '0'..='7' => {
            let len = octal_len(input);
            let value = u32::from_str_radix(&input[..len], 8).map_err(|_| InvalidEscape)?;
            Ok((byte(value).to_string(), len))
        }
        'x' => {
            let len = hex_len(&input[1..], 2);
            if len == 0 {
                return Err(InvalidEscape);
            }

            let value = u32::from_str_radix(&input[1..=len], 16).map_err(|_| InvalidEscape)?;
            Ok((byte(value).to_string(), len + 1))
        }
        'u' => decode_unicode(&input[1..]).map(|(text, len)| (text, len + 1)),
        'M' if input.starts_with("M-") => {
            let (code, len) = operand(&input[2..])?;
            if code > 0xFF {
                return Err(InvalidEscape);
            }
            Ok((byte(code | 0x80).to_string(), len + 2))
        }
        'C' if input.starts_with("C-") => {
            control(&input[2..]).map(|(character, len)| (character.to_string(), len + 2))
        }
        'c' => control(&input[1..]).map(|(character, len)| (character.to_string(), len + 1)),
        'M' | 'C' | '8' | '9' => Err(InvalidEscape),
        other => Ok((other.to_string(), other.len_utf8())),
    }
}

/// Reads the character a meta or control escape applies to: either a plain character or a
/// nested escape.
fn operand(input: &str) -> Result<(u32, usize), InvalidEscape> {
    if let Some(rest) = input.strip_prefix('\\') {
        let (text, len) = decode(rest)?;
        let code = text.chars().next().ok_or(InvalidEscape)?;
        return Ok((u32::from(code), len + 1));
    }

    let character = input.chars().next().ok_or(InvalidEscape)?;
    Ok((u32::from(character), character.len_utf8()))
}

fn control(input: &str) -> Result<(char, usize), InvalidEscape> {
    if input.starts_with('?') {
        return Ok(('\x7f', 1));
    }

    let (code, len) = operand(input)?;
    Ok((byte(code & 0x9f), len))
}

fn decode_unicode(input: &str) -> Result<(String, usize), InvalidEscape> {
    if let Some(braced) = input.strip_prefix('{') {
        let close = braced.find('}').ok_or(InvalidEscape)?;
        let mut text = String::new();

        for code_point in braced[..close].split_whitespace() {
            if code_point.len() > 6 || hex_len(code_point, 6) != code_point.len() {
                return Err(InvalidEscape);
            }

            let value = u32::from_str_radix(code_point, 16).map_err(|_| InvalidEscape)?;
            text.push(char::from_u32(value).ok_or(InvalidEscape)?);
        }

        if text.is_empty() {
            return Err(InvalidEscape);
        }

        return Ok((text, close + 2));
    }

    if hex_len(input, 4) != 4 {
        return Err(InvalidEscape);
    }

    let value = u32::from_str_radix(&input[..4], 16).map_err(|_| InvalidEscape)?;
    let character = char::from_u32(value).ok_or(InvalidEscape)?;
    Ok((character.to_string(), 4))
}

/// Gets the length of an escape sequence allowed in a string literal that is read in one piece.
///
/// Sequences this rejects send the literal through the incremental string reader instead.
#[must_use]
pub fn simple_len(input: &str) -> Option<usize> {
    let first = input.chars().next()?;

    match first {
        '0'..='7' => Some(octal_len(input)),
        'x' => {
            let len = hex_len(&input[1..], 2);
            (len > 0).then_some(len + 1)
        }
        'M' => {
            let operand = input.strip_prefix("M-")?.chars().next()?;
            (operand != '\\').then_some(2 + operand.len_utf8())
        }
        'C' | 'c' => {
            let prefix = if first == 'C' { "C-" } else { "c" };
            let operand = input.strip_prefix(prefix)?.chars().next()?;
            (operand != '\\').then_some(prefix.len() + operand.len_utf8())
        }
        'u' if input[1..].starts_with('{') => {
            let close = input.find('}')?;
            let inner = &input[2..close];
            let valid = !inner.trim().is_empty()
                && inner
                    .chars()
                    .all(|character| character.is_ascii_hexdigit() || character.is_whitespace());
            valid.then_some(close + 1)
        }
        'u' => {
            let len = hex_len(&input[1..], 4);
            Some(len + 1)
        }
        other => Some(other.len_utf8()),
    }
}

/// Decodes every escape sequence in the text.
///
/// # Errors
/// [`InvalidEscape`]: one of the sequences is malformed.
pub fn unescape(text: &str) -> Result<String, InvalidEscape> {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(index) = rest.find('\\') {
        result.push_str(&rest[..index]);
        let (decoded, len) = decode(&rest[index + 1..])?;
        result.push_str(&decoded);
        rest = &rest[index + 1 + len..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Decodes the escapes a single-quoted literal honors: `\\` and the escaped delimiter. Every
/// other backslash is kept.
#[must_use]
pub fn unescape_quoted(text: &str, delimiter: char) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(character) = chars.next() {
        if character == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == delimiter {
                    result.push(next);
                    chars.next();
                    continue;
                }
            }
        }

        result.push(character);
    }

    result
}

/// Gets the length of an escape sequence kept verbatim in a regular expression, not counting the
/// backslash.
///
/// # Errors
/// [`InvalidEscape`]: the sequence is incomplete, such as a bare `\M`, `\C`, `\c` or `\x`.
pub fn raw_len(input: &str) -> Result<usize, InvalidEscape> {
    let first = input.chars().next().ok_or(InvalidEscape)?;

    let prefix = if input.starts_with("M-") || input.starts_with("C-") {
        2
    } else if first == 'c' {
        1
    } else {
        0
    };

    if prefix > 0 {
        let rest = &input[prefix..];

        if let Some(nested) = rest.strip_prefix('\\') {
            return Ok(prefix + 1 + raw_len(nested)?);
        }

        let operand = rest.chars().next().ok_or(InvalidEscape)?;
        return Ok(prefix + operand.len_utf8());
    }

    match first {
        '0'..='7' => Ok(octal_len(input)),
        'x' => {
            let len = hex_len(&input[1..], 2);
            if len == 0 {
                Err(InvalidEscape)
            } else {
                Ok(len + 1)
            }
        }
        'M' | 'C' => Err(InvalidEscape),
        other => Ok(other.len_utf8()),
    }
}

#[cfg(test)]
mod tests;
