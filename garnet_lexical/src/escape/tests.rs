use proptest::{prop_assert_eq, proptest};

use super::{decode, raw_len, simple_len, unescape, unescape_quoted, InvalidEscape};

#[test]
fn named_escapes() {
    for (input, expected) in [
        ("n", "\n"),
        ("t", "\t"),
        ("s", " "),
        ("e", "\x1b"),
        ("a", "\x07"),
        ("v", "\x0b"),
        ("\\", "\\"),
        ("\n", ""),
        ("q", "q"),
    ] {
        assert_eq!(decode(input), Ok((expected.to_string(), input.len())), "{input:?}");
    }
}

#[test]
fn numeric_escapes() {
    assert_eq!(decode("101rest"), Ok(("A".to_string(), 3)));
    assert_eq!(decode("0"), Ok(("\0".to_string(), 1)));
    assert_eq!(decode("x41"), Ok(("A".to_string(), 3)));
    assert_eq!(decode("x4g"), Ok(("\x04".to_string(), 2)));
    assert_eq!(decode("u0041"), Ok(("A".to_string(), 5)));
    assert_eq!(decode("u{1F600}"), Ok(("\u{1F600}".to_string(), 8)));
    assert_eq!(decode("u{41 42}"), Ok(("AB".to_string(), 8)));
}

#[test]
fn meta_and_control_escapes() {
    assert_eq!(decode("M-a"), Ok(("\u{e1}".to_string(), 3)));
    assert_eq!(decode("C-a"), Ok(("\x01".to_string(), 3)));
    assert_eq!(decode("ca"), Ok(("\x01".to_string(), 2)));
    assert_eq!(decode("c?"), Ok(("\x7f".to_string(), 2)));
    assert_eq!(decode("M-\\C-a"), Ok(("\u{81}".to_string(), 6)));
}

#[test]
fn malformed_escapes() {
    for input in ["", "x", "xz", "M", "Mx", "C", "c", "u12", "u{}", "u{110000}", "8", "9"] {
        assert_eq!(decode(input), Err(InvalidEscape), "{input:?}");
    }
}

#[test]
fn unescape_whole_bodies() {
    assert_eq!(unescape(r"a\tb\x41"), Ok("a\tbA".to_string()));
    assert_eq!(unescape(r"\x"), Err(InvalidEscape));
    assert_eq!(unescape_quoted(r"it\'s \\ \n", '\''), r"it's \ \n");
}

#[test]
fn simple_and_raw_lengths() {
    assert_eq!(simple_len("n"), Some(1));
    assert_eq!(simple_len("M-\\"), None);
    assert_eq!(simple_len("u{41}x"), Some(5));
    assert_eq!(simple_len("x"), None);

    assert_eq!(raw_len("d+"), Ok(1));
    assert_eq!(raw_len("x1f"), Ok(3));
    assert_eq!(raw_len("M-\\C-x"), Ok(6));
    assert_eq!(raw_len("c"), Err(InvalidEscape));
    assert_eq!(raw_len("M"), Err(InvalidEscape));
}

proptest! {
    #[test]
    fn octal_escapes_wrap_to_a_byte(value in 0u32..0o1000) {
        let input = format!("{value:03o}");
        let (decoded, len) = decode(&input).unwrap();

        prop_assert_eq!(len, 3);
        prop_assert_eq!(decoded.chars().next().map(u32::from), Some(value & 0xFF));
    }

    #[test]
    fn plain_text_is_unchanged(text in "[^\\\\]*") {
        prop_assert_eq!(unescape(&text), Ok(text.clone()));
    }
}
