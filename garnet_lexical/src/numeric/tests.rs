use proptest::{prop_assert_eq, proptest};

use super::{
    bad_float, bad_octal, bad_prefix, binary, decimal, float, hexadecimal, literal, octal,
    trailing_decimal, Shape,
};
use crate::token::{NumericKind, Radix, TokenKind};

const DECIMAL: Shape = Shape {
    radix: Radix::Decimal,
    is_float: false,
};

#[test]
fn decimal_stops_before_fractions_and_words() {
    assert_eq!(decimal("42 "), Some(2));
    assert_eq!(decimal("1_000+1"), Some(5));
    assert_eq!(decimal("0"), Some(1));
    assert_eq!(decimal("1..5"), Some(1));
    assert_eq!(decimal("10r"), Some(3));
    assert_eq!(decimal("3ri"), Some(3));
    assert_eq!(decimal("0d19"), Some(4));
    assert_eq!(decimal("12.5"), None);
    assert_eq!(decimal("12abc"), None);
    assert_eq!(decimal("1e5"), None);
    assert_eq!(decimal("019"), None);
}

#[test]
fn prefixed_integers() {
    assert_eq!(hexadecimal("0xFF_ff;"), Some(7));
    assert_eq!(hexadecimal("0x"), None);
    assert_eq!(binary("0b1010i"), Some(7));
    assert_eq!(binary("0b2"), None);
    assert_eq!(octal("0o17"), Some(4));
    assert_eq!(octal("017"), Some(3));
    assert_eq!(octal("0o"), Some(2));
    assert_eq!(octal("+0o"), None);
    assert_eq!(octal("0"), None);
}

#[test]
fn malformed_shapes() {
    assert_eq!(bad_prefix("0x "), Some(2));
    assert_eq!(bad_prefix("0b"), Some(2));
    assert_eq!(bad_prefix("0x1"), None);
    assert_eq!(bad_octal("019"), Some(3));
    assert_eq!(bad_octal("0o8"), Some(3));
    assert_eq!(bad_octal("07"), None);
    assert_eq!(bad_float("1_.5"), Some(3));
    assert_eq!(bad_float("1_e5"), Some(3));
    assert_eq!(bad_float("1_5.5"), None);
}

#[test]
fn floats() {
    assert_eq!(float("1.5"), Some(3));
    assert_eq!(float("1.5e-3+"), Some(6));
    assert_eq!(float("2e10"), Some(4));
    assert_eq!(float("1.5r"), Some(4));
    assert_eq!(float("1.5e"), Some(3));
    assert_eq!(float("1.foo"), None);
    assert_eq!(float("7"), None);
}

#[test]
fn trailing_decimal_gives_back_a_digit_before_an_exponent_marker() {
    assert_eq!(trailing_decimal("12e"), Some(1));
    assert_eq!(trailing_decimal("1e"), None);
    assert_eq!(trailing_decimal("12x"), Some(2));
}

#[test]
fn literal_values() {
    let (kind, value) = literal("0x1F", Shape {
        radix: Radix::Hexadecimal,
        is_float: false,
    })
    .unwrap();
    assert_eq!(kind, TokenKind::Integer);
    assert_eq!(value.as_integer(), Some(31));

    let (kind, value) = literal("017", Shape {
        radix: Radix::Octal,
        is_float: false,
    })
    .unwrap();
    assert_eq!(kind, TokenKind::Integer);
    assert_eq!(value.as_integer(), Some(15));

    let (kind, value) = literal("3ri", DECIMAL).unwrap();
    assert_eq!(kind, TokenKind::Imaginary);
    assert_eq!(value.kind(), NumericKind::RationalImaginary);
    assert_eq!(value.as_integer(), Some(3));

    let (kind, value) = literal("+1_0.2_5e1", Shape {
        radix: Radix::Decimal,
        is_float: true,
    })
    .unwrap();
    assert_eq!(kind, TokenKind::Float);
    assert_eq!(value.as_float(), Some(102.5));

    let (_, value) = literal("0o", Shape {
        radix: Radix::Octal,
        is_float: false,
    })
    .unwrap();
    assert_eq!(value.as_integer(), Some(0));
}

#[test]
fn literal_rejects_bad_underscores() {
    assert_eq!(literal("1__0", DECIMAL), Err("Invalid numeric format"));
    assert_eq!(literal("10_", DECIMAL), Err("Trailing '_' in number."));
}

proptest! {
    #[test]
    fn decimal_round_trip(value in 1u64..u64::MAX) {
        let text = value.to_string();
        prop_assert_eq!(decimal(&text), Some(text.len()));

        let (_, literal) = literal(&text, DECIMAL).unwrap();
        prop_assert_eq!(literal.as_integer(), Some(i128::from(value)));
    }

    #[test]
    fn hexadecimal_value(value: u32) {
        let text = format!("0x{value:x}");
        prop_assert_eq!(hexadecimal(&text), Some(text.len()));

        let shape = Shape {
            radix: Radix::Hexadecimal,
            is_float: false,
        };
        let (_, literal) = literal(&text, shape).unwrap();
        prop_assert_eq!(literal.as_integer(), Some(i128::from(value)));
    }
}
