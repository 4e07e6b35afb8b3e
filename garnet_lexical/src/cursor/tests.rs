use garnet_base::source_file::SourceFile;

use super::Cursor;

fn digits(input: &str) -> Option<usize> {
    let len = input.bytes().take_while(u8::is_ascii_digit).count();
    (len > 0).then_some(len)
}

#[test]
fn take_consumes_only_on_match() {
    let mut cursor = Cursor::new(SourceFile::new("123abc", None));

    assert_eq!(cursor.take("abc"), None);
    assert_eq!(cursor.position(), 0);
    assert_eq!(cursor.take(digits).as_deref(), Some("123"));
    assert_eq!(cursor.peek('a'), Some("a"));
    assert!(cursor.skip("abc"));
    assert!(cursor.at_end());
    assert_eq!(cursor.bump(), None);
}

#[test]
fn advance_counts_lines() {
    let mut cursor = Cursor::new(SourceFile::new("a\nb\r\nc", None));
    assert!(cursor.is_beginning_of_line());

    cursor.advance(2);
    assert_eq!(cursor.line(), 2);
    assert!(cursor.is_beginning_of_line());

    cursor.advance(1);
    assert!(!cursor.is_beginning_of_line());
    assert_eq!(cursor.end_of_line(), 5);

    cursor.advance(100);
    assert_eq!(cursor.line(), 3);
    assert!(cursor.at_end());
}

#[test]
fn jump_restores_position_and_line() {
    let mut cursor = Cursor::new(SourceFile::new("x <<A\nbody\nA\n", None));
    cursor.advance(5);
    let (position, line) = (cursor.position(), cursor.line());

    cursor.advance(7);
    assert_eq!(cursor.line(), 3);

    cursor.jump(position, line);
    assert_eq!(cursor.remainder(), "\nbody\nA\n");
    assert_eq!(cursor.line(), 1);
}

#[test]
fn span_from_covers_consumed_text() {
    let mut cursor = Cursor::new(SourceFile::new("foo bar", None));
    cursor.advance(4);
    let start = cursor.position();
    cursor.advance(3);

    assert_eq!(cursor.span_from(start).str(), "bar");
}
