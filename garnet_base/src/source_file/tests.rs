use super::{Location, SourceFile, Span};

#[test]
fn test_get_line_byte_positions() {
    let text = "Hello\nworld\r\n!\rtes";
    let byte_positions = super::get_line_byte_positions(text);
    assert_eq!(byte_positions, vec![0..6, 6..13, 13..15, 15..18]);
}

#[test]
fn test_temp_file_round_trip() {
    const TEST_FILE: &str = "puts 'hello'\n";
    let source_file = SourceFile::temp(TEST_FILE).unwrap();
    assert_eq!(source_file.content(), TEST_FILE);
    assert!(source_file.full_path().is_some());
}

#[test]
fn test_anonymous_name() {
    let source_file = SourceFile::new("a = 1", None);
    assert_eq!(source_file.name(), super::ANONYMOUS_SOURCE_NAME);
}

#[test]
fn test_location_lookup() {
    let source_file = SourceFile::new("ab\ncd\n", None);

    assert_eq!(
        source_file.get_location(4),
        Some(Location { line: 2, column: 2 })
    );
    assert_eq!(
        source_file.get_location(6),
        Some(Location { line: 3, column: 1 })
    );
    assert_eq!(source_file.get_location(7), None);
}

#[test]
fn test_span_location_string() {
    let source_file = SourceFile::new("x\ny\n", None);
    let span = Span::new(source_file, 2, 3).unwrap();

    assert_eq!(span.str(), "y");
    assert_eq!(span.location_string(), "<input>:2");
}
