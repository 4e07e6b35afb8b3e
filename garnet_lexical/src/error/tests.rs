use garnet_base::source_file::{SourceFile, Span};

use super::{CompileError, Error, ScanFault, Warning, WarningKind};

#[test]
fn location_is_name_and_line() {
    let source_file = SourceFile::new("a = 1\nb = 019\n", None);
    let span = Span::new(source_file, 10, 13).unwrap();
    let error = Error::from(CompileError::new("Illegal octal digit.", span));

    assert_eq!(error.message(), "Illegal octal digit.");
    assert_eq!(error.location(), "<input>:2");
    assert!(error.as_compile_error().is_some());
}

#[test]
fn display_includes_message_and_source_line() {
    let source_file = SourceFile::new("x = @1\n", None);
    let span = Span::new(source_file, 4, 6).unwrap();

    let rendered = Error::from(ScanFault::new("can not match (\"@1\")", span)).to_string();
    assert!(rendered.contains("can not match"));
    assert!(rendered.contains("<input>:1:5"));
}

#[test]
fn warning_messages() {
    let source_file = SourceFile::new("foo -1", None);
    let span = Span::new(source_file, 4, 5).unwrap();

    let warning = Warning::new(WarningKind::AmbiguousFirstArgument, span);
    assert_eq!(
        warning.kind().to_string(),
        "ambiguous first argument; make sure"
    );
    assert_eq!(
        WarningKind::ArgumentPrefix("**").to_string(),
        "`**' interpreted as argument prefix"
    );
    assert_eq!(
        WarningKind::InvalidCharacterSyntax('n').to_string(),
        "invalid character syntax; use ?\\n"
    );
}
