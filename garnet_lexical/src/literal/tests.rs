use super::{Heredoc, HeredocIndent, LiteralContext, LiteralKind, LiteralStack, Suspension};

#[test]
fn suspended_context_is_not_active() {
    let mut stack = LiteralStack::new();
    assert!(!stack.is_active());

    stack.push(LiteralContext::delimited(LiteralKind::String, None, '"', true));
    assert!(stack.is_active());

    if let Some(top) = stack.top_mut() {
        top.suspension = Some(Suspension::Embedded(0));
    }
    assert!(!stack.is_active());
    assert!(stack.is_embedded_at(0));
    assert!(!stack.is_embedded_at(1));
}

#[test]
fn delimiters_and_heredoc_accessors() {
    let paren = LiteralContext::delimited(LiteralKind::String, Some('('), ')', false).with_words();
    assert_eq!(paren.opener(), Some('('));
    assert_eq!(paren.closer(), Some(')'));
    assert!(paren.words);
    assert!(paren.as_heredoc().is_none());

    let heredoc = LiteralContext::heredoc(
        Heredoc {
            tag: "EOS".to_string(),
            indent: HeredocIndent::Squiggly,
            dedent: 2,
            resume_position: 7,
            resume_line: 1,
        },
        true,
    );
    assert_eq!(heredoc.kind, LiteralKind::Heredoc);
    assert_eq!(heredoc.closer(), None);
    assert_eq!(heredoc.as_heredoc().map(|h| h.tag.as_str()), Some("EOS"));
}
