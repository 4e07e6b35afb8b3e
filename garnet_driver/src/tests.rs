use std::path::PathBuf;

use clap::Parser;

use garnet_base::diagnostic::Handler;

use super::{Argument, Printer};
use crate::registry::Version;

#[test]
fn default_grammar_test() {
    let argument = Argument::try_parse_from(["garnet", "main.rb"]).unwrap();

    assert_eq!(argument.file, Some(PathBuf::from("main.rb")));
    assert_eq!(argument.grammar, Version::RUBY19);
    assert!(!argument.list_versions);
}

#[test]
fn grammar_option_test() {
    for (input, version) in [("18", 18), ("V18", 18), ("Ruby19", 19)] {
        let argument =
            Argument::try_parse_from(["garnet", "main.rb", "--grammar", input]).unwrap();

        assert_eq!(argument.grammar, Version(version));
    }

    assert!(Argument::try_parse_from(["garnet", "main.rb", "--grammar", "1.9"]).is_err());
}

#[test]
fn list_versions_without_file_test() {
    let argument = Argument::try_parse_from(["garnet", "--list-versions"]).unwrap();

    assert!(argument.list_versions);
    assert_eq!(argument.file, None);

    assert!(Argument::try_parse_from(["garnet"]).is_err());
}

#[test]
fn printer_counts_messages_test() {
    let printer = Printer::default();
    assert_eq!(printer.printed(), 0);

    printer.receive("first");
    printer.receive(2);
    assert_eq!(printer.printed(), 2);
}
