use proptest::{prop_assert_eq, proptest};

use super::{standard_pairings, Error, Pairing, Registry, Version};
use crate::grammar::TokenDump;
use garnet_lexical::capability::Capabilities;

#[test]
fn standard_registry_test() {
    let registry = Registry::standard().unwrap();

    assert_eq!(registry.versions(), vec![Version::RUBY18, Version::RUBY19]);
    assert_eq!(
        registry.get(Version::RUBY18).map(Pairing::capabilities),
        Some(Capabilities::RUBY18)
    );
    assert_eq!(
        registry.get(Version::RUBY19).map(Pairing::capabilities),
        Some(Capabilities::RUBY19)
    );
    assert_eq!(registry.get(Version::RUBY19).map(Pairing::name), Some("Ruby19"));
    assert!(registry.get(Version(20)).is_none());
}

#[test]
fn versions_are_ascending_test() {
    let registry = Registry::with_pairings([
        Pairing::new(Version(19), "Test", Capabilities::RUBY19, TokenDump::boxed),
        Pairing::new(Version(3), "Test", Capabilities::RUBY18, TokenDump::boxed),
        Pairing::new(Version(18), "Test", Capabilities::RUBY18, TokenDump::boxed),
    ])
    .unwrap();

    assert_eq!(registry.versions(), vec![Version(3), Version(18), Version(19)]);
}

#[test]
fn duplicate_version_test() {
    let result = Registry::with_pairings([
        Pairing::new(Version(18), "Test", Capabilities::RUBY18, TokenDump::boxed),
        Pairing::new(Version(18), "Test", Capabilities::RUBY19, TokenDump::boxed),
    ]);

    assert_eq!(result.unwrap_err(), Error::DuplicateVersion(Version(18)));

    let mut registry = Registry::standard().unwrap();
    let duplicate = Pairing::new(Version::RUBY19, "Test", Capabilities::RUBY19, TokenDump::boxed);
    assert!(registry.register(duplicate).is_err());
    assert_eq!(registry.versions().len(), 2);
}

#[test]
fn repeated_standard_pairings_test() {
    let pairings = standard_pairings().into_iter().chain(standard_pairings());
    let error = Registry::with_pairings(pairings).unwrap_err();

    assert_eq!(error, Error::DuplicateVersion(Version::RUBY18));
    assert_eq!(error.to_string(), "grammar version 18 is registered twice");
}

#[test]
fn invalid_version_test() {
    for input in ["", "V", "Ruby", "1.9", "nineteen", "-18", "19a"] {
        assert_eq!(
            input.parse::<Version>(),
            Err(Error::InvalidVersion(input.to_owned())),
            "{input:?}"
        );
    }
}

proptest! {
    #[test]
    fn version_prefix_test(number in 0u32..10_000, prefix in "(v|V|ruby|Ruby|RUBY)?") {
        let input = format!("{prefix}{number}");

        prop_assert_eq!(input.parse::<Version>(), Ok(Version(number)));
        prop_assert_eq!(Version(number).to_string(), number.to_string());
    }
}
