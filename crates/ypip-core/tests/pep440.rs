use std::str::FromStr;

use ypip_core::specifier::{Operator, Specifier};
use ypip_core::version::Version;

fn v(s: &str) -> Version {
    Version::from_str(s).unwrap()
}

#[test]
fn equal_releases_with_trailing_zeros() {
    assert_eq!(v("1.2"), v("1.2.0"));
}

#[test]
fn post_release_outranks_release() {
    assert!(v("1") < v("1.post1"));
}

#[test]
fn dev_release_is_below_release() {
    assert!(v("1.dev1") < v("1"));
}

#[test]
fn local_outranks_release() {
    assert!(v("1") < v("1+local"));
}

#[test]
fn every_parseable_version_equals_itself() {
    for s in ["0", "1.0", "v2.0b3", "1!1.0.post1.dev2+ubuntu.1", "2013.10.5-1"] {
        assert_eq!(v(s), v(s), "{s}");
    }
}

#[test]
fn sorting_a_release_history() {
    let mut versions: Vec<Version> = [
        "1.1", "1.0.post1", "1.0", "1.0rc1", "1.0b2", "1.0a1", "1.0.dev0", "0.9", "1!0.1",
    ]
    .iter()
    .map(|s| v(s))
    .collect();
    versions.sort();
    let sorted: Vec<String> = versions.iter().map(Version::to_string).collect();
    assert_eq!(
        sorted,
        [
            "0.9", "1.0.dev0", "1.0a1", "1.0b2", "1.0rc1", "1.0", "1.0.post1", "1.1", "1!0.1"
        ]
    );
}

#[test]
fn specifier_from_str_exposes_clauses() {
    let spec = Specifier::from_str(">= 1.0, != 1.2.*").unwrap();
    let clauses = spec.clauses();
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0].operator(), Operator::GreaterThanEqual);
    assert_eq!(clauses[0].version(), &v("1.0"));
    assert!(!clauses[0].wildcard());
    assert_eq!(clauses[1].operator(), Operator::NotEqual);
    assert!(clauses[1].wildcard());
}

#[test]
fn specifier_selects_from_candidates() {
    let spec = Specifier::from_str("~= 1.4.2, != 1.4.5").unwrap();
    let chosen: Vec<String> = ["1.4.1", "1.4.2", "1.4.5", "1.4.9", "1.5.0"]
        .iter()
        .map(|s| v(s))
        .filter(|candidate| spec.contains(candidate))
        .map(|candidate| candidate.to_string())
        .collect();
    assert_eq!(chosen, ["1.4.2", "1.4.9"]);
}
