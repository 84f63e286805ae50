//! Tests for dot-notation key paths.

use super::*;

#[test]
fn test_parse_single_segment() {
    let path = KeyPath::parse("teams");

    assert_eq!(path.segments(), &["teams"]);
    assert_eq!(path.depth(), 0);
    assert!(!path.is_dotted());
    let (parents, last) = path.split_last();
    assert!(parents.is_empty());
    assert_eq!(last, "teams");
}

#[test]
fn test_parse_nested_segments() {
    let path = KeyPath::parse("auth.oauth.providers.google");

    assert_eq!(path.segments(), &["auth", "oauth", "providers", "google"]);
    assert_eq!(path.depth(), 3);
    assert!(path.is_dotted());
    assert_eq!(path.key(), "auth.oauth.providers.google");
    assert_eq!(path.to_string(), "auth.oauth.providers.google");
}

#[test]
fn test_split_last_returns_parents_and_leaf() {
    let path = KeyPath::parse("c.e.f");
    let (parents, last) = path.split_last();

    assert_eq!(parents, &["c", "e"]);
    assert_eq!(last, "f");
}

#[test]
fn test_is_shadowed_by_same_key() {
    assert!(KeyPath::parse("c.d").is_shadowed_by("c.d"));
}

#[test]
fn test_is_shadowed_by_ancestor_key() {
    let path = KeyPath::parse("c.e.f");

    assert!(path.is_shadowed_by("c"));
    assert!(path.is_shadowed_by("c.e"));
}

#[test]
fn test_is_not_shadowed_by_descendant_key() {
    // Shadow-clearing never removes ancestors of the assigned key.
    assert!(!KeyPath::parse("a").is_shadowed_by("a.b"));
}

#[test]
fn test_is_not_shadowed_by_string_prefix() {
    assert!(!KeyPath::parse("cd.e").is_shadowed_by("c"));
    assert!(!KeyPath::parse("c.ef").is_shadowed_by("c.e"));
}

#[test]
fn test_is_not_shadowed_by_sibling() {
    assert!(!KeyPath::parse("c.g").is_shadowed_by("c.e"));
}

#[test]
fn test_valid_segments() {
    for segment in ["a", "A1", "_private", "$team_admin", "team:read", "0", "x-y", "a-"] {
        assert!(is_valid_segment(segment), "expected {segment:?} to be valid");
    }
}

#[test]
fn test_invalid_segments() {
    for segment in ["", "-a", "a b", "a/b", "a.b", "ä", "a!"] {
        assert!(!is_valid_segment(segment), "expected {segment:?} to be invalid");
    }
}

#[test]
fn test_valid_keys_check_every_segment() {
    assert!(is_valid_key("a.b.c"));
    assert!(is_valid_key("rbac.permissions.team:read"));
    assert!(!is_valid_key("a..b"));
    assert!(!is_valid_key(".a"));
    assert!(!is_valid_key("a."));
    assert!(!is_valid_key("a.-b"));
    assert!(!is_valid_key(""));
}

#[test]
fn test_dot_count() {
    assert_eq!(dot_count("a"), 0);
    assert_eq!(dot_count("a.b"), 1);
    assert_eq!(dot_count("k.l.m"), 2);
}
