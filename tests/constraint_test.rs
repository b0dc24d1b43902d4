// tests/constraint_test.rs
use git_import::domain::{ResolvedRef, TagSelector, Version, VersionConstraint};
use git_import::GitImportError;

fn v(s: &str) -> Version {
    Version::parse(s).expect("valid version")
}

#[test]
fn test_pessimistic_operator_bounds() {
    for a in 0..4u64 {
        for b in 1..5u64 {
            for c in 0..4u64 {
                let constraint = VersionConstraint::parse(&format!("~> {}.{}.{}", a, b, c)).unwrap();

                assert!(constraint.matches(&v(&format!("{}.{}.{}", a, b, c))));
                assert!(constraint.matches(&v(&format!("{}.{}.{}", a, b, c + 1))));
                assert!(!constraint.matches(&v(&format!("{}.{}.0", a, b + 1))));
                assert!(!constraint.matches(&v(&format!("{}.{}.{}", a, b - 1, c))));
            }
        }
    }
}

#[test]
fn test_selector_returns_last_match_not_maximum() {
    let constraint = VersionConstraint::parse(">= 1.0, < 3.0").unwrap();
    let lists: Vec<Vec<&str>> = vec![
        vec!["v2.5.0", "v1.0.0"],
        vec!["v1.0.0", "v2.9.9", "v3.0.0", "v1.5.0"],
        vec!["v2.0.0", "nightly", "v0.1.0", "v1.1.0", "v0.2.0"],
    ];
    let expected = ["v1.0.0", "v1.5.0", "v1.1.0"];

    for (tags, expected) in lists.iter().zip(expected) {
        let selected = TagSelector::new(&constraint).select(tags).unwrap();
        assert_eq!(selected, ResolvedRef::Tag(expected.to_string()));
    }
}

#[test]
fn test_selector_fails_when_nothing_matches() {
    let constraint = VersionConstraint::parse("~> 9.0").unwrap();
    let lists: Vec<Vec<&str>> = vec![
        vec!["v1.0.0"],
        vec!["latest", "stable"],
        vec!["v8.9.9", "v10.0.0", "v1.0.0"],
    ];

    for tags in lists {
        let result = TagSelector::new(&constraint).select(&tags);
        assert!(
            matches!(result, Err(GitImportError::NoMatchingTag { .. })),
            "{:?} should not match",
            tags
        );
    }
}

#[test]
fn test_end_to_end_tag_resolution() {
    let constraint: VersionConstraint = "~> 1.0.0".parse().unwrap();
    let tags = ["v0.9.0", "v1.0.0", "v1.0.1", "v1.1.0"];

    let selected = TagSelector::new(&constraint).select(&tags).unwrap();
    assert_eq!(selected.as_str(), "v1.0.1");
}

#[test]
fn test_prerelease_tags_participate() {
    let constraint = VersionConstraint::parse("~> 2.0").unwrap();
    let tags = ["v2.0.0", "v2.1.0-rc.1", "v3.0.0"];

    let selected = TagSelector::new(&constraint).select(&tags).unwrap();
    assert_eq!(selected.as_str(), "v2.1.0-rc.1");
}

#[test]
fn test_pessimistic_skips_prerelease_of_next_version() {
    let constraint = VersionConstraint::parse("~> 1.0").unwrap();
    let tags = ["v1.0.0", "v1.5.0", "v2.0.0-rc.1"];

    let selected = TagSelector::new(&constraint).select(&tags).unwrap();
    assert_eq!(selected.as_str(), "v1.5.0");

    let constraint = VersionConstraint::parse("~> 1.2.3").unwrap();
    let tags = ["v1.2.3", "v1.2.9", "v1.3.0-rc.1"];

    let selected = TagSelector::new(&constraint).select(&tags).unwrap();
    assert_eq!(selected.as_str(), "v1.2.9");
}
