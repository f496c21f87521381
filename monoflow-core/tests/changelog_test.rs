use chrono::NaiveDate;
use monoflow_core::changelog::ChangelogGenerator;
use monoflow_core::commit::{CommitInfo, CommitType};
use semver::Version;

fn release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

#[test]
fn test_full_fragment_layout() {
    let commits = vec![
        CommitInfo::new(CommitType::Feat, "drop python 3.8").with_breaking(true),
        CommitInfo::new(CommitType::Feat, "add retry support").with_scope("client"),
        CommitInfo::new(CommitType::Fix, "handle empty input"),
    ];

    let fragment = ChangelogGenerator::render(
        &Version::parse("2.0.0").unwrap(),
        release_date(),
        &commits,
    );

    let expected = "\
## 2.0.0

*Released on 2024-03-05*

### Breaking Changes

- drop python 3.8

### Features

- **client:** add retry support

### Bug Fixes

- handle empty input
";
    assert_eq!(fragment, expected);
}

#[test]
fn test_breaking_commit_appears_once() {
    let commits = vec![CommitInfo::new(CommitType::Feat, "rework config").with_breaking(true)];

    let fragment = ChangelogGenerator::render(
        &Version::parse("2.0.0").unwrap(),
        release_date(),
        &commits,
    );

    assert!(fragment.contains("### Breaking Changes"));
    assert!(!fragment.contains("### Features"));
    assert_eq!(fragment.matches("rework config").count(), 1);
}

#[test]
fn test_empty_sections_omitted() {
    let commits = vec![CommitInfo::new(CommitType::Fix, "handle empty input")];

    let fragment = ChangelogGenerator::render(
        &Version::parse("1.0.1").unwrap(),
        release_date(),
        &commits,
    );

    assert!(fragment.contains("### Bug Fixes"));
    assert!(!fragment.contains("### Features"));
    assert!(!fragment.contains("### Breaking Changes"));
}

#[test]
fn test_scope_renders_bold() {
    let commits = vec![CommitInfo::new(CommitType::Fix, "quote paths").with_scope("cli")];

    let fragment = ChangelogGenerator::render(
        &Version::parse("1.0.1").unwrap(),
        release_date(),
        &commits,
    );

    assert!(fragment.contains("- **cli:** quote paths"));
}

#[test]
fn test_commits_keep_input_order() {
    let commits = vec![
        CommitInfo::new(CommitType::Fix, "first fix"),
        CommitInfo::new(CommitType::Fix, "second fix"),
    ];

    let fragment = ChangelogGenerator::render(
        &Version::parse("1.0.1").unwrap(),
        release_date(),
        &commits,
    );

    let first = fragment.find("first fix").unwrap();
    let second = fragment.find("second fix").unwrap();
    assert!(first < second);
}

#[test]
fn test_no_commits_renders_header_only() {
    let fragment =
        ChangelogGenerator::render(&Version::parse("1.0.0").unwrap(), release_date(), &[]);

    assert_eq!(fragment, "## 1.0.0\n\n*Released on 2024-03-05*\n");
}

#[test]
fn test_other_commits_do_not_render() {
    let commits = vec![
        CommitInfo::new(CommitType::Other, "update CI matrix"),
        CommitInfo::new(CommitType::Fix, "handle empty input"),
    ];

    let fragment = ChangelogGenerator::render(
        &Version::parse("1.0.1").unwrap(),
        release_date(),
        &commits,
    );

    assert!(!fragment.contains("update CI matrix"));
    assert!(fragment.contains("handle empty input"));
}
