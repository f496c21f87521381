//! Conventional commit message parsing.
//!
//! Recognizes `type(scope)!: description` headers and the
//! `BREAKING CHANGE:` footer. Anything else is classified as an
//! unversioned commit carrying its first line as the message.

use monoflow_core::commit::{CommitInfo, CommitType};
use once_cell::sync::Lazy;
use regex::Regex;

// type(scope)!: description, with optional bang.
static SCOPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)\(([^)]+)\)(!?):\s*(.*)").expect("valid regex"));

// type!: description, breaking without a scope.
static BARE_BREAKING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)!:\s*(.*)").expect("valid regex"));

// type: description.
static BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z]+):\s*(.*)").expect("valid regex"));

const BREAKING_FOOTER: &str = "BREAKING CHANGE:";

/// Parses one full commit message (subject plus body) into a classified
/// commit. Never fails; unrecognized messages classify as
/// [`CommitType::Other`].
pub fn parse_commit(message: &str) -> CommitInfo {
    let footer_breaking = message.contains(BREAKING_FOOTER);

    if let Some(captures) = SCOPED.captures(message) {
        let breaking = &captures[3] == "!" || footer_breaking;
        return CommitInfo::new(CommitType::from_tag(&captures[1]), &captures[4])
            .with_scope(&captures[2])
            .with_breaking(breaking);
    }

    if let Some(captures) = BARE_BREAKING.captures(message) {
        return CommitInfo::new(CommitType::from_tag(&captures[1]), &captures[2])
            .with_breaking(true);
    }

    if let Some(captures) = BARE.captures(message) {
        return CommitInfo::new(CommitType::from_tag(&captures[1]), &captures[2])
            .with_breaking(footer_breaking);
    }

    let subject = message.lines().next().unwrap_or_default();
    CommitInfo::new(CommitType::Other, subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scoped_feat() {
        let commit = parse_commit("feat(client): add retry support");
        assert_eq!(commit.commit_type, CommitType::Feat);
        assert_eq!(commit.scope.as_deref(), Some("client"));
        assert_eq!(commit.message, "add retry support");
        assert!(!commit.breaking);
    }

    #[test]
    fn test_parse_bare_fix() {
        let commit = parse_commit("fix: handle empty input");
        assert_eq!(commit.commit_type, CommitType::Fix);
        assert_eq!(commit.scope, None);
        assert_eq!(commit.message, "handle empty input");
        assert!(!commit.breaking);
    }

    #[test]
    fn test_parse_bang_marker() {
        let commit = parse_commit("feat!: drop python 3.8");
        assert_eq!(commit.commit_type, CommitType::Feat);
        assert_eq!(commit.message, "drop python 3.8");
        assert!(commit.breaking);

        let commit = parse_commit("fix(core)!: change default ordering");
        assert_eq!(commit.commit_type, CommitType::Fix);
        assert_eq!(commit.scope.as_deref(), Some("core"));
        assert!(commit.breaking);
    }

    #[test]
    fn test_parse_breaking_footer() {
        let commit = parse_commit(
            "feat: rework config loading\n\nBREAKING CHANGE: config keys renamed",
        );
        assert_eq!(commit.commit_type, CommitType::Feat);
        assert_eq!(commit.message, "rework config loading");
        assert!(commit.breaking);
    }

    #[test]
    fn test_parse_unknown_tag() {
        let commit = parse_commit("docs: update readme");
        assert_eq!(commit.commit_type, CommitType::Other);
        assert_eq!(commit.message, "update readme");

        let commit = parse_commit("chore(deps): bump serde");
        assert_eq!(commit.commit_type, CommitType::Other);
        assert_eq!(commit.scope.as_deref(), Some("deps"));
    }

    #[test]
    fn test_parse_non_conventional() {
        let commit = parse_commit("Merge branch 'main' into develop\n\ndetails here");
        assert_eq!(commit.commit_type, CommitType::Other);
        assert_eq!(commit.message, "Merge branch 'main' into develop");
        assert!(!commit.breaking);
    }

    #[test]
    fn test_body_excluded_from_message() {
        let commit = parse_commit("fix: handle empty input\n\nlong explanation\nmore text");
        assert_eq!(commit.message, "handle empty input");
    }
}
