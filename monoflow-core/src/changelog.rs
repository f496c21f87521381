//! Changelog fragment rendering from classified commits.

use chrono::{Local, NaiveDate};
use semver::Version;

use crate::commit::{CommitInfo, CommitType};

/// Renders markdown changelog fragments.
///
/// Sections appear in a fixed order: Breaking Changes, Features, Bug
/// Fixes. Empty sections are omitted, and a breaking commit appears only
/// under Breaking Changes even when typed feat or fix. Within a section,
/// commits keep their input order.
pub struct ChangelogGenerator;

impl ChangelogGenerator {
    /// Renders the fragment for `version`, dated today.
    pub fn render_today(version: &Version, commits: &[CommitInfo]) -> String {
        Self::render(version, Local::now().date_naive(), commits)
    }

    /// Renders the fragment with an explicit release date.
    pub fn render(version: &Version, date: NaiveDate, commits: &[CommitInfo]) -> String {
        let mut lines = vec![
            format!("## {}", version),
            String::new(),
            format!("*Released on {}*", date.format("%Y-%m-%d")),
            String::new(),
        ];

        Self::push_section(
            &mut lines,
            "Breaking Changes",
            commits.iter().filter(|c| c.breaking),
        );
        Self::push_section(
            &mut lines,
            "Features",
            commits
                .iter()
                .filter(|c| c.commit_type == CommitType::Feat && !c.breaking),
        );
        Self::push_section(
            &mut lines,
            "Bug Fixes",
            commits
                .iter()
                .filter(|c| c.commit_type == CommitType::Fix && !c.breaking),
        );

        lines.join("\n")
    }

    fn push_section<'c>(
        lines: &mut Vec<String>,
        title: &str,
        commits: impl Iterator<Item = &'c CommitInfo>,
    ) {
        let entries: Vec<&CommitInfo> = commits.collect();
        if entries.is_empty() {
            return;
        }

        lines.push(format!("### {}", title));
        lines.push(String::new());
        for commit in entries {
            let scope = commit
                .scope
                .as_deref()
                .map(|s| format!("**{}:** ", s))
                .unwrap_or_default();
            lines.push(format!("- {}{}", scope, commit.message));
        }
        lines.push(String::new());
    }
}
