use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Titles of the generated version-bump pull requests that are never notified
const RELEASE_BOOKKEEPING_TITLES: [&str; 2] = [
    "chore: update version for release",
    "chore: update version for release (pre)",
];

/// A merged pull request together with the issues it closes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPullRequest {
    pub number: u64,
    pub issues: BTreeSet<u64>,
}

impl MergedPullRequest {
    pub fn new(number: u64, issues: impl IntoIterator<Item = u64>) -> Self {
        MergedPullRequest {
            number,
            issues: issues.into_iter().collect(),
        }
    }
}

/// Whether a pull request title marks a generated release version bump
pub fn is_release_bookkeeping(title: &str) -> bool {
    let title = title.trim();
    RELEASE_BOOKKEEPING_TITLES
        .iter()
        .any(|known| title.eq_ignore_ascii_case(known))
}

/// Closing keyword followed by an issue reference, e.g. `Fixes: #12`
static CLOSING_KEYWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:close[sd]?|fix(?:e[sd])?|resolve[sd]?):?\s+#(\d+)")
        .expect("Invalid regex")
});

/// Extract every issue referenced by a closing keyword in a pull request body.
///
/// Matches `close`, `closes`, `closed`, `fix`, `fixes`, `fixed`, `resolve`,
/// `resolves` and `resolved` (any case, optional colon) followed by
/// whitespace and `#<number>`.
pub fn scan_closing_issues(body: &str) -> BTreeSet<u64> {
    CLOSING_KEYWORD_REGEX
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_multiple_keywords() {
        let issues = scan_closing_issues("Fixes #12 and resolves #34");
        assert_eq!(issues, BTreeSet::from([12, 34]));
    }

    #[test]
    fn test_scan_is_case_insensitive() {
        assert_eq!(scan_closing_issues("CLOSES #7"), BTreeSet::from([7]));
        assert_eq!(scan_closing_issues("fIxEd #8"), BTreeSet::from([8]));
    }

    #[test]
    fn test_scan_all_keyword_forms() {
        let body = "close #1\ncloses #2\nclosed #3\nfix #4\nfixes #5\nfixed #6\n\
                    resolve #7\nresolves #8\nresolved #9";
        assert_eq!(scan_closing_issues(body), (1..=9).collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_scan_optional_colon() {
        assert_eq!(scan_closing_issues("Closes: #123"), BTreeSet::from([123]));
    }

    #[test]
    fn test_scan_requires_whitespace_and_hash() {
        assert!(scan_closing_issues("fixes#12").is_empty());
        assert!(scan_closing_issues("fixes 12").is_empty());
        assert!(scan_closing_issues("see #12").is_empty());
    }

    #[test]
    fn test_scan_ignores_keywords_inside_words() {
        assert!(scan_closing_issues("prefix #3").is_empty());
    }

    #[test]
    fn test_scan_dedupes() {
        assert_eq!(
            scan_closing_issues("Fixes #5. Also fixes #5 again."),
            BTreeSet::from([5])
        );
    }

    #[test]
    fn test_scan_empty_body() {
        assert!(scan_closing_issues("").is_empty());
    }

    #[test]
    fn test_bookkeeping_titles() {
        assert!(is_release_bookkeeping("chore: update version for release"));
        assert!(is_release_bookkeeping("Chore: Update Version For Release"));
        assert!(is_release_bookkeeping("chore: update version for release (pre)"));
        assert!(!is_release_bookkeeping("chore: update version for release notes"));
        assert!(!is_release_bookkeeping("fix: router crash"));
    }

    #[test]
    fn test_merged_pull_request_dedupes_issues() {
        let pr = MergedPullRequest::new(10, [5, 3, 5]);
        assert_eq!(pr.issues, BTreeSet::from([3, 5]));
    }
}
