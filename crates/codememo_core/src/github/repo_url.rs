//! Repository URL parsing.
//!
//! Accepts `http(s)://github.com/owner/name[.git][/...]` and yields
//! `owner/name`. Trailing path segments (`/tree/main/src`) are ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

const GITHUB_WEB_HOSTS: &[&str] = &["github.com", "www.github.com"];

static OWNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,38})$").expect("valid owner regex")
});
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]{1,100}$").expect("valid name regex"));

/// Parsed `owner/name` identifier of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl Display for RepoName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Rejected repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrlError {
    pub input: String,
    pub reason: &'static str,
}

impl Display for RepoUrlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid repository url `{}`: {}", self.input, self.reason)
    }
}

impl Error for RepoUrlError {}

/// Extracts `owner/name` from a repository URL.
pub fn parse_repo_name(input: &str) -> Result<RepoName, RepoUrlError> {
    let fail = |reason| RepoUrlError {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(fail("url is empty"));
    }

    let parsed = Url::parse(trimmed).map_err(|_| fail("not an absolute url"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(fail("scheme must be http or https"));
    }
    let host = parsed.host_str().ok_or_else(|| fail("url has no host"))?;
    if !GITHUB_WEB_HOSTS.contains(&host) {
        return Err(fail("host is not github.com"));
    }

    let mut segments = parsed
        .path_segments()
        .ok_or_else(|| fail("url has no path"))?
        .filter(|segment| !segment.is_empty());
    let owner = segments.next().ok_or_else(|| fail("missing owner"))?;
    let raw_name = segments.next().ok_or_else(|| fail("missing repository name"))?;
    let name = raw_name.strip_suffix(".git").unwrap_or(raw_name);

    if !OWNER_RE.is_match(owner) {
        return Err(fail("owner contains unsupported characters"));
    }
    if !NAME_RE.is_match(name) || name == "." || name == ".." {
        return Err(fail("repository name contains unsupported characters"));
    }

    Ok(RepoName {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::parse_repo_name;

    #[test]
    fn parses_plain_repository_url() {
        let repo = parse_repo_name("https://github.com/acme/widget").unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "widget");
        assert_eq!(repo.to_string(), "acme/widget");
    }

    #[test]
    fn strips_git_suffix_trailing_slash_and_extra_segments() {
        assert_eq!(
            parse_repo_name("https://github.com/acme/widget.git")
                .unwrap()
                .to_string(),
            "acme/widget"
        );
        assert_eq!(
            parse_repo_name(" https://github.com/acme/widget/ ")
                .unwrap()
                .to_string(),
            "acme/widget"
        );
        assert_eq!(
            parse_repo_name("https://github.com/acme/widget/tree/main/src")
                .unwrap()
                .to_string(),
            "acme/widget"
        );
    }

    #[test]
    fn rejects_malformed_urls() {
        for input in [
            "",
            "acme/widget",
            "ftp://github.com/acme/widget",
            "https://github.com/acme",
            "https://github.com/",
            "https://github.com/ac me/widget",
            "https://github.com/-acme/widget",
            "https://github.com/acme/..",
            "https://gitlab.com/acme/widget",
            "https://example.org/acme/widget",
            "https://github.com.evil.example/acme/widget",
        ] {
            assert!(parse_repo_name(input).is_err(), "accepted `{input}`");
        }
    }

    #[test]
    fn accepts_www_and_mixed_case_host() {
        assert_eq!(
            parse_repo_name("https://www.github.com/acme/widget")
                .unwrap()
                .to_string(),
            "acme/widget"
        );
        assert_eq!(
            parse_repo_name("http://GitHub.com/acme/widget")
                .unwrap()
                .to_string(),
            "acme/widget"
        );
    }

    #[test]
    fn foreign_host_is_named_in_the_error() {
        let err = parse_repo_name("https://gitlab.com/acme/widget").unwrap_err();
        assert_eq!(err.reason, "host is not github.com");
    }

    #[test]
    fn error_message_names_the_input() {
        let err = parse_repo_name("not a url").unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }
}
