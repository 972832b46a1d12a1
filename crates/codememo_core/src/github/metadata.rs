//! Repository metadata fetch with contributor-count fallback.
//!
//! # Invariants
//! - Contributor counting costs one single-page request at most.
//! - A failed contributor lookup never fails the fetch; it yields
//!   `CONTRIBUTORS_COUNT_FALLBACK` instead.
//! - Any failure of the repository lookup itself is returned unchanged.

use crate::github::repo_url::RepoName;
use crate::github::ProviderResult;
use log::warn;
use url::Url;

/// Stand-in contributor count used when the lookup fails (rate limits,
/// repositories too large for the contributors endpoint, transient errors).
pub const CONTRIBUTORS_COUNT_FALLBACK: i64 = 10_000;

/// Repository fields read from the main repository lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub avatar: Option<String>,
    pub description: Option<String>,
    pub stars_count: i64,
    pub forks_count: i64,
}

/// Metadata stored on a note at import time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    pub avatar: Option<String>,
    pub description: Option<String>,
    pub contributors_count: i64,
    pub stars_count: i64,
    pub forks_count: i64,
}

/// Contract of a repository hosting API.
pub trait RepositoryMetadataProvider {
    /// Looks up owner avatar, description, stars and forks.
    fn repository(&self, repo: &RepoName) -> ProviderResult<RepositoryInfo>;
    /// Counts contributors using at most one page request.
    fn contributors_count(&self, repo: &RepoName) -> ProviderResult<i64>;
}

impl<T: RepositoryMetadataProvider + ?Sized> RepositoryMetadataProvider for &T {
    fn repository(&self, repo: &RepoName) -> ProviderResult<RepositoryInfo> {
        (**self).repository(repo)
    }

    fn contributors_count(&self, repo: &RepoName) -> ProviderResult<i64> {
        (**self).contributors_count(repo)
    }
}

/// Fetches all note metadata for one repository.
pub fn fetch_metadata<P>(provider: &P, repo: &RepoName) -> ProviderResult<RepositoryMetadata>
where
    P: RepositoryMetadataProvider + ?Sized,
{
    let info = provider.repository(repo)?;

    let contributors_count = match provider.contributors_count(repo) {
        Ok(count) => count,
        Err(err) => {
            warn!(
                "event=metadata_fetch module=github status=fallback repo={} field=contributors_count fallback={} error={}",
                repo, CONTRIBUTORS_COUNT_FALLBACK, err
            );
            CONTRIBUTORS_COUNT_FALLBACK
        }
    };

    Ok(RepositoryMetadata {
        avatar: info.avatar,
        description: info.description,
        contributors_count,
        stars_count: info.stars_count,
        forks_count: info.forks_count,
    })
}

/// Reads the `page` number of the `rel="last"` link from a `Link` header.
///
/// With `per_page=1` this number equals the total item count.
pub fn last_page_from_link(header: &str) -> Option<i64> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_last = pieces.any(|param| {
            let param = param.trim();
            param == "rel=\"last\"" || param == "rel=last"
        });
        if !is_last {
            return None;
        }

        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target)
            .ok()?
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<i64>().ok())
    })
}
