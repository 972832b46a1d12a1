//! Blocking GitHub REST client.
//!
//! # Responsibility
//! - Implement `RepositoryMetadataProvider` and `RepositoryTreeProvider`
//!   over the GitHub v3 API.
//! - Map transport/status/decoding failures to `ProviderError`.
//!
//! # Invariants
//! - Every request is bounded by `GithubConfig::timeout`.
//! - The contributor count issues exactly one request (`per_page=1`).

use crate::github::config::GithubConfig;
use crate::github::metadata::{last_page_from_link, RepositoryInfo, RepositoryMetadataProvider};
use crate::github::repo_url::RepoName;
use crate::github::{ProviderError, ProviderResult};
use crate::model::file::{FileKind, NewFileEntry};
use crate::snapshot::{RepositoryTreeProvider, TreeListing};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;
use url::Url;

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    description: Option<String>,
    stargazers_count: i64,
    forks_count: i64,
    owner: OwnerPayload,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreePayload {
    #[serde(default)]
    truncated: bool,
    tree: Vec<TreeEntryPayload>,
}

#[derive(Debug, Deserialize)]
struct TreeEntryPayload {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    size: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// GitHub API client shared by metadata and tree lookups.
pub struct GithubClient {
    agent: ureq::Agent,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build();
        Self { agent, config }
    }

    fn endpoint(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|err| {
            ProviderError::Transport(format!(
                "invalid api base url `{}`: {err}",
                self.config.api_base_url
            ))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::Transport(format!(
                    "api base url `{}` cannot carry a path",
                    self.config.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: &Url, query: &[(&str, &str)]) -> ProviderResult<ureq::Response> {
        let started_at = Instant::now();
        let mut request = self
            .agent
            .get(url.as_str())
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = self.config.token.as_deref() {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        for (key, value) in query {
            request = request.query(key, value);
        }

        let result = request.call();
        debug!(
            "event=http_get module=github path={} duration_ms={}",
            url.path(),
            started_at.elapsed().as_millis()
        );

        match result {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                let message = serde_json::from_str::<ErrorPayload>(&body)
                    .map(|payload| payload.message)
                    .unwrap_or(body);
                Err(ProviderError::Status { code, message })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(ProviderError::Transport(transport.to_string()))
            }
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        self.get(url, query)?
            .into_json::<T>()
            .map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

impl RepositoryMetadataProvider for GithubClient {
    fn repository(&self, repo: &RepoName) -> ProviderResult<RepositoryInfo> {
        let url = self.endpoint(&["repos", repo.owner.as_str(), repo.name.as_str()])?;
        let payload: RepositoryPayload = self.get_json(&url, &[])?;
        Ok(RepositoryInfo {
            avatar: payload.owner.avatar_url,
            description: payload.description,
            stars_count: payload.stargazers_count,
            forks_count: payload.forks_count,
        })
    }

    fn contributors_count(&self, repo: &RepoName) -> ProviderResult<i64> {
        let url = self.endpoint(&[
            "repos",
            repo.owner.as_str(),
            repo.name.as_str(),
            "contributors",
        ])?;
        let response = self.get(&url, &[("per_page", "1")])?;

        // Empty repositories answer 204 without a body.
        if response.status() == 204 {
            return Ok(0);
        }
        if let Some(count) = response.header("link").and_then(last_page_from_link) {
            return Ok(count);
        }

        let page: Vec<serde_json::Value> = response
            .into_json()
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        Ok(page.len() as i64)
    }
}

impl RepositoryTreeProvider for GithubClient {
    fn list_tree(&self, repo: &RepoName, branch: &str) -> ProviderResult<TreeListing> {
        let url = self.endpoint(&[
            "repos",
            repo.owner.as_str(),
            repo.name.as_str(),
            "git",
            "trees",
            branch,
        ])?;
        let payload: TreePayload = self.get_json(&url, &[("recursive", "1")])?;
        let entries = payload
            .tree
            .into_iter()
            .map(|entry| {
                let kind = FileKind::parse(&entry.kind).ok_or_else(|| {
                    ProviderError::Decode(format!(
                        "unknown tree entry type `{}` at `{}`",
                        entry.kind, entry.path
                    ))
                })?;
                Ok(NewFileEntry {
                    path: entry.path,
                    kind,
                    sha: entry.sha,
                    size: entry.size,
                })
            })
            .collect::<ProviderResult<Vec<_>>>()?;

        Ok(TreeListing {
            entries,
            truncated: payload.truncated,
        })
    }
}
