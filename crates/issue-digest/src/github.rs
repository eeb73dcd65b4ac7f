//! GitHub issue fetching.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};

use crate::error::FetchError;

/// GitHub REST API base URL.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("issue-digest/", env!("CARGO_PKG_VERSION"));

/// An issue as returned by `GET /repos/{org}/{repo}/issues`.
///
/// Only the fields the digest needs are decoded; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    /// Issue title.
    pub title: String,
    /// Issue body. GitHub sends `null` for issues without a description.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    /// Link to the issue on github.com.
    pub html_url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The human-facing issue list of a repository.
#[must_use]
pub fn repo_browse_url(org: &str, repo: &str) -> String {
    format!("https://github.com/{org}/{repo}/issues")
}

/// Fetches open issues from the GitHub REST API.
#[derive(Debug, Clone)]
pub struct IssueFetcher {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl IssueFetcher {
    /// Create a fetcher against api.github.com.
    ///
    /// Without a token the request is anonymous and subject to the lower
    /// unauthenticated rate limit.
    pub fn new(token: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: GITHUB_API_BASE.to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Point the fetcher at a different API host (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The REST endpoint listing the issues of `org/repo`.
    #[must_use]
    pub fn issues_url(&self, org: &str, repo: &str) -> String {
        format!("{}/repos/{org}/{repo}/issues", self.base_url)
    }

    /// Fetch the open issues of `org/repo`, in the order GitHub returns them.
    ///
    /// A 404 means the organization or repository does not exist and is
    /// reported as [`FetchError::RepoNotFound`]. Other failures are passed
    /// through.
    #[instrument(skip(self))]
    pub async fn fetch_issues(&self, org: &str, repo: &str) -> Result<Vec<Issue>, FetchError> {
        let url = self.issues_url(org, repo);
        debug!(url = %url, "Fetching issues");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::RepoNotFound {
                org: org.to_string(),
                repo: repo.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|e| e.to_string());
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let issues: Vec<Issue> = serde_json::from_str(&body)?;
        debug!(count = issues.len(), "Fetched issues");

        Ok(issues)
    }
}
