mod gh;

#[cfg(test)]
pub mod fake;

pub use gh::GhCli;

use crate::error::GitHubError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub html_url: String,
    pub head_ref: String,
    pub base_ref: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
}

impl PullRequest {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepoInfo {
    pub default_branch: String,
    pub has_issues: bool,
}

/// The slice of the GitHub API the release tasks need
#[async_trait]
pub trait GitHub: Send + Sync {
    async fn repository(&self) -> Result<RepoInfo, GitHubError>;

    /// Most recent pull request (any state) whose head is `branch`
    async fn pull_request_for_branch(
        &self,
        branch: &str,
    ) -> Result<Option<PullRequest>, GitHubError>;

    /// All pull requests (any state) targeting `base`, oldest first
    async fn pull_requests_into(&self, base: &str) -> Result<Vec<PullRequest>, GitHubError>;

    async fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest, GitHubError>;

    async fn update_pull_request_body(&self, number: u64, body: &str)
        -> Result<(), GitHubError>;

    async fn add_label(&self, number: u64, label: &str) -> Result<(), GitHubError>;

    async fn issue_title(&self, number: u64) -> Result<Option<String>, GitHubError>;

    async fn tags(&self) -> Result<Vec<String>, GitHubError>;

    /// Commit date of the commit a tag points at
    async fn tag_date(&self, tag: &str) -> Result<Option<DateTime<Utc>>, GitHubError>;

    async fn release_by_tag(&self, tag: &str) -> Result<Option<Release>, GitHubError>;

    async fn create_release(
        &self,
        tag: &str,
        name: &str,
        body: &str,
        prerelease: bool,
    ) -> Result<Release, GitHubError>;

    async fn update_release_body(&self, id: u64, body: &str) -> Result<(), GitHubError>;
}
