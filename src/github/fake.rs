//! In-memory GitHub for tests

use super::{GitHub, PullRequest, Release, RepoInfo};
use crate::error::GitHubError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    pulls: Vec<PullRequest>,
    releases: Vec<Release>,
    calls: Vec<String>,
}

pub struct FakeGitHub {
    pub repo: RepoInfo,
    pub tags: Vec<(String, DateTime<Utc>)>,
    pub issues: HashMap<u64, String>,
    state: Mutex<State>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self {
            repo: RepoInfo {
                default_branch: "main".to_string(),
                has_issues: true,
            },
            tags: Vec::new(),
            issues: HashMap::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_pull(self, pr: PullRequest) -> Self {
        self.state.lock().unwrap().pulls.push(pr);
        self
    }

    pub fn with_tag(mut self, name: &str, date: &str) -> Self {
        self.tags.push((name.to_string(), date.parse().unwrap()));
        self
    }

    pub fn with_issue(mut self, number: u64, title: &str) -> Self {
        self.issues.insert(number, title.to_string());
        self
    }

    pub fn with_release(self, release: Release) -> Self {
        self.state.lock().unwrap().releases.push(release);
        self
    }

    pub fn pull(&self, number: u64) -> Option<PullRequest> {
        let state = self.state.lock().unwrap();
        state.pulls.iter().find(|p| p.number == number).cloned()
    }

    pub fn pulls(&self) -> Vec<PullRequest> {
        self.state.lock().unwrap().pulls.clone()
    }

    pub fn releases(&self) -> Vec<Release> {
        self.state.lock().unwrap().releases.clone()
    }

    /// Names of the API operations invoked so far
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: &str) {
        self.state.lock().unwrap().calls.push(call.to_string());
    }
}

/// Pull request fixture; `merged_at` is RFC 3339 or None for unmerged
pub fn pull(
    number: u64,
    head: &str,
    base: &str,
    body: &str,
    merged_at: Option<&str>,
) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        body: Some(body.to_string()),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        head_ref: head.to_string(),
        base_ref: base.to_string(),
        merged_at: merged_at.map(|d| d.parse().unwrap()),
        labels: Vec::new(),
    }
}

#[async_trait]
impl GitHub for FakeGitHub {
    async fn repository(&self) -> Result<RepoInfo, GitHubError> {
        self.record("repository");
        Ok(self.repo.clone())
    }

    async fn pull_request_for_branch(
        &self,
        branch: &str,
    ) -> Result<Option<PullRequest>, GitHubError> {
        self.record("pull_request_for_branch");
        let state = self.state.lock().unwrap();
        Ok(state
            .pulls
            .iter()
            .rev()
            .find(|p| p.head_ref == branch)
            .cloned())
    }

    async fn pull_requests_into(&self, base: &str) -> Result<Vec<PullRequest>, GitHubError> {
        self.record("pull_requests_into");
        let state = self.state.lock().unwrap();
        Ok(state
            .pulls
            .iter()
            .filter(|p| p.base_ref == base)
            .cloned()
            .collect())
    }

    async fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest, GitHubError> {
        self.record("create_pull_request");
        let mut state = self.state.lock().unwrap();
        let number = state.pulls.iter().map(|p| p.number).max().unwrap_or(0) + 1;
        let mut pr = pull(number, head, base, body, None);
        pr.title = title.to_string();
        state.pulls.push(pr.clone());
        Ok(pr)
    }

    async fn update_pull_request_body(
        &self,
        number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        self.record("update_pull_request_body");
        let mut state = self.state.lock().unwrap();
        let pr = state
            .pulls
            .iter_mut()
            .find(|p| p.number == number)
            .ok_or_else(|| GitHubError::GhCli(format!("no pull request #{number}")))?;
        pr.body = Some(body.to_string());
        Ok(())
    }

    async fn add_label(&self, number: u64, label: &str) -> Result<(), GitHubError> {
        self.record("add_label");
        let mut state = self.state.lock().unwrap();
        let pr = state
            .pulls
            .iter_mut()
            .find(|p| p.number == number)
            .ok_or_else(|| GitHubError::GhCli(format!("no pull request #{number}")))?;
        pr.labels.push(label.to_string());
        Ok(())
    }

    async fn issue_title(&self, number: u64) -> Result<Option<String>, GitHubError> {
        self.record("issue_title");
        Ok(self.issues.get(&number).cloned())
    }

    async fn tags(&self) -> Result<Vec<String>, GitHubError> {
        self.record("tags");
        Ok(self.tags.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn tag_date(&self, tag: &str) -> Result<Option<DateTime<Utc>>, GitHubError> {
        self.record("tag_date");
        Ok(self
            .tags
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, date)| *date))
    }

    async fn release_by_tag(&self, tag: &str) -> Result<Option<Release>, GitHubError> {
        self.record("release_by_tag");
        let state = self.state.lock().unwrap();
        Ok(state.releases.iter().find(|r| r.tag_name == tag).cloned())
    }

    async fn create_release(
        &self,
        tag: &str,
        _name: &str,
        body: &str,
        _prerelease: bool,
    ) -> Result<Release, GitHubError> {
        self.record("create_release");
        let mut state = self.state.lock().unwrap();
        let release = Release {
            id: state.releases.len() as u64 + 1,
            tag_name: tag.to_string(),
            body: Some(body.to_string()),
        };
        state.releases.push(release.clone());
        Ok(release)
    }

    async fn update_release_body(&self, id: u64, body: &str) -> Result<(), GitHubError> {
        self.record("update_release_body");
        let mut state = self.state.lock().unwrap();
        let release = state
            .releases
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| GitHubError::GhCli(format!("no release {id}")))?;
        release.body = Some(body.to_string());
        Ok(())
    }
}
