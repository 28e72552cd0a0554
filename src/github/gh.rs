use super::{GitHub, PullRequest, Release, RepoInfo};
use crate::error::GitHubError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

/// GitHub access through `gh api`, reusing the user's gh authentication
pub struct GhCli {
    repo: String,
}

#[derive(Deserialize)]
struct ApiRepo {
    default_branch: String,
    #[serde(default)]
    has_issues: bool,
}

#[derive(Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Deserialize)]
struct ApiPullRequest {
    number: u64,
    title: String,
    body: Option<String>,
    html_url: String,
    head: ApiRef,
    base: ApiRef,
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(pr: ApiPullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            html_url: pr.html_url,
            head_ref: pr.head.name,
            base_ref: pr.base.name,
            merged_at: pr.merged_at,
            labels: pr.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

#[derive(Deserialize)]
struct ApiRelease {
    id: u64,
    tag_name: String,
    body: Option<String>,
}

impl From<ApiRelease> for Release {
    fn from(r: ApiRelease) -> Self {
        Self {
            id: r.id,
            tag_name: r.tag_name,
            body: r.body,
        }
    }
}

#[derive(Deserialize)]
struct ApiTag {
    name: String,
}

#[derive(Deserialize)]
struct ApiCommit {
    commit: ApiCommitDetail,
}

#[derive(Deserialize)]
struct ApiCommitDetail {
    committer: ApiSignature,
}

#[derive(Deserialize)]
struct ApiSignature {
    date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ApiIssue {
    title: String,
}

/// Escape a value used as a single URL path segment
fn encode_segment(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('/', "%2F")
        .replace(' ', "%20")
        .replace('#', "%23")
        .replace('?', "%3F")
}

/// `--paginate` concatenates one JSON array per page
fn parse_pages<T: DeserializeOwned>(stdout: &[u8]) -> Result<Vec<T>, GitHubError> {
    let mut items = Vec::new();
    for page in serde_json::Deserializer::from_slice(stdout).into_iter::<Vec<T>>() {
        items.extend(page.map_err(|e| GitHubError::ParseOutput(e.to_string()))?);
    }
    Ok(items)
}

fn parse_one<T: DeserializeOwned>(stdout: &[u8]) -> Result<T, GitHubError> {
    serde_json::from_slice(stdout).map_err(|e| GitHubError::ParseOutput(e.to_string()))
}

impl GhCli {
    /// `repo` is `owner/name`; the `{owner}/{repo}` placeholders let gh
    /// resolve it from the current checkout
    pub fn new(repo: impl Into<String>) -> Self {
        Self { repo: repo.into() }
    }

    fn owner(&self) -> &str {
        self.repo.split('/').next().unwrap_or(&self.repo)
    }

    /// Run `gh api`; `Ok(None)` when the resource does not exist
    async fn api(&self, args: &[String]) -> Result<Option<Vec<u8>>, GitHubError> {
        debug!("gh api {}", args.join(" "));

        let output = Command::new("gh")
            .arg("api")
            .args(args)
            .output()
            .await
            .map_err(GitHubError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("HTTP 404") {
                return Ok(None);
            }
            return Err(GitHubError::GhCli(stderr.trim().to_string()));
        }

        Ok(Some(output.stdout))
    }

    async fn api_required(&self, args: &[String]) -> Result<Vec<u8>, GitHubError> {
        self.api(args)
            .await?
            .ok_or_else(|| GitHubError::GhCli(format!("Not found: {}", args.join(" "))))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("repos/{}/{}", self.repo, path)
    }

    /// gh only fills `{owner}` in typed (`-F`) fields, so the head filter
    /// must not go through `-f`
    fn branch_pulls_args(&self, branch: &str) -> Vec<String> {
        let mut cmd = args(["-X", "GET", "-f", "state=all", "-f", "per_page=100"]);
        cmd.extend([
            "-F".to_string(),
            format!("head={}:{}", self.owner(), branch),
            self.endpoint("pulls"),
        ]);
        cmd
    }
}

fn args<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl GitHub for GhCli {
    async fn repository(&self) -> Result<RepoInfo, GitHubError> {
        let stdout = self
            .api_required(&[format!("repos/{}", self.repo)])
            .await?;
        let repo: ApiRepo = parse_one(&stdout)?;
        Ok(RepoInfo {
            default_branch: repo.default_branch,
            has_issues: repo.has_issues,
        })
    }

    async fn pull_request_for_branch(
        &self,
        branch: &str,
    ) -> Result<Option<PullRequest>, GitHubError> {
        let stdout = self.api_required(&self.branch_pulls_args(branch)).await?;
        let pulls: Vec<ApiPullRequest> = parse_one(&stdout)?;
        // The API lists newest first
        Ok(pulls.into_iter().next().map(PullRequest::from))
    }

    async fn pull_requests_into(&self, base: &str) -> Result<Vec<PullRequest>, GitHubError> {
        let mut cmd = args([
            "--paginate",
            "-X",
            "GET",
            "-f",
            "state=all",
            "-f",
            "sort=created",
            "-f",
            "direction=asc",
            "-f",
            "per_page=100",
        ]);
        cmd.extend([
            "-f".to_string(),
            format!("base={base}"),
            self.endpoint("pulls"),
        ]);

        let stdout = self.api_required(&cmd).await?;
        let pulls: Vec<ApiPullRequest> = parse_pages(&stdout)?;
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    async fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest, GitHubError> {
        let cmd = vec![
            "-X".to_string(),
            "POST".to_string(),
            "-f".to_string(),
            format!("title={title}"),
            "-f".to_string(),
            format!("head={head}"),
            "-f".to_string(),
            format!("base={base}"),
            "-f".to_string(),
            format!("body={body}"),
            self.endpoint("pulls"),
        ];
        let stdout = self.api_required(&cmd).await?;
        Ok(parse_one::<ApiPullRequest>(&stdout)?.into())
    }

    async fn update_pull_request_body(
        &self,
        number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        let cmd = vec![
            "-X".to_string(),
            "PATCH".to_string(),
            "-f".to_string(),
            format!("body={body}"),
            self.endpoint(&format!("pulls/{number}")),
        ];
        self.api_required(&cmd).await?;
        Ok(())
    }

    async fn add_label(&self, number: u64, label: &str) -> Result<(), GitHubError> {
        let cmd = vec![
            "-X".to_string(),
            "POST".to_string(),
            "-f".to_string(),
            format!("labels[]={label}"),
            self.endpoint(&format!("issues/{number}/labels")),
        ];
        self.api_required(&cmd).await?;
        Ok(())
    }

    async fn issue_title(&self, number: u64) -> Result<Option<String>, GitHubError> {
        let stdout = self
            .api(&[self.endpoint(&format!("issues/{number}"))])
            .await?;
        match stdout {
            Some(stdout) => Ok(Some(parse_one::<ApiIssue>(&stdout)?.title)),
            None => Ok(None),
        }
    }

    async fn tags(&self) -> Result<Vec<String>, GitHubError> {
        let mut cmd = args(["--paginate", "-X", "GET", "-f", "per_page=100"]);
        cmd.push(self.endpoint("tags"));

        let stdout = self.api_required(&cmd).await?;
        let tags: Vec<ApiTag> = parse_pages(&stdout)?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    async fn tag_date(&self, tag: &str) -> Result<Option<DateTime<Utc>>, GitHubError> {
        let mut cmd = args(["-X", "GET", "-f", "per_page=1"]);
        cmd.extend([
            "-f".to_string(),
            format!("sha=refs/tags/{tag}"),
            self.endpoint("commits"),
        ]);

        let Some(stdout) = self.api(&cmd).await? else {
            return Ok(None);
        };
        let commits: Vec<ApiCommit> = parse_one(&stdout)?;
        Ok(commits.into_iter().next().map(|c| c.commit.committer.date))
    }

    async fn release_by_tag(&self, tag: &str) -> Result<Option<Release>, GitHubError> {
        let stdout = self
            .api(&[self.endpoint(&format!("releases/tags/{}", encode_segment(tag)))])
            .await?;
        match stdout {
            Some(stdout) => Ok(Some(parse_one::<ApiRelease>(&stdout)?.into())),
            None => Ok(None),
        }
    }

    async fn create_release(
        &self,
        tag: &str,
        name: &str,
        body: &str,
        prerelease: bool,
    ) -> Result<Release, GitHubError> {
        let cmd = vec![
            "-X".to_string(),
            "POST".to_string(),
            "-f".to_string(),
            format!("tag_name={tag}"),
            "-f".to_string(),
            format!("name={name}"),
            "-f".to_string(),
            format!("body={body}"),
            "-F".to_string(),
            format!("prerelease={prerelease}"),
            self.endpoint("releases"),
        ];
        let stdout = self.api_required(&cmd).await?;
        Ok(parse_one::<ApiRelease>(&stdout)?.into())
    }

    async fn update_release_body(&self, id: u64, body: &str) -> Result<(), GitHubError> {
        let cmd = vec![
            "-X".to_string(),
            "PATCH".to_string(),
            "-f".to_string(),
            format!("body={body}"),
            self.endpoint(&format!("releases/{id}")),
        ];
        self.api_required(&cmd).await?;
        Ok(())
    }
}
