use super::{previous_tag, render_pull_requests};
use crate::config::GitConfig;
use crate::error::NotesError;
use crate::github::{GitHub, PullRequest};
use crate::parser::{build_parsers, SectionParser};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ReleaseNotesOptions {
    pub tag: String,
    pub last_tag: Option<String>,
    pub link_pr: bool,
    pub publish: bool,
    pub include_empty: bool,
}

/// Notes for every pull request merged between the previous tag and `tag`
pub struct ReleaseNotesGenerator<'a> {
    github: &'a dyn GitHub,
    git: &'a GitConfig,
    parsers: Vec<SectionParser>,
    options: ReleaseNotesOptions,
}

impl<'a> ReleaseNotesGenerator<'a> {
    pub fn new(github: &'a dyn GitHub, git: &'a GitConfig, options: ReleaseNotesOptions) -> Self {
        Self {
            github,
            git,
            parsers: build_parsers(&git.release_notes.parsers),
            options,
        }
    }

    async fn resolve_last_tag(&self) -> Result<Option<String>, NotesError> {
        if let Some(last_tag) = &self.options.last_tag {
            return Ok(Some(last_tag.clone()));
        }
        let tags = self.github.tags().await?;
        let last = previous_tag(
            &self.options.tag,
            &tags,
            &self.git.prefix_beta,
            &self.git.prefix_release,
        );
        match &last {
            Some(tag) => debug!("Previous release tag is {}", tag),
            None => info!(
                "No previous release tag before {}, including all merged pull requests",
                self.options.tag
            ),
        }
        Ok(last)
    }

    /// Merged pull requests in range, in merge order
    async fn pull_requests(&self, default_branch: &str) -> Result<Vec<PullRequest>, NotesError> {
        let tag = &self.options.tag;
        let end = self
            .github
            .tag_date(tag)
            .await?
            .ok_or_else(|| NotesError::TagNotFound(tag.clone()))?;

        let start = match self.resolve_last_tag().await? {
            Some(last) => Some(
                self.github
                    .tag_date(&last)
                    .await?
                    .ok_or_else(|| NotesError::TagNotFound(last.clone()))?,
            ),
            None => None,
        };

        let mut pulls: Vec<PullRequest> = self
            .github
            .pull_requests_into(default_branch)
            .await?
            .into_iter()
            .filter(|pr| match pr.merged_at {
                Some(merged) => merged <= end && start.map_or(true, |s| merged > s),
                None => false,
            })
            .collect();
        pulls.sort_by_key(|pr| (pr.merged_at, pr.number));

        info!(
            "Found {} pull requests merged into {} for {}",
            pulls.len(),
            default_branch,
            tag
        );
        Ok(pulls)
    }

    /// Render the notes, publishing them to the release when requested
    pub async fn run(&self) -> Result<String, NotesError> {
        let repo = self.github.repository().await?;
        let default_branch = self
            .git
            .default_branch
            .clone()
            .unwrap_or(repo.default_branch);

        let pulls = self.pull_requests(&default_branch).await?;
        let notes = render_pull_requests(
            self.github,
            &self.parsers,
            &pulls,
            self.options.link_pr,
            self.options.include_empty,
            repo.has_issues,
        )
        .await?;

        if self.options.publish {
            self.publish(&notes).await?;
        }

        Ok(notes)
    }

    async fn publish(&self, notes: &str) -> Result<(), NotesError> {
        let tag = &self.options.tag;
        match self.github.release_by_tag(tag).await? {
            Some(release) if release.body.as_deref() == Some(notes) => {
                info!("Release {} already has these notes", release.tag_name);
            }
            Some(release) => {
                self.github.update_release_body(release.id, notes).await?;
                info!("Updated release notes for {}", release.tag_name);
            }
            None => {
                let prerelease = tag.starts_with(&self.git.prefix_beta);
                self.github
                    .create_release(tag, tag, notes, prerelease)
                    .await?;
                info!("Created release {} with notes", tag);
            }
        }
        Ok(())
    }
}
