use super::{render_pull_requests, BranchNaming};
use crate::config::GitConfig;
use crate::error::{ConfigError, NotesError};
use crate::github::{GitHub, PullRequest};
use crate::parser::{build_parsers, SectionParser};
use tracing::{debug, info};

/// Marks a parent pull request whose body is rebuilt from its children
pub const BUILD_NOTES_LABEL: &str = "Build Change Notes";

pub const UNAGGREGATED_HEADER: &str = "# Unaggregated Pull Requests";

/// Which side of the parent/child relationship an invocation starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentTarget {
    /// Child branch whose notes flow into its parent
    Child(String),
    /// Parent branch to rebuild from all children
    Parent(String),
}

impl ParentTarget {
    pub fn from_options(
        branch_name: Option<String>,
        parent_branch_name: Option<String>,
    ) -> Result<Self, ConfigError> {
        let branch_name = branch_name.filter(|b| !b.is_empty());
        let parent_branch_name = parent_branch_name.filter(|b| !b.is_empty());

        match (branch_name, parent_branch_name) {
            (Some(branch), None) => Ok(ParentTarget::Child(branch)),
            (None, Some(parent)) => Ok(ParentTarget::Parent(parent)),
            (None, None) => Err(ConfigError::MissingOption(
                "You must specify either branch_name or parent_branch_name.".to_string(),
            )),
            (Some(_), Some(_)) => Err(ConfigError::ConflictingOptions(
                "Specify only one of branch_name or parent_branch_name.".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentOutcome {
    /// No pull request exists for the given branch
    NoPullRequest,
    /// The child's base branch is not a parent branch
    NotChild,
    /// Parent body rebuilt from its children
    Aggregated { number: u64, changed: bool },
    /// Child link listed under the unaggregated header
    Linked { number: u64, changed: bool },
}

pub struct ParentPullRequestNotes<'a> {
    github: &'a dyn GitHub,
    git: &'a GitConfig,
    naming: &'a dyn BranchNaming,
    parsers: Vec<SectionParser>,
}

impl<'a> ParentPullRequestNotes<'a> {
    pub fn new(github: &'a dyn GitHub, git: &'a GitConfig, naming: &'a dyn BranchNaming) -> Self {
        Self {
            github,
            git,
            naming,
            parsers: build_parsers(&git.release_notes.parsers),
        }
    }

    pub async fn execute(&self, target: &ParentTarget) -> Result<ParentOutcome, NotesError> {
        match target {
            ParentTarget::Child(branch) => self.from_child(branch).await,
            ParentTarget::Parent(branch) => self.rebuild_parent(branch).await,
        }
    }

    async fn from_child(&self, branch: &str) -> Result<ParentOutcome, NotesError> {
        let Some(child) = self.github.pull_request_for_branch(branch).await? else {
            info!("No pull request found for branch {}", branch);
            return Ok(ParentOutcome::NoPullRequest);
        };

        let parent_branch = child.base_ref.clone();
        debug!(
            "PR #{} merges {} into {}",
            child.number, child.head_ref, parent_branch
        );
        if !self.naming.is_parent_branch(&parent_branch) {
            info!(
                "Base branch {} of PR #{} is not a parent branch",
                parent_branch, child.number
            );
            return Ok(ParentOutcome::NotChild);
        }

        let parent = match self.github.pull_request_for_branch(&parent_branch).await? {
            Some(parent) => parent,
            None => self.create_parent(&parent_branch).await?,
        };

        if parent.has_label(BUILD_NOTES_LABEL) {
            let mut children = self.merged_children(&parent_branch).await?;
            if !children.iter().any(|c| c.number == child.number) {
                children.push(child);
            }
            let changed = self.replace_body(&parent, &children).await?;
            Ok(ParentOutcome::Aggregated {
                number: parent.number,
                changed,
            })
        } else {
            let body = add_unaggregated_link(parent.body(), &child.html_url);
            let changed = body != parent.body();
            if changed {
                self.github
                    .update_pull_request_body(parent.number, &body)
                    .await?;
                info!(
                    "Listed PR #{} as unaggregated on parent PR #{}",
                    child.number, parent.number
                );
            }
            Ok(ParentOutcome::Linked {
                number: parent.number,
                changed,
            })
        }
    }

    async fn rebuild_parent(&self, parent_branch: &str) -> Result<ParentOutcome, NotesError> {
        let Some(parent) = self.github.pull_request_for_branch(parent_branch).await? else {
            info!("No pull request found for parent branch {}", parent_branch);
            return Ok(ParentOutcome::NoPullRequest);
        };

        let children = self.merged_children(parent_branch).await?;
        let changed = self.replace_body(&parent, &children).await?;
        Ok(ParentOutcome::Aggregated {
            number: parent.number,
            changed,
        })
    }

    async fn create_parent(&self, parent_branch: &str) -> Result<PullRequest, NotesError> {
        let base = match &self.git.default_branch {
            Some(branch) => branch.clone(),
            None => self.github.repository().await?.default_branch,
        };

        let mut parent = self
            .github
            .create_pull_request(parent_branch, parent_branch, &base, "")
            .await?;
        self.github
            .add_label(parent.number, BUILD_NOTES_LABEL)
            .await?;
        parent.labels.push(BUILD_NOTES_LABEL.to_string());

        info!(
            "Created parent PR #{} for {} into {}",
            parent.number, parent_branch, base
        );
        Ok(parent)
    }

    /// Children merged into the parent branch, in merge order
    async fn merged_children(&self, parent_branch: &str) -> Result<Vec<PullRequest>, NotesError> {
        let mut children: Vec<PullRequest> = self
            .github
            .pull_requests_into(parent_branch)
            .await?
            .into_iter()
            .filter(|pr| pr.merged_at.is_some())
            .collect();
        children.sort_by_key(|pr| (pr.merged_at, pr.number));
        debug!(
            "Found {} merged child PRs of {}",
            children.len(),
            parent_branch
        );
        Ok(children)
    }

    /// Overwrite the parent body with the notes of `children`
    async fn replace_body(
        &self,
        parent: &PullRequest,
        children: &[PullRequest],
    ) -> Result<bool, NotesError> {
        let has_issues = self.github.repository().await?.has_issues;
        let body =
            render_pull_requests(self.github, &self.parsers, children, true, true, has_issues)
                .await?;

        if body == parent.body() {
            debug!("Parent PR #{} body is already up to date", parent.number);
            return Ok(false);
        }

        self.github
            .update_pull_request_body(parent.number, &body)
            .await?;
        info!(
            "Aggregated notes from {} child PRs into parent PR #{}",
            children.len(),
            parent.number
        );
        Ok(true)
    }
}

/// List `url` under the unaggregated header, adding the header once
pub fn add_unaggregated_link(body: &str, url: &str) -> String {
    let entry = format!("* {url}");
    if body.lines().any(|line| line.trim() == entry) {
        return body.to_string();
    }

    let mut body = body.trim_end().to_string();
    if !body.contains(UNAGGREGATED_HEADER) {
        if !body.is_empty() {
            body.push_str("\n\n");
        }
        body.push_str(UNAGGREGATED_HEADER);
        body.push('\n');
    }
    body.push('\n');
    body.push_str(&entry);
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::{pull, FakeGitHub};
    use crate::notes::FeaturePrefix;

    const PARENT: &str = "feature/checkout";

    fn parent_pr(number: u64, labeled: bool) -> PullRequest {
        let mut pr = pull(number, PARENT, "main", "", None);
        if labeled {
            pr.labels.push(BUILD_NOTES_LABEL.to_string());
        }
        pr
    }

    fn child(number: u64, body: &str, merged_at: Option<&str>) -> PullRequest {
        pull(
            number,
            &format!("{PARENT}__part{number}"),
            PARENT,
            body,
            merged_at,
        )
    }

    fn run<'a>(
        github: &'a FakeGitHub,
        git: &'a GitConfig,
        naming: &'a FeaturePrefix,
    ) -> ParentPullRequestNotes<'a> {
        ParentPullRequestNotes::new(github, git, naming)
    }

    #[test]
    fn test_target_requires_exactly_one_branch() {
        assert!(matches!(
            ParentTarget::from_options(None, None),
            Err(ConfigError::MissingOption(_))
        ));
        assert!(matches!(
            ParentTarget::from_options(Some(String::new()), None),
            Err(ConfigError::MissingOption(_))
        ));
        assert!(matches!(
            ParentTarget::from_options(Some("a".into()), Some("b".into())),
            Err(ConfigError::ConflictingOptions(_))
        ));
        assert_eq!(
            ParentTarget::from_options(Some("a".into()), None).unwrap(),
            ParentTarget::Child("a".into())
        );
        assert_eq!(
            ParentTarget::from_options(None, Some("b".into())).unwrap(),
            ParentTarget::Parent("b".into())
        );
    }

    #[test]
    fn test_add_unaggregated_link_once() {
        let url = "https://github.com/acme/widgets/pull/2";
        let body = add_unaggregated_link("", url);
        assert_eq!(body, format!("{UNAGGREGATED_HEADER}\n\n* {url}"));
        assert_eq!(add_unaggregated_link(&body, url), body);

        let other = "https://github.com/acme/widgets/pull/3";
        assert_eq!(
            add_unaggregated_link(&body, other),
            format!("{UNAGGREGATED_HEADER}\n\n* {url}\n* {other}")
        );
        assert_eq!(
            add_unaggregated_link("Intro\n", url),
            format!("Intro\n\n{UNAGGREGATED_HEADER}\n\n* {url}")
        );
    }

    #[tokio::test]
    async fn test_child_creates_labeled_parent_and_aggregates() {
        let github = FakeGitHub::new().with_pull(child(
            1,
            "# Changes\nCart totals",
            Some("2024-03-01T00:00:00Z"),
        ));
        let git = GitConfig::default();
        let naming = FeaturePrefix::new("feature/");

        let outcome = run(&github, &git, &naming)
            .execute(&ParentTarget::Child(format!("{PARENT}__part1")))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ParentOutcome::Aggregated {
                number: 2,
                changed: true
            }
        );

        let parent = github.pull(2).unwrap();
        assert_eq!(parent.head_ref, PARENT);
        assert_eq!(parent.base_ref, "main");
        assert!(parent.has_label(BUILD_NOTES_LABEL));
        assert_eq!(
            parent.body(),
            "# Changes\n\nCart totals [[PR1](https://github.com/acme/widgets/pull/1)]"
        );
    }

    #[tokio::test]
    async fn test_unmerged_child_is_included_once() {
        let github = FakeGitHub::new()
            .with_pull(parent_pr(1, true))
            .with_pull(child(2, "# Changes\nMerged", Some("2024-03-01T00:00:00Z")))
            .with_pull(child(3, "# Changes\nOpen", None));
        let git = GitConfig::default();
        let naming = FeaturePrefix::new("feature/");

        run(&github, &git, &naming)
            .execute(&ParentTarget::Child(format!("{PARENT}__part3")))
            .await
            .unwrap();

        let body = github.pull(1).unwrap().body.unwrap();
        assert!(body.starts_with("# Changes\n\nMerged [[PR2]"));
        assert_eq!(body.matches("Open [[PR3]").count(), 1);
    }

    #[tokio::test]
    async fn test_unlabeled_parent_gets_link() {
        let github = FakeGitHub::new()
            .with_pull(parent_pr(1, false))
            .with_pull(child(2, "# Changes\nMerged", Some("2024-03-01T00:00:00Z")));
        let git = GitConfig::default();
        let naming = FeaturePrefix::new("feature/");
        let task = run(&github, &git, &naming);
        let target = ParentTarget::Child(format!("{PARENT}__part2"));

        let outcome = task.execute(&target).await.unwrap();
        assert_eq!(
            outcome,
            ParentOutcome::Linked {
                number: 1,
                changed: true
            }
        );
        let expected = format!("{UNAGGREGATED_HEADER}\n\n* https://github.com/acme/widgets/pull/2");
        assert_eq!(github.pull(1).unwrap().body(), expected);

        let outcome = task.execute(&target).await.unwrap();
        assert_eq!(
            outcome,
            ParentOutcome::Linked {
                number: 1,
                changed: false
            }
        );
        assert_eq!(github.pull(1).unwrap().body(), expected);
    }

    #[tokio::test]
    async fn test_child_of_non_parent_branch_is_ignored() {
        let github = FakeGitHub::new().with_pull(pull(1, "fix/typo", "main", "", None));
        let git = GitConfig::default();
        let naming = FeaturePrefix::new("feature/");

        let outcome = run(&github, &git, &naming)
            .execute(&ParentTarget::Child("fix/typo".into()))
            .await
            .unwrap();
        assert_eq!(outcome, ParentOutcome::NotChild);
        assert_eq!(github.pulls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_pull_requests_are_no_ops() {
        let github = FakeGitHub::new();
        let git = GitConfig::default();
        let naming = FeaturePrefix::new("feature/");
        let task = run(&github, &git, &naming);

        for target in [
            ParentTarget::Child("feature/x__y".into()),
            ParentTarget::Parent(PARENT.into()),
        ] {
            assert_eq!(
                task.execute(&target).await.unwrap(),
                ParentOutcome::NoPullRequest
            );
        }
        assert!(github.pulls().is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_parent_is_idempotent() {
        let mut stale = parent_pr(1, true);
        stale.body = Some("stale body".to_string());
        let github = FakeGitHub::new()
            .with_issue(7, "Rounding error")
            .with_pull(stale)
            .with_pull(child(
                3,
                "# Critical Changes\nNew tax API\n# Issues Closed\nFixes #7",
                Some("2024-03-02T00:00:00Z"),
            ))
            .with_pull(child(
                2,
                "# Critical Changes\nOld tax API removed",
                Some("2024-03-01T00:00:00Z"),
            ))
            .with_pull(child(4, "Refactor only", Some("2024-03-03T00:00:00Z")))
            .with_pull(child(5, "# Changes\nStill open", None));
        let git = GitConfig::default();
        let naming = FeaturePrefix::new("feature/");
        let task = run(&github, &git, &naming);
        let target = ParentTarget::Parent(PARENT.into());

        let first = task.execute(&target).await.unwrap();
        assert_eq!(
            first,
            ParentOutcome::Aggregated {
                number: 1,
                changed: true
            }
        );
        let body = github.pull(1).unwrap().body.unwrap();
        assert_eq!(
            body,
            "# Critical Changes\n\n\
             Old tax API removed [[PR2](https://github.com/acme/widgets/pull/2)]\n\
             New tax API [[PR3](https://github.com/acme/widgets/pull/3)]\n\n\
             # Issues Closed\n\n\
             #7: Rounding error\n\n\
             # Pull requests without release notes\n\n\
             * [#4](https://github.com/acme/widgets/pull/4) PR 4"
        );

        let second = task.execute(&target).await.unwrap();
        assert_eq!(
            second,
            ParentOutcome::Aggregated {
                number: 1,
                changed: false
            }
        );
        assert_eq!(github.pull(1).unwrap().body.unwrap(), body);
    }
}
