use crate::cli::ParentNotesArgs;
use crate::config::Config;
use crate::github::GhCli;
use crate::notes::{FeaturePrefix, ParentOutcome, ParentPullRequestNotes, ParentTarget};
use std::path::Path;
use tracing::info;

pub async fn execute(args: ParentNotesArgs, config_path: &Path) -> anyhow::Result<()> {
    // Option errors must surface before anything touches GitHub
    let target = ParentTarget::from_options(args.branch_name, args.parent_branch_name)?;

    let config = Config::load_or_default(config_path)?;
    config.validate()?;

    let repo = args.repo.unwrap_or_else(|| config.github.repo.clone());
    let github = GhCli::new(repo);
    let naming = FeaturePrefix::new(config.project.git.prefix_feature.clone());

    let task = ParentPullRequestNotes::new(&github, &config.project.git, &naming);
    match task.execute(&target).await? {
        ParentOutcome::NoPullRequest | ParentOutcome::NotChild => {
            info!("Nothing to aggregate")
        }
        ParentOutcome::Aggregated { number, changed } => {
            info!("Parent PR #{} aggregated (changed: {})", number, changed)
        }
        ParentOutcome::Linked { number, changed } => {
            info!("Parent PR #{} linked (changed: {})", number, changed)
        }
    }

    Ok(())
}
