use crate::cli::ReleaseNotesArgs;
use crate::config::Config;
use crate::github::GhCli;
use crate::notes::{ReleaseNotesGenerator, ReleaseNotesOptions};
use std::path::Path;
use tracing::info;

pub async fn execute(args: ReleaseNotesArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load_or_default(config_path)?;
    config.validate()?;

    let repo = args.repo.unwrap_or_else(|| config.github.repo.clone());
    let github = GhCli::new(repo);

    let options = ReleaseNotesOptions {
        tag: args.tag,
        last_tag: args.last_tag,
        link_pr: args.link_pr,
        publish: args.publish,
        include_empty: args.include_empty,
    };
    if options.publish {
        info!("Notes will be published to the release for {}", options.tag);
    }

    let generator = ReleaseNotesGenerator::new(&github, &config.project.git, options);
    let notes = generator.run().await?;
    println!("{}", notes);

    Ok(())
}
