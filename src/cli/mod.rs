pub mod parent_notes;
pub mod push_fails;
pub mod release_notes;
pub mod schema;

use crate::config::parse_bool;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "releasekit")]
#[command(
    author,
    version,
    about = "Release automation: push upgrade failure reports and pull request release notes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to project config file
    #[arg(short, long, global = true, default_value = "releasekit.yaml")]
    pub config: PathBuf,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a CSV report of the failed jobs of a push upgrade request
    PushFails(PushFailsArgs),

    /// Generate release notes from pull requests merged since the last tag
    ReleaseNotes(ReleaseNotesArgs),

    /// Aggregate child pull request notes into the parent pull request
    ParentNotes(ParentNotesArgs),

    /// Print the JSON Schema of releasekit.yaml
    Schema(SchemaArgs),
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Write the schema to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Accepts true/false, yes/no, 1/0, on/off
fn bool_arg(value: &str) -> Result<bool, String> {
    parse_bool(value).map_err(|e| e.to_string())
}

#[derive(Parser, Clone)]
pub struct PushFailsArgs {
    /// PackagePushRequest ID for the request to report on
    #[arg(long)]
    pub request_id: String,

    /// Path to write the CSV results to (default: push_fails.csv)
    #[arg(long)]
    pub result_file: Option<PathBuf>,

    /// Salesforce instance URL (overrides salesforce.instance_url)
    #[arg(long, env = "SF_INSTANCE_URL")]
    pub instance_url: Option<String>,

    /// Salesforce OAuth access token
    #[arg(long, env = "SF_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

#[derive(Parser, Clone)]
pub struct ReleaseNotesArgs {
    /// The tag to generate release notes for, e.g. release/1.2
    #[arg(long)]
    pub tag: String,

    /// Override the last release tag, e.g. when releases were skipped
    #[arg(long)]
    pub last_tag: Option<String>,

    /// Append a link to the source pull request to each line
    #[arg(long, action = ArgAction::Set, value_parser = bool_arg, num_args = 0..=1,
          default_value = "false", default_missing_value = "true")]
    pub link_pr: bool,

    /// Publish the notes to the GitHub release for the tag
    #[arg(long, action = ArgAction::Set, value_parser = bool_arg, num_args = 0..=1,
          default_value = "false", default_missing_value = "true")]
    pub publish: bool,

    /// List pull requests that have no release notes
    #[arg(long, action = ArgAction::Set, value_parser = bool_arg, num_args = 0..=1,
          default_value = "false", default_missing_value = "true")]
    pub include_empty: bool,

    /// Override repository (owner/repo)
    #[arg(long)]
    pub repo: Option<String>,
}

#[derive(Parser, Clone)]
pub struct ParentNotesArgs {
    /// Branch with a pull request whose notes flow into its parent
    #[arg(long)]
    pub branch_name: Option<String>,

    /// Parent branch to rebuild change notes for
    #[arg(long)]
    pub parent_branch_name: Option<String>,

    /// Override repository (owner/repo)
    #[arg(long)]
    pub repo: Option<String>,
}
