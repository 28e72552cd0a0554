use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0}")]
    MissingOption(String),

    #[error("{0}")]
    ConflictingOptions(String),

    #[error("Invalid boolean value '{0}' (expected true/false, yes/no, 1/0)")]
    InvalidBool(String),

    #[error("Missing Salesforce credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("Duplicate release notes parser title '{0}'")]
    DuplicateParser(String),
}

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("gh CLI failed: {0}")]
    GhCli(String),

    #[error("Failed to parse gh output: {0}")]
    ParseOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SalesforceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Query failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode query records: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Salesforce error: {0}")]
    Salesforce(#[from] SalesforceError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("Tag '{0}' not found")]
    TagNotFound(String),
}
