use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::*;

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub salesforce: SalesforceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GithubConfig {
    /// Repository as owner/name
    #[serde(default = "default_repo")]
    pub repo: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ProjectConfig {
    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GitConfig {
    /// Falls back to the repository's default branch when unset
    #[serde(default)]
    pub default_branch: Option<String>,

    #[serde(default = "default_prefix_beta")]
    pub prefix_beta: String,

    #[serde(default = "default_prefix_release")]
    pub prefix_release: String,

    #[serde(default = "default_prefix_feature")]
    pub prefix_feature: String,

    #[serde(default)]
    pub release_notes: ReleaseNotesConfig,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            default_branch: None,
            prefix_beta: default_prefix_beta(),
            prefix_release: default_prefix_release(),
            prefix_feature: default_prefix_feature(),
            release_notes: ReleaseNotesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ReleaseNotesConfig {
    /// Section parsers, applied and rendered in this order
    #[serde(default = "default_parsers")]
    pub parsers: Vec<ParserConfig>,
}

impl Default for ReleaseNotesConfig {
    fn default() -> Self {
        Self {
            parsers: default_parsers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ParserConfig {
    pub class: ParserClass,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParserClass {
    /// Free-form lines under a heading
    Lines,
    /// `#123` issue references under a heading
    Issues,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SalesforceConfig {
    #[serde(default)]
    pub instance_url: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for SalesforceConfig {
    fn default() -> Self {
        Self {
            instance_url: None,
            api_version: default_api_version(),
        }
    }
}
