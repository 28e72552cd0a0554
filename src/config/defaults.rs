use super::types::{ParserClass, ParserConfig};

pub fn default_repo() -> String {
    // Placeholders resolved by `gh api` from the current git checkout
    "{owner}/{repo}".to_string()
}

pub fn default_prefix_beta() -> String {
    "beta/".to_string()
}

pub fn default_prefix_release() -> String {
    "release/".to_string()
}

pub fn default_prefix_feature() -> String {
    "feature/".to_string()
}

pub fn default_api_version() -> String {
    "43.0".to_string()
}

pub fn default_parsers() -> Vec<ParserConfig> {
    [
        (ParserClass::Lines, "Critical Changes"),
        (ParserClass::Lines, "Changes"),
        (ParserClass::Issues, "Issues Closed"),
        (ParserClass::Lines, "New Metadata"),
        (ParserClass::Lines, "Deleted Metadata"),
    ]
    .into_iter()
    .map(|(class, title)| ParserConfig {
        class,
        title: title.to_string(),
    })
    .collect()
}
