mod rest;

#[cfg(test)]
pub mod fake;

pub use rest::RestClient;

use crate::error::SalesforceError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One page-complete answer from the query endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub done: bool,
    pub total_size: u64,
    #[serde(default)]
    pub records: Vec<serde_json::Value>,
    #[serde(default)]
    pub next_records_url: Option<String>,
}

impl QueryResult {
    /// Decode the raw records into typed rows
    pub fn records_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, SalesforceError> {
        self.records
            .iter()
            .map(|r| serde_json::from_value(r.clone()).map_err(SalesforceError::from))
            .collect()
    }
}

/// Nested subquery payload, e.g. `"PackagePushErrors": {"records": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct Nested<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

#[async_trait]
pub trait QueryApi: Send + Sync {
    /// Run a SOQL query and return every record, following pagination
    async fn query(&self, soql: &str) -> Result<QueryResult, SalesforceError>;
}

/// Quote a value for interpolation into a SOQL string literal
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
