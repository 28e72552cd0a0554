//! In-memory query API for tests

use super::{QueryApi, QueryResult};
use crate::error::SalesforceError;
use async_trait::async_trait;
use std::sync::Mutex;

/// Answers queries by matching the queried object name.
/// Nested subqueries end in `)` so they never match the outer object.
#[derive(Default)]
pub struct FakeQueryApi {
    responses: Vec<(String, QueryResult)>,
    queries: Mutex<Vec<String>>,
}

impl FakeQueryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the records returned for queries `FROM <object>`
    pub fn with_records(mut self, object: &str, records: Vec<serde_json::Value>) -> Self {
        self.responses.push((
            format!("FROM {object} "),
            QueryResult {
                done: true,
                total_size: records.len() as u64,
                records,
                next_records_url: None,
            },
        ));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryApi for FakeQueryApi {
    async fn query(&self, soql: &str) -> Result<QueryResult, SalesforceError> {
        self.queries.lock().unwrap().push(soql.to_string());
        let result = self
            .responses
            .iter()
            .find(|(needle, _)| soql.contains(needle.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_default();
        Ok(result)
    }
}
