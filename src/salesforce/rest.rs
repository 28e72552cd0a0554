use super::{QueryApi, QueryResult};
use crate::error::SalesforceError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Query client for the Salesforce REST API
pub struct RestClient {
    http: reqwest::Client,
    instance_url: String,
    api_version: String,
    access_token: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(rename = "errorCode")]
    error_code: String,
}

impl RestClient {
    pub fn new(
        instance_url: &str,
        api_version: &str,
        access_token: &str,
    ) -> Result<Self, SalesforceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("releasekit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            instance_url: instance_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
            access_token: access_token.to_string(),
        })
    }

    async fn fetch(&self, url: &str, soql: Option<&str>) -> Result<QueryResult, SalesforceError> {
        let mut request = self.http.get(url).bearer_auth(&self.access_token);
        if let Some(soql) = soql {
            request = request.query(&[("q", soql)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // The API answers errors with a list of {message, errorCode}
            let message = serde_json::from_str::<Vec<ApiErrorBody>>(&text)
                .ok()
                .and_then(|errors| errors.into_iter().next())
                .map(|e| format!("{}: {}", e.error_code, e.message))
                .unwrap_or(text);
            return Err(SalesforceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<QueryResult>().await?)
    }
}

#[async_trait]
impl QueryApi for RestClient {
    async fn query(&self, soql: &str) -> Result<QueryResult, SalesforceError> {
        let url = format!(
            "{}/services/data/v{}/query",
            self.instance_url, self.api_version
        );
        let mut result = self.fetch(&url, Some(soql)).await?;

        while let Some(next) = result.next_records_url.take() {
            debug!("Fetching next batch of records from {}", next);
            let page = self
                .fetch(&format!("{}{}", self.instance_url, next), None)
                .await?;
            result.records.extend(page.records);
            result.done = page.done;
            result.next_records_url = page.next_records_url;
        }

        Ok(result)
    }
}
