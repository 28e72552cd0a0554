mod gack;
mod report;

pub use gack::{extract_gack, GackIds};
pub use report::PushFailureReport;

use crate::salesforce::Nested;
use serde::Deserialize;

/// A push upgrade job for one subscriber org
#[derive(Debug, Clone, Deserialize)]
pub struct PushJob {
    #[serde(rename = "SubscriberOrganizationKey", default)]
    pub subscriber_organization_key: Option<String>,

    #[serde(rename = "PackagePushErrors", default)]
    pub errors: Option<Nested<PushJobError>>,
}

impl PushJob {
    /// The error reported for this job. Only the first is kept; jobs without
    /// errors get an empty placeholder.
    pub fn first_error(&self) -> PushJobError {
        self.errors
            .as_ref()
            .and_then(|nested| nested.records.first().cloned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushJobError {
    #[serde(rename = "ErrorSeverity", default)]
    pub severity: Option<String>,

    #[serde(rename = "ErrorTitle", default)]
    pub title: Option<String>,

    #[serde(rename = "ErrorType", default)]
    pub error_type: Option<String>,

    #[serde(rename = "ErrorMessage", default)]
    pub message: Option<String>,
}

impl PushJobError {
    pub fn gack(&self) -> Option<GackIds> {
        self.message.as_deref().and_then(extract_gack)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriberOrg {
    #[serde(rename = "OrgKey")]
    pub org_key: String,

    #[serde(rename = "OrgName", default)]
    pub name: Option<String>,

    #[serde(rename = "OrgType", default)]
    pub org_type: Option<String>,

    #[serde(rename = "OrgStatus", default)]
    pub status: Option<String>,

    #[serde(rename = "InstanceName", default)]
    pub instance_name: Option<String>,
}
