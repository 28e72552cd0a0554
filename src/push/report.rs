use super::{PushJob, PushJobError, SubscriberOrg};
use crate::error::ReportError;
use crate::salesforce::{quote, QueryApi};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_RESULT_FILE: &str = "push_fails.csv";

pub const CSV_HEADERS: [&str; 11] = [
    "OrganizationId",
    "OrgName",
    "OrgType",
    "OrgStatus",
    "InstanceName",
    "ErrorSeverity",
    "ErrorTitle",
    "ErrorType",
    "ErrorMessage",
    "Gack Id",
    "Stacktrace Id",
];

/// Report of the failed and otherwise anomalous jobs of one push request
pub struct PushFailureReport {
    pub request_id: String,
    pub result_file: PathBuf,
}

impl PushFailureReport {
    pub fn new(request_id: impl Into<String>, result_file: Option<PathBuf>) -> Self {
        Self {
            request_id: request_id.into(),
            result_file: result_file.unwrap_or_else(|| PathBuf::from(DEFAULT_RESULT_FILE)),
        }
    }

    fn job_query(&self) -> String {
        format!(
            "SELECT Id, SubscriberOrganizationKey, \
             (SELECT ErrorDetails, ErrorMessage, ErrorSeverity, ErrorTitle, ErrorType FROM PackagePushErrors) \
             FROM PackagePushJob WHERE PackagePushRequestId = {} AND Status != 'Succeeded'",
            quote(&self.request_id)
        )
    }

    fn subscriber_query(org_keys: &[&str]) -> String {
        let keys = org_keys
            .iter()
            .map(|k| quote(k))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "SELECT OrgKey, OrgName, OrgType, OrgStatus, InstanceName \
             FROM PackageSubscriber WHERE OrgKey IN ({keys})"
        )
    }

    /// Query, join and write the CSV. Returns the written path, or `None`
    /// when the request has no failed jobs (no file is created then).
    pub async fn run(&self, api: &dyn QueryApi) -> Result<Option<PathBuf>, ReportError> {
        let query = self.job_query();
        debug!("Running query for job errors: {}", query);
        let result = api.query(&query).await?;
        debug!(
            "Query is complete: {}. Found {} results.",
            result.done, result.total_size
        );
        if result.total_size == 0 {
            info!("No errors found.");
            return Ok(None);
        }

        let jobs: Vec<PushJob> = result.records_as()?;
        let mut failures: Vec<(PushJob, PushJobError)> = jobs
            .into_iter()
            .map(|job| {
                let error = job.first_error();
                (job, error)
            })
            .collect();
        failures.sort_by(|(_, a), (_, b)| {
            a.title
                .as_deref()
                .unwrap_or("")
                .cmp(b.title.as_deref().unwrap_or(""))
        });

        let mut org_keys: Vec<&str> = Vec::new();
        for key in failures
            .iter()
            .filter_map(|(job, _)| job.subscriber_organization_key.as_deref())
        {
            if !org_keys.contains(&key) {
                org_keys.push(key);
            }
        }

        let mut orgs: HashMap<String, SubscriberOrg> = HashMap::new();
        if !org_keys.is_empty() {
            let query = Self::subscriber_query(&org_keys);
            debug!("Running query for subscriber orgs: {}", query);
            let result = api.query(&query).await?;
            debug!(
                "Query is complete: {}. Found {} results.",
                result.done, result.total_size
            );
            orgs.extend(
                result
                    .records_as::<SubscriberOrg>()?
                    .into_iter()
                    .map(|org| (org.org_key.clone(), org)),
            );
        }

        write_csv(&self.result_file, &failures, &orgs)?;
        info!(
            "Wrote {} failed jobs to {}",
            failures.len(),
            self.result_file.display()
        );
        Ok(Some(self.result_file.clone()))
    }
}

fn build_row(job: &PushJob, error: &PushJobError, org: Option<&SubscriberOrg>) -> Vec<String> {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    let org = org.cloned().unwrap_or_default();
    let gack = error.gack();

    vec![
        field(&job.subscriber_organization_key),
        field(&org.name),
        field(&org.org_type),
        field(&org.status),
        field(&org.instance_name),
        field(&error.severity),
        field(&error.title),
        field(&error.error_type),
        field(&error.message),
        gack.as_ref().map(|g| g.gack_id.clone()).unwrap_or_default(),
        gack.map(|g| g.stacktrace_id).unwrap_or_default(),
    ]
}

fn write_csv(
    path: &Path,
    failures: &[(PushJob, PushJobError)],
    orgs: &HashMap<String, SubscriberOrg>,
) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADERS)?;
    for (job, error) in failures {
        let org = job
            .subscriber_organization_key
            .as_ref()
            .and_then(|key| orgs.get(key));
        writer.write_record(build_row(job, error, org))?;
    }
    writer.flush()?;
    Ok(())
}
