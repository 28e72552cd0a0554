use crate::cli::PushFailsArgs;
use crate::config::Config;
use crate::error::ConfigError;
use crate::push::PushFailureReport;
use crate::salesforce::RestClient;
use std::path::Path;
use tracing::info;

pub async fn execute(args: PushFailsArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load_or_default(config_path)?;

    let instance_url = args
        .instance_url
        .or(config.salesforce.instance_url.clone())
        .ok_or(ConfigError::MissingCredentials(
            "set --instance-url, SF_INSTANCE_URL or salesforce.instance_url",
        ))?;
    let access_token = args
        .access_token
        .ok_or(ConfigError::MissingCredentials(
            "set --access-token or SF_ACCESS_TOKEN",
        ))?;

    let client = RestClient::new(&instance_url, &config.salesforce.api_version, &access_token)?;
    let report = PushFailureReport::new(args.request_id, args.result_file);

    match report.run(&client).await? {
        Some(path) => {
            info!("Push failure report written to {}", path.display());
            println!("{}", path.display());
        }
        None => info!("No report produced"),
    }

    Ok(())
}
