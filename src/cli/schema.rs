use super::SchemaArgs;
use crate::config::Config;
use anyhow::Context;
use schemars::schema_for;
use tracing::info;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let mut schema = schema_for!(Config);
    if let Some(meta) = schema.schema.metadata.as_mut() {
        meta.title = Some("releasekit.yaml".to_string());
    }
    let json = serde_json::to_string_pretty(&schema)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write schema to {}", path.display()))?;
            info!("Wrote config schema to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
