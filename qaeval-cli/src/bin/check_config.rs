use anyhow::Result;
use clap::Parser;
use qaeval_cli::CheckConfigCli;
use qaeval_cli::config_check::{azure_services, run_check};
use qaeval_model::ServiceSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _cli = CheckConfigCli::parse();
    dotenvy::dotenv().ok();
    qaeval_telemetry::init_telemetry("qaeval-check-config")
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let settings = ServiceSettings::from_env();
    let passed = run_check(&settings, &mut std::io::stdout().lock(), azure_services).await?;

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
