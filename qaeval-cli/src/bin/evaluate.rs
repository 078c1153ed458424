use anyhow::Result;
use clap::Parser;
use qaeval_cli::EvaluateCli;
use qaeval_cli::runner::{configure_azure, default_models, run};
use qaeval_model::ServiceSettings;
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = EvaluateCli::parse();
    dotenvy::dotenv().ok();
    qaeval_telemetry::init_telemetry("qaeval-evaluate")
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let settings = ServiceSettings::from_env();
    let mut out = std::io::stdout().lock();

    writeln!(out, "RAGAS Evaluation Script with Azure OpenAI")?;
    writeln!(out, "{}", "=".repeat(40))?;
    writeln!(out, "\nConfiguring Azure OpenAI...")?;

    let azure = configure_azure(&settings, &mut out)?;
    if azure.is_none() {
        writeln!(out, "Falling back to default OpenAI configuration...")?;
    }
    let defaults = default_models(&settings);

    if !run(&cli.run_options(), azure, defaults, &mut out).await? {
        out.flush()?;
        std::process::exit(1);
    }
    Ok(())
}
