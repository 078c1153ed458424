//! Azure OpenAI configuration check
//!
//! Reports which variables are set, then makes one chat call and one
//! embedding call against the configured deployments. Nothing is built or
//! called when a required variable is missing.

use qaeval_core::{Content, Embedder, Llm, LlmRequest};
use qaeval_model::settings::{AZURE_VARS, OPENAI_API_KEY};
use qaeval_model::{ServiceSettings, mask_secret};
use std::io::{self, Write};
use std::sync::Arc;

pub const CHAT_PROBE: &str = "Hello, how are you?";
pub const EMBEDDING_PROBE: &str = "Hello world";

/// Characters of the chat reply shown on success.
const PREVIEW_CHARS: usize = 100;

/// Variables listed in the failure hint.
const HINT_VARS: [&str; 4] = [
    "AZURE_OPENAI_API_KEY",
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_MODEL_DEPLOYMENT",
    "AZURE_OPENAI_EMBEDDING_DEPLOYMENT",
];

/// Chat and embedding handles under test.
pub type ServicePair = (Arc<dyn Llm>, Arc<dyn Embedder>);

/// Outcome of a successful connectivity probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub reply_preview: String,
    pub embedding_dimension: usize,
}

/// One line per Azure variable plus the OpenAI fallback key.
pub fn environment_report(settings: &ServiceSettings) -> Vec<String> {
    let mut lines: Vec<String> = AZURE_VARS
        .iter()
        .map(|(name, description)| match settings.raw(name) {
            Some(value) if name.contains("API_KEY") => {
                format!("✅ {description}: {}", mask_secret(value))
            }
            Some(value) => format!("✅ {description}: {value}"),
            None => format!("❌ {description}: Not set"),
        })
        .collect();

    lines.push(match settings.raw(OPENAI_API_KEY) {
        Some(key) => format!("✅ OpenAI API Key (fallback): {}", mask_secret(key)),
        None => "⚠️ OpenAI API Key (fallback): Not set".to_string(),
    });
    lines
}

/// Effective configuration with defaults applied.
pub fn configuration_report(settings: &ServiceSettings) -> Vec<String> {
    let endpoint = settings.azure_endpoint.as_deref().unwrap_or_default();
    let embedding = settings.embedding_deployment();
    vec![
        format!("  Endpoint: {endpoint}"),
        format!("  API Version: {}", settings.api_version()),
        format!("  Model Deployment: {}", settings.model_deployment()),
        format!("  Embedding Deployment: {embedding}"),
    ]
}

/// Make one chat call and one embedding call.
pub async fn probe(llm: &dyn Llm, embedder: &dyn Embedder) -> qaeval_core::Result<ProbeReport> {
    let messages = vec![Content::user(CHAT_PROBE)];
    let request = LlmRequest::new(llm.name(), messages).with_temperature(0.0);
    let response = llm.generate(request).await?;
    let reply_preview: String = response.text().chars().take(PREVIEW_CHARS).collect();

    let embedding = embedder.embed_query(EMBEDDING_PROBE).await?;

    Ok(ProbeReport {
        reply_preview,
        embedding_dimension: embedding.len(),
    })
}

/// Build the Azure clients described by `settings`.
pub fn azure_services(settings: &ServiceSettings) -> qaeval_core::Result<ServicePair> {
    let (llm, embedder) = settings.azure_clients()?;
    Ok((Arc::new(llm), Arc::new(embedder)))
}

/// Run the full check, writing the console report to `out`.
///
/// `build` is only called once every required variable is present.
/// Returns whether the configuration works.
pub async fn run_check<W, F>(settings: &ServiceSettings, out: &mut W, build: F) -> io::Result<bool>
where
    W: Write,
    F: FnOnce(&ServiceSettings) -> qaeval_core::Result<ServicePair>,
{
    let rule = "=".repeat(40);

    writeln!(out, "\n{rule}")?;
    writeln!(out, "Environment Variables Check")?;
    writeln!(out, "{rule}")?;
    for line in environment_report(settings) {
        writeln!(out, "{line}")?;
    }

    writeln!(out, "\nTesting Azure OpenAI Configuration")?;
    writeln!(out, "{rule}")?;

    let success = check_services(settings, out, build).await?;

    if success {
        writeln!(out, "\n🎉 All tests passed! Ready to run RAGAS evaluation.")?;
    } else {
        writeln!(out, "\n💡 Please check your Azure OpenAI configuration.")?;
        writeln!(
            out,
            "   Make sure the following environment variables are set:"
        )?;
        for name in HINT_VARS {
            writeln!(out, "   - {name}")?;
        }
    }
    Ok(success)
}

async fn check_services<W, F>(settings: &ServiceSettings, out: &mut W, build: F) -> io::Result<bool>
where
    W: Write,
    F: FnOnce(&ServiceSettings) -> qaeval_core::Result<ServicePair>,
{
    let missing = settings.missing_required();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "required variables not set");
        let missing = missing.join(", ");
        writeln!(out, "❌ Missing required environment variables: {missing}")?;
        return Ok(false);
    }

    writeln!(out, "Configuration:")?;
    for line in configuration_report(settings) {
        writeln!(out, "{line}")?;
    }

    let (llm, embedder) = match build(settings) {
        Ok(services) => services,
        Err(e) => {
            writeln!(out, "\n❌ Azure OpenAI configuration test failed: {e}")?;
            return Ok(false);
        }
    };

    writeln!(out, "\n🔄 Testing Azure OpenAI LLM and Embeddings...")?;
    match probe(llm.as_ref(), embedder.as_ref()).await {
        Ok(report) => {
            writeln!(out, "✅ LLM Response: {}...", report.reply_preview)?;
            writeln!(out, "✅ Embedding dimension: {}", report.embedding_dimension)?;
            writeln!(out, "\n✅ Azure OpenAI configuration test passed!")?;
            Ok(true)
        }
        Err(e) => {
            tracing::error!(error = %e, "connectivity probe failed");
            writeln!(out, "\n❌ Azure OpenAI configuration test failed: {e}")?;
            Ok(false)
        }
    }
}
