//! Backend selection and the per-item verification entry point.
//!
//! `verify` never returns `Err`: any remote failure (timeout, HTTP error,
//! unusable response) is absorbed into a synthesized `failed` result so one
//! bad item never aborts a batch.

use super::parser::parse_verification_response;
use super::prompt::build_verification_prompt;
use super::remote::{ChatOptions, EndpointError, LlmEndpointClient};
use super::simulated::SimulatedVerifier;
use super::types::VerificationResult;
use crate::checklist::ChecklistItemDefinition;
use crate::config::VerifyConfig;

const VERIFY_TEMPERATURE: f64 = 0.1;
const VERIFY_MAX_TOKENS: u32 = 5000;

pub enum VerifyBackend {
    Remote {
        client: LlmEndpointClient,
        timeout_secs: u64,
    },
    Simulated(SimulatedVerifier),
}

impl VerifyBackend {
    pub fn from_config(config: &VerifyConfig) -> Self {
        if config.use_real_api {
            Self::Remote {
                client: LlmEndpointClient::new(config.endpoint_url.clone()),
                timeout_secs: config.verify_timeout_secs,
            }
        } else {
            Self::Simulated(SimulatedVerifier::new())
        }
    }

    /// Verify one checklist item against the document text.
    pub async fn verify(
        &self,
        token: &str,
        document_text: &str,
        item: &ChecklistItemDefinition,
    ) -> VerificationResult {
        match self {
            Self::Remote {
                client,
                timeout_secs,
            } => {
                tracing::info!(item_id = item.id, description = %item.description, "verifying via endpoint");
                match remote_verify(client, *timeout_secs, token, document_text, item).await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!(item_id = item.id, error = %e, "endpoint verification failed");
                        VerificationResult::failure(item.id, "API call failed", e.to_string())
                    }
                }
            }
            Self::Simulated(sim) => {
                tracing::info!(item_id = item.id, description = %item.description, "verifying via simulation");
                sim.verify(document_text, item).await
            }
        }
    }
}

async fn remote_verify(
    client: &LlmEndpointClient,
    timeout_secs: u64,
    token: &str,
    document_text: &str,
    item: &ChecklistItemDefinition,
) -> Result<VerificationResult, EndpointError> {
    let prompt = build_verification_prompt(document_text, item);
    let content = client
        .chat(
            token,
            &prompt,
            ChatOptions {
                temperature: VERIFY_TEMPERATURE,
                max_tokens: VERIFY_MAX_TOKENS,
                timeout_secs,
            },
        )
        .await?;
    Ok(parse_verification_response(&content).into_result(item.id))
}
