use famopt_contracts::error::AnalysisError;
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use tracing::debug;

use super::{error_chain_text, truncate_text, AnalysisProvider};
use crate::config::{EngineConfig, API_KEY_ENV_VARS};
use crate::request::AnalysisRequest;

const PROVIDER_LABEL: &str = "Gemini";
const ERROR_BODY_MAX_CHARS: usize = 512;

/// Google Gemini `generateContent` with schema-constrained JSON output.
pub struct GeminiProvider {
    api_base: String,
    api_key: Option<String>,
    model: String,
    http: HttpClient,
}

impl GeminiProvider {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            api_base: config.api_base.trim().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            http: HttpClient::new(),
        }
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    /// Concatenated text parts of the first candidate.
    fn extract_response_text(response_payload: &Value) -> String {
        response_payload
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl AnalysisProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AnalysisError::MissingCredential(
                API_KEY_ENV_VARS.join(" or "),
            ));
        };
        let endpoint = self.endpoint_for_model(&self.model);
        let payload = request.to_generate_content_payload();
        debug!(
            endpoint = %endpoint,
            has_image = request.image.is_some(),
            instruction_chars = request.instruction.chars().count(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .map_err(|err| {
                AnalysisError::transport(
                    PROVIDER_LABEL,
                    error_chain_text(&err.without_url(), ERROR_BODY_MAX_CHARS),
                )
            })?;

        let status = response.status();
        let body = response.text().map_err(|err| {
            AnalysisError::transport(
                PROVIDER_LABEL,
                format!(
                    "response body read failed: {}",
                    error_chain_text(&err.without_url(), ERROR_BODY_MAX_CHARS)
                ),
            )
        })?;
        if !status.is_success() {
            return Err(AnalysisError::Service {
                provider: PROVIDER_LABEL.to_string(),
                status: status.as_u16(),
                body: truncate_text(&body, ERROR_BODY_MAX_CHARS),
            });
        }

        let response_payload: Value = serde_json::from_str(&body).map_err(|err| {
            AnalysisError::transport(
                PROVIDER_LABEL,
                format!("returned invalid JSON payload: {err}"),
            )
        })?;
        let text = Self::extract_response_text(&response_payload);
        debug!(response_chars = text.chars().count(), "received generateContent response");
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(text)
    }
}
