use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use tracing::debug;

use super::{truncate_text, InferenceProvider};
use crate::error::AnalysisError;
use crate::request::{ProviderRequest, RequestPart};

const ERROR_BODY_CHARS: usize = 512;
const TEMPERATURE: f64 = 0.2;

/// Google Gemini `generateContent` over HTTPS.
pub struct GeminiProvider {
    api_base: String,
    api_key: String,
    http: HttpClient,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
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

    fn build_payload(request: &ProviderRequest) -> Value {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => json!({ "text": text }),
                RequestPart::Image(image) => json!({
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.data,
                    }
                }),
            })
            .collect::<Vec<Value>>();
        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "candidateCount": 1,
                "responseMimeType": "application/json",
            },
        })
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: &Value) -> Result<String, AnalysisError> {
    let text = response
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.pointer("/content/parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<Vec<&str>>()
                .join("")
        })
        .unwrap_or_default();
    if !text.trim().is_empty() {
        return Ok(text);
    }
    let reason = response
        .pointer("/promptFeedback/blockReason")
        .or_else(|| response.pointer("/candidates/0/finishReason"))
        .and_then(Value::as_str)
        .unwrap_or("no text in response");
    Err(AnalysisError::Provider(format!(
        "Gemini returned no text ({reason})"
    )))
}

#[async_trait]
impl InferenceProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<String, AnalysisError> {
        let endpoint = self.endpoint_for_model(&request.model);
        let payload = Self::build_payload(request);
        debug!(
            domain = %request.domain,
            model = %request.model,
            images = request.images().count(),
            "posting generateContent"
        );

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                AnalysisError::Provider(format!(
                    "Gemini request failed ({endpoint}): {}",
                    err.without_url()
                ))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            AnalysisError::Provider(format!(
                "Gemini response body read failed: {}",
                err.without_url()
            ))
        })?;
        if !status.is_success() {
            return Err(AnalysisError::Provider(format!(
                "Gemini request failed ({}): {}",
                status.as_u16(),
                truncate_text(&body, ERROR_BODY_CHARS)
            )));
        }
        let parsed: Value = serde_json::from_str(&body).map_err(|err| {
            AnalysisError::Provider(format!("Gemini returned invalid JSON payload: {err}"))
        })?;
        extract_text(&parsed)
    }
}
