//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One request per call: no streaming, no retries, and no client-side
//! timeout beyond whatever the remote service enforces.

use crate::config::GeminiConfig;
use crate::messages::{GenerateContentRequest, GenerateContentResponse, InlineData};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client bound to one [`GeminiConfig`].
pub struct GeminiApi {
    client: reqwest::Client,
    config: GeminiConfig,
}

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiApiError {
    /// No API key was configured at startup.
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code (quota, auth, bad request).
    #[error("Gemini API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response parsed but contained no text candidate.
    #[error("Gemini response contained no text")]
    EmptyResponse,
}

impl GeminiApi {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Model name from the injected configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate text from one image and one instruction.
    ///
    /// Sends `POST {base_url}/models/{model}:generateContent` and returns
    /// the concatenated text of the first candidate exactly as received.
    pub async fn generate_content(
        &self,
        model: &str,
        instruction: &str,
        image: &InlineData,
    ) -> Result<String, GeminiApiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GeminiApiError::MissingApiKey)?;

        let body = GenerateContentRequest::image_with_instruction(image, instruction);

        tracing::debug!(
            model,
            mime_type = %image.mime_type,
            payload_bytes = image.data.len(),
            "Sending generateContent request",
        );

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.base_url, model
            ))
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed = response.json::<GenerateContentResponse>().await?;

        parsed.text().ok_or(GeminiApiError::EmptyResponse)
    }

    /// Returns the response unchanged on a success status, otherwise a
    /// [`GeminiApiError::ApiError`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeminiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
