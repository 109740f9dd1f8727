/// Default pinned model for avatar descriptions.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Public Gemini REST endpoint (v1beta).
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Credential and endpoint configuration for [`GeminiApi`](crate::GeminiApi).
///
/// Read once at process startup and injected into the client, so tests can
/// point it at a local server with a fake key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`. `None` makes every request fail
    /// with [`GeminiApiError::MissingApiKey`](crate::GeminiApiError::MissingApiKey).
    pub api_key: Option<String>,
    /// Model name used in `models/{model}:generateContent`.
    pub model: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default                                            |
    /// |-------------------|----------------------------------------------------|
    /// | `GEMINI_API_KEY`  | falls back to `API_KEY`, otherwise unset           |
    /// | `GEMINI_MODEL`    | `gemini-2.5-flash`                                 |
    /// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta` |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        if api_key.is_none() {
            tracing::warn!("No Gemini API key configured; avatar descriptions will fail");
        }

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        Self {
            api_key,
            model,
            base_url,
        }
    }
}
