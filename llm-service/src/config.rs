//! Env-driven configuration for LLM model invocations.

use crate::error_handler::{
    ConfigError, LlmResult, env_opt_f32, env_opt_u32, must_env, validate_http_endpoint,
};

/// Default model when `OPENAI_MODEL` is unset.
const DEFAULT_MODEL: &str = "gpt-4";

/// Default API base when `OPENAI_BASE_URL` is unset.
const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Low default temperature keeps review output consistent across runs.
const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Configuration for an LLM model invocation.
///
/// # Fields
/// - `model`: model identifier (e.g., `"gpt-4"`).
/// - `endpoint`: API base URL (the `/v1/...` path is appended by the client).
/// - `api_key`: bearer token for authentication.
/// - `max_tokens`: optional generation cap.
/// - `temperature`: sampling temperature (defaults low for reviews).
/// - `timeout_secs`: optional request timeout in seconds.
#[derive(Debug, Clone)]
pub struct LlmModelConfig {
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Builds a config from environment variables.
    ///
    /// Required: `OPENAI_API_KEY`. Optional: `OPENAI_MODEL`,
    /// `OPENAI_BASE_URL`, `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`,
    /// `LLM_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// [`ConfigError`] variants for a missing key, an empty model name, an
    /// endpoint without an http scheme, or unparsable numbers.
    pub fn from_env() -> LlmResult<Self> {
        let api_key = must_env("OPENAI_API_KEY")?;

        let model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let endpoint =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;

        let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
        let temperature = env_opt_f32("LLM_TEMPERATURE")?.or(Some(DEFAULT_TEMPERATURE));
        let timeout_secs = env_opt_u32("LLM_TIMEOUT_SECS")?.map(u64::from);

        Ok(Self {
            model,
            endpoint,
            api_key: Some(api_key),
            max_tokens,
            temperature,
            timeout_secs,
        })
    }
}
