use std::env;
use std::time::Duration;

/// Environment variable holding the completion API key.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the completion endpoint base URL.
pub const BASE_URL_VAR: &str = "LLM_PROBE_BASE_URL";

/// Environment variable overriding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "LLM_PROBE_TIMEOUT_SECS";

/// Configuration for the completion backend.
///
/// Built once from the process environment and passed into the client
/// constructor, so tests can inject fake endpoints and credentials.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Base URL of the OpenAI-compatible API endpoint
    pub base_url: String,
    /// Optional API key for authentication
    pub api_key: Option<String>,
    /// Request timeout duration
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout: Duration::from_secs(default_timeout_secs()),
        }
    }
}

impl ProbeConfig {
    /// Read the configuration from the process environment.
    ///
    /// Call after any `.env` file has been loaded. Unset variables fall
    /// back to the defaults; a missing API key only surfaces once the
    /// backend rejects a request.
    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_VAR)
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_base_url);

        let api_key = env::var(API_KEY_VAR).ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var(TIMEOUT_VAR)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(default_timeout_secs);

        Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    180
}
