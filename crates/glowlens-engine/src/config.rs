use std::env;

use crate::retry::RetryPolicy;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Everything the orchestrator needs to decide between the provider and the
/// fallback path. Built once and handed to [`crate::Orchestrator::new`].
#[derive(Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub force_mock: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub retry: RetryPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            force_mock: false,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("force_mock", &self.force_mock)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("retry", &self.retry)
            .finish()
    }
}

impl AnalysisConfig {
    /// A config that never touches the provider.
    pub fn mock() -> Self {
        Self {
            force_mock: true,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the same keys as [`AnalysisConfig::from_env`] through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let force_mock = non_empty("GLOWLENS_FORCE_MOCK")
            .and_then(|value| value_as_bool(&value))
            .unwrap_or(false);
        let api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY"));
        let model = non_empty("GLOWLENS_MODEL")
            .or_else(|| non_empty("GEMINI_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = non_empty("GEMINI_API_BASE")
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            force_mock,
            api_key,
            model,
            api_base,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_force_mock(mut self, force_mock: bool) -> Self {
        self.force_mock = force_mock;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

fn value_as_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
