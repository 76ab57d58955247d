mod gemini;
mod scripted;

pub use gemini::GeminiProvider;
pub use scripted::{ScriptedProvider, ScriptedReply};

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::request::ProviderRequest;

/// The one seam between the orchestrator and a model vendor. Implementations
/// return the raw reply text; parsing happens in [`crate::parser`].
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &ProviderRequest) -> Result<String, AnalysisError>;
}

pub(crate) fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}
