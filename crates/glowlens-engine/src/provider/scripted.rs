use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::InferenceProvider;
use crate::error::AnalysisError;
use crate::request::ProviderRequest;

/// One canned provider reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Text(String),
    /// Answers with `text` after sleeping for `delay`.
    Slow { delay: Duration, text: String },
    Error(String),
    /// Never answers.
    Hang,
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        ScriptedReply::Text(text.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        ScriptedReply::Error(message.into())
    }
}

/// Replays queued replies in order and records every request it receives.
/// Once the queue is empty every call fails with a provider error, unless a
/// repeating reply was configured with [`ScriptedProvider::repeating`].
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    repeat: Option<ScriptedReply>,
    requests: Mutex<Vec<ProviderRequest>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Answers every call with `reply`.
    pub fn repeating(reply: ScriptedReply) -> Self {
        Self {
            repeat: Some(reply),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_reply(&self) -> Option<ScriptedReply> {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .or_else(|| self.repeat.clone())
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match self.next_reply() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Slow { delay, text }) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Some(ScriptedReply::Error(message)) => Err(AnalysisError::Provider(message)),
            Some(ScriptedReply::Hang) => std::future::pending().await,
            None => Err(AnalysisError::Provider(
                "scripted provider has no replies left".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use glowlens_contracts::AnalysisDomain;

    use super::{ScriptedProvider, ScriptedReply};
    use crate::error::AnalysisError;
    use crate::provider::InferenceProvider;
    use crate::request::{ProviderRequest, RequestPart};

    fn request() -> ProviderRequest {
        ProviderRequest {
            domain: AnalysisDomain::ProgressInsight,
            model: "scripted".to_string(),
            parts: vec![RequestPart::Text("hello".to_string())],
        }
    }

    #[tokio::test]
    async fn replays_in_order_then_runs_dry() {
        let provider = ScriptedProvider::new([
            ScriptedReply::error("first fails"),
            ScriptedReply::text("{}"),
        ]);
        assert_eq!(
            provider.generate(&request()).await,
            Err(AnalysisError::Provider("first fails".to_string()))
        );
        assert_eq!(provider.generate(&request()).await, Ok("{}".to_string()));
        assert!(provider.generate(&request()).await.is_err());
        assert_eq!(provider.calls(), 3);
        assert_eq!(provider.requests()[0].instruction(), "hello");
    }

    #[tokio::test]
    async fn repeating_reply_never_runs_dry() {
        let provider = ScriptedProvider::repeating(ScriptedReply::text("same"));
        for _ in 0..4 {
            assert_eq!(provider.generate(&request()).await, Ok("same".to_string()));
        }
        assert_eq!(provider.calls(), 4);
    }
}
