//! Analysis orchestration: turns a domain input plus photos into a typed
//! result, through the inference provider when it can and through the
//! deterministic fallback generators when it cannot.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod observe;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod provider;
pub mod request;
pub mod retry;

pub use config::{AnalysisConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use descriptor::{deadline_for, DomainDescriptor};
pub use error::AnalysisError;
pub use executor::BoundedExecutor;
pub use observe::{AnalysisObserver, JsonlObserver, ObserverSet, TracingObserver};
pub use orchestrator::{AnalysisOutcome, Orchestrator};
pub use provider::{GeminiProvider, InferenceProvider, ScriptedProvider, ScriptedReply};
pub use request::{EncodedImage, MultimodalRequestBuilder, ProviderRequest, RequestPart};
pub use retry::RetryPolicy;
