use std::sync::Arc;

use glowlens_contracts::domains::body_shape::{BodyShapeAnalysis, BodyShapeInput};
use glowlens_contracts::domains::exercise::{ExerciseInput, ExercisePlan};
use glowlens_contracts::domains::personal_color::{PersonalColorAnalysis, PersonalColorInput};
use glowlens_contracts::domains::progress::{ProgressInput, ProgressInsights};
use glowlens_contracts::domains::skin::{SkinAnalysis, SkinInput};
use glowlens_contracts::domains::workout::{WorkoutTypeAnalysis, WorkoutTypeInput};
use glowlens_contracts::events::{AnalysisEvent, EventStage, FailureKind};
use glowlens_contracts::{ImageInput, ResultContract};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::descriptor::{
    DomainDescriptor, BODY_SHAPE, EXERCISE, PERSONAL_COLOR, PROGRESS, SKIN, WORKOUT_TYPE,
};
use crate::error::AnalysisError;
use crate::executor::BoundedExecutor;
use crate::fallback::fallback_seed;
use crate::observe::{AnalysisObserver, TracingObserver};
use crate::parser::parse_contract;
use crate::provider::{GeminiProvider, InferenceProvider};
use crate::request::MultimodalRequestBuilder;

/// Which path a call took. Both variants carry the same contract type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome<R> {
    ProviderSuccess(R),
    FallbackUsed { result: R, reason: FailureKind },
}

impl<R> AnalysisOutcome<R> {
    pub fn result(&self) -> &R {
        match self {
            AnalysisOutcome::ProviderSuccess(result) => result,
            AnalysisOutcome::FallbackUsed { result, .. } => result,
        }
    }

    pub fn into_result(self) -> R {
        match self {
            AnalysisOutcome::ProviderSuccess(result) => result,
            AnalysisOutcome::FallbackUsed { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisOutcome::FallbackUsed { .. })
    }

    pub fn fallback_reason(&self) -> Option<FailureKind> {
        match self {
            AnalysisOutcome::ProviderSuccess(_) => None,
            AnalysisOutcome::FallbackUsed { reason, .. } => Some(*reason),
        }
    }
}

/// Provider availability, fixed when the orchestrator is built.
enum ProviderState {
    ForceMock,
    Unconfigured,
    Live(Arc<dyn InferenceProvider>),
}

/// Runs one analysis call end to end: template, request, bounded and retried
/// provider call, parse, and the fallback path for every failure except a bad
/// input image.
pub struct Orchestrator {
    config: AnalysisConfig,
    state: ProviderState,
    observer: Arc<dyn AnalysisObserver>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("provider", &self.provider_name())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Resolves the provider from `config`: force-mock wins, then a missing
    /// credential, otherwise Gemini.
    pub fn new(config: AnalysisConfig) -> Self {
        let state = match config.api_key.as_deref() {
            _ if config.force_mock => ProviderState::ForceMock,
            Some(key) if config.has_credentials() => ProviderState::Live(Arc::new(
                GeminiProvider::new(config.api_base.clone(), key.trim()),
            )),
            _ => ProviderState::Unconfigured,
        };
        Self::with_state(config, state)
    }

    /// Uses `provider` instead of Gemini. The force-mock flag still applies;
    /// the credential check does not.
    pub fn with_provider(config: AnalysisConfig, provider: Arc<dyn InferenceProvider>) -> Self {
        let state = if config.force_mock {
            ProviderState::ForceMock
        } else {
            ProviderState::Live(provider)
        };
        Self::with_state(config, state)
    }

    fn with_state(config: AnalysisConfig, state: ProviderState) -> Self {
        Self {
            config,
            state,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn AnalysisObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        match &self.state {
            ProviderState::ForceMock => "force-mock",
            ProviderState::Unconfigured => "unconfigured",
            ProviderState::Live(provider) => provider.name(),
        }
    }

    /// Full analysis with provenance. The only error is
    /// [`AnalysisError::InvalidImageEncoding`], raised before the provider is
    /// contacted: for an undecodable image, a photo domain called without a
    /// primary image, or auxiliary images without a primary one.
    pub async fn analyze_outcome<I, R>(
        &self,
        descriptor: &DomainDescriptor<I, R>,
        input: &I,
        primary: Option<&ImageInput>,
        auxiliary: &[ImageInput],
    ) -> Result<AnalysisOutcome<R>, AnalysisError>
    where
        I: Serialize,
        R: ResultContract,
    {
        let call = CallContext {
            call_id: Uuid::new_v4().to_string(),
            started: Instant::now(),
            observer: self.observer.as_ref(),
            model: &self.config.model,
        };
        call.emit(AnalysisEvent::new(
            &call.call_id,
            descriptor.domain,
            EventStage::Started,
        ));

        if let Err(err) = check_photos(descriptor, primary, auxiliary) {
            return Err(reject(&call, descriptor, err));
        }

        let provider = match &self.state {
            ProviderState::ForceMock => {
                return Ok(self.fallback(
                    &call,
                    descriptor,
                    input,
                    FailureKind::ForceMock,
                    "force-mock is enabled",
                ));
            }
            ProviderState::Unconfigured => {
                let err = AnalysisError::ConfigurationAbsent;
                return Ok(self.fallback(&call, descriptor, input, err.kind(), &err.to_string()));
            }
            ProviderState::Live(provider) => Arc::clone(provider),
        };

        let instruction = (descriptor.template)(input);
        let request = match MultimodalRequestBuilder::build(
            descriptor.domain,
            &self.config.model,
            instruction,
            primary,
            auxiliary,
        ) {
            Ok(request) => Arc::new(request),
            Err(err) => return Err(reject(&call, descriptor, err)),
        };

        let executor = BoundedExecutor::new(descriptor.deadline);
        let reply = self
            .config
            .retry
            .run(
                descriptor.domain.as_str(),
                |attempt, err: &AnalysisError| {
                    call.emit(
                        AnalysisEvent::new(&call.call_id, descriptor.domain, EventStage::AttemptFailed)
                            .with_attempt(attempt)
                            .with_failure(err.kind(), err.to_string()),
                    );
                },
                |attempt| {
                    debug!(
                        domain = %descriptor.domain,
                        attempt,
                        provider = provider.name(),
                        "calling provider"
                    );
                    let provider = Arc::clone(&provider);
                    let request = Arc::clone(&request);
                    async move {
                        executor
                            .run(async move { provider.generate(&request).await })
                            .await
                    }
                },
            )
            .await;

        let parsed = reply.and_then(|text| parse_contract::<R>(&text));
        match parsed {
            Ok(result) => {
                info!(
                    domain = %descriptor.domain,
                    elapsed_ms = call.elapsed_ms(),
                    "provider result accepted"
                );
                call.emit(AnalysisEvent::new(
                    &call.call_id,
                    descriptor.domain,
                    EventStage::ProviderSucceeded,
                ));
                Ok(AnalysisOutcome::ProviderSuccess(result))
            }
            Err(err) => Ok(self.fallback(&call, descriptor, input, err.kind(), &err.to_string())),
        }
    }

    /// Like [`Orchestrator::analyze_outcome`] without provenance.
    pub async fn analyze<I, R>(
        &self,
        descriptor: &DomainDescriptor<I, R>,
        input: &I,
        primary: Option<&ImageInput>,
        auxiliary: &[ImageInput],
    ) -> Result<R, AnalysisError>
    where
        I: Serialize,
        R: ResultContract,
    {
        self.analyze_outcome(descriptor, input, primary, auxiliary)
            .await
            .map(AnalysisOutcome::into_result)
    }

    pub async fn analyze_skin(
        &self,
        input: &SkinInput,
        primary: &ImageInput,
        auxiliary: &[ImageInput],
    ) -> Result<SkinAnalysis, AnalysisError> {
        self.analyze(&SKIN, input, Some(primary), auxiliary).await
    }

    pub async fn analyze_body_shape(
        &self,
        input: &BodyShapeInput,
        primary: &ImageInput,
        auxiliary: &[ImageInput],
    ) -> Result<BodyShapeAnalysis, AnalysisError> {
        self.analyze(&BODY_SHAPE, input, Some(primary), auxiliary).await
    }

    /// A wrist photo among `auxiliary` enables the vein-color rule.
    pub async fn analyze_personal_color(
        &self,
        input: &PersonalColorInput,
        primary: &ImageInput,
        auxiliary: &[ImageInput],
    ) -> Result<PersonalColorAnalysis, AnalysisError> {
        self.analyze(&PERSONAL_COLOR, input, Some(primary), auxiliary)
            .await
    }

    pub async fn analyze_workout_type(
        &self,
        input: &WorkoutTypeInput,
        primary: Option<&ImageInput>,
    ) -> Result<WorkoutTypeAnalysis, AnalysisError> {
        self.analyze(&WORKOUT_TYPE, input, primary, &[]).await
    }

    pub async fn recommend_exercises(
        &self,
        input: &ExerciseInput,
        primary: Option<&ImageInput>,
    ) -> Result<ExercisePlan, AnalysisError> {
        self.analyze(&EXERCISE, input, primary, &[]).await
    }

    pub async fn analyze_progress(
        &self,
        input: &ProgressInput,
        primary: Option<&ImageInput>,
    ) -> Result<ProgressInsights, AnalysisError> {
        self.analyze(&PROGRESS, input, primary, &[]).await
    }

    fn fallback<I, R>(
        &self,
        call: &CallContext<'_>,
        descriptor: &DomainDescriptor<I, R>,
        input: &I,
        reason: FailureKind,
        detail: &str,
    ) -> AnalysisOutcome<R>
    where
        I: Serialize,
    {
        if reason == FailureKind::ForceMock {
            info!(domain = %descriptor.domain, failure_kind = %reason, "serving fallback result");
        } else {
            warn!(
                domain = %descriptor.domain,
                failure_kind = %reason,
                detail,
                "serving fallback result"
            );
        }
        call.emit(
            AnalysisEvent::new(&call.call_id, descriptor.domain, EventStage::FallbackUsed)
                .with_failure(reason, detail),
        );

        let seed = fallback_seed(descriptor.domain, Some(input));
        debug!(domain = %descriptor.domain, seed = %hex::encode(&seed[..8]), "seeding fallback");
        let mut rng = StdRng::from_seed(seed);
        let result = (descriptor.fallback)(Some(input), &mut rng);
        AnalysisOutcome::FallbackUsed { result, reason }
    }
}

/// Photo domains need a primary image, and extra angles only make sense next
/// to one.
fn check_photos<I, R>(
    descriptor: &DomainDescriptor<I, R>,
    primary: Option<&ImageInput>,
    auxiliary: &[ImageInput],
) -> Result<(), AnalysisError> {
    if primary.is_some() {
        return Ok(());
    }
    if descriptor.photo_required {
        return Err(AnalysisError::InvalidImageEncoding(format!(
            "{} analysis requires a primary image",
            descriptor.domain
        )));
    }
    if !auxiliary.is_empty() {
        return Err(AnalysisError::InvalidImageEncoding(
            "auxiliary images were given without a primary image".to_string(),
        ));
    }
    Ok(())
}

fn reject<I, R>(
    call: &CallContext<'_>,
    descriptor: &DomainDescriptor<I, R>,
    err: AnalysisError,
) -> AnalysisError {
    warn!(domain = %descriptor.domain, error = %err, "rejecting analysis input");
    call.emit(
        AnalysisEvent::new(&call.call_id, descriptor.domain, EventStage::Rejected)
            .with_failure(err.kind(), err.to_string()),
    );
    err
}

struct CallContext<'a> {
    call_id: String,
    started: Instant,
    observer: &'a dyn AnalysisObserver,
    model: &'a str,
}

impl CallContext<'_> {
    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn emit(&self, event: AnalysisEvent) {
        let event = event
            .with_elapsed_ms(self.elapsed_ms())
            .with_model(self.model);
        self.observer.record(&event);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;

    use glowlens_contracts::domains::body_shape::{BodyShapeAnalysis, BodyShapeInput};
    use glowlens_contracts::domains::exercise::ExercisePlan;
    use glowlens_contracts::domains::personal_color::{PersonalColorAnalysis, PersonalColorInput, Season};
    use glowlens_contracts::domains::progress::ProgressInsights;
    use glowlens_contracts::domains::skin::{SkinAnalysis, SkinInput};
    use glowlens_contracts::domains::workout::{WorkoutTypeAnalysis, WorkoutTypeInput};
    use glowlens_contracts::events::{EventStage, FailureKind};
    use glowlens_contracts::{conform, ImageAngle, ImageInput, ReliabilityTier, ResultContract};
    use serde_json::{json, Value};
    use tokio::time::Instant;

    use super::{AnalysisOutcome, Orchestrator};
    use crate::config::AnalysisConfig;
    use crate::descriptor::{BODY_SHAPE, PERSONAL_COLOR, SKIN, WORKOUT_TYPE};
    use crate::error::AnalysisError;
    use crate::observe::recording::RecordingObserver;
    use crate::provider::{ScriptedProvider, ScriptedReply};
    use crate::retry::RetryPolicy;
    use crate::test_support::{png_bytes, sample_exercise_input, sample_progress_input, sample_workout_input};

    fn live_config() -> AnalysisConfig {
        AnalysisConfig::default().with_api_key("test-key")
    }

    fn workout_reply() -> String {
        json!({
            "workoutType": "strength",
            "confidence": 81,
            "reasoning": "Muscle gain goal, no injuries, dumbbells at home.",
            "recommendedExercises": [
                {"name": "Goblet squat", "focus": "legs", "sets": 3, "reps": "8-12"}
            ],
            "weeklyFrequency": 3,
            "cautions": [],
            "imageQuality": {
                "lighting": "unknown",
                "makeupDetected": false,
                "obstructionDetected": false,
                "reliability": "low"
            }
        })
        .to_string()
    }

    fn personal_color_reply() -> String {
        format!(
            "```json\n{}\n```",
            json!({
                "season": "summer",
                "undertone": "cool",
                "confidence": 77,
                "bestColors": ["#B0C4DE", "#D8BFD8", "#E6A8D7", "#87A9C9", "#C3B1E1"],
                "avoidColors": ["#FF8C00", "#DAA520", "#8B4513"],
                "summary": "Cool undertone with soft contrast."
            })
        )
    }

    fn primary() -> ImageInput {
        ImageInput::from_bytes(png_bytes(12, 16)).with_angle(ImageAngle::Front)
    }

    fn assert_conforms<R: ResultContract>(result: &R) {
        let value = serde_json::to_value(result).unwrap();
        conform::<R>(value).unwrap();
        let quality = result.image_quality().unwrap();
        assert_eq!(quality.reliability, ReliabilityTier::Low);
    }

    async fn run_all_domains(orchestrator: &Orchestrator) {
        let image = primary();
        let skin: SkinAnalysis = orchestrator
            .analyze_skin(&Default::default(), &image, &[])
            .await
            .unwrap();
        assert_conforms(&skin);
        let body: BodyShapeAnalysis = orchestrator
            .analyze_body_shape(&BodyShapeInput::default(), &image, &[])
            .await
            .unwrap();
        assert_conforms(&body);
        let color: PersonalColorAnalysis = orchestrator
            .analyze_personal_color(&PersonalColorInput::default(), &image, &[])
            .await
            .unwrap();
        assert_conforms(&color);
        let workout: WorkoutTypeAnalysis = orchestrator
            .analyze_workout_type(&sample_workout_input(), None)
            .await
            .unwrap();
        assert_conforms(&workout);
        let plan: ExercisePlan = orchestrator
            .recommend_exercises(&sample_exercise_input(), None)
            .await
            .unwrap();
        assert_conforms(&plan);
        let progress: ProgressInsights = orchestrator
            .analyze_progress(&sample_progress_input(), None)
            .await
            .unwrap();
        assert_conforms(&progress);
    }

    #[tokio::test(start_paused = true)]
    async fn every_domain_answers_under_force_mock() {
        let recorder = RecordingObserver::default();
        let orchestrator =
            Orchestrator::new(AnalysisConfig::mock()).with_observer(Arc::new(recorder.clone()));
        run_all_domains(&orchestrator).await;
        assert_eq!(recorder.fallback_kind(), Some(FailureKind::ForceMock));
        assert_eq!(orchestrator.provider_name(), "force-mock");
    }

    #[tokio::test(start_paused = true)]
    async fn every_domain_answers_without_credentials() {
        let recorder = RecordingObserver::default();
        let orchestrator =
            Orchestrator::new(AnalysisConfig::default()).with_observer(Arc::new(recorder.clone()));
        run_all_domains(&orchestrator).await;
        assert_eq!(recorder.fallback_kind(), Some(FailureKind::ConfigurationAbsent));
    }

    #[tokio::test(start_paused = true)]
    async fn every_domain_answers_when_the_provider_is_down() {
        let provider = Arc::new(ScriptedProvider::repeating(ScriptedReply::error("503")));
        let orchestrator = Orchestrator::with_provider(live_config(), provider.clone());
        run_all_domains(&orchestrator).await;
        assert_eq!(provider.calls(), 6 * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn force_mock_never_calls_the_provider() {
        let provider = Arc::new(ScriptedProvider::repeating(ScriptedReply::text(workout_reply())));
        let orchestrator = Orchestrator::with_provider(AnalysisConfig::mock(), provider.clone());
        let outcome = orchestrator
            .analyze_outcome(&WORKOUT_TYPE, &sample_workout_input(), None, &[])
            .await
            .unwrap();
        assert_eq!(outcome.fallback_reason(), Some(FailureKind::ForceMock));
        assert!(!outcome.result().recommended_exercises.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn valid_reply_is_a_provider_success() {
        let provider = Arc::new(ScriptedProvider::new([ScriptedReply::text(workout_reply())]));
        let recorder = RecordingObserver::default();
        let orchestrator = Orchestrator::with_provider(live_config(), provider.clone())
            .with_observer(Arc::new(recorder.clone()));
        let outcome = orchestrator
            .analyze_outcome(&WORKOUT_TYPE, &sample_workout_input(), None, &[])
            .await
            .unwrap();
        assert!(matches!(outcome, AnalysisOutcome::ProviderSuccess(_)));
        assert_eq!(outcome.result().confidence, 81);
        assert_eq!(provider.calls(), 1);
        assert_eq!(
            recorder.stages(),
            vec![EventStage::Started, EventStage::ProviderSucceeded]
        );
        let request = &provider.requests()[0];
        assert_eq!(request.model, crate::config::DEFAULT_MODEL);
        assert!(request.instruction().contains("- Goals: build muscle"));
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_reply_falls_back_without_retrying() {
        for reply in [
            "```json\n{not valid json```",
            "Sorry, I can only describe the photo in words.",
        ] {
            let provider = Arc::new(ScriptedProvider::repeating(ScriptedReply::text(reply)));
            let recorder = RecordingObserver::default();
            let orchestrator = Orchestrator::with_provider(live_config(), provider.clone())
                .with_observer(Arc::new(recorder.clone()));
            let outcome = orchestrator
                .analyze_outcome(&WORKOUT_TYPE, &sample_workout_input(), None, &[])
                .await
                .unwrap();
            assert_eq!(outcome.fallback_reason(), Some(FailureKind::MalformedResponse));
            assert_eq!(provider.calls(), 1);
            assert_eq!(recorder.fallback_kind(), Some(FailureKind::MalformedResponse));
            assert_conforms(outcome.result());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn season_undertone_mismatch_is_malformed() {
        let reply = json!({
            "season": "winter",
            "undertone": "warm",
            "confidence": 88,
            "bestColors": ["#000080", "#DC143C", "#FFFFFF", "#4B0082", "#008B8B"],
            "avoidColors": ["#FF8C00", "#DAA520"],
            "summary": "Striking contrast."
        })
        .to_string();
        let provider = Arc::new(ScriptedProvider::repeating(ScriptedReply::text(reply)));
        let orchestrator = Orchestrator::with_provider(live_config(), provider.clone());
        let outcome = orchestrator
            .analyze_outcome(&PERSONAL_COLOR, &PersonalColorInput::default(), Some(&primary()), &[])
            .await
            .unwrap();
        assert_eq!(outcome.fallback_reason(), Some(FailureKind::MalformedResponse));
        assert_eq!(provider.calls(), 1);
        let result = outcome.result();
        assert_eq!(result.undertone, result.season.undertone());
    }

    #[tokio::test(start_paused = true)]
    async fn photo_domains_reject_a_missing_primary_image() {
        let provider = Arc::new(ScriptedProvider::repeating(ScriptedReply::text(
            personal_color_reply(),
        )));
        let recorder = RecordingObserver::default();
        let orchestrator = Orchestrator::with_provider(live_config(), provider.clone())
            .with_observer(Arc::new(recorder.clone()));
        let wrist = ImageInput::from_bytes(png_bytes(8, 8)).with_angle(ImageAngle::Wrist);

        let err = orchestrator
            .analyze(&SKIN, &SkinInput::default(), None, &[wrist.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImageEncoding(_)));
        let err = orchestrator
            .analyze(&PERSONAL_COLOR, &PersonalColorInput::default(), None, &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("requires a primary image"));
        let err = orchestrator
            .analyze(&WORKOUT_TYPE, &sample_workout_input(), None, &[wrist])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImageEncoding(_)));

        assert_eq!(provider.calls(), 0);
        assert_eq!(
            recorder.stages(),
            vec![
                EventStage::Started,
                EventStage::Rejected,
                EventStage::Started,
                EventStage::Rejected,
                EventStage::Started,
                EventStage::Rejected,
            ]
        );

        let mocked = Orchestrator::new(AnalysisConfig::mock());
        assert!(mocked
            .analyze(&BODY_SHAPE, &BodyShapeInput::default(), None, &[])
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_provider_is_bounded_by_deadline_and_retries() {
        let provider = Arc::new(ScriptedProvider::repeating(ScriptedReply::Hang));
        let policy = RetryPolicy::default();
        let orchestrator =
            Orchestrator::with_provider(live_config().with_retry(policy), provider.clone());
        let started = Instant::now();
        let outcome = orchestrator
            .analyze_outcome(&WORKOUT_TYPE, &sample_workout_input(), None, &[])
            .await
            .unwrap();
        let elapsed = started.elapsed();
        let bound = WORKOUT_TYPE.deadline
            + (WORKOUT_TYPE.deadline + policy.delay) * policy.max_retries;
        assert!(elapsed <= bound, "{elapsed:?} > {bound:?}");
        assert_eq!(outcome.fallback_reason(), Some(FailureKind::Timeout));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_reply_inside_the_deadline_succeeds() {
        let provider = Arc::new(ScriptedProvider::new([ScriptedReply::Slow {
            delay: Duration::from_millis(2500),
            text: workout_reply(),
        }]));
        let orchestrator = Orchestrator::with_provider(live_config(), provider.clone());
        let outcome = orchestrator
            .analyze_outcome(&WORKOUT_TYPE, &sample_workout_input(), None, &[])
            .await
            .unwrap();
        assert!(!outcome.is_fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_within_budget_recover() {
        for failures in 0..=2usize {
            let mut replies = vec![ScriptedReply::error("unavailable"); failures];
            replies.push(ScriptedReply::text(workout_reply()));
            let provider = Arc::new(ScriptedProvider::new(replies));
            let orchestrator = Orchestrator::with_provider(live_config(), provider.clone());
            let outcome = orchestrator
                .analyze_outcome(&WORKOUT_TYPE, &sample_workout_input(), None, &[])
                .await
                .unwrap();
            assert!(!outcome.is_fallback(), "{failures} failures");
            assert_eq!(provider.calls(), failures + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failures_beyond_budget_fall_back() {
        let mut replies = vec![ScriptedReply::error("unavailable"); 3];
        replies.push(ScriptedReply::text(workout_reply()));
        let provider = Arc::new(ScriptedProvider::new(replies));
        let recorder = RecordingObserver::default();
        let orchestrator = Orchestrator::with_provider(live_config(), provider.clone())
            .with_observer(Arc::new(recorder.clone()));
        let outcome = orchestrator
            .analyze_outcome(&WORKOUT_TYPE, &sample_workout_input(), None, &[])
            .await
            .unwrap();
        assert_eq!(outcome.fallback_reason(), Some(FailureKind::ProviderError));
        assert_eq!(provider.calls(), 3);
        let attempts = recorder
            .events()
            .iter()
            .filter(|event| event.stage == EventStage::AttemptFailed)
            .filter_map(|event| event.attempt)
            .collect::<Vec<u32>>();
        assert_eq!(attempts, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn wrist_photo_changes_prompt_not_contract() {
        let provider = Arc::new(ScriptedProvider::repeating(ScriptedReply::text(
            personal_color_reply(),
        )));
        let orchestrator = Orchestrator::with_provider(live_config(), provider.clone());
        let input = PersonalColorInput::default();
        let wrist = ImageInput::from_bytes(png_bytes(8, 8)).with_angle(ImageAngle::Wrist);

        let front_only = orchestrator
            .analyze_personal_color(&input, &primary(), &[])
            .await
            .unwrap();
        let with_wrist = orchestrator
            .analyze_personal_color(&input, &primary(), &[wrist])
            .await
            .unwrap();

        let requests = provider.requests();
        assert!(!requests[0].instruction().contains("VEIN COLOR CHECK"));
        assert!(requests[1].instruction().contains("VEIN COLOR CHECK"));
        assert_eq!(requests[0].images().count(), 1);
        assert_eq!(requests[1].images().count(), 2);

        let keys = |result: &PersonalColorAnalysis| -> BTreeSet<String> {
            match serde_json::to_value(result).unwrap() {
                Value::Object(map) => map.keys().cloned().collect(),
                other => panic!("not an object: {other}"),
            }
        };
        assert_eq!(keys(&front_only), keys(&with_wrist));
        assert_eq!(with_wrist.season, Season::Summer);
    }

    #[tokio::test(start_paused = true)]
    async fn bad_image_is_rejected_before_the_provider() {
        let provider = Arc::new(ScriptedProvider::repeating(ScriptedReply::text(workout_reply())));
        let recorder = RecordingObserver::default();
        let orchestrator = Orchestrator::with_provider(live_config(), provider.clone())
            .with_observer(Arc::new(recorder.clone()));
        let garbage = ImageInput::from_base64("%%% not an image %%%");
        let err = orchestrator
            .analyze(&BODY_SHAPE, &BodyShapeInput::default(), Some(&garbage), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImageEncoding(_)));
        assert_eq!(provider.calls(), 0);
        assert_eq!(recorder.stages(), vec![EventStage::Started, EventStage::Rejected]);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_is_stable_for_the_same_input() {
        let orchestrator = Orchestrator::new(AnalysisConfig::mock());
        let input = WorkoutTypeInput {
            goals: vec!["lose fat".to_string()],
            ..WorkoutTypeInput::default()
        };
        let first = orchestrator.analyze(&WORKOUT_TYPE, &input, None, &[]).await.unwrap();
        let second = orchestrator.analyze(&WORKOUT_TYPE, &input, None, &[]).await.unwrap();
        assert_eq!(first, second);
        let color = orchestrator
            .analyze(&PERSONAL_COLOR, &PersonalColorInput::default(), Some(&primary()), &[])
            .await
            .unwrap();
        assert!(color.analysis_evidence.is_none());
    }
}
