use std::time::Duration;

use glowlens_contracts::domains::body_shape::{BodyShapeAnalysis, BodyShapeInput};
use glowlens_contracts::domains::exercise::{ExerciseInput, ExercisePlan};
use glowlens_contracts::domains::personal_color::{PersonalColorAnalysis, PersonalColorInput};
use glowlens_contracts::domains::progress::{ProgressInput, ProgressInsights};
use glowlens_contracts::domains::skin::{SkinAnalysis, SkinInput};
use glowlens_contracts::domains::workout::{WorkoutTypeAnalysis, WorkoutTypeInput};
use glowlens_contracts::AnalysisDomain;
use rand::rngs::StdRng;

use crate::fallback::{
    body_shape_fallback, exercise_fallback, personal_color_fallback, progress_fallback,
    skin_fallback, workout_type_fallback,
};
use crate::prompts::{
    body_shape_prompt, exercise_prompt, personal_color_prompt, progress_prompt, skin_prompt,
    workout_type_prompt,
};

/// Everything that differs between two domains: the template that renders the
/// input, the fallback generator for the contract, and the provider deadline.
pub struct DomainDescriptor<I, R> {
    pub domain: AnalysisDomain,
    pub deadline: Duration,
    /// The call must carry a primary photo.
    pub photo_required: bool,
    pub template: fn(&I) -> String,
    pub fallback: fn(Option<&I>, &mut StdRng) -> R,
}

impl<I, R> Clone for DomainDescriptor<I, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, R> Copy for DomainDescriptor<I, R> {}

impl<I, R> std::fmt::Debug for DomainDescriptor<I, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainDescriptor")
            .field("domain", &self.domain)
            .field("deadline", &self.deadline)
            .field("photo_required", &self.photo_required)
            .finish_non_exhaustive()
    }
}

pub const SKIN: DomainDescriptor<SkinInput, SkinAnalysis> = DomainDescriptor {
    domain: AnalysisDomain::Skin,
    deadline: Duration::from_secs(12),
    photo_required: true,
    template: skin_prompt,
    fallback: skin_fallback,
};

pub const BODY_SHAPE: DomainDescriptor<BodyShapeInput, BodyShapeAnalysis> = DomainDescriptor {
    domain: AnalysisDomain::BodyShape,
    deadline: Duration::from_secs(15),
    photo_required: true,
    template: body_shape_prompt,
    fallback: body_shape_fallback,
};

pub const PERSONAL_COLOR: DomainDescriptor<PersonalColorInput, PersonalColorAnalysis> =
    DomainDescriptor {
        domain: AnalysisDomain::PersonalColor,
        deadline: Duration::from_secs(10),
        photo_required: true,
        template: personal_color_prompt,
        fallback: personal_color_fallback,
    };

pub const WORKOUT_TYPE: DomainDescriptor<WorkoutTypeInput, WorkoutTypeAnalysis> = DomainDescriptor {
    domain: AnalysisDomain::WorkoutType,
    deadline: Duration::from_secs(3),
    photo_required: false,
    template: workout_type_prompt,
    fallback: workout_type_fallback,
};

pub const EXERCISE: DomainDescriptor<ExerciseInput, ExercisePlan> = DomainDescriptor {
    domain: AnalysisDomain::ExerciseRecommendation,
    deadline: Duration::from_secs(3),
    photo_required: false,
    template: exercise_prompt,
    fallback: exercise_fallback,
};

pub const PROGRESS: DomainDescriptor<ProgressInput, ProgressInsights> = DomainDescriptor {
    domain: AnalysisDomain::ProgressInsight,
    deadline: Duration::from_secs(3),
    photo_required: false,
    template: progress_prompt,
    fallback: progress_fallback,
};

/// Provider deadline for a domain, for callers that only hold the tag.
pub fn deadline_for(domain: AnalysisDomain) -> Duration {
    match domain {
        AnalysisDomain::Skin => SKIN.deadline,
        AnalysisDomain::BodyShape => BODY_SHAPE.deadline,
        AnalysisDomain::PersonalColor => PERSONAL_COLOR.deadline,
        AnalysisDomain::WorkoutType => WORKOUT_TYPE.deadline,
        AnalysisDomain::ExerciseRecommendation => EXERCISE.deadline,
        AnalysisDomain::ProgressInsight => PROGRESS.deadline,
    }
}
