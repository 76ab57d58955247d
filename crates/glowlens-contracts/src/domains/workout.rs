use serde::{Deserialize, Serialize};

use crate::contract::ResultContract;
use crate::domain::AnalysisDomain;
use crate::domains::body_shape::BodyType;
use crate::reliability::{AnalysisEvidence, ImageQuality};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Hiit,
    Flexibility,
    Balanced,
}

impl WorkoutType {
    pub const ALL: [WorkoutType; 5] = [
        WorkoutType::Strength,
        WorkoutType::Cardio,
        WorkoutType::Hiit,
        WorkoutType::Flexibility,
        WorkoutType::Balanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutType::Strength => "strength",
            WorkoutType::Cardio => "cardio",
            WorkoutType::Hiit => "hiit",
            WorkoutType::Flexibility => "flexibility",
            WorkoutType::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyProportions {
    #[serde(default)]
    pub shoulder_to_hip_ratio: Option<f32>,
    #[serde(default)]
    pub waist_to_hip_ratio: Option<f32>,
    #[serde(default)]
    pub body_type: Option<BodyType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTypeInput {
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub frequency_per_week: u8,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub injuries: Vec<String>,
    #[serde(default)]
    pub fitness_level: Option<FitnessLevel>,
    #[serde(default)]
    pub body_proportions: Option<BodyProportions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedExercise {
    pub name: String,
    pub focus: String,
    pub sets: u8,
    /// Free-form repetition target, e.g. `8-12` or `30s`.
    pub reps: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTypeAnalysis {
    pub workout_type: WorkoutType,
    pub confidence: u8,
    pub reasoning: String,
    pub recommended_exercises: Vec<RecommendedExercise>,
    pub weekly_frequency: u8,
    pub cautions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<ImageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_evidence: Option<AnalysisEvidence>,
}

impl ResultContract for WorkoutTypeAnalysis {
    const DOMAIN: AnalysisDomain = AnalysisDomain::WorkoutType;
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "workoutType",
        "confidence",
        "reasoning",
        "recommendedExercises",
        "weeklyFrequency",
        "cautions",
    ];

    fn image_quality(&self) -> Option<&ImageQuality> {
        self.image_quality.as_ref()
    }
}
