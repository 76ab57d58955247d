use serde::{Deserialize, Serialize};

use crate::contract::ResultContract;
use crate::domain::AnalysisDomain;
use crate::domains::workout::{FitnessLevel, WorkoutType};
use crate::reliability::{AnalysisEvidence, ImageQuality};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInput {
    pub workout_type: WorkoutType,
    pub fitness_level: FitnessLevel,
    pub session_minutes: u16,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub injuries: Vec<String>,
    #[serde(default)]
    pub target_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
    pub name: String,
    pub target_area: String,
    pub sets: u8,
    #[serde(default)]
    pub reps: Option<u16>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    pub rest_seconds: u16,
    pub instructions: String,
}

impl PlannedExercise {
    /// Seconds of work plus rest, assuming three seconds per repetition.
    pub fn estimated_seconds(&self) -> u32 {
        let per_set = self
            .duration_seconds
            .unwrap_or_else(|| u32::from(self.reps.unwrap_or(0)) * 3);
        u32::from(self.sets) * (per_set + u32::from(self.rest_seconds))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlan {
    pub title: String,
    pub difficulty: FitnessLevel,
    pub total_minutes: u16,
    pub warm_up: Vec<PlannedExercise>,
    pub main_set: Vec<PlannedExercise>,
    pub cool_down: Vec<PlannedExercise>,
    pub form_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<ImageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_evidence: Option<AnalysisEvidence>,
}

impl ExercisePlan {
    pub fn exercises(&self) -> impl Iterator<Item = &PlannedExercise> {
        self.warm_up
            .iter()
            .chain(self.main_set.iter())
            .chain(self.cool_down.iter())
    }
}

impl ResultContract for ExercisePlan {
    const DOMAIN: AnalysisDomain = AnalysisDomain::ExerciseRecommendation;
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "title",
        "difficulty",
        "totalMinutes",
        "warmUp",
        "mainSet",
        "coolDown",
        "formTips",
    ];

    fn image_quality(&self) -> Option<&ImageQuality> {
        self.image_quality.as_ref()
    }
}
