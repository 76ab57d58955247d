use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The analysis category a call belongs to. Selects the prompt template,
/// result contract, fallback generator and deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDomain {
    Skin,
    BodyShape,
    PersonalColor,
    WorkoutType,
    ExerciseRecommendation,
    ProgressInsight,
}

impl AnalysisDomain {
    pub const ALL: [AnalysisDomain; 6] = [
        AnalysisDomain::Skin,
        AnalysisDomain::BodyShape,
        AnalysisDomain::PersonalColor,
        AnalysisDomain::WorkoutType,
        AnalysisDomain::ExerciseRecommendation,
        AnalysisDomain::ProgressInsight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisDomain::Skin => "skin",
            AnalysisDomain::BodyShape => "body_shape",
            AnalysisDomain::PersonalColor => "personal_color",
            AnalysisDomain::WorkoutType => "workout_type",
            AnalysisDomain::ExerciseRecommendation => "exercise_recommendation",
            AnalysisDomain::ProgressInsight => "progress_insight",
        }
    }
}

impl fmt::Display for AnalysisDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisDomain {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        AnalysisDomain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown analysis domain '{}'. Expected one of: {}.",
                    raw.trim(),
                    AnalysisDomain::ALL
                        .iter()
                        .map(|domain| domain.as_str())
                        .collect::<Vec<&str>>()
                        .join(", ")
                )
            })
    }
}
