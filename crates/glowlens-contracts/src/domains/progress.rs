use serde::{Deserialize, Serialize};

use crate::contract::ResultContract;
use crate::domain::AnalysisDomain;
use crate::reliability::{AnalysisEvidence, ImageQuality};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTrend {
    Improving,
    Steady,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCheckpoint {
    pub date: String,
    #[serde(default)]
    pub weight_kg: Option<f32>,
    #[serde(default)]
    pub score: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInput {
    pub goal: String,
    pub period_days: u16,
    pub workouts_planned: u16,
    pub workouts_completed: u16,
    #[serde(default)]
    pub checkpoints: Vec<ProgressCheckpoint>,
}

impl ProgressInput {
    /// Completed over planned sessions in `0.0..=1.0`; zero when nothing was planned.
    pub fn completion_rate(&self) -> f32 {
        if self.workouts_planned == 0 {
            return 0.0;
        }
        (f32::from(self.workouts_completed) / f32::from(self.workouts_planned)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInsights {
    pub overall_progress: u8,
    pub trend: ProgressTrend,
    pub consistency_score: u8,
    pub highlights: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub visible_changes: Vec<String>,
    pub motivation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<ImageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_evidence: Option<AnalysisEvidence>,
}

impl ResultContract for ProgressInsights {
    const DOMAIN: AnalysisDomain = AnalysisDomain::ProgressInsight;
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "overallProgress",
        "trend",
        "consistencyScore",
        "highlights",
        "areasToImprove",
        "nextSteps",
        "motivation",
    ];

    fn image_quality(&self) -> Option<&ImageQuality> {
        self.image_quality.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::ProgressInput;

    #[test]
    fn completion_rate_handles_zero_and_overshoot() {
        let mut input = ProgressInput {
            goal: "run 5k".to_string(),
            period_days: 28,
            workouts_planned: 0,
            workouts_completed: 4,
            checkpoints: Vec::new(),
        };
        assert_eq!(input.completion_rate(), 0.0);
        input.workouts_planned = 8;
        assert_eq!(input.completion_rate(), 0.5);
        input.workouts_completed = 12;
        assert_eq!(input.completion_rate(), 1.0);
    }
}
