use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingCondition {
    Natural,
    Artificial,
    Mixed,
    Dim,
    Harsh,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityTier {
    Low,
    Medium,
    High,
}

/// How trustworthy the photo was as evidence. Attached to every result so a
/// caller can tell a confident provider answer from a low-confidence one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQuality {
    pub lighting: LightingCondition,
    pub makeup_detected: bool,
    pub obstruction_detected: bool,
    pub reliability: ReliabilityTier,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ImageQuality {
    /// The fixed value attached to every fallback result.
    pub fn conservative() -> Self {
        Self {
            lighting: LightingCondition::Unknown,
            makeup_detected: false,
            obstruction_detected: false,
            reliability: ReliabilityTier::Low,
            notes: Vec::new(),
        }
    }
}

/// Visual cues a judgment was based on, for domains without a dedicated
/// evidence record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEvidence {
    #[serde(default)]
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Warning,
    Normal,
    Good,
}

impl MetricStatus {
    /// 0-40 warning, 41-70 normal, 71-100 good.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=40 => MetricStatus::Warning,
            41..=70 => MetricStatus::Normal,
            _ => MetricStatus::Good,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricScore {
    pub score: u8,
    pub status: MetricStatus,
}

impl MetricScore {
    pub fn new(score: u8) -> Self {
        let score = score.min(100);
        Self {
            score,
            status: MetricStatus::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ImageQuality, MetricScore, MetricStatus, ReliabilityTier};

    #[test]
    fn status_bands_follow_score_boundaries() {
        assert_eq!(MetricStatus::from_score(0), MetricStatus::Warning);
        assert_eq!(MetricStatus::from_score(40), MetricStatus::Warning);
        assert_eq!(MetricStatus::from_score(41), MetricStatus::Normal);
        assert_eq!(MetricStatus::from_score(70), MetricStatus::Normal);
        assert_eq!(MetricStatus::from_score(71), MetricStatus::Good);
        assert_eq!(MetricStatus::from_score(100), MetricStatus::Good);
    }

    #[test]
    fn metric_score_clamps_to_hundred() {
        let metric = MetricScore::new(140);
        assert_eq!(metric.score, 100);
        assert_eq!(metric.status, MetricStatus::Good);
    }

    #[test]
    fn conservative_quality_is_low_and_serializes_camel_case() {
        let quality = ImageQuality::conservative();
        assert_eq!(quality.reliability, ReliabilityTier::Low);
        assert_eq!(
            serde_json::to_value(&quality).unwrap(),
            json!({
                "lighting": "unknown",
                "makeupDetected": false,
                "obstructionDetected": false,
                "reliability": "low",
            })
        );
    }
}
