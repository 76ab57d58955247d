use serde::{Deserialize, Serialize};

use crate::contract::ResultContract;
use crate::domain::AnalysisDomain;
use crate::reliability::ImageQuality;

/// Skeletal frame type, serialized with its one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    #[serde(rename = "S")]
    Straight,
    #[serde(rename = "W")]
    Wave,
    #[serde(rename = "N")]
    Natural,
}

impl BodyType {
    pub const ALL: [BodyType; 3] = [BodyType::Straight, BodyType::Wave, BodyType::Natural];

    pub fn code(self) -> &'static str {
        match self {
            BodyType::Straight => "S",
            BodyType::Wave => "W",
            BodyType::Natural => "N",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BodyType::Straight => "straight",
            BodyType::Wave => "wave",
            BodyType::Natural => "natural",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyShapeInput {
    #[serde(default)]
    pub height_cm: Option<f32>,
    #[serde(default)]
    pub weight_kg: Option<f32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub style_goals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightCenter {
    Upper,
    Lower,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSize {
    Compact,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMeasurements {
    pub shoulder_to_hip_ratio: f32,
    pub waist_to_hip_ratio: f32,
    pub weight_center: WeightCenter,
    pub frame: FrameSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyShapeEvidence {
    pub shoulder_line: String,
    pub collarbone: String,
    pub joint_size: String,
    pub flesh_texture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyShapeAnalysis {
    pub body_type: BodyType,
    pub confidence: u8,
    pub measurements: BodyMeasurements,
    pub characteristics: Vec<String>,
    pub recommended_styles: Vec<String>,
    pub avoid_styles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<ImageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_evidence: Option<BodyShapeEvidence>,
}

impl ResultContract for BodyShapeAnalysis {
    const DOMAIN: AnalysisDomain = AnalysisDomain::BodyShape;
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "bodyType",
        "confidence",
        "measurements",
        "characteristics",
        "recommendedStyles",
        "avoidStyles",
    ];

    fn image_quality(&self) -> Option<&ImageQuality> {
        self.image_quality.as_ref()
    }
}
