use serde::{Deserialize, Serialize};

use crate::contract::ResultContract;
use crate::domain::AnalysisDomain;
use crate::reliability::{AnalysisEvidence, ImageQuality, MetricScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    Dry,
    Oily,
    Combination,
    Normal,
    Sensitive,
}

impl SkinType {
    pub const ALL: [SkinType; 5] = [
        SkinType::Dry,
        SkinType::Oily,
        SkinType::Combination,
        SkinType::Normal,
        SkinType::Sensitive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkinType::Dry => "dry",
            SkinType::Oily => "oily",
            SkinType::Combination => "combination",
            SkinType::Normal => "normal",
            SkinType::Sensitive => "sensitive",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinInput {
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub self_reported_type: Option<SkinType>,
    #[serde(default)]
    pub current_products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinMetrics {
    pub moisture: MetricScore,
    pub oiliness: MetricScore,
    pub pores: MetricScore,
    pub wrinkles: MetricScore,
    pub pigmentation: MetricScore,
    pub redness: MetricScore,
    pub elasticity: MetricScore,
}

impl SkinMetrics {
    pub fn entries(&self) -> [(&'static str, &MetricScore); 7] {
        [
            ("moisture", &self.moisture),
            ("oiliness", &self.oiliness),
            ("pores", &self.pores),
            ("wrinkles", &self.wrinkles),
            ("pigmentation", &self.pigmentation),
            ("redness", &self.redness),
            ("elasticity", &self.elasticity),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinAnalysis {
    pub overall_score: u8,
    pub skin_type: SkinType,
    pub metrics: SkinMetrics,
    pub recommended_ingredients: Vec<String>,
    pub avoid_ingredients: Vec<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<ImageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_evidence: Option<AnalysisEvidence>,
}

impl ResultContract for SkinAnalysis {
    const DOMAIN: AnalysisDomain = AnalysisDomain::Skin;
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "overallScore",
        "skinType",
        "metrics",
        "recommendedIngredients",
        "avoidIngredients",
        "summary",
    ];

    fn image_quality(&self) -> Option<&ImageQuality> {
        self.image_quality.as_ref()
    }
}
