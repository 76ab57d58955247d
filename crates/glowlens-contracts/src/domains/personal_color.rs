use serde::{Deserialize, Serialize};

use crate::contract::ResultContract;
use crate::domain::AnalysisDomain;
use crate::reliability::ImageQuality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Spring and autumn are warm seasons, summer and winter are cool.
    pub fn undertone(self) -> Undertone {
        match self {
            Season::Spring | Season::Autumn => Undertone::Warm,
            Season::Summer | Season::Winter => Undertone::Cool,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Undertone {
    Warm,
    Cool,
}

impl Undertone {
    pub fn as_str(self) -> &'static str {
        match self {
            Undertone::Warm => "warm",
            Undertone::Cool => "cool",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VeinColor {
    Blue,
    Purple,
    Green,
    Olive,
    Mixed,
    Unclear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContrastLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunReaction {
    Burns,
    Tans,
    Both,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalColorInput {
    #[serde(default)]
    pub natural_hair_color: Option<String>,
    #[serde(default)]
    pub eye_color: Option<String>,
    #[serde(default)]
    pub sun_reaction: Option<SunReaction>,
    #[serde(default)]
    pub preferred_colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalColorEvidence {
    pub vein_color: VeinColor,
    pub skin_brightness: String,
    pub hair_color: String,
    pub eye_color: String,
    pub contrast: ContrastLevel,
    #[serde(default)]
    pub wrist_image_used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalColorAnalysis {
    pub season: Season,
    pub undertone: Undertone,
    pub confidence: u8,
    pub best_colors: Vec<String>,
    pub avoid_colors: Vec<String>,
    #[serde(default)]
    pub makeup_tips: Vec<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<ImageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_evidence: Option<PersonalColorEvidence>,
}

impl ResultContract for PersonalColorAnalysis {
    const DOMAIN: AnalysisDomain = AnalysisDomain::PersonalColor;
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "season",
        "undertone",
        "confidence",
        "bestColors",
        "avoidColors",
        "summary",
    ];

    fn image_quality(&self) -> Option<&ImageQuality> {
        self.image_quality.as_ref()
    }

    fn check_invariants(&self) -> Result<(), String> {
        let expected = self.season.undertone();
        if self.undertone != expected {
            return Err(format!(
                "season {} has a {} undertone, got {}",
                self.season.as_str(),
                expected.as_str(),
                self.undertone.as_str()
            ));
        }
        Ok(())
    }
}
