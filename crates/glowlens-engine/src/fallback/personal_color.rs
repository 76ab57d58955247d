use glowlens_contracts::domains::personal_color::{
    PersonalColorAnalysis, PersonalColorInput, Season, SunReaction, Undertone,
};
use glowlens_contracts::ImageQuality;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{pick, strings};

fn palette(season: Season) -> &'static [&'static str] {
    match season {
        Season::Spring => &["#FFB7A5", "#FF8C69", "#FFD966", "#98D98E", "#7FCDCD", "#F4A460", "#FFE4B5"],
        Season::Summer => &["#B0C4DE", "#D8BFD8", "#E6A8D7", "#87A9C9", "#C3B1E1", "#F4C2C2", "#9FB6CD"],
        Season::Autumn => &["#C46210", "#8B5A2B", "#B8860B", "#6B8E23", "#A0522D", "#CC7722", "#556B2F"],
        Season::Winter => &["#000080", "#DC143C", "#FFFFFF", "#000000", "#4B0082", "#C71585", "#008B8B"],
    }
}

/// Colors that fight the season's undertone.
fn clashing(season: Season) -> &'static [&'static str] {
    match season {
        Season::Spring | Season::Autumn => &["#C0C0C0", "#000000", "#FF00FF", "#4169E1"],
        Season::Summer | Season::Winter => &["#FF8C00", "#DAA520", "#8B4513", "#9ACD32"],
    }
}

fn makeup_tips(season: Season) -> &'static [&'static str] {
    match season {
        Season::Spring => &["Coral or peach lip colors", "Apricot blush", "Warm brown eyeliner"],
        Season::Summer => &["Rose or berry-pink lips", "Cool pink blush", "Taupe or grey-brown eyeshadow"],
        Season::Autumn => &["Brick, terracotta or warm nude lips", "Bronze blush", "Olive or copper eyeshadow"],
        Season::Winter => &["True red or deep plum lips", "Cool fuchsia blush", "Crisp black eyeliner"],
    }
}

fn season_from_hints(input: Option<&PersonalColorInput>, rng: &mut StdRng) -> Season {
    match input.and_then(|input| input.sun_reaction) {
        // cool without a photo never escalates past summer
        Some(SunReaction::Burns) => Season::Summer,
        Some(SunReaction::Tans) => pick(rng, &[Season::Spring, Season::Autumn]),
        Some(SunReaction::Both) | None => pick(rng, &[Season::Spring, Season::Summer, Season::Autumn]),
    }
}

pub fn personal_color_fallback(
    input: Option<&PersonalColorInput>,
    rng: &mut StdRng,
) -> PersonalColorAnalysis {
    let season = season_from_hints(input, rng);
    let undertone = season.undertone();

    let mut best = palette(season).to_vec();
    best.shuffle(rng);
    best.truncate(rng.gen_range(5..=best.len()));
    let avoid = clashing(season);

    PersonalColorAnalysis {
        season,
        undertone,
        confidence: rng.gen_range(45..=60),
        best_colors: strings(&best),
        avoid_colors: strings(avoid),
        makeup_tips: strings(makeup_tips(season)),
        summary: format!(
            "A {} undertone with {} coloring is the most likely match. Confirm with a daylight photo and a wrist photo for a precise result.",
            match undertone {
                Undertone::Warm => "warm",
                Undertone::Cool => "cool",
            },
            season.as_str()
        ),
        image_quality: Some(ImageQuality::conservative()),
        analysis_evidence: None,
    }
}
