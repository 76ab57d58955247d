use glowlens_contracts::domains::skin::{SkinAnalysis, SkinInput, SkinMetrics, SkinType};
use glowlens_contracts::{ImageQuality, MetricScore};
use rand::rngs::StdRng;
use rand::Rng;

use super::{pick, strings};

fn recommended_for(skin_type: SkinType) -> &'static [&'static str] {
    match skin_type {
        SkinType::Oily => &["niacinamide", "salicylic acid", "zinc PCA", "green tea extract"],
        SkinType::Dry => &["ceramides", "hyaluronic acid", "squalane", "shea butter"],
        SkinType::Combination => &["niacinamide", "hyaluronic acid", "panthenol"],
        SkinType::Sensitive => &["centella asiatica", "panthenol", "allantoin", "oat extract"],
        SkinType::Normal => &["vitamin C", "peptides", "ceramides"],
    }
}

fn avoid_for(skin_type: SkinType) -> &'static [&'static str] {
    match skin_type {
        SkinType::Oily => &["mineral oil", "coconut oil", "heavy lanolin"],
        SkinType::Dry => &["denatured alcohol", "strong sulfates", "clay masks"],
        SkinType::Combination => &["heavy oils on the T-zone", "denatured alcohol"],
        SkinType::Sensitive => &["fragrance", "essential oils", "denatured alcohol", "high-strength retinoids"],
        SkinType::Normal => &["harsh physical scrubs", "denatured alcohol"],
    }
}

/// Score ranges per metric for a skin type, in metric order
/// moisture, oiliness, pores, wrinkles, pigmentation, redness, elasticity.
fn metric_ranges(skin_type: SkinType) -> [(u8, u8); 7] {
    match skin_type {
        SkinType::Oily => [(55, 70), (28, 40), (38, 55), (65, 80), (55, 72), (58, 75), (62, 78)],
        SkinType::Dry => [(28, 40), (70, 85), (65, 80), (48, 65), (55, 72), (52, 68), (50, 66)],
        SkinType::Combination => [(45, 60), (38, 52), (45, 60), (60, 76), (55, 72), (56, 72), (58, 74)],
        SkinType::Sensitive => [(45, 60), (55, 70), (58, 74), (58, 74), (52, 68), (30, 42), (55, 70)],
        SkinType::Normal => [(62, 78), (62, 78), (60, 76), (62, 78), (60, 76), (62, 78), (62, 78)],
    }
}

fn summary_for(skin_type: SkinType) -> &'static str {
    match skin_type {
        SkinType::Oily => "Your skin leans oily, so balancing sebum without stripping moisture is the priority. Keep routines light and non-comedogenic.",
        SkinType::Dry => "Your skin leans dry, so rebuilding the moisture barrier comes first. Rich, fragrance-free hydration will help most.",
        SkinType::Combination => "Your skin looks combination, oilier in the T-zone and drier on the cheeks. Treat each zone with its own texture of product.",
        SkinType::Sensitive => "Your skin looks reactive, so a short, soothing routine is the safest path. Introduce new actives one at a time.",
        SkinType::Normal => "Your skin looks balanced overall. Focus on protection and steady maintenance.",
    }
}

pub fn skin_fallback(input: Option<&SkinInput>, rng: &mut StdRng) -> SkinAnalysis {
    let skin_type = input
        .and_then(|input| input.self_reported_type)
        .unwrap_or_else(|| pick(rng, &SkinType::ALL));

    let mut scores = metric_ranges(skin_type).map(|(low, high)| rng.gen_range(low..=high));
    if input.and_then(|input| input.age).unwrap_or(0) >= 45 {
        // wrinkles and elasticity
        scores[3] = scores[3].saturating_sub(10);
        scores[6] = scores[6].saturating_sub(8);
    }
    let [moisture, oiliness, pores, wrinkles, pigmentation, redness, elasticity] =
        scores.map(MetricScore::new);
    let metrics = SkinMetrics {
        moisture,
        oiliness,
        pores,
        wrinkles,
        pigmentation,
        redness,
        elasticity,
    };
    let total = metrics
        .entries()
        .iter()
        .map(|(_, metric)| u32::from(metric.score))
        .sum::<u32>();
    let overall_score = ((total as f32) / 7.0).round() as u8;

    SkinAnalysis {
        overall_score,
        skin_type,
        metrics,
        recommended_ingredients: strings(recommended_for(skin_type)),
        avoid_ingredients: strings(avoid_for(skin_type)),
        summary: summary_for(skin_type).to_string(),
        image_quality: Some(ImageQuality::conservative()),
        analysis_evidence: None,
    }
}
