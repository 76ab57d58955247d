use glowlens_contracts::domains::body_shape::{
    BodyMeasurements, BodyShapeAnalysis, BodyShapeInput, BodyType, FrameSize, WeightCenter,
};
use glowlens_contracts::ImageQuality;
use rand::rngs::StdRng;
use rand::Rng;

use super::{pick, ratio_between, strings};

struct FrameProfile {
    weight_center: WeightCenter,
    frame: FrameSize,
    shoulder_to_hip: (f32, f32),
    waist_to_hip: (f32, f32),
    characteristics: &'static [&'static str],
    recommended: &'static [&'static str],
    avoid: &'static [&'static str],
}

fn profile(body_type: BodyType) -> FrameProfile {
    match body_type {
        BodyType::Straight => FrameProfile {
            weight_center: WeightCenter::Upper,
            frame: FrameSize::Medium,
            shoulder_to_hip: (1.00, 1.08),
            waist_to_hip: (0.74, 0.80),
            characteristics: &[
                "Full, rounded upper body with a thick ribcage",
                "Firm, elastic flesh",
                "Collarbone barely visible",
                "Short waist-to-hip distance",
            ],
            recommended: &[
                "V-necks and open collars",
                "Straight-cut trousers",
                "Tailored jackets in firm fabrics",
                "Pencil skirts",
            ],
            avoid: &["Ruffles and heavy layering on top", "Clingy knits", "Low-rise bottoms"],
        },
        BodyType::Wave => FrameProfile {
            weight_center: WeightCenter::Lower,
            frame: FrameSize::Compact,
            shoulder_to_hip: (0.88, 0.96),
            waist_to_hip: (0.66, 0.73),
            characteristics: &[
                "Narrow, sloped shoulder line",
                "Thin upper body with soft flesh",
                "Small joints and a delicate collarbone",
                "Weight gathers on hips and thighs",
            ],
            recommended: &[
                "High-waisted bottoms",
                "Short, fitted tops",
                "Flared and A-line skirts",
                "Soft fabrics with gentle drape",
            ],
            avoid: &["Boxy oversized tops", "Long straight tunics", "Stiff heavy fabrics"],
        },
        BodyType::Natural => FrameProfile {
            weight_center: WeightCenter::Even,
            frame: FrameSize::Large,
            shoulder_to_hip: (1.05, 1.15),
            waist_to_hip: (0.78, 0.85),
            characteristics: &[
                "Square, wide shoulder line",
                "Prominent collarbone and large joints",
                "Lean flesh with visible bone structure",
                "Frame dominates the silhouette",
            ],
            recommended: &[
                "Relaxed and oversized fits",
                "Natural textured fabrics like linen",
                "Long layered outfits",
                "Wide-leg trousers",
            ],
            avoid: &["Tight body-con cuts", "Shiny thin fabrics", "Overly fitted short jackets"],
        },
    }
}

pub fn body_shape_fallback(_input: Option<&BodyShapeInput>, rng: &mut StdRng) -> BodyShapeAnalysis {
    let body_type = pick(rng, &BodyType::ALL);
    let profile = profile(body_type);
    let measurements = BodyMeasurements {
        shoulder_to_hip_ratio: ratio_between(rng, profile.shoulder_to_hip.0, profile.shoulder_to_hip.1),
        waist_to_hip_ratio: ratio_between(rng, profile.waist_to_hip.0, profile.waist_to_hip.1),
        weight_center: profile.weight_center,
        frame: profile.frame,
    };
    BodyShapeAnalysis {
        body_type,
        confidence: rng.gen_range(50..=65),
        measurements,
        characteristics: strings(profile.characteristics),
        recommended_styles: strings(profile.recommended),
        avoid_styles: strings(profile.avoid),
        image_quality: Some(ImageQuality::conservative()),
        analysis_evidence: None,
    }
}

#[cfg(test)]
mod tests {
    use glowlens_contracts::domains::body_shape::{
        BodyShapeInput, BodyType, FrameSize, WeightCenter,
    };
    use glowlens_contracts::AnalysisDomain;

    use super::body_shape_fallback;
    use crate::fallback::seeded_rng;

    #[test]
    fn measurements_follow_the_chosen_frame() {
        let mut seen = Vec::new();
        for height in 150..190 {
            let input = BodyShapeInput {
                height_cm: Some(height as f32),
                ..BodyShapeInput::default()
            };
            let mut rng = seeded_rng(AnalysisDomain::BodyShape, Some(&input));
            let result = body_shape_fallback(Some(&input), &mut rng);
            let m = &result.measurements;
            match result.body_type {
                BodyType::Straight => {
                    assert_eq!(m.weight_center, WeightCenter::Upper);
                    assert_eq!(m.frame, FrameSize::Medium);
                    assert!((1.00..=1.08).contains(&m.shoulder_to_hip_ratio));
                    assert!((0.74..=0.80).contains(&m.waist_to_hip_ratio));
                }
                BodyType::Wave => {
                    assert_eq!(m.weight_center, WeightCenter::Lower);
                    assert_eq!(m.frame, FrameSize::Compact);
                    assert!((0.88..=0.96).contains(&m.shoulder_to_hip_ratio));
                    assert!((0.66..=0.73).contains(&m.waist_to_hip_ratio));
                }
                BodyType::Natural => {
                    assert_eq!(m.weight_center, WeightCenter::Even);
                    assert_eq!(m.frame, FrameSize::Large);
                    assert!((1.05..=1.15).contains(&m.shoulder_to_hip_ratio));
                    assert!((0.78..=0.85).contains(&m.waist_to_hip_ratio));
                }
            }
            assert!(result.analysis_evidence.is_none());
            if !seen.contains(&result.body_type) {
                seen.push(result.body_type);
            }
        }
        assert_eq!(seen.len(), 3);
    }
}
