//! Prompt template registry. One pure template per domain; every template
//! embeds the exact JSON shape the provider must return plus ordered decision
//! rules, and [`multi_angle_guidance`] post-fixes guidance for extra photos.

mod body_shape;
mod exercise;
mod personal_color;
mod progress;
mod skin;
mod workout_type;

pub use body_shape::body_shape_prompt;
pub use exercise::exercise_prompt;
pub use personal_color::personal_color_prompt;
pub use progress::progress_prompt;
pub use skin::skin_prompt;
pub use workout_type::workout_type_prompt;

use glowlens_contracts::{AnalysisDomain, ImageAngle};

pub(crate) const JSON_ONLY: &str = "Respond with ONE JSON object and nothing else: no markdown, \
no code fences, no commentary before or after it. Use exactly the keys shown below, in camelCase. \
Never invent extra top-level keys and never omit a required key.";

/// Reliability sub-record every template asks for.
pub(crate) const IMAGE_QUALITY_SCHEMA: &str = r#"  "imageQuality": {
    "lighting": "natural" | "artificial" | "mixed" | "dim" | "harsh" | "unknown",
    "makeupDetected": true | false,
    "obstructionDetected": true | false,
    "reliability": "high" | "medium" | "low",
    "notes": ["short note about anything that limited the photo as evidence"]
  }"#;

pub(crate) const IMAGE_QUALITY_RULES: &str = "IMAGE QUALITY RULES:\n\
- reliability = \"high\" only when the subject is sharp, evenly lit by daylight or neutral light, and unobstructed.\n\
- Colored, dim or harsh light, heavy makeup, filters, hair or clothing covering the relevant area: at most \"medium\".\n\
- Two or more of those problems, or the relevant area barely visible: \"low\".\n\
- Judge what the photo shows; when the photo cannot support a field, still fill it with your best estimate and lower reliability instead of refusing.";

/// Bullet list of present user-context values; absent values are skipped.
pub(crate) fn context_block(lines: &[(&str, Option<String>)]) -> String {
    let rendered = lines
        .iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(|text| format!("- {label}: {text}"))
        })
        .collect::<Vec<String>>();
    if rendered.is_empty() {
        return "- (no additional context supplied; rely on the photo)".to_string();
    }
    rendered.join("\n")
}

pub(crate) fn join_list(items: &[String]) -> Option<String> {
    let cleaned = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<&str>>();
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.join(", "))
}

/// Text appended to a template when auxiliary photos accompany the primary one.
/// Returns `None` for primary-only calls.
pub fn multi_angle_guidance(domain: AnalysisDomain, auxiliary: &[Option<ImageAngle>]) -> Option<String> {
    if auxiliary.is_empty() {
        return None;
    }
    let total = auxiliary.len() + 1;
    let mut lines = vec![format!(
        "ADDITIONAL PHOTOS: {total} photos are attached. Photo 1 is the primary photo; \
the others are extra angles meant only to raise confidence. Produce ONE result for this analysis."
    )];
    for (idx, angle) in auxiliary.iter().enumerate() {
        let label = angle.map(ImageAngle::as_str).unwrap_or("extra");
        lines.push(format!(
            "- Photo {} ({label}): {}",
            idx + 2,
            angle_purpose(domain, *angle)
        ));
    }
    lines.push(
        "When the extra photos confirm what Photo 1 suggests, report imageQuality.reliability one tier \
higher than the primary photo alone would justify (low -> medium, medium -> high). Do not raise it \
when the same lighting or obstruction problem is present in every photo."
            .to_string(),
    );
    Some(lines.join("\n"))
}

fn angle_purpose(domain: AnalysisDomain, angle: Option<ImageAngle>) -> &'static str {
    match (domain, angle) {
        (AnalysisDomain::PersonalColor, Some(ImageAngle::Wrist)) => {
            "VEIN COLOR CHECK. Look at the veins on the inner wrist. Blue or purple veins mean the \
undertone is COOL no matter how warm the face skin looks in this light; green or olive veins mean \
WARM; mixed or unclear veins mean you decide from skin, hair and eye cues instead. Write what you saw \
into analysisEvidence.veinColor and set analysisEvidence.wristImageUsed to true."
        }
        (AnalysisDomain::PersonalColor, _) => {
            "compare skin tone under a different light falloff to cancel out colored ambient light; \
do not let a warm cast in one photo decide the undertone."
        }
        (AnalysisDomain::BodyShape, Some(ImageAngle::Side)) => {
            "read body thickness: ribcage depth, how far the chest and hips project, and whether the \
upper body looks thick (S), flat (W) or flat with a prominent bone frame (N)."
        }
        (AnalysisDomain::BodyShape, Some(ImageAngle::Back)) => {
            "read shoulder-blade width against hip width and where flesh collects on the back and \
hips; this confirms the weight center."
        }
        (AnalysisDomain::BodyShape, _) => {
            "confirm shoulder line, collarbone and joint size seen in the primary photo."
        }
        (AnalysisDomain::Skin, Some(ImageAngle::Left | ImageAngle::Right | ImageAngle::Side)) => {
            "inspect cheek texture, pore size, pigmentation and redness on that side of the face, \
including the jawline and temple that the front photo shows poorly."
        }
        (AnalysisDomain::Skin, _) => {
            "confirm texture, shine and pigmentation seen in the primary photo."
        }
        (AnalysisDomain::WorkoutType | AnalysisDomain::ExerciseRecommendation, Some(ImageAngle::Side)) => {
            "check posture from the side: head position, rounded shoulders, pelvic tilt."
        }
        (AnalysisDomain::ProgressInsight, _) => {
            "compare against the primary photo for visible changes in posture, muscle definition and \
body outline; mention only changes you can actually see."
        }
        _ => "use it as a supporting view to confirm observations from the primary photo.",
    }
}
