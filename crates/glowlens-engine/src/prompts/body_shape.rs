use glowlens_contracts::domains::body_shape::{BodyShapeInput, Gender};

use super::{context_block, join_list, IMAGE_QUALITY_RULES, IMAGE_QUALITY_SCHEMA, JSON_ONLY};

const ROLE: &str = "You are a body-frame stylist. From a full-body photo you classify the skeletal \
frame type used in fashion styling (S = straight, W = wave, N = natural). This is about bone structure \
and where flesh sits, never about weight or attractiveness.";

const SCHEMA: &str = r#"{
  "bodyType": "S" | "W" | "N",
  "confidence": 0-100 integer,
  "measurements": {
    "shoulderToHipRatio": number between 0.7 and 1.4 (visual estimate),
    "waistToHipRatio": number between 0.55 and 1.0 (visual estimate),
    "weightCenter": "upper" | "lower" | "even",
    "frame": "compact" | "medium" | "large"
  },
  "characteristics": ["3 to 5 short observations about the frame"],
  "recommendedStyles": ["3 to 5 clothing styles that flatter this frame"],
  "avoidStyles": ["2 to 4 clothing styles to avoid"],
__IMAGE_QUALITY__,
  "analysisEvidence": {
    "shoulderLine": "what the shoulder line looks like",
    "collarbone": "how visible and how large the collarbone is",
    "jointSize": "wrist, knee and elbow joint size relative to the body",
    "fleshTexture": "firm and elastic, soft, or lean with visible bone"
  }
}"#;

const RULES: &str = "DECISION RULES (apply in order, stop at the first rule that decides):\n\
1. Ignore body weight. A slim person can be S and a heavy person can be W; decide from bone and flesh \
placement only.\n\
2. Shoulder line: rounded and full with a thick upper body -> lean S. Sloped and narrow with a thin \
upper body -> lean W. Square, wide and bony -> lean N.\n\
3. Collarbone and joints: barely visible collarbone and small joints -> supports S. Thin, visible but \
small collarbone and small joints -> supports W. Prominent collarbone and large joints (wrists, knees) \
-> supports N.\n\
4. Weight center: flesh gathers on chest and upper arms -> \"upper\" (S). Flesh gathers on hips and \
thighs -> \"lower\" (W). Flesh evenly spread with frame dominating -> \"even\" (N).\n\
5. Tie-break: if S and N are tied, choose N when joints are clearly large, else S. If W and N are tied, \
choose W when the waist is clearly defined (waistToHipRatio below 0.72), else N. If S and W are tied, \
follow the weight center.\n\
6. measurements must agree with bodyType: S -> weightCenter \"upper\", shoulderToHipRatio about 1.00-1.08, \
waistToHipRatio about 0.74-0.80, frame \"medium\"; W -> \"lower\", about 0.88-0.96, about 0.66-0.73, \
frame \"compact\"; N -> \"even\", about 1.05-1.15, about 0.78-0.85, frame \"large\".\n\
7. Baggy clothing, sitting poses or cropped photos hide the frame: lower confidence and reliability \
rather than guessing a type with high confidence.";

pub fn body_shape_prompt(input: &BodyShapeInput) -> String {
    let context = context_block(&[
        ("Height (cm)", input.height_cm.map(|value| format!("{value:.0}"))),
        ("Weight (kg)", input.weight_kg.map(|value| format!("{value:.0}"))),
        (
            "Gender",
            input.gender.map(|gender| {
                match gender {
                    Gender::Female => "female",
                    Gender::Male => "male",
                    Gender::Other => "other",
                }
                .to_string()
            }),
        ),
        ("Style goals", join_list(&input.style_goals)),
    ]);
    let schema = SCHEMA.replace("__IMAGE_QUALITY__", IMAGE_QUALITY_SCHEMA);
    format!(
        "{ROLE}\n\n{JSON_ONLY}\n\nOUTPUT SCHEMA:\n{schema}\n\n{RULES}\n\n{IMAGE_QUALITY_RULES}\n\n\
USER CONTEXT (height and weight are context only, see rule 1):\n{context}\n\n\
Analyze the attached full-body photo now."
    )
}
