use glowlens_contracts::domains::skin::SkinInput;

use super::{context_block, join_list, IMAGE_QUALITY_RULES, IMAGE_QUALITY_SCHEMA, JSON_ONLY};

const ROLE: &str = "You are a careful skin-analysis assistant for a skincare app. You look at a face \
photo and score the visible condition of the skin. You do not diagnose disease.";

const SCHEMA: &str = r#"{
  "overallScore": 0-100 integer,
  "skinType": "dry" | "oily" | "combination" | "normal" | "sensitive",
  "metrics": {
    "moisture":     { "score": 0-100 integer, "status": "warning" | "normal" | "good" },
    "oiliness":     { "score": 0-100 integer, "status": "warning" | "normal" | "good" },
    "pores":        { "score": 0-100 integer, "status": "warning" | "normal" | "good" },
    "wrinkles":     { "score": 0-100 integer, "status": "warning" | "normal" | "good" },
    "pigmentation": { "score": 0-100 integer, "status": "warning" | "normal" | "good" },
    "redness":      { "score": 0-100 integer, "status": "warning" | "normal" | "good" },
    "elasticity":   { "score": 0-100 integer, "status": "warning" | "normal" | "good" }
  },
  "recommendedIngredients": ["3 to 5 skincare ingredients"],
  "avoidIngredients": ["2 to 4 ingredients to avoid"],
  "summary": "two sentences in plain language",
__IMAGE_QUALITY__,
  "analysisEvidence": {
    "observations": ["concrete visual cue, e.g. 'visible shine on forehead and nose'"]
  }
}"#;

const RULES: &str = "SCORING RULES (apply in order):\n\
1. Every metric score is a HEALTH score: higher is better. A very oily face gets a LOW oiliness score; \
deep wrinkles get a LOW wrinkles score.\n\
2. status is derived from score and nothing else: 0-40 = \"warning\", 41-70 = \"normal\", 71-100 = \"good\".\n\
3. overallScore is the rounded mean of the seven metric scores, adjusted by at most 5 points for anything \
the metrics miss.\n\
4. skinType: shine on forehead, nose AND cheeks = \"oily\"; shine only on the T-zone with dry or flaky \
cheeks = \"combination\"; flaking, tightness lines or dull texture without shine = \"dry\"; diffuse \
redness or visible irritation as the dominant trait = \"sensitive\"; otherwise \"normal\". If the user \
reports a skin type, use it only to break a tie between two equally likely types.\n\
5. recommendedIngredients must suit the chosen skinType (oily: niacinamide, salicylic acid, zinc; dry: \
ceramides, hyaluronic acid, squalane; combination: niacinamide, lightweight hyaluronic acid; sensitive: \
centella asiatica, panthenol, allantoin; normal: vitamin C, peptides, ceramides). avoidIngredients must \
not overlap recommendedIngredients.\n\
6. Makeup, beauty filters or foundation hide texture and pigmentation: set imageQuality.makeupDetected \
and lower reliability; do not reward covered skin with high pigmentation or pores scores.\n\
7. Warm indoor light exaggerates redness and yellow tones; under \"artificial\" or \"mixed\" lighting \
do not push redness or pigmentation below 41 from color alone.";

pub fn skin_prompt(input: &SkinInput) -> String {
    let context = context_block(&[
        ("Age", input.age.map(|age| age.to_string())),
        ("Concerns", join_list(&input.concerns)),
        (
            "Self-reported skin type",
            input.self_reported_type.map(|kind| kind.as_str().to_string()),
        ),
        ("Current products", join_list(&input.current_products)),
    ]);
    let schema = SCHEMA.replace("__IMAGE_QUALITY__", IMAGE_QUALITY_SCHEMA);
    format!(
        "{ROLE}\n\n{JSON_ONLY}\n\nOUTPUT SCHEMA:\n{schema}\n\n{RULES}\n\n{IMAGE_QUALITY_RULES}\n\n\
USER CONTEXT:\n{context}\n\nAnalyze the attached face photo now."
    )
}
