use glowlens_contracts::domains::personal_color::{PersonalColorInput, SunReaction};

use super::{context_block, join_list, IMAGE_QUALITY_RULES, IMAGE_QUALITY_SCHEMA, JSON_ONLY};

const ROLE: &str = "You are a personal-color consultant. From a face photo you decide the person's \
undertone and seasonal color type (spring, summer, autumn, winter) and suggest a palette.";

const SCHEMA: &str = r##"{
  "season": "spring" | "summer" | "autumn" | "winter",
  "undertone": "warm" | "cool",
  "confidence": 0-100 integer,
  "bestColors": ["5 to 8 hex colors like #F4A6A0"],
  "avoidColors": ["3 to 5 hex colors"],
  "makeupTips": ["2 to 4 short tips for lip, cheek and eye colors"],
  "summary": "two sentences explaining the result in plain language",
__IMAGE_QUALITY__,
  "analysisEvidence": {
    "veinColor": "blue" | "purple" | "green" | "olive" | "mixed" | "unclear",
    "skinBrightness": "e.g. near-white, light, medium, tan, deep",
    "hairColor": "what the hair color looks like",
    "eyeColor": "what the eye color looks like",
    "contrast": "low" | "medium" | "high" | "very_high",
    "wristImageUsed": true | false
  }
}"##;

/// The rule order is what keeps results stable under colored indoor light;
/// the undertone is fixed before the season is chosen.
const RULES: &str = "DECISION RULES (apply strictly in this order):\n\
1. UNDERTONE FIRST. If wrist veins are visible and look blue or purple, the undertone is \"cool\" \
regardless of how the skin color appears. If they look green or olive, the undertone is \"warm\". \
If no wrist is visible or the veins are mixed or unclear, decide from skin (pink or rosy = cool, \
golden or peachy = warm), then hair, then eyes.\n\
2. LIGHTING BIAS. Indoor warm light makes almost everyone look golden. Under \"artificial\" or \
\"mixed\" lighting never switch a cool undertone to warm on skin color alone; prefer the vein color \
and the white of the eyes as the neutral reference.\n\
3. WARM SEASONS. A warm undertone is \"spring\" when features are light, clear and bright, and \
\"autumn\" when features are deeper, muted or earthy.\n\
4. COOL SEASONS. A cool undertone is \"summer\" by default. Escalate to \"winter\" ONLY IF ALL of the \
following hold: near-white skin, pure-black hair, near-black eyes, and very high contrast between skin \
and hair. If even one of the four is missing, keep \"summer\".\n\
5. undertone must match season: spring and autumn are warm, summer and winter are cool.\n\
6. Dyed hair or colored contact lenses are not evidence; mention them in imageQuality.notes and rely \
on skin and veins.\n\
7. bestColors must belong to the chosen season's palette; avoidColors must come from the opposite \
undertone.";

pub fn personal_color_prompt(input: &PersonalColorInput) -> String {
    let context = context_block(&[
        ("Natural hair color", input.natural_hair_color.clone()),
        ("Eye color", input.eye_color.clone()),
        (
            "Reaction to sun",
            input.sun_reaction.map(|reaction| {
                match reaction {
                    SunReaction::Burns => "burns easily, rarely tans",
                    SunReaction::Tans => "tans easily, rarely burns",
                    SunReaction::Both => "burns first, then tans",
                }
                .to_string()
            }),
        ),
        ("Colors the user likes", join_list(&input.preferred_colors)),
    ]);
    let schema = SCHEMA.replace("__IMAGE_QUALITY__", IMAGE_QUALITY_SCHEMA);
    format!(
        "{ROLE}\n\n{JSON_ONLY}\n\nOUTPUT SCHEMA:\n{schema}\n\n{RULES}\n\n{IMAGE_QUALITY_RULES}\n\n\
USER CONTEXT (self-reported, lower priority than the photo):\n{context}\n\n\
Analyze the attached face photo now. If no wrist photo is attached, set analysisEvidence.wristImageUsed to false."
    )
}

#[cfg(test)]
mod tests {
    use glowlens_contracts::domains::personal_color::{PersonalColorInput, SunReaction};

    use super::personal_color_prompt;

    #[test]
    fn undertone_rule_precedes_winter_escalation() {
        let prompt = personal_color_prompt(&PersonalColorInput::default());
        let undertone = prompt.find("1. UNDERTONE FIRST").unwrap();
        let cool = prompt.find("4. COOL SEASONS").unwrap();
        assert!(undertone < cool);
        assert!(prompt.contains("\"summer\" by default"));
        assert!(prompt.contains("ONLY IF ALL of the following hold"));
        assert!(prompt.contains("no additional context supplied"));
    }

    #[test]
    fn renders_sun_reaction_in_words() {
        let prompt = personal_color_prompt(&PersonalColorInput {
            natural_hair_color: Some("dark brown".to_string()),
            eye_color: None,
            sun_reaction: Some(SunReaction::Burns),
            preferred_colors: vec!["navy".to_string()],
        });
        assert!(prompt.contains("- Reaction to sun: burns easily, rarely tans"));
        assert!(prompt.contains("- Natural hair color: dark brown"));
        assert!(prompt.contains("- Colors the user likes: navy"));
    }
}
