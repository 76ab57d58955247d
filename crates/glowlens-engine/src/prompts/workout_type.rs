use glowlens_contracts::domains::workout::{BodyProportions, WorkoutTypeInput};

use super::{context_block, join_list, IMAGE_QUALITY_RULES, IMAGE_QUALITY_SCHEMA, JSON_ONLY};

const ROLE: &str = "You are a certified personal trainer. You pick the single workout style that best \
fits the user's goals, constraints and body proportions, and outline a starter routine.";

const SCHEMA: &str = r#"{
  "workoutType": "strength" | "cardio" | "hiit" | "flexibility" | "balanced",
  "confidence": 0-100 integer,
  "reasoning": "two or three sentences linking the choice to the user's goals and constraints",
  "recommendedExercises": [
    { "name": "exercise name", "focus": "muscle group or quality trained", "sets": integer, "reps": "e.g. 8-12 or 30s" }
  ],
  "weeklyFrequency": 1-7 integer,
  "cautions": ["safety notes; at least one when injuries are reported"],
__IMAGE_QUALITY__,
  "analysisEvidence": {
    "observations": ["posture or proportion cue used, if a photo is attached"]
  }
}"#;

const RULES: &str = "DECISION RULES (apply in order):\n\
1. Injuries first. Never recommend an exercise that loads a reported injury; prefer \"flexibility\" or \
\"balanced\" when injuries limit most options, and list each injury in cautions.\n\
2. Goals next: fat loss or endurance -> \"cardio\" or \"hiit\"; muscle gain or toning -> \"strength\"; \
mobility, stress or posture -> \"flexibility\"; several competing goals -> \"balanced\".\n\
3. \"hiit\" only for intermediate or advanced users without joint injuries.\n\
4. weeklyFrequency must not exceed the frequency the user says they can train; when none is given, \
use 3.\n\
5. Every recommended exercise must be possible with the listed equipment; with no equipment listed, \
use bodyweight exercises only. Recommend 4 to 6 exercises.\n\
6. Body proportions only fine-tune exercise selection (e.g. a lower weight center favors upper-body \
volume); they never override rules 1-5.\n\
7. Without a photo, set imageQuality.reliability to \"low\" and lighting to \"unknown\".";

fn proportions_line(proportions: &BodyProportions) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(body_type) = proportions.body_type {
        parts.push(format!("frame type {} ({})", body_type.code(), body_type.label()));
    }
    if let Some(ratio) = proportions.shoulder_to_hip_ratio {
        parts.push(format!("shoulder-to-hip {ratio:.2}"));
    }
    if let Some(ratio) = proportions.waist_to_hip_ratio {
        parts.push(format!("waist-to-hip {ratio:.2}"));
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join(", "))
}

pub fn workout_type_prompt(input: &WorkoutTypeInput) -> String {
    let context = context_block(&[
        ("Goals", join_list(&input.goals)),
        ("Concerns", join_list(&input.concerns)),
        (
            "Can train (days per week)",
            (input.frequency_per_week > 0).then(|| input.frequency_per_week.to_string()),
        ),
        ("Equipment", join_list(&input.equipment)),
        ("Injuries", join_list(&input.injuries)),
        (
            "Fitness level",
            input.fitness_level.map(|level| level.as_str().to_string()),
        ),
        (
            "Body proportions",
            input.body_proportions.as_ref().and_then(proportions_line),
        ),
    ]);
    let schema = SCHEMA.replace("__IMAGE_QUALITY__", IMAGE_QUALITY_SCHEMA);
    format!(
        "{ROLE}\n\n{JSON_ONLY}\n\nOUTPUT SCHEMA:\n{schema}\n\n{RULES}\n\n{IMAGE_QUALITY_RULES}\n\n\
USER PROFILE:\n{context}\n\nRecommend the workout type now."
    )
}
