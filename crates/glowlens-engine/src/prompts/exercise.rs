use glowlens_contracts::domains::exercise::ExerciseInput;

use super::{context_block, join_list, IMAGE_QUALITY_RULES, IMAGE_QUALITY_SCHEMA, JSON_ONLY};

const ROLE: &str = "You are a personal trainer writing one concrete workout session for a specific \
user. The session must be safe, fit the time available and match the requested workout type.";

const SCHEMA: &str = r#"{
  "title": "short session title",
  "difficulty": "beginner" | "intermediate" | "advanced",
  "totalMinutes": integer,
  "warmUp":   [ EXERCISE ],
  "mainSet":  [ EXERCISE ],
  "coolDown": [ EXERCISE ],
  "formTips": ["2 to 4 form cues"],
__IMAGE_QUALITY__
}

EXERCISE = {
  "name": "exercise name",
  "targetArea": "body area trained",
  "sets": integer,
  "reps": integer or null,
  "durationSeconds": integer or null,
  "restSeconds": integer,
  "instructions": "one sentence"
}"#;

const RULES: &str = "PLANNING RULES (apply in order):\n\
1. Exclude every exercise that loads a reported injury. Name no exercise that needs equipment the \
user did not list; with no equipment, use bodyweight only.\n\
2. totalMinutes must not exceed the session length. Count each exercise as sets x (durationSeconds, or \
reps x 3 seconds) plus sets x restSeconds; the sum over warmUp, mainSet and coolDown must fit.\n\
3. Each exercise sets exactly one of reps or durationSeconds; the other is null.\n\
4. warmUp and coolDown each take roughly 10-20% of the session; the rest is mainSet.\n\
5. difficulty equals the user's fitness level. Beginners get longer rest and fewer sets.\n\
6. Cover the requested target areas in mainSet first; fill remaining time with the workout type's \
staple movements.";

pub fn exercise_prompt(input: &ExerciseInput) -> String {
    let context = context_block(&[
        ("Workout type", Some(input.workout_type.as_str().to_string())),
        ("Fitness level", Some(input.fitness_level.as_str().to_string())),
        ("Session length (minutes)", Some(input.session_minutes.to_string())),
        ("Equipment", join_list(&input.equipment)),
        ("Injuries", join_list(&input.injuries)),
        ("Target areas", join_list(&input.target_areas)),
    ]);
    let schema = SCHEMA.replace("__IMAGE_QUALITY__", IMAGE_QUALITY_SCHEMA);
    format!(
        "{ROLE}\n\n{JSON_ONLY}\n\nOUTPUT SCHEMA:\n{schema}\n\n{RULES}\n\n{IMAGE_QUALITY_RULES}\n\
Without a photo, set imageQuality.reliability to \"low\" and lighting to \"unknown\".\n\n\
SESSION REQUEST:\n{context}\n\nWrite the session now."
    )
}
