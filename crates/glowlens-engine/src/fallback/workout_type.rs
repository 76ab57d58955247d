use glowlens_contracts::domains::workout::{
    FitnessLevel, RecommendedExercise, WorkoutType, WorkoutTypeAnalysis, WorkoutTypeInput,
};
use glowlens_contracts::ImageQuality;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{mentions_any, pick};

const DEFAULT_FREQUENCY: u8 = 3;

const BODYWEIGHT: &[&str] = &[];

/// (name, focus, sets, reps, equipment keywords; empty means bodyweight)
type Template = (&'static str, &'static str, u8, &'static str, &'static [&'static str]);

fn exercise_pool(workout_type: WorkoutType) -> &'static [Template] {
    match workout_type {
        WorkoutType::Strength => &[
            ("Goblet squat", "legs and glutes", 3, "8-12", &["dumbbell", "kettlebell"]),
            ("Push-up", "chest and triceps", 3, "8-12", BODYWEIGHT),
            ("Bent-over row", "upper back", 3, "10-12", &["dumbbell", "barbell", "band"]),
            ("Romanian deadlift", "hamstrings", 3, "8-10", &["dumbbell", "barbell", "kettlebell"]),
            ("Overhead press", "shoulders", 3, "8-10", &["dumbbell", "barbell", "band"]),
            ("Split squat", "legs", 3, "10 per side", BODYWEIGHT),
            ("Glute bridge", "glutes", 3, "12-15", BODYWEIGHT),
            ("Superman hold", "lower back", 3, "20s", BODYWEIGHT),
            ("Plank", "core", 3, "30s", BODYWEIGHT),
        ],
        WorkoutType::Cardio => &[
            ("Brisk walk or easy jog", "aerobic base", 1, "25 min", BODYWEIGHT),
            ("Cycling", "aerobic endurance", 1, "20 min", &["bike", "cycle"]),
            ("Step-ups", "legs and heart rate", 3, "12 per side", BODYWEIGHT),
            ("Jumping jacks", "full body", 3, "45s", BODYWEIGHT),
            ("Shadow boxing", "upper body endurance", 3, "2 min", BODYWEIGHT),
            ("Rowing intervals", "full body endurance", 4, "2 min", &["row"]),
        ],
        WorkoutType::Hiit => &[
            ("Burpees", "full body", 4, "30s", BODYWEIGHT),
            ("Mountain climbers", "core and shoulders", 4, "30s", BODYWEIGHT),
            ("Jump squats", "legs", 4, "30s", BODYWEIGHT),
            ("High knees", "conditioning", 4, "30s", BODYWEIGHT),
            ("Skater jumps", "lateral power", 4, "30s", BODYWEIGHT),
            ("Kettlebell swings", "posterior chain", 4, "20s", &["kettlebell"]),
        ],
        WorkoutType::Flexibility => &[
            ("Cat-cow", "spine mobility", 2, "10", BODYWEIGHT),
            ("World's greatest stretch", "hips and thoracic spine", 2, "5 per side", BODYWEIGHT),
            ("Hip flexor stretch", "hip flexors", 2, "45s per side", BODYWEIGHT),
            ("Child's pose", "lower back", 2, "60s", BODYWEIGHT),
            ("Thread the needle", "upper back", 2, "8 per side", BODYWEIGHT),
        ],
        WorkoutType::Balanced => &[
            ("Bodyweight squat", "legs", 3, "12-15", BODYWEIGHT),
            ("Incline push-up", "chest", 3, "10-12", BODYWEIGHT),
            ("Brisk walk", "aerobic base", 1, "20 min", BODYWEIGHT),
            ("Glute bridge", "glutes", 3, "12-15", BODYWEIGHT),
            ("Bird dog", "core stability", 3, "10 per side", BODYWEIGHT),
            ("Hamstring stretch", "flexibility", 2, "45s", BODYWEIGHT),
        ],
    }
}

/// Templates doable with `equipment`. Every pool has at least four bodyweight
/// entries, so the result never runs short.
fn available(pool: &[Template], equipment: &[String]) -> Vec<Template> {
    pool.iter()
        .filter(|(.., needs)| needs.is_empty() || mentions_any(equipment, needs))
        .copied()
        .collect()
}

fn choose_type(input: Option<&WorkoutTypeInput>, rng: &mut StdRng) -> WorkoutType {
    let Some(input) = input else {
        return WorkoutType::Balanced;
    };
    if !input.injuries.is_empty() {
        return WorkoutType::Flexibility;
    }
    let fat_loss = mentions_any(&input.goals, &["fat", "weight", "lose", "endurance", "stamina"]);
    let muscle = mentions_any(&input.goals, &["muscle", "strength", "tone", "toning", "strong"]);
    let mobility = mentions_any(&input.goals, &["mobility", "flexib", "posture", "stress"]);
    match (fat_loss, muscle, mobility) {
        (true, false, false) => {
            if matches!(
                input.fitness_level,
                Some(FitnessLevel::Intermediate | FitnessLevel::Advanced)
            ) {
                pick(rng, &[WorkoutType::Cardio, WorkoutType::Hiit])
            } else {
                WorkoutType::Cardio
            }
        }
        (false, true, false) => WorkoutType::Strength,
        (false, false, true) => WorkoutType::Flexibility,
        _ => WorkoutType::Balanced,
    }
}

pub fn workout_type_fallback(
    input: Option<&WorkoutTypeInput>,
    rng: &mut StdRng,
) -> WorkoutTypeAnalysis {
    let workout_type = choose_type(input, rng);

    let equipment = input.map(|input| input.equipment.as_slice()).unwrap_or_default();
    let mut pool = available(exercise_pool(workout_type), equipment);
    pool.shuffle(rng);
    pool.truncate(4);
    let recommended_exercises = pool
        .into_iter()
        .map(|(name, focus, sets, reps, _)| RecommendedExercise {
            name: name.to_string(),
            focus: focus.to_string(),
            sets,
            reps: reps.to_string(),
        })
        .collect();

    let weekly_frequency = input
        .map(|input| input.frequency_per_week)
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_FREQUENCY)
        .min(DEFAULT_FREQUENCY + 2)
        .clamp(1, 7);

    let mut cautions = input
        .map(|input| {
            input
                .injuries
                .iter()
                .filter(|injury| !injury.trim().is_empty())
                .map(|injury| format!("Avoid loading the {} until it is pain-free.", injury.trim()))
                .collect::<Vec<String>>()
        })
        .unwrap_or_default();
    cautions.push("Stop any exercise that causes sharp pain.".to_string());

    WorkoutTypeAnalysis {
        workout_type,
        confidence: rng.gen_range(45..=60),
        reasoning: format!(
            "A {} routine is a safe starting point for the goals provided. Adjust it once a full analysis is available.",
            workout_type.as_str()
        ),
        recommended_exercises,
        weekly_frequency,
        cautions,
        image_quality: Some(ImageQuality::conservative()),
        analysis_evidence: None,
    }
}
