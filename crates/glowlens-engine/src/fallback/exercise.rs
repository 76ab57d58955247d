use glowlens_contracts::domains::exercise::{ExerciseInput, ExercisePlan, PlannedExercise};
use glowlens_contracts::domains::workout::{FitnessLevel, WorkoutType};
use glowlens_contracts::ImageQuality;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{mentions_any, pick, strings};

const DEFAULT_SESSION_MINUTES: u16 = 20;
const MIN_WORK_SECONDS: u32 = 20;

struct Movement {
    name: &'static str,
    target_area: &'static str,
    /// Injury keywords that rule the movement out.
    loads: &'static [&'static str],
    instructions: &'static str,
}

const fn movement(
    name: &'static str,
    target_area: &'static str,
    loads: &'static [&'static str],
    instructions: &'static str,
) -> Movement {
    Movement {
        name,
        target_area,
        loads,
        instructions,
    }
}

const STRENGTH: &[Movement] = &[
    movement("Goblet squat", "legs", &["knee", "hip"], "Sit between the heels and keep the chest tall."),
    movement("Push-up", "chest", &["shoulder", "wrist"], "Keep a straight line from head to heels."),
    movement("Dumbbell row", "back", &["back", "shoulder"], "Pull the elbow toward the hip without twisting."),
    movement("Glute bridge", "glutes", &["back"], "Drive through the heels and squeeze at the top."),
    movement("Dead bug", "core", &[], "Press the lower back into the floor throughout."),
    movement("Reverse lunge", "legs", &["knee", "ankle"], "Step back softly and keep the front knee over the foot."),
];

const CARDIO: &[Movement] = &[
    movement("Marching in place", "full body", &[], "Lift the knees to hip height and swing the arms."),
    movement("Step-ups", "legs", &["knee", "ankle"], "Step the whole foot onto the platform."),
    movement("Shadow boxing", "upper body", &["shoulder"], "Stay light on the feet and exhale with each punch."),
    movement("Jumping jacks", "full body", &["knee", "ankle"], "Land softly on the balls of the feet."),
    movement("Skater steps", "legs", &["knee", "hip"], "Step side to side with control."),
];

const HIIT: &[Movement] = &[
    movement("Squat jumps", "legs", &["knee", "ankle", "hip"], "Land softly and reset before the next jump."),
    movement("Mountain climbers", "core", &["wrist", "shoulder"], "Keep the hips level with the shoulders."),
    movement("Burpees", "full body", &["knee", "back", "wrist"], "Step back instead of jumping if needed."),
    movement("High knees", "conditioning", &["knee", "hip"], "Drive the knees up quickly with a tall torso."),
    movement("Plank jacks", "core", &["wrist", "shoulder"], "Brace the core so the hips do not sway."),
];

const FLEXIBILITY: &[Movement] = &[
    movement("Cat-cow", "spine", &[], "Move slowly with the breath."),
    movement("Hip flexor stretch", "hips", &["knee"], "Tuck the pelvis and lean gently forward."),
    movement("Thread the needle", "upper back", &["shoulder"], "Rotate from the upper back, not the lower back."),
    movement("Seated hamstring stretch", "hamstrings", &["back"], "Hinge at the hips with a long spine."),
    movement("Figure-four stretch", "glutes", &["hip"], "Keep the lower back on the floor."),
];

const BALANCED: &[Movement] = &[
    movement("Bodyweight squat", "legs", &["knee", "hip"], "Keep the weight over the mid-foot."),
    movement("Incline push-up", "chest", &["shoulder", "wrist"], "Use a bench or wall to adjust difficulty."),
    movement("Bird dog", "core", &[], "Reach long without arching the lower back."),
    movement("Marching in place", "full body", &[], "Keep a steady breathing rhythm."),
    movement("Side plank", "core", &["shoulder"], "Stack the hips and keep the body in one line."),
];

/// Movements that load none of the usual injury sites.
const GENTLE: &[Movement] = &[
    movement("Diaphragmatic breathing", "core", &[], "Breathe into the belly for a slow count of four."),
    movement("Seated arm circles", "shoulders", &[], "Make small, controlled circles."),
    movement("Supine pelvic tilts", "core", &[], "Flatten and release the lower back gently."),
];

fn movements_for(workout_type: WorkoutType) -> &'static [Movement] {
    match workout_type {
        WorkoutType::Strength => STRENGTH,
        WorkoutType::Cardio => CARDIO,
        WorkoutType::Hiit => HIIT,
        WorkoutType::Flexibility => FLEXIBILITY,
        WorkoutType::Balanced => BALANCED,
    }
}

fn load_for(level: FitnessLevel) -> (u8, u32) {
    match level {
        FitnessLevel::Beginner => (2, 60),
        FitnessLevel::Intermediate => (3, 45),
        FitnessLevel::Advanced => (4, 30),
    }
}

fn timed(movement: &Movement, sets: u8, work_seconds: u32, rest_seconds: u32) -> PlannedExercise {
    PlannedExercise {
        name: movement.name.to_string(),
        target_area: movement.target_area.to_string(),
        sets,
        reps: None,
        duration_seconds: Some(work_seconds),
        rest_seconds: u16::try_from(rest_seconds).unwrap_or(u16::MAX),
        instructions: movement.instructions.to_string(),
    }
}

pub fn exercise_fallback(input: Option<&ExerciseInput>, rng: &mut StdRng) -> ExercisePlan {
    let workout_type = input.map(|input| input.workout_type).unwrap_or(WorkoutType::Balanced);
    let level = input
        .map(|input| input.fitness_level)
        .unwrap_or(FitnessLevel::Beginner);
    let session_minutes = input
        .map(|input| input.session_minutes)
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_SESSION_MINUTES);
    let injuries = input.map(|input| input.injuries.clone()).unwrap_or_default();
    let targets = input.map(|input| input.target_areas.clone()).unwrap_or_default();

    let budget = u32::from(session_minutes) * 60;
    let warm_up_seconds = budget * 15 / 100;
    let cool_down_seconds = budget * 15 / 100;
    let main_budget = budget - warm_up_seconds - cool_down_seconds;

    let mut candidates = movements_for(workout_type)
        .iter()
        .filter(|movement| !mentions_any(&injuries, movement.loads))
        .collect::<Vec<&Movement>>();
    if candidates.is_empty() {
        candidates = GENTLE.iter().collect();
    }
    candidates.shuffle(rng);
    // requested areas first; sort is stable so the shuffle order survives otherwise
    candidates.sort_by_key(|movement| !mentions_any(&targets, &[movement.target_area]));

    let (sets, mut rest) = load_for(level);
    let mut count = candidates.len().min(5);
    let per_set = |count: usize| main_budget / (count as u32).max(1) / u32::from(sets);
    while count > 1 && per_set(count) < rest + MIN_WORK_SECONDS {
        count -= 1;
    }
    let slot = per_set(count);
    if slot < rest + MIN_WORK_SECONDS {
        rest = slot / 3;
    }
    let work = slot - rest;
    let main_set = candidates
        .iter()
        .take(count)
        .map(|movement| timed(movement, sets, work, rest))
        .collect::<Vec<PlannedExercise>>();

    let warm_up = vec![timed(&GENTLE[0], 1, warm_up_seconds, 0)];
    let cool_down_move = pick(rng, &[&FLEXIBILITY[0], &FLEXIBILITY[3], &GENTLE[0]]);
    let cool_down = vec![timed(cool_down_move, 1, cool_down_seconds, 0)];

    let mut plan = ExercisePlan {
        title: format!("{session_minutes}-minute {} session", workout_type.as_str()),
        difficulty: level,
        total_minutes: 0,
        warm_up,
        main_set,
        cool_down,
        form_tips: strings(&[
            "Move with control; speed comes after good form.",
            "Exhale on the effort and keep breathing steadily.",
            "Stop if you feel sharp or joint pain.",
        ]),
        image_quality: Some(ImageQuality::conservative()),
        analysis_evidence: None,
    };
    let total_seconds = plan.exercises().map(PlannedExercise::estimated_seconds).sum::<u32>();
    plan.total_minutes = u16::try_from(total_seconds.div_ceil(60)).unwrap_or(session_minutes);
    plan
}
