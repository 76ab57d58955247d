use glowlens_contracts::domains::progress::{ProgressInput, ProgressInsights, ProgressTrend};
use glowlens_contracts::ImageQuality;
use rand::rngs::StdRng;

use super::pick;

const MOTIVATION: &[&str] = &[
    "Every session you log is a vote for the person you are becoming.",
    "Small, steady steps add up faster than you think.",
    "Consistency beats intensity; keep showing up.",
    "You have already done the hardest part: starting.",
];

fn trend_from_checkpoints(input: &ProgressInput) -> ProgressTrend {
    let (Some(first), Some(last)) = (input.checkpoints.first(), input.checkpoints.last()) else {
        return ProgressTrend::Steady;
    };
    if input.checkpoints.len() < 2 {
        return ProgressTrend::Steady;
    }
    if let (Some(before), Some(after)) = (first.score, last.score) {
        return match i16::from(after) - i16::from(before) {
            delta if delta >= 3 => ProgressTrend::Improving,
            delta if delta <= -3 => ProgressTrend::Declining,
            _ => ProgressTrend::Steady,
        };
    }
    if let (Some(before), Some(after)) = (first.weight_kg, last.weight_kg) {
        let goal = input.goal.to_ascii_lowercase();
        let delta = after - before;
        let wanted = if goal.contains("gain") || goal.contains("bulk") {
            delta
        } else if goal.contains("lose") || goal.contains("weight") || goal.contains("fat") {
            -delta
        } else {
            return ProgressTrend::Steady;
        };
        if wanted >= 0.5 {
            return ProgressTrend::Improving;
        }
        if wanted <= -0.5 {
            return ProgressTrend::Declining;
        }
    }
    ProgressTrend::Steady
}

pub fn progress_fallback(input: Option<&ProgressInput>, rng: &mut StdRng) -> ProgressInsights {
    let default_input = ProgressInput::default();
    let input = input.unwrap_or(&default_input);

    let consistency_score = (input.completion_rate() * 100.0).round() as u8;
    let trend = trend_from_checkpoints(input);
    let overall_progress = match trend {
        ProgressTrend::Improving => consistency_score.saturating_add(10).min(100),
        ProgressTrend::Steady => consistency_score,
        ProgressTrend::Declining => consistency_score.saturating_sub(10),
    };

    let mut highlights = vec![format!(
        "Completed {} of {} planned workouts over {} days.",
        input.workouts_completed, input.workouts_planned, input.period_days
    )];
    if trend == ProgressTrend::Improving {
        highlights.push("Your check-ins are moving in the right direction.".to_string());
    }

    let mut areas_to_improve = Vec::new();
    if consistency_score < 70 {
        areas_to_improve.push(format!(
            "Consistency is at {consistency_score}%; aim for at least 70%."
        ));
    }
    if trend == ProgressTrend::Declining {
        areas_to_improve.push("Recent check-ins moved away from the goal.".to_string());
    }
    if areas_to_improve.is_empty() {
        areas_to_improve.push("Keep logging check-ins so trends stay visible.".to_string());
    }

    ProgressInsights {
        overall_progress,
        trend,
        consistency_score,
        highlights,
        areas_to_improve,
        next_steps: vec![
            "Schedule next week's sessions in advance.".to_string(),
            "Log a check-in at the end of each week.".to_string(),
        ],
        visible_changes: Vec::new(),
        motivation: pick(rng, MOTIVATION).to_string(),
        image_quality: Some(ImageQuality::conservative()),
        analysis_evidence: None,
    }
}
