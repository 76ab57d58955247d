use glowlens_contracts::domains::progress::{ProgressCheckpoint, ProgressInput};

use super::{context_block, IMAGE_QUALITY_RULES, IMAGE_QUALITY_SCHEMA, JSON_ONLY};

const ROLE: &str = "You are a supportive fitness coach reviewing a user's training log. You summarize \
progress honestly, point out what to improve and keep the user motivated.";

const SCHEMA: &str = r#"{
  "overallProgress": 0-100 integer,
  "trend": "improving" | "steady" | "declining",
  "consistencyScore": 0-100 integer,
  "highlights": ["2 to 4 concrete wins"],
  "areasToImprove": ["1 to 3 items"],
  "nextSteps": ["2 to 4 actionable steps for the next period"],
  "visibleChanges": ["only changes visible in attached photos; empty when there is no photo"],
  "motivation": "one encouraging sentence",
__IMAGE_QUALITY__
}"#;

const RULES: &str = "INSIGHT RULES (apply in order):\n\
1. consistencyScore is the completion rate (completed / planned sessions) scaled to 0-100, rounded. \
It is given below; do not recompute it from anything else.\n\
2. trend comes from the checkpoints: a better score or movement toward the goal weight across the \
period is \"improving\", no meaningful change is \"steady\", movement away is \"declining\". With fewer \
than two checkpoints use \"steady\".\n\
3. overallProgress blends consistencyScore with the trend: improving adds up to 15 points, declining \
subtracts up to 15, and the result stays within 0-100.\n\
4. Highlights and areasToImprove must cite numbers from the log.\n\
5. Never comment on appearance unless a photo is attached, and then only in visibleChanges.";

fn checkpoint_line(checkpoint: &ProgressCheckpoint) -> String {
    let mut parts = vec![checkpoint.date.clone()];
    if let Some(weight) = checkpoint.weight_kg {
        parts.push(format!("weight {weight:.1} kg"));
    }
    if let Some(score) = checkpoint.score {
        parts.push(format!("score {score}"));
    }
    parts.join(", ")
}

pub fn progress_prompt(input: &ProgressInput) -> String {
    let consistency = (input.completion_rate() * 100.0).round() as u8;
    let checkpoints = if input.checkpoints.is_empty() {
        None
    } else {
        Some(
            input
                .checkpoints
                .iter()
                .map(checkpoint_line)
                .collect::<Vec<String>>()
                .join("; "),
        )
    };
    let context = context_block(&[
        ("Goal", Some(input.goal.clone())),
        ("Period (days)", Some(input.period_days.to_string())),
        (
            "Sessions",
            Some(format!(
                "{} of {} planned completed",
                input.workouts_completed, input.workouts_planned
            )),
        ),
        ("Consistency score", Some(consistency.to_string())),
        ("Checkpoints", checkpoints),
    ]);
    let schema = SCHEMA.replace("__IMAGE_QUALITY__", IMAGE_QUALITY_SCHEMA);
    format!(
        "{ROLE}\n\n{JSON_ONLY}\n\nOUTPUT SCHEMA:\n{schema}\n\n{RULES}\n\n{IMAGE_QUALITY_RULES}\n\
Without a photo, set imageQuality.reliability to \"low\" and lighting to \"unknown\".\n\n\
TRAINING LOG:\n{context}\n\nWrite the progress insights now."
    )
}

#[cfg(test)]
mod tests {
    use glowlens_contracts::domains::progress::{ProgressCheckpoint, ProgressInput};

    use super::progress_prompt;

    #[test]
    fn states_precomputed_consistency_and_checkpoints() {
        let prompt = progress_prompt(&ProgressInput {
            goal: "lose 4 kg".to_string(),
            period_days: 28,
            workouts_planned: 12,
            workouts_completed: 9,
            checkpoints: vec![
                ProgressCheckpoint {
                    date: "2026-09-01".to_string(),
                    weight_kg: Some(68.0),
                    score: None,
                },
                ProgressCheckpoint {
                    date: "2026-09-29".to_string(),
                    weight_kg: Some(66.4),
                    score: Some(72),
                },
            ],
        });
        assert!(prompt.contains("- Sessions: 9 of 12 planned completed"));
        assert!(prompt.contains("- Consistency score: 75"));
        assert!(prompt.contains("2026-09-01, weight 68.0 kg; 2026-09-29, weight 66.4 kg, score 72"));
        assert!(prompt.contains("\"trend\": \"improving\" | \"steady\" | \"declining\""));
    }
}
