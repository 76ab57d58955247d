//! Deterministic stand-in results for when the provider cannot be used.
//!
//! Each generator is seeded from the domain and the serialized input, so a
//! repeated call with the same input yields the same result. Fallbacks always
//! carry [`ImageQuality::conservative`] and never carry evidence.
//!
//! [`ImageQuality::conservative`]: glowlens_contracts::ImageQuality::conservative

mod body_shape;
mod exercise;
mod personal_color;
mod progress;
mod skin;
mod workout_type;

pub use body_shape::body_shape_fallback;
pub use exercise::exercise_fallback;
pub use personal_color::personal_color_fallback;
pub use progress::progress_fallback;
pub use skin::skin_fallback;
pub use workout_type::workout_type_fallback;

use glowlens_contracts::AnalysisDomain;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// `sha256(domain || 0x00 || json(input))`, the seed behind [`seeded_rng`].
pub fn fallback_seed<I: Serialize>(domain: AnalysisDomain, input: Option<&I>) -> [u8; 32] {
    let serialized = input
        .and_then(|value| serde_json::to_vec(value).ok())
        .unwrap_or_else(|| b"null".to_vec());
    let mut hasher = Sha256::new();
    hasher.update(domain.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(&serialized);
    hasher.finalize().into()
}

pub fn seeded_rng<I: Serialize>(domain: AnalysisDomain, input: Option<&I>) -> StdRng {
    StdRng::from_seed(fallback_seed(domain, input))
}

/// Uniform pick from a non-empty table.
pub(crate) fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Ratio drawn from `low..=high`, rounded to two decimals.
pub(crate) fn ratio_between(rng: &mut StdRng, low: f32, high: f32) -> f32 {
    (rng.gen_range(low..=high) * 100.0).round() / 100.0
}

pub(crate) fn mentions_any(haystack: &[String], needles: &[&str]) -> bool {
    haystack.iter().any(|item| {
        let lowered = item.to_ascii_lowercase();
        needles.iter().any(|needle| lowered.contains(needle))
    })
}
