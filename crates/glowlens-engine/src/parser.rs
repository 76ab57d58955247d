use glowlens_contracts::{conform, ResultContract};
use serde_json::Value;

use crate::error::AnalysisError;
use crate::provider::truncate_text;

/// Removes a leading fence (with optional language tag) and a trailing fence.
/// Each side is handled on its own so half-fenced replies still parse.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            Some(newline) if is_language_tag(&rest[..newline]) => &rest[newline + 1..],
            Some(_) => rest,
            None => rest
                .trim_start_matches(|ch: char| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'),
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

/// Parses raw provider text into the domain result, enforcing the required
/// fields and the enumerated values of `R`.
pub fn parse_contract<R: ResultContract>(raw: &str) -> Result<R, AnalysisError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(AnalysisError::MalformedResponse(
            "provider returned no text".to_string(),
        ));
    }
    let value: Value = serde_json::from_str(body).map_err(|err| {
        AnalysisError::MalformedResponse(format!(
            "response is not valid JSON ({err}): {}",
            truncate_text(body, 160)
        ))
    })?;
    Ok(conform::<R>(value)?)
}
