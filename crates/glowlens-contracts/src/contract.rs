use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::AnalysisDomain;
use crate::reliability::ImageQuality;

/// A domain's structured output shape. Provider output and fallback output
/// both have to pass [`conform`] for the same contract.
pub trait ResultContract: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const DOMAIN: AnalysisDomain;
    /// Top-level camelCase keys that must be present and non-null.
    const REQUIRED_FIELDS: &'static [&'static str];

    fn image_quality(&self) -> Option<&ImageQuality>;

    /// Cross-field rules the typed shape cannot express.
    fn check_invariants(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("{domain} result must be a JSON object, got {found}")]
    NotAnObject {
        domain: AnalysisDomain,
        found: &'static str,
    },
    #[error("{domain} result is missing required fields: {}", .missing.join(", "))]
    MissingFields {
        domain: AnalysisDomain,
        missing: Vec<String>,
    },
    #[error("{domain} result does not match its contract: {message}")]
    Shape {
        domain: AnalysisDomain,
        message: String,
    },
    #[error("{domain} result is inconsistent: {message}")]
    Inconsistent {
        domain: AnalysisDomain,
        message: String,
    },
}

/// Shallow structural check, typed decoding, then the contract's cross-field
/// invariants. Values are never defaulted.
pub fn conform<R: ResultContract>(value: Value) -> Result<R, ContractViolation> {
    let Some(object) = value.as_object() else {
        return Err(ContractViolation::NotAnObject {
            domain: R::DOMAIN,
            found: json_kind(&value),
        });
    };
    let missing = R::REQUIRED_FIELDS
        .iter()
        .filter(|field| object.get(**field).map(Value::is_null).unwrap_or(true))
        .map(|field| (*field).to_string())
        .collect::<Vec<String>>();
    if !missing.is_empty() {
        return Err(ContractViolation::MissingFields {
            domain: R::DOMAIN,
            missing,
        });
    }
    let decoded: R = serde_json::from_value(value).map_err(|err| ContractViolation::Shape {
        domain: R::DOMAIN,
        message: err.to_string(),
    })?;
    decoded
        .check_invariants()
        .map_err(|message| ContractViolation::Inconsistent {
            domain: R::DOMAIN,
            message,
        })?;
    Ok(decoded)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
