use std::time::Duration;

use glowlens_contracts::events::FailureKind;
use glowlens_contracts::ContractViolation;

/// Failure taxonomy of the orchestration layer. Only `InvalidImageEncoding`
/// ever reaches a caller; everything else is absorbed by the fallback path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("provider credential is not configured")]
    ConfigurationAbsent,
    #[error("provider did not answer within {}ms", .deadline.as_millis())]
    Timeout { deadline: Duration },
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("invalid image encoding: {0}")]
    InvalidImageEncoding(String),
}

impl AnalysisError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalysisError::ConfigurationAbsent => FailureKind::ConfigurationAbsent,
            AnalysisError::Timeout { .. } => FailureKind::Timeout,
            AnalysisError::Provider(_) => FailureKind::ProviderError,
            AnalysisError::MalformedResponse(_) => FailureKind::MalformedResponse,
            AnalysisError::InvalidImageEncoding(_) => FailureKind::InvalidImageEncoding,
        }
    }
}

impl From<ContractViolation> for AnalysisError {
    fn from(violation: ContractViolation) -> Self {
        AnalysisError::MalformedResponse(violation.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glowlens_contracts::events::FailureKind;

    use super::AnalysisError;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(
            AnalysisError::Timeout {
                deadline: Duration::from_secs(3)
            }
            .kind(),
            FailureKind::Timeout
        );
        assert_eq!(
            AnalysisError::Provider("503".to_string()).kind(),
            FailureKind::ProviderError
        );
        assert_eq!(
            AnalysisError::ConfigurationAbsent.kind(),
            FailureKind::ConfigurationAbsent
        );
    }

    #[test]
    fn timeout_message_reports_milliseconds() {
        let err = AnalysisError::Timeout {
            deadline: Duration::from_millis(2500),
        };
        assert_eq!(err.to_string(), "provider did not answer within 2500ms");
    }
}
