use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::AnalysisDomain;

/// Why a call left the provider path. Carried on events so an observability
/// sink can tell outages, bad replies and configuration apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ForceMock,
    ConfigurationAbsent,
    Timeout,
    ProviderError,
    MalformedResponse,
    InvalidImageEncoding,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::ForceMock => "force_mock",
            FailureKind::ConfigurationAbsent => "configuration_absent",
            FailureKind::Timeout => "timeout",
            FailureKind::ProviderError => "provider_error",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::InvalidImageEncoding => "invalid_image_encoding",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStage {
    Started,
    AttemptFailed,
    ProviderSucceeded,
    FallbackUsed,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEvent {
    pub call_id: String,
    pub domain: AnalysisDomain,
    pub stage: EventStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AnalysisEvent {
    pub fn new(call_id: impl Into<String>, domain: AnalysisDomain, stage: EventStage) -> Self {
        Self {
            call_id: call_id.into(),
            domain,
            stage,
            failure_kind: None,
            attempt: None,
            elapsed_ms: 0,
            model: None,
            detail: None,
        }
    }

    pub fn with_failure(mut self, kind: FailureKind, detail: impl Into<String>) -> Self {
        self.failure_kind = Some(kind);
        self.detail = Some(detail.into());
        self
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Append-only writer for `analysis.jsonl`.
///
/// - every line carries `session_id` and an RFC 3339 `ts`
/// - event fields are merged last
/// - one compact JSON object per line
#[derive(Debug, Clone)]
pub struct EventWriter {
    inner: Arc<EventWriterInner>,
}

#[derive(Debug)]
struct EventWriterInner {
    path: PathBuf,
    session_id: String,
    lock: Mutex<()>,
}

impl EventWriter {
    pub fn new(path: impl Into<PathBuf>, session_id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(EventWriterInner {
                path: path.into(),
                session_id: session_id.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    pub fn append(&self, event: &AnalysisEvent) -> anyhow::Result<Value> {
        let mut line = serde_json::Map::new();
        line.insert(
            "session_id".to_string(),
            Value::String(self.inner.session_id.clone()),
        );
        line.insert("ts".to_string(), Value::String(now_utc_iso()));
        if let Value::Object(fields) = serde_json::to_value(event)? {
            for (key, value) in fields {
                line.insert(key, value);
            }
        }

        if let Some(parent) = self.inner.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_string(&line)?;
        let _guard = self
            .inner
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("event writer lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.inner.path)?;
        file.write_all(encoded.as_bytes())?;
        file.write_all(b"\n")?;

        Ok(Value::Object(line))
    }
}

fn now_utc_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::DateTime;
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn append_writes_compact_jsonl_line() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("analysis.jsonl");
        let writer = EventWriter::new(&path, "session-1");

        let event = AnalysisEvent::new("call-1", AnalysisDomain::Skin, EventStage::FallbackUsed)
            .with_failure(FailureKind::Timeout, "deadline of 12s elapsed")
            .with_elapsed_ms(12_004);
        let emitted = writer.append(&event)?;

        let content = fs::read_to_string(&path)?;
        let line = content.lines().next().unwrap_or("");
        let parsed: Value = serde_json::from_str(line)?;

        assert_eq!(parsed, emitted);
        assert_eq!(parsed["session_id"], json!("session-1"));
        assert_eq!(parsed["domain"], json!("skin"));
        assert_eq!(parsed["stage"], json!("fallback_used"));
        assert_eq!(parsed["failureKind"], json!("timeout"));
        assert_eq!(parsed["elapsedMs"], json!(12_004));
        assert!(parsed.get("attempt").is_none());

        let ts = parsed["ts"].as_str().unwrap_or("");
        DateTime::parse_from_rfc3339(ts)?;
        Ok(())
    }

    #[test]
    fn append_creates_parent_dirs_and_appends() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("analysis.jsonl");
        let writer = EventWriter::new(&path, "session-1");

        writer.append(&AnalysisEvent::new(
            "call-1",
            AnalysisDomain::BodyShape,
            EventStage::Started,
        ))?;
        writer.append(
            &AnalysisEvent::new("call-1", AnalysisDomain::BodyShape, EventStage::AttemptFailed)
                .with_attempt(1),
        )?;

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: Value = serde_json::from_str(lines[1])?;
        assert_eq!(second["stage"], json!("attempt_failed"));
        assert_eq!(second["attempt"], json!(1));
        Ok(())
    }

    #[test]
    fn failure_kind_display_matches_serde_tag() {
        for kind in [
            FailureKind::ForceMock,
            FailureKind::ConfigurationAbsent,
            FailureKind::Timeout,
            FailureKind::ProviderError,
            FailureKind::MalformedResponse,
            FailureKind::InvalidImageEncoding,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.to_string()));
        }
    }
}
