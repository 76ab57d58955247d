use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use glowlens_contracts::events::{AnalysisEvent, EventWriter};
use tracing::{debug, warn};

/// Receives orchestration events. Recording never fails from the caller's
/// point of view.
pub trait AnalysisObserver: Send + Sync {
    fn record(&self, event: &AnalysisEvent);
}

/// Default observer: writes the event trail as debug log lines. The
/// orchestrator logs fallbacks itself, so nothing here is louder than debug.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn record(&self, event: &AnalysisEvent) {
        debug!(
            call_id = %event.call_id,
            domain = %event.domain,
            stage = ?event.stage,
            attempt = event.attempt.unwrap_or(0),
            failure_kind = event.failure_kind.map(|kind| kind.as_str()).unwrap_or(""),
            detail = event.detail.as_deref().unwrap_or(""),
            elapsed_ms = event.elapsed_ms,
            "analysis event"
        );
    }
}

/// Appends every event to a JSONL file from a dedicated writer thread, so
/// `record` only enqueues. Write errors are logged and dropped. Dropping the
/// observer drains the queue before returning.
#[derive(Debug)]
pub struct JsonlObserver {
    path: PathBuf,
    sender: Option<mpsc::Sender<AnalysisEvent>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl JsonlObserver {
    pub fn new(writer: EventWriter) -> Self {
        let path = writer.path().to_path_buf();
        let (sender, receiver) = mpsc::channel::<AnalysisEvent>();
        let worker = thread::spawn(move || drain_events(&writer, receiver));
        Self {
            path,
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn drain_events(writer: &EventWriter, receiver: mpsc::Receiver<AnalysisEvent>) {
    for event in receiver {
        if let Err(err) = writer.append(&event) {
            warn!(
                path = %writer.path().display(),
                error = %format!("{err:#}"),
                "failed to append analysis event"
            );
        }
    }
}

impl AnalysisObserver for JsonlObserver {
    fn record(&self, event: &AnalysisEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(event.clone()).is_err() {
            warn!(path = %self.path.display(), "event writer thread is gone");
        }
    }
}

impl Drop for JsonlObserver {
    fn drop(&mut self) {
        // closing the channel ends the writer loop
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(path = %self.path.display(), "event writer thread panicked");
            }
        }
    }
}

/// Fans one event out to several observers.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn AnalysisObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: impl AnalysisObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl AnalysisObserver for ObserverSet {
    fn record(&self, event: &AnalysisEvent) {
        for observer in &self.observers {
            observer.record(event);
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::sync::{Arc, Mutex};

    use glowlens_contracts::events::{AnalysisEvent, EventStage, FailureKind};

    use super::AnalysisObserver;

    /// Keeps every event in memory; clones share the same buffer.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct RecordingObserver {
        events: Arc<Mutex<Vec<AnalysisEvent>>>,
    }

    impl RecordingObserver {
        pub(crate) fn events(&self) -> Vec<AnalysisEvent> {
            self.events.lock().unwrap().clone()
        }

        pub(crate) fn stages(&self) -> Vec<EventStage> {
            self.events().iter().map(|event| event.stage).collect()
        }

        pub(crate) fn fallback_kind(&self) -> Option<FailureKind> {
            self.events()
                .iter()
                .find(|event| event.stage == EventStage::FallbackUsed)
                .and_then(|event| event.failure_kind)
        }
    }

    impl AnalysisObserver for RecordingObserver {
        fn record(&self, event: &AnalysisEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
