use crate::run::observer::RunObserver;
use crate::run::outcome::TestOutcome;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe recorder collecting issue-key tags and test outcomes for one
/// run. Cloning is cheap; clones share the same state so a harness can hand
/// one handle per worker thread.
#[derive(Debug, Default, Clone)]
pub struct RunRecorder {
    inner: Arc<RwLock<RecorderState>>,
}

#[derive(Debug, Default)]
struct RecorderState {
    keys: HashMap<String, String>,
    outcomes: Vec<TestOutcome>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of everything the recorder collected, handed to the
/// report builder once the run is over.
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub keys: HashMap<String, String>,
    pub outcomes: Vec<TestOutcome>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let state = self.inner.read().expect("recorder lock poisoned");
        RunSnapshot {
            keys: state.keys.clone(),
            outcomes: state.outcomes.clone(),
            started_at: state.started_at,
            finished_at: state.finished_at,
        }
    }

    /// Issue key previously tagged for a test, if any.
    pub fn key_for(&self, test_id: &str) -> Option<String> {
        let state = self.inner.read().expect("recorder lock poisoned");
        state.keys.get(test_id).cloned()
    }

    pub fn tagged_count(&self) -> usize {
        let state = self.inner.read().expect("recorder lock poisoned");
        state.keys.len()
    }

    pub fn outcome_count(&self) -> usize {
        let state = self.inner.read().expect("recorder lock poisoned");
        state.outcomes.len()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        let state = self.inner.read().expect("recorder lock poisoned");
        state.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        let state = self.inner.read().expect("recorder lock poisoned");
        state.finished_at
    }
}

impl RunObserver for RunRecorder {
    fn run_started(&self) {
        let mut state = self.inner.write().expect("recorder lock poisoned");
        if state.started_at.is_none() {
            state.started_at = Some(Utc::now());
        }
    }

    fn tag(&self, test_id: &str, issue_key: &str) {
        let mut state = self.inner.write().expect("recorder lock poisoned");
        state.keys.insert(test_id.to_owned(), issue_key.to_owned());
    }

    fn record(&self, outcome: TestOutcome) {
        tracing::debug!(
            test_id = outcome.test_id(),
            status = %outcome.status(),
            "recorded test outcome"
        );
        let mut state = self.inner.write().expect("recorder lock poisoned");
        state.outcomes.push(outcome);
    }

    fn run_finished(&self) {
        let mut state = self.inner.write().expect("recorder lock poisoned");
        if state.finished_at.is_none() {
            state.finished_at = Some(Utc::now());
        }
    }
}
