/// Profiling session lifecycle.
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use super::collector::{Collector, ProfileLayer, Snapshot};
use super::report::render;
use super::sort::SortKey;

/// Lifecycle of a profiling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileState {
    /// Profiling was not requested.
    Disarmed,
    /// Requested; sort keys captured, nothing recorded yet.
    Armed,
    /// The layer is installed and recording spans.
    Collecting,
    /// The report has been rendered. Terminal.
    Reported,
}

/// Handle to one profiling session. Clones share state.
#[derive(Clone)]
pub struct ProfileSession {
    sort_keys: Vec<SortKey>,
    collector: Arc<Mutex<Collector>>,
}

impl ProfileSession {
    /// A session that will never collect or report.
    #[must_use]
    pub fn disarmed() -> Self {
        Self {
            sort_keys: vec![SortKey::default()],
            collector: Arc::new(Mutex::new(Collector::new(ProfileState::Disarmed))),
        }
    }

    /// Arm a session with the given sort keys. An empty list means the default key.
    #[must_use]
    pub fn arm(sort_keys: Vec<SortKey>) -> Self {
        let sort_keys = if sort_keys.is_empty() {
            vec![SortKey::default()]
        } else {
            sort_keys
        };
        Self {
            sort_keys,
            collector: Arc::new(Mutex::new(Collector::new(ProfileState::Armed))),
        }
    }

    /// Sort keys, primary first.
    #[must_use]
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ProfileState {
        self.collector
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
    }

    /// Start collecting and return the layer to install.
    ///
    /// Returns `None` unless the session is armed and not yet started.
    #[must_use]
    pub fn start(&self) -> Option<ProfileLayer> {
        let mut collector = self
            .collector
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if collector.state != ProfileState::Armed {
            return None;
        }
        collector.start(Instant::now());
        Some(ProfileLayer::new(Arc::clone(&self.collector)))
    }

    /// Stop collecting and take the raw statistics.
    ///
    /// Returns `None` if the session never collected or was already stopped.
    #[must_use]
    pub fn stop(&self) -> Option<Snapshot> {
        let mut collector = self
            .collector
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match collector.state {
            ProfileState::Armed | ProfileState::Collecting => Some(collector.stop(Instant::now())),
            ProfileState::Disarmed | ProfileState::Reported => None,
        }
    }

    /// Stop collecting and render the sorted report, once.
    ///
    /// Later calls return `None`.
    #[must_use]
    pub fn report(&self) -> Option<String> {
        let snapshot = self.stop()?;
        Some(render(snapshot, &self.sort_keys))
    }
}
