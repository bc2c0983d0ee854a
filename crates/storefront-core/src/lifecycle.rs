//! Page load lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases for a page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    /// Page load started, requests classified.
    Start,
    /// Deferred requests have been launched.
    DeferredDispatched,
    /// Every critical request succeeded.
    CriticalResolved,
    /// The bundle was handed back to the page handler.
    Completion,
    /// The critical set failed; carries the failing request name.
    Error(String),
}

impl LoadPhase {
    /// Timing mark name recorded for this phase.
    pub fn mark_name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::DeferredDispatched => "deferred_dispatched",
            Self::CriticalResolved => "critical_resolved",
            Self::Completion => "complete",
            Self::Error(_) => "error",
        }
    }
}

/// Phase marks for one page load, relative to its start.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark. Re-marking a name overwrites it.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Record the mark for a lifecycle phase.
    pub fn mark_phase(&mut self, phase: &LoadPhase) {
        self.mark(phase.mark_name());
    }

    /// Time from start to a named mark.
    pub fn since_start(&self, name: &str) -> Option<Duration> {
        self.marks.get(name).map(|t| t.duration_since(self.start))
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time until the critical barrier released.
    pub fn time_to_critical(&self) -> Option<Duration> {
        self.since_start(LoadPhase::CriticalResolved.mark_name())
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives each phase as a page load passes it.
pub trait LifecycleObserver: Send + Sync {
    fn on_phase(&self, phase: LoadPhase, elapsed: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_mark_names() {
        assert_eq!(LoadPhase::Start.mark_name(), "start");
        assert_eq!(LoadPhase::CriticalResolved.mark_name(), "critical_resolved");
        assert_eq!(LoadPhase::Error("x".into()).mark_name(), "error");
    }

    #[test]
    fn test_timing_marks() {
        let mut timing = TimingContext::new();
        assert!(timing.time_to_critical().is_none());

        timing.mark_phase(&LoadPhase::CriticalResolved);
        assert!(timing.time_to_critical().is_some());
    }

    #[test]
    fn test_remark_overwrites() {
        let mut timing = TimingContext::new();
        timing.mark("render");
        let first = timing.since_start("render").unwrap();
        std::thread::sleep(Duration::from_millis(2));
        timing.mark("render");
        assert!(timing.since_start("render").unwrap() > first);
        assert!(timing.since_start("missing").is_none());
    }
}
