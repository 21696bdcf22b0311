//! Progress reporting
//!
//! A progress reporter is an explicit `(label, percent)` callback passed
//! into every operation that can report progress. Every call is a new
//! event; there is no buffering or debouncing.
//!
//! Two percent scales are in play: model acquisition uses 0-90 (download
//! plus a fixed load milestone) while per-chunk synthesis restarts at 0
//! and runs to 100. They are intentionally not normalized onto a single
//! job-level scale.

use std::sync::Arc;

/// Callback signature for progress events
pub type ProgressFn = Arc<dyn Fn(&str, u8) + Send + Sync>;

/// Handle through which components report progress
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressFn>,
}

impl ProgressReporter {
    /// Create a reporter from a callback
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&str, u8) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    /// Create a reporter that discards all events
    pub fn noop() -> Self {
        Self { callback: None }
    }

    /// Emit one progress event. Percent is clamped to 100.
    pub fn report(&self, label: &str, percent: u8) {
        if let Some(cb) = &self.callback {
            cb(label, percent.min(100));
        }
    }

    /// Whether any observer is attached
    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_reporter_delivers_events() {
        let events: Arc<Mutex<Vec<(String, u8)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::new(move |label, pct| {
            sink.lock().unwrap().push((label.to_string(), pct));
        });

        reporter.report("Downloading", 40);
        reporter.report("Done!", 100);

        let seen = events.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("Downloading".to_string(), 40));
        assert_eq!(seen[1], ("Done!".to_string(), 100));
    }

    #[test]
    fn test_percent_clamped() {
        let events: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::new(move |_, pct| sink.lock().unwrap().push(pct));

        reporter.report("overflow", 250);
        assert_eq!(*events.lock().unwrap(), vec![100]);
    }

    #[test]
    fn test_noop_is_inactive() {
        let reporter = ProgressReporter::noop();
        assert!(!reporter.is_active());
        reporter.report("ignored", 50);
    }
}
