//! Progress tracking for the record loop.
//!
//! Logs a progress line each time the running count crosses an interval
//! boundary, plus a final line when the pass completes.

use log::info;

/// Progress tracker for logging record counts at regular intervals.
///
/// # Example
/// ```
/// use scsplit_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Processed records").with_interval(100);
/// for _ in 0..250 {
///     tracker.inc(); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Processed records 250 (complete)"
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// Creates a tracker with a count of 0 and the default interval of
    /// 1,000,000 records.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        ProgressTracker { interval: 1_000_000, message: message.into(), count: 0 }
    }

    /// Sets the logging interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        assert!(interval > 0, "progress interval must be positive");
        self.interval = interval;
        self
    }

    /// Counts one item, logging when an interval boundary is crossed.
    pub fn inc(&mut self) {
        self.count += 1;
        if self.count % self.interval == 0 {
            info!("{} {}", self.message, self.count);
        }
    }

    /// Logs the final count.
    pub fn log_final(&self) {
        info!("{} {} (complete)", self.message, self.count);
    }

    /// Returns the current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}
