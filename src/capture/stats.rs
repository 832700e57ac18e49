use serde::Serialize;
use std::time::Instant;

/// Collects frame counters for one capture session.
pub struct CaptureStats {
    accepted: u64,
    dropped: u64,
    start_time: Instant,
}

/// Snapshot of capture stats, logged when the loop ends.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSummary {
    pub accepted: u64,
    pub dropped: u64,
    pub fps: f64,
    pub elapsed_secs: f64,
}

impl CaptureStats {
    /// Create new stats with zeroed counters.
    pub fn new() -> Self {
        Self {
            accepted: 0,
            dropped: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a frame accepted into the collection.
    pub fn record_accepted(&mut self) {
        self.accepted += 1;
    }

    /// Record a frame dropped by preprocessing.
    pub fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    /// Accepted frames per second over the session so far.
    pub fn fps(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < 0.001 {
            return 0.0;
        }
        self.accepted as f64 / elapsed
    }

    /// Take a snapshot of the counters.
    pub fn summary(&self) -> CaptureSummary {
        CaptureSummary {
            accepted: self.accepted,
            dropped: self.dropped,
            fps: self.fps(),
            elapsed_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }
}

impl Default for CaptureStats {
    fn default() -> Self {
        Self::new()
    }
}
