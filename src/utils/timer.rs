//! Wall-clock timing of pipeline stages.

use std::time::{Duration, Instant};

use log::info;

/// Logs the elapsed time of a stage when dropped
#[derive(Debug)]
pub struct ScopedTimer {
    label: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        info!("Finished: {} in {:.3}s", self.label, self.elapsed().as_secs_f64());
    }
}
