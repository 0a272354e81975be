//! Step timing.

use std::time::Instant;
use tracing::info;

/// Measures one transform step and logs its duration when finished.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    pub fn start(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Log the elapsed time.
    pub fn finish(self) {
        let elapsed = self.start.elapsed();
        if elapsed.as_secs() >= 1 {
            info!("[{:.1}s] {}", elapsed.as_secs_f64(), self.name);
        } else {
            info!("[{}ms] {}", elapsed.as_millis(), self.name);
        }
    }
}
