use std::time::{Duration, Instant};

/// Logs how long the enclosing scope took once it ends.
///
/// Scopes finishing below the threshold are only logged at `debug`, so the
/// per-chip passes stay quiet on small boards.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold: Duration,
}

impl ScopedTimer {
    pub const DEFAULT_THRESHOLD: Duration = Duration::from_millis(10);

    pub fn new(name: &'static str) -> Self {
        Self::with_threshold(name, Self::DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(name: &'static str, threshold: Duration) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        if elapsed >= self.threshold {
            log::info!("{} took {:?}", self.name, elapsed);
        } else {
            log::debug!("{} took {:?}", self.name, elapsed);
        }
    }
}
