use std::time::{Duration, Instant};

/// Quiet interval before a typed search term is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces rapid search edits into one update after a quiet interval.
#[derive(Debug)]
pub struct Debounce {
    wait: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Debounce {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Record the latest value; restarts the quiet interval.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now));
    }

    /// Return the pending value once it has been quiet long enough.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.duration_since(*at) >= self.wait => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Drop the pending value and return it, bypassing the wait.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
