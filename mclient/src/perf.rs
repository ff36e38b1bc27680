//! Latency tracking against the real-time response budget.

use std::time::Duration;

/// The response budget for an interaction that should feel real-time.
pub const RESPONSE_BUDGET: Duration = Duration::from_millis(500);

/// Records the latency of the most recent call attempt. No history is
/// retained; the only consumer question is whether the last interaction
/// was fast enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseTimer {
    last: Option<Duration>,
}

impl ResponseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the elapsed time of a completed call attempt, success or
    /// failure alike.
    pub fn record(&mut self, elapsed: Duration) {
        self.last = Some(elapsed);
    }

    pub fn last_response_time(&self) -> Option<Duration> {
        self.last
    }

    /// False until a call completes, then true iff the latest call fit
    /// inside [`RESPONSE_BUDGET`].
    pub fn is_acceptable(&self) -> bool {
        self.last.is_some_and(|elapsed| elapsed <= RESPONSE_BUDGET)
    }
}
