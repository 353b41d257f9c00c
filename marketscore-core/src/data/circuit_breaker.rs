//! Circuit breaker for the filing source.
//!
//! EDGAR answers abusive clients with HTTP 403; repeated 429s mean the fair
//! access rate is exceeded. Either way the breaker opens and refuses requests
//! for a cooldown period (default 10 minutes).

use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open { tripped_at: Instant },
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
}

/// Refuses requests after a ban or a run of rate-limit responses.
#[derive(Debug)]
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    /// Create a closed breaker. A threshold of 0 is treated as 1.
    pub fn new(cooldown: Duration, failure_threshold: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
            }),
            cooldown,
            failure_threshold: failure_threshold.max(1),
        }
    }

    /// 10-minute cooldown, trips after 3 consecutive failures.
    pub fn default_provider() -> Self {
        Self::new(Duration::from_secs(10 * 60), 3)
    }

    /// Current state, without applying cooldown expiry.
    pub fn state(&self) -> BreakerState {
        self.inner.lock().state
    }

    /// Whether a request may go out now. An expired cooldown closes the breaker.
    pub fn is_allowed(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open { tripped_at } if tripped_at.elapsed() >= self.cooldown => {
                inner.state = BreakerState::Closed;
                inner.consecutive_failures = 0;
                true
            }
            BreakerState::Open { .. } => false,
        }
    }

    /// Record a successful request. Resets the consecutive-failure count.
    pub fn record_success(&self) {
        self.inner.lock().consecutive_failures = 0;
    }

    /// Record a failed request (429). Opens the breaker once the count
    /// reaches the threshold.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.failure_threshold {
            inner.state = BreakerState::Open {
                tripped_at: Instant::now(),
            };
        }
    }

    /// Open immediately (403 Forbidden).
    pub fn trip(&self) {
        self.inner.lock().state = BreakerState::Open {
            tripped_at: Instant::now(),
        };
    }

    /// Time until an open breaker admits requests again; zero when closed.
    pub fn remaining_cooldown(&self) -> Duration {
        match self.inner.lock().state {
            BreakerState::Closed => Duration::ZERO,
            BreakerState::Open { tripped_at } => self.cooldown.saturating_sub(tripped_at.elapsed()),
        }
    }
}
