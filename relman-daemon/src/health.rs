//! Liveness derived from consecutive export pass failures.

use std::sync::{Mutex, MutexGuard};

/// Consecutive failed passes after which the daemon reports unhealthy.
pub const MAX_FAILURES: u32 = 2;

#[derive(Debug)]
struct State {
    failures: u32,
    healthy: bool,
}

/// Shared between the export loop (writer) and the HTTP surface (reader).
#[derive(Debug)]
pub struct HealthTracker {
    state: Mutex<State>,
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                failures: 0,
                healthy: true,
            }),
        }
    }

    pub fn record_failure(&self) {
        let mut state = self.lock();
        state.failures = state.failures.saturating_add(1);
        Self::settle(&mut state);
    }

    pub fn record_success(&self) {
        let mut state = self.lock();
        state.failures = 0;
        Self::settle(&mut state);
    }

    pub fn is_healthy(&self) -> bool {
        self.lock().healthy
    }

    pub fn failures(&self) -> u32 {
        self.lock().failures
    }

    /// Recompute health, logging only on transitions.
    fn settle(state: &mut State) {
        let healthy = state.failures < MAX_FAILURES;
        if healthy == state.healthy {
            return;
        }
        if healthy {
            tracing::info!("the service is now healthy");
        } else {
            tracing::warn!(failures = state.failures, "the service is now in an unhealthy state");
        }
        state.healthy = healthy;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_healthy() {
        let health = HealthTracker::new();
        assert!(health.is_healthy());
        assert_eq!(health.failures(), 0);
    }

    #[test]
    fn single_failure_is_tolerated() {
        let health = HealthTracker::new();
        health.record_failure();
        assert!(health.is_healthy());
    }

    #[test]
    fn consecutive_failures_flip_then_success_recovers() {
        let health = HealthTracker::new();
        for _ in 0..MAX_FAILURES {
            health.record_failure();
        }
        assert!(!health.is_healthy());

        health.record_failure();
        assert!(!health.is_healthy());

        health.record_success();
        assert!(health.is_healthy());
        assert_eq!(health.failures(), 0);
    }

    #[test]
    fn success_between_failures_resets_count() {
        let health = HealthTracker::new();
        health.record_failure();
        health.record_success();
        health.record_failure();
        assert!(health.is_healthy());
    }
}
