use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

use crate::config::LockoutConfig;

/// Per-identifier failure state. An entry can exist for identifiers that
/// never registered; attempts are tracked by the presented identifier
/// string.
#[derive(Debug, Clone, Default)]
struct LockoutState {
    failed_count: u32,
    lock_expires_at: Option<DateTime<Utc>>,
}

/// Tracks failed login attempts per identifier and applies a temporary lock
/// once the threshold is reached.
///
/// The lock window is fixed from the failure that triggered it: further
/// failures while a lock is active change nothing.
#[derive(Clone)]
pub struct LockoutTracker {
    attempts: Arc<DashMap<String, LockoutState>>,
    max_attempts: u32,
    lock_duration: Duration,
}

impl LockoutTracker {
    pub fn new(config: &LockoutConfig) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts: config.max_attempts,
            lock_duration: Duration::seconds(config.lock_duration_seconds as i64),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the remaining lock time in seconds, or None when the
    /// identifier is not locked.
    pub fn is_locked(&self, identifier: &str) -> Option<i64> {
        let entry = self.attempts.get(identifier)?;
        let expires_at = entry.lock_expires_at?;
        let now = Utc::now();
        if expires_at > now {
            Some((expires_at - now).num_seconds().max(1))
        } else {
            None
        }
    }

    /// Record a failed attempt and return the updated count. Arms the lock
    /// when the count reaches the threshold; a no-op while a lock is still
    /// active.
    pub fn record_failure(&self, identifier: &str) -> u32 {
        let now = Utc::now();
        let mut entry = self.attempts.entry(identifier.to_string()).or_default();

        if let Some(expires_at) = entry.lock_expires_at {
            if expires_at > now {
                return entry.failed_count;
            }
        }

        entry.failed_count += 1;
        if entry.failed_count >= self.max_attempts {
            entry.lock_expires_at = Some(now + self.lock_duration);
            tracing::warn!(
                identifier = %identifier,
                failed_count = entry.failed_count,
                "Account locked after repeated failed login attempts"
            );
        }

        entry.failed_count
    }

    /// Clear the failure count and any lock for the identifier.
    pub fn record_success(&self, identifier: &str) {
        self.attempts.remove(identifier);
    }
}
