//! Submission rate limiting.
//!
//! The limiter is a collaborator of the write path, not of the engine. The
//! in-memory implementation is process-local: in a multi-instance deployment
//! it degrades to best effort, and a shared counter store should implement
//! [`RateLimiter`] instead.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use crate::error::{EngineError, Result};

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: i64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }

    /// Convert into a `Result`, mapping a rejection to [`EngineError::RateLimited`].
    pub fn into_result(self) -> Result<()> {
        match self {
            RateDecision::Allowed { .. } => Ok(()),
            RateDecision::Limited { retry_after_secs } => {
                Err(EngineError::RateLimited { retry_after_secs })
            }
        }
    }
}

/// Counts submissions per client key.
///
/// `check` both tests and records: an allowed call consumes one unit.
pub trait RateLimiter: Send + Sync {
    fn check(&self, key: &str, now: DateTime<Utc>) -> RateDecision;
}

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    started_at: DateTime<Utc>,
    count: u32,
}

#[derive(Debug, Default)]
struct LimiterState {
    counters: HashMap<String, WindowCounter>,
    swept_at: Option<DateTime<Utc>>,
}

impl LimiterState {
    fn evict_expired(&mut self, now: DateTime<Utc>, window: TimeDelta) -> usize {
        let before = self.counters.len();
        self.counters.retain(|_, c| now - c.started_at < window);
        self.swept_at = Some(now);
        before - self.counters.len()
    }
}

/// Fixed-window counter per key held in process memory.
///
/// Expired counters are evicted at most once per window during `check`, so
/// the map only holds keys seen within the last two windows.
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    limit: u32,
    window: TimeDelta,
    state: Mutex<LimiterState>,
}

impl FixedWindowRateLimiter {
    pub fn new(limit: u32, window: TimeDelta) -> Self {
        Self {
            limit,
            window,
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// `limit` submissions per minute per key.
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, TimeDelta::minutes(1))
    }

    /// Drop counters whose window has ended.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        self.state.lock().evict_expired(now, self.window)
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.state.lock().counters.len()
    }
}

impl RateLimiter for FixedWindowRateLimiter {
    fn check(&self, key: &str, now: DateTime<Utc>) -> RateDecision {
        let mut state = self.state.lock();
        let sweep_due = match state.swept_at {
            Some(swept) => now - swept >= self.window,
            None => true,
        };
        if sweep_due {
            let evicted = state.evict_expired(now, self.window);
            if evicted > 0 {
                log::debug!("Evicted {} expired rate-limit counters", evicted);
            }
        }

        let counter = state
            .counters
            .entry(key.to_string())
            .or_insert(WindowCounter {
                started_at: now,
                count: 0,
            });

        if now - counter.started_at >= self.window {
            counter.started_at = now;
            counter.count = 0;
        }

        if counter.count >= self.limit {
            let resets_at = counter.started_at + self.window;
            let retry_after_secs = (resets_at - now).num_seconds().max(1);
            log::warn!("Rate limit reached for key {}", key);
            return RateDecision::Limited { retry_after_secs };
        }

        counter.count += 1;
        RateDecision::Allowed {
            remaining: self.limit - counter.count,
        }
    }
}
