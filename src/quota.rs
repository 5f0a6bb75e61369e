//! Daily like-allowance tracking, tier-aware.
//!
//! Specializes the fixed-window pattern for the "daily like" action: the
//! window is the calendar UTC day, not a rolling 24 hours from first use, so
//! `window_start` is always a day boundary and the reset instant is the start
//! of the next day. Free-tier actors get a fixed daily allowance; premium
//! actors bypass the counter structurally — their likes are never counted,
//! which is stronger than a very large limit.

use crate::clock::{Clock, SystemClock};
use crate::profile::SubscriptionTier;
use crate::rate_limit::store::{CounterState, CounterStore};
use std::sync::Arc;

/// Length of the quota window, one calendar day.
pub const DAY_MILLIS: u64 = 86_400_000;

/// Daily like allowance for free-tier actors.
pub const FREE_DAILY_LIKES: u32 = 15;

/// Counter key prefix for the like-quota action.
pub const LIKE_ACTION: &str = "daily_like";

const CAS_ATTEMPTS: usize = 3;

/// Snapshot of an actor's like allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub allowed: bool,
    /// Likes left today; `None` means unlimited.
    pub remaining: Option<u32>,
    /// Epoch millis of the next day boundary; `None` for unlimited.
    pub reset_at: Option<u64>,
}

/// Tracks per-user daily like consumption against a counter store.
pub struct QuotaTracker<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    daily_limit: u32,
}

impl<S> QuotaTracker<S>
where
    S: CounterStore,
{
    /// Create a tracker with the standard free-tier allowance.
    pub fn new(store: Arc<S>) -> Self {
        Self { store, clock: Arc::new(SystemClock), daily_limit: FREE_DAILY_LIKES }
    }

    /// Override the clock (useful for deterministic tests).
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Override the free-tier daily allowance.
    pub fn with_daily_limit(mut self, limit: u32) -> Self {
        self.daily_limit = limit;
        self
    }

    /// Start of the calendar day containing `now`.
    fn day_start(now: u64) -> u64 {
        now - now % DAY_MILLIS
    }

    /// The next day boundary after `now`.
    pub fn next_reset(&self) -> u64 {
        Self::day_start(self.clock.now_millis()) + DAY_MILLIS
    }

    fn key(user_id: &str) -> String {
        format!("{}:{}", LIKE_ACTION, user_id)
    }

    /// Read-only allowance check; never mutates the counter.
    pub async fn can_consume(
        &self,
        user_id: &str,
        tier: SubscriptionTier,
    ) -> Result<QuotaStatus, S::Error> {
        if tier == SubscriptionTier::Premium {
            return Ok(QuotaStatus { allowed: true, remaining: None, reset_at: None });
        }

        let now = self.clock.now_millis();
        let used = match self.store.get(&Self::key(user_id)).await? {
            // Counters from an earlier day are stale; they read as zero.
            Some(counter) if counter.window_start == Self::day_start(now) => counter.count,
            _ => 0,
        };
        let remaining = self.daily_limit.saturating_sub(used);
        Ok(QuotaStatus {
            allowed: remaining > 0,
            remaining: Some(remaining),
            reset_at: Some(Self::day_start(now) + DAY_MILLIS),
        })
    }

    /// Atomically take one unit of today's allowance. Returns `false` when
    /// the allowance is spent (or lost to store contention — fail closed).
    pub async fn consume(&self, user_id: &str, tier: SubscriptionTier) -> Result<bool, S::Error> {
        if tier == SubscriptionTier::Premium {
            return Ok(true); // never decremented
        }

        let key = Self::key(user_id);
        for _ in 0..CAS_ATTEMPTS {
            let prev = self.store.get(&key).await?;
            let now = self.clock.now_millis();
            let today = Self::day_start(now);
            let used = match prev {
                Some(counter) if counter.window_start == today => counter.count,
                _ => 0,
            };
            if used >= self.daily_limit {
                tracing::debug!(user_id, "daily like quota exhausted");
                return Ok(false);
            }
            let next =
                CounterState { window_start: today, count: used + 1, blocked: false, block_until: 0 };
            if self.store.compare_and_set(&key, next, prev).await? {
                return Ok(true);
            }
        }

        tracing::warn!(user_id, "counter store contention while consuming like quota");
        Ok(false)
    }
}
