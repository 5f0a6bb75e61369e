//! Fixed-window limiter with block escalation.
//!
//! The state machine lives in [`step`], a pure function over counter state;
//! [`FixedWindowLimiter`] drives it through a [`CounterStore`] with an
//! optimistic compare-and-set loop so the limit check and the increment
//! commit as one atomic operation even on a shared backend.

use crate::clock::{Clock, SystemClock};
use crate::rate_limit::store::{CounterState, CounterStore};
use crate::rate_limit::{Decision, RateLimitConfig};
use std::sync::Arc;
use std::time::Duration;

const CAS_ATTEMPTS: usize = 3;
const CONTENTION_BACKOFF: Duration = Duration::from_millis(100);

/// One transition of the per-key state machine.
///
/// - **Open** (count < max): increment and allow with the remaining budget.
/// - **Exceeded**: an attempt past the cap enters **Blocked** with
///   `block_until = now + block_duration`; the count stays at the cap.
/// - **Blocked**: denied with the remaining block time until it elapses,
///   then the key resets to a fresh window.
/// - A window older than `config.window()` resets regardless of history.
pub fn step(
    config: &RateLimitConfig,
    state: Option<CounterState>,
    now_millis: u64,
) -> (CounterState, Decision) {
    match state {
        Some(s) if s.blocked && now_millis < s.block_until => {
            let retry_after = Duration::from_millis(s.block_until - now_millis);
            (s, Decision::Denied { retry_after, reason: "blocked".to_string() })
        }
        Some(s)
            if !s.blocked
                && now_millis.saturating_sub(s.window_start) <= config.window_millis()
                && s.count >= config.max_attempts() =>
        {
            let next = CounterState {
                window_start: s.window_start,
                count: s.count,
                blocked: true,
                block_until: now_millis + config.block_millis(),
            };
            let denial = Decision::Denied {
                retry_after: config.block_duration(),
                reason: "limit_exceeded".to_string(),
            };
            (next, denial)
        }
        Some(s)
            if !s.blocked
                && now_millis.saturating_sub(s.window_start) <= config.window_millis() =>
        {
            let count = s.count + 1;
            let next = CounterState {
                window_start: s.window_start,
                count,
                blocked: false,
                block_until: 0,
            };
            (next, Decision::Allowed { remaining: config.max_attempts() - count })
        }
        // No counter yet, an expired window, or an expired block: fresh start.
        _ => {
            let next = CounterState {
                window_start: now_millis,
                count: 1,
                blocked: false,
                block_until: 0,
            };
            (next, Decision::Allowed { remaining: config.max_attempts().saturating_sub(1) })
        }
    }
}

/// A fixed-window rate limiter for one action kind, keyed by identifier.
pub struct FixedWindowLimiter<S> {
    store: Arc<S>,
    action: String,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl<S> FixedWindowLimiter<S>
where
    S: CounterStore,
{
    /// Create a limiter for `action` backed by `store`.
    pub fn new(store: Arc<S>, action: impl Into<String>, config: RateLimitConfig) -> Self {
        Self { store, action: action.into(), config, clock: Arc::new(SystemClock) }
    }

    /// Override the clock (useful for deterministic tests).
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The action this limiter guards.
    pub fn action(&self) -> &str {
        &self.action
    }

    fn key(&self, identifier: &str) -> String {
        format!("{}:{}", self.action, identifier)
    }

    /// Record one attempt for `identifier` and decide whether it may proceed.
    pub async fn check(&self, identifier: &str) -> Result<Decision, S::Error> {
        let key = self.key(identifier);

        // Optimistic concurrency: re-read and retry when another writer
        // commits between our read and our compare-and-set.
        for _ in 0..CAS_ATTEMPTS {
            let prev = self.store.get(&key).await?;
            let now = self.clock.now_millis();
            let (next, decision) = step(&self.config, prev, now);

            if prev == Some(next) {
                // Still inside a block; nothing to write.
                return Ok(decision);
            }
            if self.store.compare_and_set(&key, next, prev).await? {
                if next.blocked && !prev.is_some_and(|p| p.blocked) {
                    tracing::warn!(
                        action = %self.action,
                        identifier,
                        retry_after = ?decision.retry_after(),
                        "rate limit exceeded; key blocked"
                    );
                }
                return Ok(decision);
            }
        }

        tracing::warn!(action = %self.action, identifier, "counter store contention; denying");
        Ok(Decision::Denied {
            retry_after: CONTENTION_BACKOFF,
            reason: "store_contention".to_string(),
        })
    }
}
