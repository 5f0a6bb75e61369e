//! Rate limiting primitives.
//!
//! This module provides the building blocks for abuse prevention:
//! - [`Decision`]: The result of a rate limit check (Allowed/Denied).
//! - [`RateLimitConfig`]: Per-action window, attempt cap, and block duration.
//! - [`RateLimiterRegistry`]: Named per-action limiters over one shared store.
//!
//! # Architecture
//!
//! The system is designed to be modular:
//! - **Logic**: `fixed_window::step` is a pure transition function over
//!   counter state — deterministic and trivially testable.
//! - **Storage**: `CounterStore` (in `store` module) handles the state with
//!   compare-and-set semantics, enabling in-memory or distributed backends
//!   (e.g., Redis).
//! - **Driver**: [`FixedWindowLimiter`] runs the transition through the store
//!   with optimistic concurrency.
//!
//! Keys are independent: a block on one action for a user never affects
//! another action for the same user. The limiter returns decisions and
//! nothing else; callers are responsible for logging outcomes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub mod fixed_window;
pub mod store;

pub use fixed_window::FixedWindowLimiter;
pub use store::{CounterState, CounterStore, InMemoryCounterStore};

/// The decision returned by a rate limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The attempt is allowed to proceed.
    Allowed {
        /// Number of attempts remaining in the current window.
        remaining: u32,
    },
    /// The attempt is denied.
    Denied {
        /// How long the caller should wait before retrying.
        retry_after: Duration,
        /// Reason for denial (e.g., "limit_exceeded", "blocked").
        reason: String,
    },
}

impl Decision {
    /// Helper to check if allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }

    /// Remaining block or window time for a denied decision.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Decision::Denied { retry_after, .. } => Some(*retry_after),
            Decision::Allowed { .. } => None,
        }
    }
}

/// Errors produced when validating limiter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitConfigError {
    /// Window must be > 0.
    InvalidWindow(Duration),
    /// Max attempts must be > 0.
    InvalidMaxAttempts {
        /// Value provided by caller.
        provided: u32,
    },
    /// Block duration must be > 0.
    InvalidBlockDuration(Duration),
}

impl std::fmt::Display for RateLimitConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateLimitConfigError::InvalidWindow(window) => {
                write!(f, "window must be > 0 (got {:?})", window)
            }
            RateLimitConfigError::InvalidMaxAttempts { provided } => {
                write!(f, "max_attempts must be > 0 (got {})", provided)
            }
            RateLimitConfigError::InvalidBlockDuration(block) => {
                write!(f, "block_duration must be > 0 (got {:?})", block)
            }
        }
    }
}

impl std::error::Error for RateLimitConfigError {}

/// Validated configuration for one action kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    window: Duration,
    max_attempts: u32,
    block_duration: Duration,
}

impl RateLimitConfig {
    /// Create a config with validation.
    pub fn new(
        window: Duration,
        max_attempts: u32,
        block_duration: Duration,
    ) -> Result<Self, RateLimitConfigError> {
        if window == Duration::ZERO {
            return Err(RateLimitConfigError::InvalidWindow(window));
        }
        if max_attempts == 0 {
            return Err(RateLimitConfigError::InvalidMaxAttempts { provided: 0 });
        }
        if block_duration == Duration::ZERO {
            return Err(RateLimitConfigError::InvalidBlockDuration(block_duration));
        }
        Ok(Self { window, max_attempts, block_duration })
    }

    /// Construction path for compile-time presets whose values are known
    /// to be valid.
    pub(crate) const fn new_unchecked(
        window: Duration,
        max_attempts: u32,
        block_duration: Duration,
    ) -> Self {
        Self { window, max_attempts, block_duration }
    }

    /// Count reset period.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Allowed attempts per window.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Lockout after the cap is exceeded.
    pub fn block_duration(&self) -> Duration {
        self.block_duration
    }

    pub(crate) fn window_millis(&self) -> u64 {
        self.window.as_millis() as u64
    }

    pub(crate) fn block_millis(&self) -> u64 {
        self.block_duration.as_millis() as u64
    }
}

/// Named per-action limiter table over one shared counter store.
///
/// Each action has its own window/attempts/block configuration; counters for
/// different actions never interact. Checking an unregistered action fails
/// open so a misconfigured deployment degrades to "no limiting" instead of
/// locking everyone out.
pub struct RateLimiterRegistry<S> {
    store: Arc<S>,
    limiters: HashMap<String, FixedWindowLimiter<S>>,
}

impl<S> RateLimiterRegistry<S>
where
    S: CounterStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store, limiters: HashMap::new() }
    }

    /// Register `action` with its configuration, replacing any existing
    /// limiter for that name.
    pub fn register(&mut self, action: impl Into<String>, config: RateLimitConfig) -> &mut Self {
        let action = action.into();
        let limiter = FixedWindowLimiter::new(self.store.clone(), action.clone(), config);
        self.limiters.insert(action, limiter);
        self
    }

    /// Check `identifier` against the named action's limiter.
    pub async fn check(&self, action: &str, identifier: &str) -> Result<Decision, S::Error> {
        match self.limiters.get(action) {
            Some(limiter) => limiter.check(identifier).await,
            None => {
                tracing::warn!(action, "no limiter registered for action; failing open");
                Ok(Decision::Allowed { remaining: u32::MAX })
            }
        }
    }

    /// Registered action names, sorted.
    pub fn actions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.limiters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
