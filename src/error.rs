//! Error types for engagement decisions.
//!
//! Preference validation has its own error type in the profile module;
//! limiter configuration errors live with the limiter. Everything the
//! engagement path can surface at runtime is collected here. All variants
//! are recoverable by the caller — wait and retry, or prompt for an upgrade;
//! none are fatal to the process.

use std::time::Duration;

/// Unified error type for swipe handling.
#[derive(thiserror::Error, Debug)]
pub enum EngagementError {
    /// The actor's daily like allowance is spent.
    #[error("daily like quota exhausted; retry after {retry_after:?}")]
    QuotaExceeded {
        /// Time until the quota window resets.
        retry_after: Duration,
    },
    /// An abuse-prevention action is inside its block period.
    #[error("action '{action}' is rate limited; retry after {retry_after:?}")]
    RateLimitBlocked {
        /// The limited action name.
        action: String,
        /// Remaining block time.
        retry_after: Duration,
    },
    /// The counter store or swipe ledger failed.
    #[error("storage backend failed: {source}")]
    Store {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EngagementError {
    /// Wrap a storage-layer error.
    pub fn store<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        EngagementError::Store { source: Box::new(source) }
    }

    /// Check if this error is due to quota exhaustion.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Check if this error is due to a rate-limit block.
    pub fn is_rate_limit_blocked(&self) -> bool {
        matches!(self, Self::RateLimitBlocked { .. })
    }

    /// Check if this error came from the storage layer.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store { .. })
    }

    /// How long the caller should wait before retrying, if applicable.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::QuotaExceeded { retry_after } => Some(*retry_after),
            Self::RateLimitBlocked { retry_after, .. } => Some(*retry_after),
            Self::Store { .. } => None,
        }
    }
}
