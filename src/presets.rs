//! Production-ready limiter configurations.
//!
//! This module provides the per-action rate-limit table so deployments don't
//! hand-tune window/attempt/block numbers per call site.
//!
//! ## Available presets
//!
//! - [`login_attempts`]: credential checks (5 per 15 minutes, 30 minute block)
//! - [`password_reset`]: reset emails (3 per hour, 1 hour block)
//! - [`report_submission`]: abuse reports (10 per day, 1 day block)
//! - [`abuse_registry`]: all of the above registered under their action names
//!
//! The daily like allowance is quota, not abuse prevention — it lives in
//! [`crate::quota`] with its own calendar-day window.

use crate::rate_limit::{CounterStore, RateLimitConfig, RateLimiterRegistry};
use std::sync::Arc;
use std::time::Duration;

/// Action name for credential checks.
pub const ACTION_LOGIN: &str = "auth.login";
/// Action name for password-reset requests.
pub const ACTION_PASSWORD_RESET: &str = "auth.password_reset";
/// Action name for abuse-report submissions.
pub const ACTION_REPORT: &str = "moderation.report";

const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);
const LOGIN_MAX_ATTEMPTS: u32 = 5;
const LOGIN_BLOCK: Duration = Duration::from_secs(30 * 60);

const RESET_WINDOW: Duration = Duration::from_secs(60 * 60);
const RESET_MAX_ATTEMPTS: u32 = 3;
const RESET_BLOCK: Duration = Duration::from_secs(60 * 60);

const REPORT_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);
const REPORT_MAX_ATTEMPTS: u32 = 10;
const REPORT_BLOCK: Duration = Duration::from_secs(24 * 60 * 60);

/// Limits on credential checks: brute-force protection.
pub const fn login_attempts() -> RateLimitConfig {
    RateLimitConfig::new_unchecked(LOGIN_WINDOW, LOGIN_MAX_ATTEMPTS, LOGIN_BLOCK)
}

/// Limits on password-reset requests: mailbox-flood protection.
pub const fn password_reset() -> RateLimitConfig {
    RateLimitConfig::new_unchecked(RESET_WINDOW, RESET_MAX_ATTEMPTS, RESET_BLOCK)
}

/// Limits on abuse-report submissions: report-spam protection.
pub const fn report_submission() -> RateLimitConfig {
    RateLimitConfig::new_unchecked(REPORT_WINDOW, REPORT_MAX_ATTEMPTS, REPORT_BLOCK)
}

/// A registry with every abuse-prevention action registered.
pub fn abuse_registry<S>(store: Arc<S>) -> RateLimiterRegistry<S>
where
    S: CounterStore + 'static,
{
    let mut registry = RateLimiterRegistry::new(store);
    registry.register(ACTION_LOGIN, login_attempts());
    registry.register(ACTION_PASSWORD_RESET, password_reset());
    registry.register(ACTION_REPORT, report_submission());
    registry
}
