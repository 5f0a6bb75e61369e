#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Fairway ⛳
//!
//! Partner-discovery core for golf matchmaking: candidate filtering,
//! weighted compatibility scoring, tier-aware placement, and quota-gated
//! swipes with deterministic match detection.
//!
//! ## Features
//!
//! - **Discovery pipeline**: hard-constraint filtering, multi-factor scoring
//!   clamped to [0,100], and stable tier/verification/rating/activity
//!   placement
//! - **Fixed-window rate limiting** with block escalation, pure decision
//!   logic over an injectable compare-and-set counter store
//! - **Daily like quota** on calendar-day boundaries; premium actors bypass
//!   the counter structurally
//! - **Engagement gate** serializing swipes per actor, with idempotent
//!   reciprocal-like match creation
//!
//! ## Quick Start
//!
//! ```rust
//! use fairway::{discover, Coordinates, MatchingPreferences, Profile};
//! use fairway::{GroupSize, PaceOfPlay, PlayingStyle, SubscriptionTier, TeeTimeSlot};
//!
//! fn golfer(id: &str, latitude: f64, longitude: f64) -> Profile {
//!     Profile {
//!         id: id.to_string(),
//!         location: Coordinates::new(latitude, longitude),
//!         handicap: 12,
//!         preferred_times: [TeeTimeSlot::Morning].into_iter().collect(),
//!         playing_style: PlayingStyle::Casual,
//!         pace_of_play: PaceOfPlay::Moderate,
//!         preferred_group_size: GroupSize::Foursome,
//!         is_verified: true,
//!         avg_rating: 4.5,
//!         total_rounds: 42,
//!         last_active_millis: 0,
//!         tier: SubscriptionTier::Free,
//!     }
//! }
//!
//! let seeker = golfer("ava", 37.7749, -122.4194);
//! let pool = vec![golfer("sam", 37.8044, -122.2711)];
//!
//! let feed = discover(&seeker, &MatchingPreferences::default(), pool).unwrap();
//! assert_eq!(feed.len(), 1);
//! assert!(feed[0].score > 0);
//! ```

pub mod clock;
pub mod discovery;
pub mod engagement;
pub mod error;
pub mod filter;
pub mod geo;
pub mod prelude;
pub mod presets;
pub mod profile;
pub mod quota;
pub mod rank;
pub mod rate_limit;
pub mod score;

// Re-exports
pub use clock::{Clock, SystemClock};
pub use discovery::discover;
pub use engagement::{
    pair_id, EngagementGate, InMemorySwipeStore, MatchRecord, Swipe, SwipeDirection, SwipeOutcome,
    SwipeStore,
};
pub use error::EngagementError;
pub use filter::{admits, filter_candidates};
pub use geo::{haversine_miles, Coordinates};
pub use profile::{
    GroupSize, HandicapRange, MatchingPreferences, PaceOfPlay, PlayingStyle, PreferenceError,
    Profile, SubscriptionTier, TeeTimeSlot,
};
pub use quota::{QuotaStatus, QuotaTracker, FREE_DAILY_LIKES};
pub use rank::rank_candidates;
pub use rate_limit::{
    CounterState, CounterStore, Decision, FixedWindowLimiter, InMemoryCounterStore,
    RateLimitConfig, RateLimitConfigError, RateLimiterRegistry,
};
pub use score::{compatibility_score, ScoredCandidate, MAX_SCORE};
