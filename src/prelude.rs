//! Convenient re-exports for common Fairway types.
pub use crate::{
    clock::{Clock, SystemClock},
    discovery::discover,
    engagement::{
        pair_id, EngagementGate, InMemorySwipeStore, MatchRecord, Swipe, SwipeDirection,
        SwipeOutcome, SwipeStore,
    },
    error::EngagementError,
    filter::{admits, filter_candidates},
    geo::{haversine_miles, Coordinates},
    profile::{
        GroupSize, HandicapRange, MatchingPreferences, PaceOfPlay, PlayingStyle, PreferenceError,
        Profile, SubscriptionTier, TeeTimeSlot,
    },
    quota::{QuotaStatus, QuotaTracker, FREE_DAILY_LIKES},
    rank::rank_candidates,
    rate_limit::{
        CounterState, CounterStore, Decision, FixedWindowLimiter, InMemoryCounterStore,
        RateLimitConfig, RateLimitConfigError, RateLimiterRegistry,
    },
    score::{compatibility_score, ScoredCandidate, MAX_SCORE},
};
