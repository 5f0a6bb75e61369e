//! Swipe handling: quota gate, swipe ledger, and match detection.
//!
//! Match detection is a deterministic reciprocal-like lookup: a match forms
//! exactly when both users have liked each other, and forming it is
//! idempotent — the pair is checked for an existing match before inserting,
//! so a duplicate can never be created.

use crate::clock::{Clock, SystemClock};
use crate::error::EngagementError;
use crate::profile::Profile;
use crate::quota::{QuotaTracker, DAY_MILLIS};
use crate::rate_limit::store::CounterStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Like,
    Pass,
}

/// An append-only swipe fact; immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swipe {
    pub actor_id: String,
    pub target_id: String,
    pub direction: SwipeDirection,
    pub recorded_at: u64,
}

/// A formed match between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Canonical pair key, see [`pair_id`].
    pub pair_id: String,
    pub user_a: String,
    pub user_b: String,
    pub created_at: u64,
}

/// Canonical pair key: the two user ids in lexicographic order, so the key
/// is the same regardless of which side liked first.
pub fn pair_id(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

/// The decision returned for one swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeOutcome {
    /// Whether the swipe was accepted and recorded. Rejections (quota,
    /// rate limit, storage) surface as [`EngagementError`] instead.
    pub accepted: bool,
    /// Whether this swipe completed a reciprocal like.
    pub is_match: bool,
}

/// Abstract storage for the swipe/match ledger.
///
/// Swipes are append-only; matches are inserted at most once per pair.
#[async_trait]
pub trait SwipeStore: Send + Sync {
    /// Error type for ledger operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one swipe fact.
    async fn record_swipe(&self, swipe: Swipe) -> Result<(), Self::Error>;

    /// Whether `actor_id` has an existing like for `target_id`.
    async fn has_like(&self, actor_id: &str, target_id: &str) -> Result<bool, Self::Error>;

    /// Look up the match for a canonical pair key.
    async fn find_match(&self, pair_id: &str) -> Result<Option<MatchRecord>, Self::Error>;

    /// Insert a newly formed match. Callers must check [`Self::find_match`]
    /// first; inserting a duplicate pair is a bug, not a recoverable state.
    async fn insert_match(&self, record: MatchRecord) -> Result<(), Self::Error>;
}

/// Simple in-memory swipe ledger.
#[derive(Default, Clone, Debug)]
pub struct InMemorySwipeStore {
    inner: Arc<std::sync::Mutex<LedgerInner>>,
}

#[derive(Default, Debug)]
struct LedgerInner {
    swipes: Vec<Swipe>,
    likes: HashSet<(String, String)>,
    matches: HashMap<String, MatchRecord>,
}

impl InMemorySwipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total swipes recorded, for inspection in tests and diagnostics.
    pub fn swipe_count(&self) -> usize {
        self.inner.lock().expect("swipe ledger poisoned").swipes.len()
    }

    /// Total matches formed.
    pub fn match_count(&self) -> usize {
        self.inner.lock().expect("swipe ledger poisoned").matches.len()
    }
}

#[async_trait]
impl SwipeStore for InMemorySwipeStore {
    type Error = std::convert::Infallible;

    async fn record_swipe(&self, swipe: Swipe) -> Result<(), Self::Error> {
        let mut guard = self.inner.lock().expect("swipe ledger poisoned");
        if swipe.direction == SwipeDirection::Like {
            guard.likes.insert((swipe.actor_id.clone(), swipe.target_id.clone()));
        }
        guard.swipes.push(swipe);
        Ok(())
    }

    async fn has_like(&self, actor_id: &str, target_id: &str) -> Result<bool, Self::Error> {
        let guard = self.inner.lock().expect("swipe ledger poisoned");
        Ok(guard.likes.contains(&(actor_id.to_string(), target_id.to_string())))
    }

    async fn find_match(&self, pair_id: &str) -> Result<Option<MatchRecord>, Self::Error> {
        let guard = self.inner.lock().expect("swipe ledger poisoned");
        Ok(guard.matches.get(pair_id).cloned())
    }

    async fn insert_match(&self, record: MatchRecord) -> Result<(), Self::Error> {
        let mut guard = self.inner.lock().expect("swipe ledger poisoned");
        guard.matches.insert(record.pair_id.clone(), record);
        Ok(())
    }
}

/// Orchestrates one swipe: quota check → record → consume → match detection.
///
/// Swipes for the same actor are serialized behind a per-user async lock so
/// two concurrent likes can never both observe the last unit of quota
/// (check-then-act race); the counter store's compare-and-set covers the
/// same race across gate instances sharing a distributed backend.
pub struct EngagementGate<Q, S> {
    quota: QuotaTracker<Q>,
    ledger: Arc<S>,
    clock: Arc<dyn Clock>,
    actor_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<Q, S> EngagementGate<Q, S>
where
    Q: CounterStore,
    S: SwipeStore,
{
    pub fn new(quota: QuotaTracker<Q>, ledger: Arc<S>) -> Self {
        Self { quota, ledger, clock: Arc::new(SystemClock), actor_locks: Mutex::new(HashMap::new()) }
    }

    /// Override the clock (useful for deterministic tests).
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current like allowance for `actor`, for rendering "N likes left".
    pub async fn quota_status(
        &self,
        actor: &Profile,
    ) -> Result<crate::quota::QuotaStatus, EngagementError> {
        self.quota.can_consume(&actor.id, actor.tier).await.map_err(EngagementError::store)
    }

    /// Handle one swipe from `actor` on `target_id`.
    ///
    /// Likes consume quota; a denied quota fails with
    /// [`EngagementError::QuotaExceeded`] and records nothing. Passes are
    /// free and never form a match.
    pub async fn swipe(
        &self,
        actor: &Profile,
        target_id: &str,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome, EngagementError> {
        let lock = self.actor_lock(&actor.id).await;
        let _serialized = lock.lock().await;

        if direction == SwipeDirection::Like {
            let status = self
                .quota
                .can_consume(&actor.id, actor.tier)
                .await
                .map_err(EngagementError::store)?;
            if !status.allowed {
                let retry_after = self.until(status.reset_at);
                tracing::info!(
                    actor = %actor.id,
                    ?retry_after,
                    "like rejected: daily quota exhausted"
                );
                return Err(EngagementError::QuotaExceeded { retry_after });
            }
        }

        let swipe = Swipe {
            actor_id: actor.id.clone(),
            target_id: target_id.to_string(),
            direction,
            recorded_at: self.clock.now_millis(),
        };
        self.ledger.record_swipe(swipe).await.map_err(EngagementError::store)?;

        if direction == SwipeDirection::Like {
            let consumed = self
                .quota
                .consume(&actor.id, actor.tier)
                .await
                .map_err(EngagementError::store)?;
            if !consumed {
                // Only reachable when another gate instance drained the
                // allowance through a shared backend between our check and
                // our consume. The swipe fact stays (append-only ledger).
                tracing::warn!(actor = %actor.id, "like recorded but quota consume lost a race");
                let now = self.clock.now_millis();
                let reset = now - now % DAY_MILLIS + DAY_MILLIS;
                return Err(EngagementError::QuotaExceeded {
                    retry_after: Duration::from_millis(reset - now),
                });
            }
        }

        let is_match = match direction {
            SwipeDirection::Like => self.detect_match(&actor.id, target_id).await?,
            SwipeDirection::Pass => false,
        };

        Ok(SwipeOutcome { accepted: true, is_match })
    }

    /// Deterministic reciprocal-like lookup with idempotent match creation.
    async fn detect_match(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<bool, EngagementError> {
        let reciprocal = self
            .ledger
            .has_like(target_id, actor_id)
            .await
            .map_err(EngagementError::store)?;
        if !reciprocal {
            return Ok(false);
        }

        let pair = pair_id(actor_id, target_id);
        let existing = self.ledger.find_match(&pair).await.map_err(EngagementError::store)?;
        if existing.is_none() {
            let (user_a, user_b) = if actor_id <= target_id {
                (actor_id.to_string(), target_id.to_string())
            } else {
                (target_id.to_string(), actor_id.to_string())
            };
            let record = MatchRecord {
                pair_id: pair.clone(),
                user_a,
                user_b,
                created_at: self.clock.now_millis(),
            };
            self.ledger.insert_match(record).await.map_err(EngagementError::store)?;
            tracing::info!(pair = %pair, "match formed");
        }
        Ok(true)
    }

    fn until(&self, reset_at: Option<u64>) -> Duration {
        let now = self.clock.now_millis();
        reset_at.map(|at| Duration::from_millis(at.saturating_sub(now))).unwrap_or_default()
    }

    async fn actor_lock(&self, actor_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.actor_locks.lock().await;
        locks.entry(actor_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::profile::{
        GroupSize, PaceOfPlay, PlayingStyle, SubscriptionTier, TeeTimeSlot,
    };
    use crate::rate_limit::store::InMemoryCounterStore;
    use std::collections::BTreeSet;

    fn golfer(id: &str, tier: SubscriptionTier) -> Profile {
        Profile {
            id: id.to_string(),
            location: Coordinates::new(37.7749, -122.4194),
            handicap: 12,
            preferred_times: [TeeTimeSlot::Morning].into_iter().collect::<BTreeSet<_>>(),
            playing_style: PlayingStyle::Casual,
            pace_of_play: PaceOfPlay::Moderate,
            preferred_group_size: GroupSize::Foursome,
            is_verified: true,
            avg_rating: 4.0,
            total_rounds: 50,
            last_active_millis: 0,
            tier,
        }
    }

    fn gate(
        daily_limit: u32,
    ) -> (EngagementGate<InMemoryCounterStore, InMemorySwipeStore>, Arc<InMemorySwipeStore>) {
        let counters = Arc::new(InMemoryCounterStore::new());
        let ledger = Arc::new(InMemorySwipeStore::new());
        let quota = QuotaTracker::new(counters).with_daily_limit(daily_limit);
        (EngagementGate::new(quota, ledger.clone()), ledger)
    }

    #[test]
    fn pair_id_is_canonical() {
        assert_eq!(pair_id("ava", "sam"), "ava:sam");
        assert_eq!(pair_id("sam", "ava"), "ava:sam");
    }

    #[tokio::test]
    async fn reciprocal_likes_form_a_match() {
        let (gate, ledger) = gate(15);
        let ava = golfer("ava", SubscriptionTier::Free);
        let sam = golfer("sam", SubscriptionTier::Free);

        let first = gate.swipe(&ava, "sam", SwipeDirection::Like).await.expect("accepted");
        assert!(!first.is_match);

        let second = gate.swipe(&sam, "ava", SwipeDirection::Like).await.expect("accepted");
        assert!(second.is_match);
        assert_eq!(ledger.match_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_likes_never_duplicate_the_match() {
        let (gate, ledger) = gate(15);
        let ava = golfer("ava", SubscriptionTier::Free);
        let sam = golfer("sam", SubscriptionTier::Free);

        gate.swipe(&ava, "sam", SwipeDirection::Like).await.expect("accepted");
        gate.swipe(&sam, "ava", SwipeDirection::Like).await.expect("accepted");
        let again = gate.swipe(&sam, "ava", SwipeDirection::Like).await.expect("accepted");

        assert!(again.is_match);
        assert_eq!(ledger.match_count(), 1);
    }

    #[tokio::test]
    async fn passes_never_match_and_cost_nothing() {
        let (gate, ledger) = gate(1);
        let ava = golfer("ava", SubscriptionTier::Free);
        let sam = golfer("sam", SubscriptionTier::Free);

        gate.swipe(&sam, "ava", SwipeDirection::Like).await.expect("accepted");
        let outcome = gate.swipe(&ava, "sam", SwipeDirection::Pass).await.expect("accepted");
        assert!(!outcome.is_match);
        assert_eq!(ledger.match_count(), 0);

        // The pass above did not touch ava's allowance of one.
        let like = gate.swipe(&ava, "sam", SwipeDirection::Like).await.expect("accepted");
        assert!(like.is_match);
    }

    #[tokio::test]
    async fn exhausted_quota_rejects_without_recording() {
        let (gate, ledger) = gate(2);
        let ava = golfer("ava", SubscriptionTier::Free);

        gate.swipe(&ava, "sam", SwipeDirection::Like).await.expect("accepted");
        gate.swipe(&ava, "lee", SwipeDirection::Like).await.expect("accepted");
        let swipes_before = ledger.swipe_count();

        let err = gate
            .swipe(&ava, "kim", SwipeDirection::Like)
            .await
            .expect_err("third like should be rejected");
        assert!(err.is_quota_exceeded());
        assert!(err.retry_after().expect("quota errors carry retry_after") > Duration::ZERO);
        assert_eq!(ledger.swipe_count(), swipes_before);
    }

    #[tokio::test]
    async fn premium_actors_are_never_quota_limited() {
        let (gate, _ledger) = gate(1);
        let vip = golfer("vip", SubscriptionTier::Premium);

        for i in 0..30 {
            let target = format!("target-{i}");
            gate.swipe(&vip, &target, SwipeDirection::Like).await.expect("accepted");
        }
        let status = gate.quota_status(&vip).await.expect("no error");
        assert!(status.allowed);
        assert_eq!(status.remaining, None);
    }

    #[tokio::test]
    async fn concurrent_likes_cannot_overspend_the_last_unit() {
        let counters = Arc::new(InMemoryCounterStore::new());
        let ledger = Arc::new(InMemorySwipeStore::new());
        let quota = QuotaTracker::new(counters).with_daily_limit(1);
        let gate = Arc::new(EngagementGate::new(quota, ledger));
        let ava = golfer("ava", SubscriptionTier::Free);

        let mut handles = Vec::new();
        for i in 0..4 {
            let gate = gate.clone();
            let ava = ava.clone();
            handles.push(tokio::spawn(async move {
                let target = format!("target-{i}");
                gate.swipe(&ava, &target, SwipeDirection::Like).await
            }));
        }

        let results = futures::future::join_all(handles).await;
        let accepted = results
            .iter()
            .filter(|r| r.as_ref().expect("join error").is_ok())
            .count();
        assert_eq!(accepted, 1, "only the single unit of quota may be spent");
    }
}
