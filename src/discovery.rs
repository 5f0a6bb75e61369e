//! Discovery pipeline: validate → filter → score → rank.
//!
//! Read-only over a snapshot of profile and preference data; no shared-state
//! mutation, so concurrent discovery requests need no locking. Bounding the
//! candidate pool fetched per request is the caller's responsibility.

use crate::filter::filter_candidates;
use crate::profile::{MatchingPreferences, PreferenceError, Profile};
use crate::rank::rank_candidates;
use crate::score::{compatibility_score, ScoredCandidate};

/// Produce the ranked discovery feed for `seeker` over `pool`.
///
/// Candidates are admitted by the hard constraints, scored, ordered by score,
/// and then placed by tier/verification/rating/activity — the stable
/// placement sort leaves compatibility as the final tie-break. Invalid
/// preferences fail closed with no partial result.
pub fn discover(
    seeker: &Profile,
    preferences: &MatchingPreferences,
    pool: Vec<Profile>,
) -> Result<Vec<ScoredCandidate>, PreferenceError> {
    let pool_size = pool.len();
    let admitted = filter_candidates(seeker, preferences, pool)?;
    tracing::debug!(
        seeker = %seeker.id,
        pool = pool_size,
        admitted = admitted.len(),
        "discovery pool filtered"
    );

    let mut scored: Vec<ScoredCandidate> = admitted
        .into_iter()
        .map(|profile| {
            let score = compatibility_score(seeker, &profile);
            ScoredCandidate { profile, score }
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    Ok(rank_candidates(seeker.tier, scored))
}
