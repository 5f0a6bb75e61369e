//! Weighted multi-factor compatibility scoring.
//!
//! `compatibility_score` is a pure function of the two profiles: identical
//! inputs always yield identical scores. Each factor contributes a
//! non-negative number of points; the sum is rounded and capped at 100. The
//! same weights apply regardless of direction, though evaluation is from the
//! seeker's perspective since the candidate varies per call.

use crate::geo::haversine_miles;
use crate::profile::{GroupSize, PaceOfPlay, PlayingStyle, Profile, TeeTimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Upper bound of the compatibility score.
pub const MAX_SCORE: u8 = 100;

// Factor weights. Distance and handicap decay linearly to zero at their
// falloff; categorical factors award exact / adjacent / nothing.
const DISTANCE_WEIGHT: f64 = 20.0;
const DISTANCE_FALLOFF_MILES: f64 = 25.0;
const HANDICAP_WEIGHT: f64 = 15.0;
const HANDICAP_FALLOFF: f64 = 10.0;
const STYLE_EXACT_POINTS: f64 = 15.0;
const STYLE_ADJACENT_POINTS: f64 = 10.0;
const PACE_EXACT_POINTS: f64 = 15.0;
const PACE_ADJACENT_POINTS: f64 = 10.0;
const GROUP_EXACT_POINTS: f64 = 10.0;
const GROUP_FLEXIBLE_POINTS: f64 = 5.0;
const TIME_OVERLAP_WEIGHT: f64 = 15.0;
const RATING_PIVOT: f64 = 3.0;
const RATING_BONUS_CAP: f64 = 10.0;
const RATING_MULTIPLIER: f64 = 2.0;

/// A candidate with its compatibility score attached.
///
/// Ephemeral: recomputed per request, never cached across requests, because
/// preferences and tier state can change between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub profile: Profile,
    /// Compatibility score in [0,100].
    pub score: u8,
}

/// Score `candidate` against `seeker`, returning an integer in [0,100].
pub fn compatibility_score(seeker: &Profile, candidate: &Profile) -> u8 {
    let miles = haversine_miles(seeker.location, candidate.location);
    let total = distance_term(miles)
        + handicap_term(seeker.handicap, candidate.handicap)
        + style_term(seeker.playing_style, candidate.playing_style)
        + pace_term(seeker.pace_of_play, candidate.pace_of_play)
        + group_term(seeker.preferred_group_size, candidate.preferred_group_size)
        + time_overlap_term(&seeker.preferred_times, &candidate.preferred_times)
        + rating_term(seeker.avg_rating, candidate.avg_rating);
    total.round().min(f64::from(MAX_SCORE)) as u8
}

/// Closer scores higher; beyond the falloff radius the term contributes 0.
fn distance_term(miles: f64) -> f64 {
    (DISTANCE_FALLOFF_MILES - miles).max(0.0) / DISTANCE_FALLOFF_MILES * DISTANCE_WEIGHT
}

fn handicap_term(seeker: i8, candidate: i8) -> f64 {
    let gap = (f64::from(seeker) - f64::from(candidate)).abs();
    (HANDICAP_FALLOFF - gap).max(0.0) / HANDICAP_FALLOFF * HANDICAP_WEIGHT
}

fn style_term(seeker: PlayingStyle, candidate: PlayingStyle) -> f64 {
    use PlayingStyle::{BeginnerFriendly, Casual};
    match (seeker, candidate) {
        (a, b) if a == b => STYLE_EXACT_POINTS,
        (Casual, BeginnerFriendly) | (BeginnerFriendly, Casual) => STYLE_ADJACENT_POINTS,
        _ => 0.0,
    }
}

fn pace_term(seeker: PaceOfPlay, candidate: PaceOfPlay) -> f64 {
    use PaceOfPlay::{Moderate, Relaxed};
    match (seeker, candidate) {
        (a, b) if a == b => PACE_EXACT_POINTS,
        (Moderate, Relaxed) | (Relaxed, Moderate) => PACE_ADJACENT_POINTS,
        _ => 0.0,
    }
}

fn group_term(seeker: GroupSize, candidate: GroupSize) -> f64 {
    if seeker == candidate {
        GROUP_EXACT_POINTS
    } else if seeker == GroupSize::Flexible || candidate == GroupSize::Flexible {
        GROUP_FLEXIBLE_POINTS
    } else {
        0.0
    }
}

/// Shared-slot ratio against the larger of the two sets. Contributes 0 when
/// both golfers left their time preferences empty.
fn time_overlap_term(seeker: &BTreeSet<TeeTimeSlot>, candidate: &BTreeSet<TeeTimeSlot>) -> f64 {
    let larger = seeker.len().max(candidate.len());
    if larger == 0 {
        return 0.0;
    }
    let shared = seeker.intersection(candidate).count();
    shared as f64 / larger as f64 * TIME_OVERLAP_WEIGHT
}

/// Only average ratings above the pivot contribute.
fn rating_term(seeker: f64, candidate: f64) -> f64 {
    let avg = (seeker + candidate) / 2.0;
    (((avg - RATING_PIVOT).min(RATING_BONUS_CAP)) * RATING_MULTIPLIER).max(0.0)
}
