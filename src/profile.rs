//! Domain model: golfer profiles and matching preferences.
//!
//! `Profile` records are owned and mutated by the external profile service;
//! this core treats them as immutable value inputs for the duration of a
//! single discovery or swipe call. `MatchingPreferences` arrive fresh per
//! discovery request and are never persisted here.

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Subscription level controlling quota size and placement bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
}

/// How a golfer likes to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayingStyle {
    Competitive,
    Casual,
    BeginnerFriendly,
}

/// Preferred pace over a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceOfPlay {
    Fast,
    Moderate,
    Relaxed,
}

/// Preferred group size on the tee sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSize {
    Twosome,
    Foursome,
    Flexible,
}

/// Tee-time slots a golfer prefers. Ordered so sets have a stable layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeeTimeSlot {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
    WeekendsOnly,
}

/// Inclusive handicap range. Handicaps run from −10 (plus golfer) to 54.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandicapRange {
    pub min: i8,
    pub max: i8,
}

impl HandicapRange {
    pub fn new(min: i8, max: i8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, handicap: i8) -> bool {
        self.min <= handicap && handicap <= self.max
    }
}

/// A golfer as seen by the discovery core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub location: Coordinates,
    /// Skill index, −10..54. Smaller gap between two players means better
    /// skill compatibility.
    pub handicap: i8,
    pub preferred_times: BTreeSet<TeeTimeSlot>,
    pub playing_style: PlayingStyle,
    pub pace_of_play: PaceOfPlay,
    pub preferred_group_size: GroupSize,
    pub is_verified: bool,
    /// Average peer rating, 0..5.
    pub avg_rating: f64,
    /// Lifetime rounds recorded, used as an activity proxy in placement.
    pub total_rounds: u32,
    pub last_active_millis: u64,
    pub tier: SubscriptionTier,
}

/// Errors produced when validating matching preferences.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceError {
    /// Handicap range must satisfy min ≤ max.
    InvalidHandicapRange {
        /// Lower bound provided by the caller.
        min: i8,
        /// Upper bound provided by the caller.
        max: i8,
    },
    /// Max distance must be finite and non-negative.
    InvalidMaxDistance(f64),
    /// Minimum rating must lie within 0..5.
    InvalidMinRating(f64),
}

impl std::fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceError::InvalidHandicapRange { min, max } => {
                write!(f, "handicap range min must be <= max (got {}..{})", min, max)
            }
            PreferenceError::InvalidMaxDistance(miles) => {
                write!(f, "max distance must be finite and non-negative (got {})", miles)
            }
            PreferenceError::InvalidMinRating(rating) => {
                write!(f, "min rating must be within 0..5 (got {})", rating)
            }
        }
    }
}

impl std::error::Error for PreferenceError {}

/// Hard constraints and soft filters for one discovery request.
///
/// An empty `preferred_times` set is legal and never filters candidates;
/// time overlap affects scoring, not admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingPreferences {
    pub max_distance_miles: f64,
    pub handicap_range: HandicapRange,
    pub preferred_times: BTreeSet<TeeTimeSlot>,
    pub playing_style: Option<PlayingStyle>,
    pub pace_of_play: Option<PaceOfPlay>,
    pub group_size: Option<GroupSize>,
    pub verified_only: bool,
    pub min_rating: f64,
}

impl Default for MatchingPreferences {
    fn default() -> Self {
        Self {
            max_distance_miles: 25.0,
            handicap_range: HandicapRange::new(-10, 54),
            preferred_times: BTreeSet::new(),
            playing_style: None,
            pace_of_play: None,
            group_size: None,
            verified_only: false,
            min_rating: 0.0,
        }
    }
}

impl MatchingPreferences {
    /// Validate the preferences before any filtering.
    ///
    /// Malformed preferences fail closed: the caller gets an error and no
    /// partial filtering is ever applied.
    pub fn validate(&self) -> Result<(), PreferenceError> {
        if self.handicap_range.min > self.handicap_range.max {
            return Err(PreferenceError::InvalidHandicapRange {
                min: self.handicap_range.min,
                max: self.handicap_range.max,
            });
        }
        if !self.max_distance_miles.is_finite() || self.max_distance_miles < 0.0 {
            return Err(PreferenceError::InvalidMaxDistance(self.max_distance_miles));
        }
        if !self.min_rating.is_finite() || !(0.0..=5.0).contains(&self.min_rating) {
            return Err(PreferenceError::InvalidMinRating(self.min_rating));
        }
        Ok(())
    }
}
