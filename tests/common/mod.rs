use fairway::{
    Coordinates, GroupSize, PaceOfPlay, PlayingStyle, Profile, SubscriptionTier, TeeTimeSlot,
};

/// Route tracing output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A reasonable mid-handicap golfer in San Francisco; tests tweak fields
/// from here.
pub fn golfer(id: &str) -> Profile {
    golfer_at(id, 37.7749, -122.4194)
}

pub fn golfer_at(id: &str, latitude: f64, longitude: f64) -> Profile {
    Profile {
        id: id.to_string(),
        location: Coordinates::new(latitude, longitude),
        handicap: 12,
        preferred_times: [TeeTimeSlot::Morning, TeeTimeSlot::WeekendsOnly].into_iter().collect(),
        playing_style: PlayingStyle::Casual,
        pace_of_play: PaceOfPlay::Moderate,
        preferred_group_size: GroupSize::Foursome,
        is_verified: true,
        avg_rating: 4.0,
        total_rounds: 50,
        last_active_millis: 0,
        tier: SubscriptionTier::Free,
    }
}
