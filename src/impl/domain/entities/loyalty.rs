use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub name: String,
    pub min_points: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierProgress {
    pub program: String,
    pub points: u64,
    pub current_tier: Tier,
    pub next_tier: Option<Tier>,
    /// Zero once the top tier is reached.
    pub points_to_next: u64,
    /// Progress through the current tier towards the next, 0-100.
    pub progress_pct: f64,
}

/// Minimal view of a trip for cruise-loyalty point counting.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyTrip {
    pub nights: u32,
    pub solo: bool,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyProgress {
    pub current_points: u32,
    pub target_points: u32,
    pub points_left: u32,
    pub points_from_upcoming: u32,
    pub points_left_after_upcoming: u32,
    pub avg_nights_per_trip: f64,
    pub nights_left: u32,
    pub trips_left_at_avg: u32,
    pub seven_night_trips_left: u32,
    pub estimated_months_to_target: u32,
    pub current_tier: Option<Tier>,
}
