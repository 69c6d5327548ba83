use fractic_server_error::ServerError;

use crate::{
    entities::{LoyaltyProgress, LoyaltyTrip, Tier, TierProgram, TierProgress},
    errors::EmptyTierProgram,
};

const DEFAULT_AVG_NIGHTS: f64 = 4.0;
const RECENT_TRIPS_FOR_AVG: usize = 5;

/// Cruise-loyalty points earned for a sailing: one per night, doubled when
/// sailing solo.
pub(crate) fn trip_points(trip: &LoyaltyTrip) -> u32 {
    trip.nights.saturating_mul(if trip.solo { 2 } else { 1 })
}

fn total_points(trips: &[LoyaltyTrip]) -> u32 {
    trips.iter().map(trip_points).fold(0, u32::saturating_add)
}

/// Tiers sorted ascending by threshold, with the highest tier reached.
fn placed_tiers<P: TierProgram + ?Sized>(
    program: &P,
    points: u64,
) -> Result<(Vec<Tier>, usize), ServerError> {
    let mut tiers = program.tiers();
    if tiers.is_empty() {
        return Err(EmptyTierProgram::new(program.name()));
    }
    tiers.sort_by_key(|t| t.min_points);
    let current = tiers
        .iter()
        .rposition(|t| t.min_points <= points)
        .unwrap_or(0);
    Ok((tiers, current))
}

pub(crate) fn tier_progress<P: TierProgram + ?Sized>(
    program: &P,
    points: u64,
) -> Result<TierProgress, ServerError> {
    let (tiers, current) = placed_tiers(program, points)?;
    let current_tier = tiers[current].clone();
    let next_tier = tiers.get(current + 1).cloned();
    let (points_to_next, progress_pct) = match &next_tier {
        Some(next) => {
            let span = next.min_points.saturating_sub(current_tier.min_points);
            let done = points.saturating_sub(current_tier.min_points);
            (
                next.min_points.saturating_sub(points),
                if span > 0 {
                    (done as f64 / span as f64 * 100.0).min(100.0)
                } else {
                    100.0
                },
            )
        }
        None => (0, 100.0),
    };
    Ok(TierProgress {
        program: program.name().to_string(),
        points,
        current_tier,
        next_tier,
        points_to_next,
        progress_pct,
    })
}

/// Progress towards a cruise-loyalty target from completed and upcoming
/// sailings.
pub(crate) struct LoyaltyProcessor {
    completed: Vec<LoyaltyTrip>,
    upcoming: Vec<LoyaltyTrip>,
    target_points: u32,
    override_points: Option<u32>,
}

impl LoyaltyProcessor {
    pub(crate) fn new(
        completed: Vec<LoyaltyTrip>,
        upcoming: Vec<LoyaltyTrip>,
        target_points: u32,
        override_points: Option<u32>,
    ) -> Self {
        Self {
            completed,
            upcoming,
            target_points,
            override_points,
        }
    }

    pub(crate) fn process<P: TierProgram + ?Sized>(
        mut self,
        program: &P,
    ) -> Result<LoyaltyProgress, ServerError> {
        // Oldest first, so the tail holds the most recent sailings.
        self.completed.sort_by_key(|t| t.end_date);

        let current_points = self
            .override_points
            .unwrap_or_else(|| total_points(&self.completed));
        let points_from_upcoming = total_points(&self.upcoming);
        let points_left = self.target_points.saturating_sub(current_points);
        let points_left_after_upcoming = points_left.saturating_sub(points_from_upcoming);

        let recent = &self.completed[self
            .completed
            .len()
            .saturating_sub(RECENT_TRIPS_FOR_AVG)..];
        let avg_nights_per_trip = if recent.is_empty() {
            DEFAULT_AVG_NIGHTS
        } else {
            recent.iter().map(|t| t.nights as f64).sum::<f64>() / recent.len() as f64
        };

        let nights_left = points_left_after_upcoming;
        let trips_left_at_avg = if avg_nights_per_trip > 0.0 {
            (nights_left as f64 / avg_nights_per_trip).ceil() as u32
        } else {
            nights_left
        };
        let months_per_trip = if self.upcoming.is_empty() { 2 } else { 1 };

        let (tiers, current) = placed_tiers(program, current_points as u64)?;
        Ok(LoyaltyProgress {
            current_points,
            target_points: self.target_points,
            points_left,
            points_from_upcoming,
            points_left_after_upcoming,
            avg_nights_per_trip: (avg_nights_per_trip * 10.0).round() / 10.0,
            nights_left,
            trips_left_at_avg,
            seven_night_trips_left: nights_left.div_ceil(7),
            estimated_months_to_target: trips_left_at_avg.saturating_mul(months_per_trip),
            current_tier: tiers.into_iter().nth(current),
        })
    }
}
