use crate::entities::{Tier, TierProgram};

/// Cruise loyalty program, tiered on cruise points (one per night sailed,
/// two when sailing solo).
pub struct CrownAndAnchor;

impl TierProgram for CrownAndAnchor {
    fn name(&self) -> &str {
        "Crown & Anchor Society"
    }

    fn tiers(&self) -> Vec<Tier> {
        [
            ("Gold", 0),
            ("Platinum", 30),
            ("Emerald", 55),
            ("Diamond", 80),
            ("Diamond Plus", 175),
            ("Pinnacle Club", 700),
        ]
        .into_iter()
        .map(|(name, min_points)| Tier {
            name: name.to_string(),
            min_points,
        })
        .collect()
    }
}
