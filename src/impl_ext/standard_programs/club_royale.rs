use crate::entities::{Tier, TierProgram};

/// Casino loyalty program, tiered on casino points earned from coin-in.
pub struct ClubRoyale;

impl TierProgram for ClubRoyale {
    fn name(&self) -> &str {
        "Club Royale"
    }

    fn tiers(&self) -> Vec<Tier> {
        [
            ("Choice", 0),
            ("Prime", 2_500),
            ("Signature", 25_000),
            ("Masters", 100_000),
        ]
        .into_iter()
        .map(|(name, min_points)| Tier {
            name: name.to_string(),
            min_points,
        })
        .collect()
    }
}
