use super::loyalty::Tier;

// Lookup handlers.
// ---

/// Maps a ship to its usual departure port. Used to fill in trips that are
/// synthesized from documents which don't mention a port.
pub trait PortDirectory: Send + Sync {
    fn home_port(&self, ship: &str) -> Option<String>;
}

// Loyalty programs.
// ---

/// A loyalty program with point thresholds. Tiers must be returned in
/// ascending `min_points` order, and the first tier should start at 0.
pub trait TierProgram: Send + Sync {
    fn name(&self) -> &str;
    fn tiers(&self) -> Vec<Tier>;
}
