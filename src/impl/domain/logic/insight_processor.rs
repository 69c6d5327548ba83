use std::collections::BTreeMap;

use crate::entities::{
    CasinoMetrics, Insight, InsightKind, PerformanceMetrics, Severity, Trends,
};

const HIGH_ROI_PCT: f64 = 50.0;
const LOW_ROI_PCT: f64 = 15.0;
const LOW_CASINO_EFFICIENCY_PCT: f64 = 5.0;
const DECLINING_ROI_CHANGE_PCT: f64 = -20.0;

/// Rule-based observations over already computed metrics.
pub(crate) struct InsightProcessor<'a> {
    performance: &'a PerformanceMetrics,
    casino: &'a CasinoMetrics,
    trends: &'a Trends,
    /// Cabin types of the trips in the window (one per trip, when known).
    cabin_types: Vec<String>,
}

impl<'a> InsightProcessor<'a> {
    pub(crate) fn new(
        performance: &'a PerformanceMetrics,
        casino: &'a CasinoMetrics,
        trends: &'a Trends,
        cabin_types: Vec<String>,
    ) -> Self {
        Self {
            performance,
            casino,
            trends,
            cabin_types,
        }
    }

    pub(crate) fn process(&self) -> Vec<Insight> {
        let mut insights = Vec::new();

        let roi = self.performance.total_roi;
        if roi > HIGH_ROI_PCT {
            insights.push(Insight {
                id: "high-roi",
                kind: InsightKind::Achievement,
                title: "Excellent ROI Performance".to_string(),
                description: format!(
                    "Your {:.1}% ROI is exceptional. You're maximizing value from casino offers.",
                    roi
                ),
                value: Some(roi),
                severity: Severity::High,
                recommendations: vec![],
            });
        } else if roi < LOW_ROI_PCT {
            insights.push(Insight {
                id: "low-roi",
                kind: InsightKind::Warning,
                title: "ROI Below Target".to_string(),
                description: format!(
                    "Your {:.1}% ROI is below the recommended {:.0}% minimum.",
                    roi, LOW_ROI_PCT
                ),
                value: Some(roi),
                severity: Severity::High,
                recommendations: strings(&[
                    "Focus on higher-value casino offers",
                    "Consider longer cruises for better point accumulation",
                    "Look for suite offers with better perks",
                ]),
            });
        }

        let trips_per_month = self.performance.trips_with_entries as f64 / 12.0;
        if trips_per_month > 1.0 {
            insights.push(Insight {
                id: "high-frequency",
                kind: InsightKind::Opportunity,
                title: "High Cruise Frequency".to_string(),
                description: format!(
                    "You're cruising {:.1} times per month. Consider VIP status benefits.",
                    trips_per_month
                ),
                value: Some(trips_per_month),
                severity: Severity::Medium,
                recommendations: strings(&[
                    "Apply for casino host relationship",
                    "Negotiate better offers based on frequency",
                    "Consider annual cruise packages",
                ]),
            });
        }

        let efficiency = self.casino.casino_efficiency;
        if efficiency < LOW_CASINO_EFFICIENCY_PCT {
            insights.push(Insight {
                id: "low-casino-efficiency",
                kind: InsightKind::Warning,
                title: "Low Casino Efficiency".to_string(),
                description: format!(
                    "Your casino efficiency is {:.1}%. You may be over-gambling.",
                    efficiency
                ),
                value: Some(efficiency),
                severity: Severity::Medium,
                recommendations: strings(&[
                    "Set stricter gambling budgets",
                    "Focus on minimum play requirements only",
                    "Track coin-in more carefully",
                ]),
            });
        }

        if let Some(change) = self
            .trends
            .roi
            .last()
            .and_then(|p| p.change)
            .filter(|c| *c < DECLINING_ROI_CHANGE_PCT)
        {
            insights.push(Insight {
                id: "declining-roi",
                kind: InsightKind::Trend,
                title: "Declining ROI Trend".to_string(),
                description: format!(
                    "Your ROI has declined by {:.1}% in the latest period.",
                    change.abs()
                ),
                value: Some(change),
                severity: Severity::High,
                recommendations: strings(&[
                    "Review recent cruise selections",
                    "Analyze what changed in your strategy",
                    "Consider returning to previously successful patterns",
                ]),
            });
        }

        if let Some(cabin) = self
            .most_common_cabin()
            .filter(|c| c.to_lowercase().contains("interior"))
        {
            insights.push(Insight {
                id: "cabin-upgrade-opportunity",
                kind: InsightKind::Opportunity,
                title: "Cabin Upgrade Opportunity".to_string(),
                description: format!(
                    "You primarily book {} cabins. Consider upgrading for better offers.",
                    cabin
                ),
                value: None,
                severity: Severity::Low,
                recommendations: strings(&[
                    "Look for balcony upgrade offers",
                    "Suite offers often have better perks",
                    "Higher cabin categories get priority treatment",
                ]),
            });
        }

        insights
    }

    /// Ties resolve to the alphabetically first cabin type.
    fn most_common_cabin(&self) -> Option<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for cabin in &self.cabin_types {
            *counts.entry(cabin.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .fold(None, |best: Option<(&str, usize)>, (cabin, n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((cabin, n)),
            })
            .map(|(cabin, _)| cabin.to_string())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
