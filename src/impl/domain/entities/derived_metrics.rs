use chrono::NaiveDate;
use iso_currency::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde_derive::Deserialize)]
pub enum Timeframe {
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "6m")]
    Last6Months,
    #[serde(rename = "1y")]
    LastYear,
    #[serde(rename = "all")]
    All,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceMetrics {
    pub total_spent: f64,
    pub total_savings: f64,
    /// Savings as a percentage of spend.
    pub total_roi: f64,
    /// Total ROI spread over the trips that have ledger entries.
    pub average_roi: f64,
    pub profit_margin: f64,
    pub trips_with_entries: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CasinoMetrics {
    pub casino_spend: f64,
    /// True when no casino lines were found and spend was estimated as a
    /// fixed share of the total.
    pub casino_spend_estimated: bool,
    pub total_coin_in: f64,
    pub total_points: f64,
    pub total_free_play: f64,
    pub total_comps: f64,
    pub average_points_per_trip: f64,
    /// (Free play + comps) / coin-in, as a percentage.
    pub casino_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendBucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub spent: f64,
    pub savings: f64,
    pub roi: f64,
    pub trips: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
    /// Percent change versus the previous bucket; `None` for the first one.
    pub change: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trends {
    pub buckets: Vec<TrendBucket>,
    pub roi: Vec<TrendPoint>,
    pub spending: Vec<TrendPoint>,
    pub trip_frequency: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    Trend,
    Opportunity,
    Warning,
    Achievement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub id: &'static str,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub value: Option<f64>,
    pub severity: Severity,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projections {
    pub projected_annual_savings: f64,
    pub projected_trips_per_year: f64,
    pub recommended_budget: f64,
}

/// Analytics over a time window. Always recomputed from the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub timeframe: Timeframe,
    pub window_start: Option<NaiveDate>,
    pub as_of: NaiveDate,
    pub currency: Currency,
    pub performance: PerformanceMetrics,
    pub casino: CasinoMetrics,
    pub trends: Trends,
    pub insights: Vec<Insight>,
    pub projections: Projections,
    pub mixed_currency: bool,
}

// --

impl Timeframe {
    /// Length of the window in days; `None` means unbounded.
    pub fn days(&self) -> Option<i64> {
        match self {
            Timeframe::Last30Days => Some(30),
            Timeframe::Last90Days => Some(90),
            Timeframe::Last6Months => Some(180),
            Timeframe::LastYear => Some(365),
            Timeframe::All => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Timeframe> {
        match code.trim() {
            "30d" => Some(Timeframe::Last30Days),
            "90d" => Some(Timeframe::Last90Days),
            "6m" => Some(Timeframe::Last6Months),
            "1y" => Some(Timeframe::LastYear),
            "all" => Some(Timeframe::All),
            _ => None,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::Last30Days => write!(f, "30d"),
            Timeframe::Last90Days => write!(f, "90d"),
            Timeframe::Last6Months => write!(f, "6m"),
            Timeframe::LastYear => write!(f, "1y"),
            Timeframe::All => write!(f, "all"),
        }
    }
}
