use std::collections::BTreeMap;

use iso_currency::Currency;

use crate::{
    entities::{
        DerivedMetrics, InsightKind, LedgerEntry, Severity, TrendPoint, Trip, TripId, TxnType,
    },
    presentation::utils::{format_amount, format_change, format_pct},
};

const WIDTH: usize = 80;

fn section(output: &mut String, title: &str) {
    let prefix = format!("--- {} ", title);
    output.push_str(&prefix);
    output.push_str(&"-".repeat(WIDTH.saturating_sub(prefix.len())));
    output.push_str("\n\n");
}

impl InsightKind {
    fn tag(&self) -> &'static str {
        match self {
            InsightKind::Trend => "TREND",
            InsightKind::Opportunity => "OPPORTUNITY",
            InsightKind::Warning => "WARNING",
            InsightKind::Achievement => "ACHIEVEMENT",
        }
    }
}

impl Severity {
    fn tag(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

pub(crate) struct ReportPrinter;

impl ReportPrinter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn print_metrics(&self, metrics: &DerivedMetrics) -> String {
        let mut output = String::new();
        let currency = metrics.currency;

        output.push_str(&format!(
            "Cruise performance ({}, as of {}",
            metrics.timeframe, metrics.as_of
        ));
        if let Some(start) = metrics.window_start {
            output.push_str(&format!(", trips departing from {}", start));
        }
        output.push_str(")\n");
        if metrics.mixed_currency {
            output.push_str(
                "Note: the ledger holds more than one currency; totals mix them unconverted.\n",
            );
        }
        output.push('\n');

        section(&mut output, "Performance");
        let p = &metrics.performance;
        self.print_row(&mut output, "Total spent", format_amount(p.total_spent, currency));
        self.print_row(&mut output, "Total savings", format_amount(p.total_savings, currency));
        self.print_row(&mut output, "ROI", format_pct(p.total_roi));
        self.print_row(&mut output, "Average ROI per trip", format_pct(p.average_roi));
        self.print_row(&mut output, "Profit margin", format_pct(p.profit_margin));
        self.print_row(&mut output, "Trips", p.trips_with_entries.to_string());
        output.push('\n');

        section(&mut output, "Casino");
        let c = &metrics.casino;
        self.print_row(
            &mut output,
            "Casino spend",
            format!(
                "{}{}",
                format_amount(c.casino_spend, currency),
                if c.casino_spend_estimated { " (estimated)" } else { "" }
            ),
        );
        self.print_row(&mut output, "Estimated coin-in", format_amount(c.total_coin_in, currency));
        self.print_row(&mut output, "Estimated points", format!("{:.0}", c.total_points));
        self.print_row(&mut output, "Points per trip", format!("{:.0}", c.average_points_per_trip));
        self.print_row(&mut output, "Free play", format_amount(c.total_free_play, currency));
        self.print_row(&mut output, "Comps", format_amount(c.total_comps, currency));
        self.print_row(&mut output, "Casino efficiency", format_pct(c.casino_efficiency));
        output.push('\n');

        section(&mut output, "Trends");
        self.print_trend(&mut output, "ROI", &metrics.trends.roi, format_pct);
        self.print_trend(&mut output, "Spending", &metrics.trends.spending, |v| {
            format_amount(v, currency)
        });
        self.print_trend(&mut output, "Trips", &metrics.trends.trip_frequency, |v| {
            format!("{:.0}", v)
        });

        section(&mut output, "Insights");
        if metrics.insights.is_empty() {
            output.push_str("No insights for this period.\n");
        }
        let wrap = textwrap::Options::new(WIDTH)
            .initial_indent("    ")
            .subsequent_indent("    ");
        for insight in &metrics.insights {
            output.push_str(&format!(
                "[{}/{}] {}\n",
                insight.kind.tag(),
                insight.severity.tag(),
                insight.title
            ));
            output.push_str(&textwrap::fill(&insight.description, &wrap));
            output.push('\n');
            for r in &insight.recommendations {
                output.push_str(&format!("      - {}\n", r));
            }
            output.push('\n');
        }

        section(&mut output, "Projections");
        let pr = &metrics.projections;
        self.print_row(
            &mut output,
            "Projected annual savings",
            format_amount(pr.projected_annual_savings, currency),
        );
        self.print_row(
            &mut output,
            "Projected trips per year",
            format!("{:.0}", pr.projected_trips_per_year),
        );
        self.print_row(
            &mut output,
            "Recommended budget",
            format_amount(pr.recommended_budget, currency),
        );

        output
    }

    /// Entries grouped per trip, trips in departure order. Entries whose trip
    /// is unknown are listed last under their raw trip ID.
    pub(crate) fn print_ledger(&self, trips: &[Trip], entries: &[LedgerEntry]) -> String {
        let mut output = String::new();
        let mut by_trip: BTreeMap<&TripId, Vec<&LedgerEntry>> = BTreeMap::new();
        for e in entries {
            by_trip.entry(&e.trip_id).or_default().push(e);
        }

        let mut sorted_trips: Vec<&Trip> = trips.iter().collect();
        sorted_trips.sort_by_key(|t| (t.departure_date, t.id.clone()));
        for trip in sorted_trips {
            let Some(trip_entries) = by_trip.remove(&trip.id) else {
                continue;
            };
            section(
                &mut output,
                &format!("{} | {} | {}", trip.id, trip.ship, trip.departure_date),
            );
            self.print_entries(&mut output, &trip_entries);
            output.push('\n');
        }
        for (trip_id, trip_entries) in by_trip {
            section(&mut output, trip_id.as_str());
            self.print_entries(&mut output, &trip_entries);
            output.push('\n');
        }
        output
    }

    fn print_entries(&self, output: &mut String, entries: &[&LedgerEntry]) {
        let mut sorted = entries.to_vec();
        sorted.sort_by_key(|e| (e.post_date, e.id));
        let mut totals: BTreeMap<&str, (Currency, f64)> = BTreeMap::new();
        for e in sorted {
            let signed = match e.txn_type {
                TxnType::Credit => -e.amount,
                TxnType::Charge | TxnType::Adjustment => e.amount,
            };
            output.push_str(&format!(
                "{:10}  {:<36.36}  {:<8}  {:>16}{}\n",
                e.post_date.map(|d| d.to_string()).unwrap_or_default(),
                e.description,
                e.category.to_string(),
                format_amount(signed, e.currency),
                if e.verified { "  *" } else { "" },
            ));
            let total = totals.entry(e.currency.code()).or_insert((e.currency, 0.0));
            total.1 += signed;
        }
        for (_, (currency, total)) in totals {
            output.push_str(&format!(
                "{:10}  {:<36}  {:<8}  {:>16}\n",
                "",
                "Net",
                "",
                format_amount(total, currency)
            ));
        }
    }

    fn print_row(&self, output: &mut String, label: &str, value: String) {
        output.push_str(&format!("  {:<28}{:>20}\n", label, value));
    }

    fn print_trend(
        &self,
        output: &mut String,
        title: &str,
        points: &[TrendPoint],
        value: impl Fn(f64) -> String,
    ) {
        output.push_str(&format!("{}\n", title));
        for point in points {
            output.push_str(&format!(
                "  {:<16}{:>20}{:>12}\n",
                point.label,
                value(point.value),
                format_change(point.change)
            ));
        }
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::entities::{
        CasinoMetrics, Category, DocumentId, Insight, LedgerEntryId, PerformanceMetrics,
        Projections, SourceDocument, SourceKind, Timeframe, Trends,
    };

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn metrics_report_wraps_insights() {
        let metrics = DerivedMetrics {
            timeframe: Timeframe::All,
            window_start: None,
            as_of: ymd(2025, 6, 1),
            currency: Currency::USD,
            performance: PerformanceMetrics {
                total_spent: 12345.5,
                total_roi: 9.5,
                ..Default::default()
            },
            casino: CasinoMetrics::default(),
            trends: Trends::default(),
            insights: vec![Insight {
                id: "low-roi",
                kind: InsightKind::Warning,
                title: "ROI Below Target".to_string(),
                description: "word ".repeat(40),
                value: Some(9.5),
                severity: Severity::High,
                recommendations: vec!["Focus on higher-value casino offers".to_string()],
            }],
            projections: Projections::default(),
            mixed_currency: true,
        };
        let report = ReportPrinter::new().print_metrics(&metrics);
        assert!(report.contains("12,345.50 $"));
        assert!(report.contains("9.5%"));
        assert!(report.contains("[WARNING/high] ROI Below Target"));
        assert!(report.contains("more than one currency"));
        assert!(report.lines().all(|l| l.chars().count() <= WIDTH));
    }

    #[test]
    fn ledger_listing_groups_by_trip_and_nets_credits() {
        let trip = Trip {
            id: TripId::new("trip-1"),
            ship: "Wonder of the Seas".to_string(),
            itinerary: "7 Night Western Caribbean".to_string(),
            departure_date: ymd(2025, 3, 9),
            return_date: ymd(2025, 3, 16),
            nights: 7,
            departure_port: "Port Canaveral".to_string(),
            cruise_line: "Royal Caribbean".to_string(),
            cabin_type: None,
            cabin_number: None,
            reservation_number: None,
            offer_code: None,
            offer_name: None,
            synthesized: false,
        };
        let entry = |id: u64, description: &str, amount: f64, txn_type: TxnType| LedgerEntry {
            id: LedgerEntryId(id),
            trip_id: TripId::new("trip-1"),
            source: SourceDocument {
                kind: SourceKind::Statement,
                document_id: DocumentId("statement-1".to_string()),
                file_name: None,
            },
            post_date: Some(ymd(2025, 3, 10)),
            description: description.to_string(),
            amount,
            txn_type,
            category: Category::Other,
            payment_method: None,
            onboard_credit_applied: 0.0,
            currency: Currency::USD,
            verified: false,
            ref_number: None,
            folio_number: None,
        };
        let entries = vec![
            entry(1, "Dinner", 120.0, TxnType::Charge),
            entry(2, "Onboard Credit Applied", 20.0, TxnType::Credit),
        ];
        let listing = ReportPrinter::new().print_ledger(&[trip], &entries);
        assert!(listing.starts_with("--- trip-1 | Wonder of the Seas | 2025-03-09"));
        assert!(listing.contains("-20.00 $"));
        assert!(listing.contains("100.00 $"));
    }
}
