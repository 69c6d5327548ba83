use std::collections::HashSet;

use iso_currency::Currency;

use crate::{
    config::EngineConfig,
    domain::logic::{
        normalizers::{dollar_figure, is_comp, is_free_play},
        utils::{from_minor_units, pct, sum_minor_units, to_minor_units},
    },
    entities::{
        CasinoMetrics, CasinoOffer, Category, LedgerEntry, PerformanceMetrics, Projections,
    },
};

// Per-entry contributions, in minor units.
// ---

pub(crate) fn spend_of(entry: &LedgerEntry, currency: Currency) -> i64 {
    to_minor_units(entry.amount.abs(), currency)
}

/// Onboard credit applied, plus the full amount of comp/free lines.
pub(crate) fn savings_of(entry: &LedgerEntry, currency: Currency) -> i64 {
    let credit = if entry.onboard_credit_applied > 0.0 {
        to_minor_units(entry.onboard_credit_applied, currency)
    } else {
        0
    };
    let comp = if is_comp(&entry.description) {
        spend_of(entry, currency)
    } else {
        0
    };
    credit.saturating_add(comp)
}

fn is_casino_line(entry: &LedgerEntry) -> bool {
    let description = entry.description.to_lowercase();
    entry.category == Category::Casino
        || ["casino", "slot", "table game", "poker"]
            .iter()
            .any(|k| description.contains(k))
}

fn free_play_of(entry: &LedgerEntry, currency: Currency) -> i64 {
    if !is_free_play(&entry.description) {
        return 0;
    }
    match dollar_figure(&entry.description) {
        Some(figure) => to_minor_units(figure, currency),
        None => spend_of(entry, currency),
    }
}

fn comps_of(entry: &LedgerEntry, currency: Currency) -> i64 {
    let description = entry.description.to_lowercase();
    if entry.onboard_credit_applied > 0.0 {
        to_minor_units(entry.onboard_credit_applied, currency)
    } else if description.contains("comp") || description.contains("complimentary") {
        spend_of(entry, currency)
    } else {
        0
    }
}

fn offer_free_play(offer: &CasinoOffer, currency: Currency) -> i64 {
    let figure = if offer.free_play > 0.0 {
        Some(offer.free_play)
    } else {
        dollar_figure(&offer.offer_name)
    };
    figure.map_or(0, |f| to_minor_units(f, currency))
}

// --

/// Performance and casino figures over a set of ledger entries. All sums are
/// taken in integer minor units, so the result does not depend on the order
/// of `entries`.
pub(crate) struct MetricsProcessor<'a> {
    entries: &'a [LedgerEntry],
    offers: &'a [CasinoOffer],
    config: &'a EngineConfig,
    currency: Currency,
}

impl<'a> MetricsProcessor<'a> {
    pub(crate) fn new(
        entries: &'a [LedgerEntry],
        offers: &'a [CasinoOffer],
        config: &'a EngineConfig,
        currency: Currency,
    ) -> Self {
        Self {
            entries,
            offers,
            config,
            currency,
        }
    }

    pub(crate) fn process(&self) -> (PerformanceMetrics, CasinoMetrics) {
        let performance = self.performance();
        let casino = self.casino(&performance);
        (performance, casino)
    }

    fn sum(&self, f: impl Fn(&LedgerEntry, Currency) -> i64) -> f64 {
        from_minor_units(
            sum_minor_units(self.entries.iter().map(|e| f(e, self.currency))),
            self.currency,
        )
    }

    fn performance(&self) -> PerformanceMetrics {
        let total_spent = self.sum(spend_of);
        let total_savings = self.sum(savings_of);
        let trips_with_entries = self
            .entries
            .iter()
            .map(|e| &e.trip_id)
            .collect::<HashSet<_>>()
            .len();
        let total_roi = pct(total_savings, total_spent);
        let retail_value = total_spent * self.config.retail_value_multiplier + total_savings;
        PerformanceMetrics {
            total_spent,
            total_savings,
            total_roi,
            average_roi: if trips_with_entries > 0 {
                total_roi / trips_with_entries as f64
            } else {
                0.0
            },
            profit_margin: pct(total_savings, retail_value),
            trips_with_entries,
        }
    }

    fn casino(&self, performance: &PerformanceMetrics) -> CasinoMetrics {
        let detected = self.sum(|e, c| if is_casino_line(e) { spend_of(e, c) } else { 0 });
        let casino_spend_estimated = detected == 0.0;
        let casino_spend = if casino_spend_estimated {
            performance.total_spent * self.config.casino_share_of_spend
        } else {
            detected
        };
        let total_coin_in = casino_spend * self.config.coin_in_multiplier;
        let total_points = if self.config.coin_in_per_point > 0.0 {
            total_coin_in / self.config.coin_in_per_point
        } else {
            0.0
        };

        let offers_free_play =
            sum_minor_units(self.offers.iter().map(|o| offer_free_play(o, self.currency)));
        let total_free_play =
            self.sum(free_play_of) + from_minor_units(offers_free_play, self.currency);
        let total_comps = self.sum(comps_of);

        CasinoMetrics {
            casino_spend,
            casino_spend_estimated,
            total_coin_in,
            total_points,
            total_free_play,
            total_comps,
            average_points_per_trip: if performance.trips_with_entries > 0 {
                total_points / performance.trips_with_entries as f64
            } else {
                0.0
            },
            casino_efficiency: pct(total_free_play + total_comps, total_coin_in),
        }
    }
}

/// Forward-looking figures. The window's savings and trip count stand in for
/// a year's worth.
pub(crate) fn projections(performance: &PerformanceMetrics, config: &EngineConfig) -> Projections {
    let projected_annual_savings = performance.total_savings;
    Projections {
        projected_annual_savings,
        projected_trips_per_year: performance.trips_with_entries as f64,
        recommended_budget: if config.target_roi_pct > 0.0 {
            projected_annual_savings / (config.target_roi_pct / 100.0)
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::entities::{
        CasinoOfferId, DocumentId, LedgerEntryId, SourceDocument, SourceKind, TripId, TxnType,
    };

    fn entry(trip: &str, description: &str, amount: f64, category: Category) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId(0),
            trip_id: TripId::new(trip),
            source: SourceDocument {
                kind: SourceKind::Statement,
                document_id: DocumentId("statement-1".to_string()),
                file_name: None,
            },
            post_date: NaiveDate::from_ymd_opt(2025, 3, 10),
            description: description.to_string(),
            amount,
            txn_type: TxnType::Charge,
            category,
            payment_method: None,
            onboard_credit_applied: 0.0,
            currency: Currency::USD,
            verified: false,
            ref_number: None,
            folio_number: None,
        }
    }

    fn process(entries: &[LedgerEntry], offers: &[CasinoOffer]) -> (PerformanceMetrics, CasinoMetrics) {
        let config = EngineConfig::default();
        MetricsProcessor::new(entries, offers, &config, Currency::USD).process()
    }

    #[test]
    fn roi_counts_comps_and_onboard_credit() {
        let mut credit = entry("trip-1", "Onboard Credit Applied", 100.0, Category::Other);
        credit.onboard_credit_applied = 100.0;
        let entries = vec![
            entry("trip-1", "Casino slots", 500.0, Category::Casino),
            entry("trip-1", "Complimentary dinner", 100.0, Category::Dining),
            entry("trip-2", "Coffee", 300.0, Category::Beverage),
            credit,
        ];
        let (performance, _) = process(&entries, &[]);
        assert_eq!(performance.total_spent, 1000.0);
        assert_eq!(performance.total_savings, 200.0);
        assert_eq!(performance.total_roi, 20.0);
        assert_eq!(performance.trips_with_entries, 2);
        assert_eq!(performance.average_roi, 10.0);
        // 200 / (1000 * 1.5 + 200)
        assert!((performance.profit_margin - 200.0 / 1700.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_ledger_yields_zeros() {
        let (performance, casino) = process(&[], &[]);
        assert_eq!(performance, PerformanceMetrics::default());
        assert_eq!(casino.casino_efficiency, 0.0);
        assert_eq!(casino.average_points_per_trip, 0.0);
        assert!(casino.casino_spend_estimated);
    }

    #[test]
    fn casino_spend_drives_coin_in_and_points() {
        let entries = vec![
            entry("trip-1", "Club Royale Entertainment Games", 1000.0, Category::Casino),
            entry("trip-1", "Club Royale FreePlay $250", 0.0, Category::Casino),
            entry("trip-1", "Dinner", 100.0, Category::Dining),
        ];
        let offers = vec![CasinoOffer {
            id: CasinoOfferId(1),
            offer_code: None,
            offer_name: "$100 Free Play Bonus".to_string(),
            free_play: 0.0,
            onboard_credit: 0.0,
            expires: None,
        }];
        let (_, casino) = process(&entries, &offers);
        assert!(!casino.casino_spend_estimated);
        assert_eq!(casino.casino_spend, 1000.0);
        assert_eq!(casino.total_coin_in, 15000.0);
        assert_eq!(casino.total_points, 3000.0);
        assert_eq!(casino.total_free_play, 350.0);
        assert_eq!(casino.average_points_per_trip, 3000.0);
        assert!((casino.casino_efficiency - 350.0 / 15000.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn casino_spend_is_estimated_without_casino_lines() {
        let entries = vec![entry("trip-1", "Dinner", 1000.0, Category::Dining)];
        let (_, casino) = process(&entries, &[]);
        assert!(casino.casino_spend_estimated);
        assert!((casino.casino_spend - 120.0).abs() < 1e-9);
        assert!((casino.total_coin_in - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn results_do_not_depend_on_entry_order() {
        let mut entries: Vec<LedgerEntry> = (0..40)
            .map(|i| {
                entry(
                    &format!("trip-{}", i % 3),
                    if i % 4 == 0 { "Free drink" } else { "Casino slots" },
                    0.1 + i as f64 * 0.37,
                    Category::Casino,
                )
            })
            .collect();
        let forward = process(&entries, &[]);
        entries.reverse();
        entries.swap(3, 17);
        assert_eq!(process(&entries, &[]), forward);
    }

    #[test]
    fn projections_use_target_roi() {
        let performance = PerformanceMetrics {
            total_savings: 500.0,
            trips_with_entries: 3,
            ..Default::default()
        };
        let p = projections(&performance, &EngineConfig::default());
        assert_eq!(p.projected_annual_savings, 500.0);
        assert_eq!(p.projected_trips_per_year, 3.0);
        assert_eq!(p.recommended_budget, 2000.0);
    }
}
