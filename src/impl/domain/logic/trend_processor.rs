use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use iso_currency::Currency;

use crate::{
    domain::logic::{
        metrics_processor::{savings_of, spend_of},
        utils::{from_minor_units, pct, sum_minor_units, Period},
    },
    entities::{LedgerEntry, TrendBucket, TrendPoint, Trends, TripId},
};

/// Buckets ledger entries into trend periods by the departure date of the
/// trip they belong to.
pub(crate) struct TrendProcessor<'a> {
    entries: &'a [LedgerEntry],
    departures: &'a HashMap<TripId, NaiveDate>,
    periods: Vec<Period>,
    currency: Currency,
}

impl<'a> TrendProcessor<'a> {
    pub(crate) fn new(
        entries: &'a [LedgerEntry],
        departures: &'a HashMap<TripId, NaiveDate>,
        periods: Vec<Period>,
        currency: Currency,
    ) -> Self {
        Self {
            entries,
            departures,
            periods,
            currency,
        }
    }

    pub(crate) fn process(self) -> Trends {
        let buckets: Vec<TrendBucket> = self
            .periods
            .iter()
            .map(|period| self.bucket(period))
            .collect();
        Trends {
            roi: series(&buckets, |b| b.roi),
            spending: series(&buckets, |b| b.spent),
            trip_frequency: series(&buckets, |b| b.trips as f64),
            buckets,
        }
    }

    fn bucket(&self, period: &Period) -> TrendBucket {
        let in_period: Vec<&LedgerEntry> = self
            .entries
            .iter()
            .filter(|e| {
                self.departures
                    .get(&e.trip_id)
                    .is_some_and(|d| *d >= period.start && *d <= period.end)
            })
            .collect();
        let spent = from_minor_units(
            sum_minor_units(in_period.iter().map(|e| spend_of(e, self.currency))),
            self.currency,
        );
        let savings = from_minor_units(
            sum_minor_units(in_period.iter().map(|e| savings_of(e, self.currency))),
            self.currency,
        );
        TrendBucket {
            label: period.label.clone(),
            start: period.start,
            end: period.end,
            spent,
            savings,
            roi: pct(savings, spent),
            trips: in_period
                .iter()
                .map(|e| &e.trip_id)
                .collect::<HashSet<_>>()
                .len(),
        }
    }
}

/// Period-over-period change: none for the first point, 0 when the previous
/// value is not positive.
fn series(buckets: &[TrendBucket], value: impl Fn(&TrendBucket) -> f64) -> Vec<TrendPoint> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let current = value(b);
            TrendPoint {
                label: b.label.clone(),
                value: current,
                change: (i > 0).then(|| {
                    let previous = value(&buckets[i - 1]);
                    if previous > 0.0 {
                        (current - previous) / previous * 100.0
                    } else {
                        0.0
                    }
                }),
            }
        })
        .collect()
}
