use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::{Duration, NaiveDate};
use fractic_server_error::ServerError;
use iso_currency::Currency;
use tracing::debug;

use crate::{
    config::EngineConfig,
    data::repositories::store_repository_impl::StoreRepositoryImpl,
    domain::{
        logic::{
            insight_processor::InsightProcessor,
            loyalty_processor::{tier_progress, LoyaltyProcessor},
            metrics_processor::{projections, MetricsProcessor},
            normalizers::detect_mixed_currency,
            trend_processor::TrendProcessor,
            utils::trend_periods,
        },
        repositories::store_repository::StoreRepository,
    },
    entities::{
        DerivedMetrics, LedgerEntry, LoyaltyProgress, LoyaltyTrip, TierProgram, TierProgress,
        Timeframe, Trip, TripId,
    },
};

pub trait AnalyticsUsecase: Send + Sync {
    /// Recomputes every figure from the current ledger. Calling it twice
    /// without intervening writes yields identical results.
    fn metrics(&self, timeframe: Timeframe, today: NaiveDate)
        -> Result<DerivedMetrics, ServerError>;

    /// Points default to the estimated casino points over the whole ledger.
    fn tier_progress(
        &self,
        program: &dyn TierProgram,
        points: Option<u64>,
        today: NaiveDate,
    ) -> Result<TierProgress, ServerError>;

    fn loyalty_progress(
        &self,
        program: &dyn TierProgram,
        solo_trips: &HashSet<TripId>,
        override_points: Option<u32>,
        today: NaiveDate,
    ) -> Result<LoyaltyProgress, ServerError>;
}

pub(crate) struct AnalyticsUsecaseImpl<S = StoreRepositoryImpl>
where
    S: StoreRepository,
{
    store: Arc<S>,
    config: Arc<EngineConfig>,
    currency: Currency,
}

impl<S: StoreRepository> AnalyticsUsecase for AnalyticsUsecaseImpl<S> {
    fn metrics(
        &self,
        timeframe: Timeframe,
        today: NaiveDate,
    ) -> Result<DerivedMetrics, ServerError> {
        let trips = self.store.trips()?;
        let entries = self.store.entries(None)?;
        let offers = self.store.offers()?;

        let departures: HashMap<TripId, NaiveDate> = trips
            .iter()
            .map(|t| (t.id.clone(), t.departure_date))
            .collect();
        let window_start = timeframe.days().map(|d| today - Duration::days(d));
        let windowed: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| match window_start {
                None => true,
                Some(start) => departures.get(&e.trip_id).is_some_and(|d| *d >= start),
            })
            .cloned()
            .collect();

        let (performance, casino) =
            MetricsProcessor::new(&windowed, &offers, &self.config, self.currency).process();
        let trends = TrendProcessor::new(
            &entries,
            &departures,
            trend_periods(timeframe, today)?,
            self.currency,
        )
        .process();

        let trips_in_window: HashSet<&TripId> = windowed.iter().map(|e| &e.trip_id).collect();
        let cabin_types = trips
            .iter()
            .filter(|t| trips_in_window.contains(&t.id))
            .filter_map(|t| t.cabin_type.clone())
            .collect();
        let insights = InsightProcessor::new(&performance, &casino, &trends, cabin_types).process();

        debug!(
            timeframe = %timeframe,
            entries = windowed.len(),
            trips = performance.trips_with_entries,
            roi = performance.total_roi,
            "metrics computed"
        );

        Ok(DerivedMetrics {
            timeframe,
            window_start,
            as_of: today,
            currency: self.currency,
            projections: projections(&performance, &self.config),
            mixed_currency: detect_mixed_currency(&entries),
            performance,
            casino,
            trends,
            insights,
        })
    }

    fn tier_progress(
        &self,
        program: &dyn TierProgram,
        points: Option<u64>,
        today: NaiveDate,
    ) -> Result<TierProgress, ServerError> {
        let points = match points {
            Some(p) => p,
            None => self
                .metrics(Timeframe::All, today)?
                .casino
                .total_points
                .floor() as u64,
        };
        tier_progress(program, points)
    }

    fn loyalty_progress(
        &self,
        program: &dyn TierProgram,
        solo_trips: &HashSet<TripId>,
        override_points: Option<u32>,
        today: NaiveDate,
    ) -> Result<LoyaltyProgress, ServerError> {
        let (completed, upcoming): (Vec<_>, Vec<_>) = self
            .store
            .trips()?
            .into_iter()
            .partition(|t| t.is_completed(today));
        let view = |trips: Vec<Trip>| -> Vec<LoyaltyTrip> {
            trips
                .into_iter()
                .map(|t| LoyaltyTrip {
                    nights: t.nights,
                    solo: solo_trips.contains(&t.id),
                    end_date: Some(t.return_date),
                })
                .collect()
        };
        LoyaltyProcessor::new(
            view(completed),
            view(upcoming),
            self.config.loyalty_target_points,
            override_points,
        )
        .process(program)
    }
}

impl AnalyticsUsecaseImpl {
    pub(crate) fn new(
        store: Arc<StoreRepositoryImpl>,
        config: Arc<EngineConfig>,
        currency: Currency,
    ) -> Self {
        Self {
            store,
            config,
            currency,
        }
    }
}
