use tracing::debug;

use crate::{
    config::EngineConfig,
    domain::logic::normalizers::{nights_between, nights_from_itinerary, return_date},
    entities::{
        PortDirectory, Trip, TripDraft, TripHint, TripId, TripResolution, UnresolvedReason,
    },
};

const UNKNOWN_ITINERARY: &str = "Unknown Itinerary";
const UNKNOWN_PORT: &str = "Unknown Port";

/// Matches extracted documents against known trips. Never mutates anything;
/// a `Created` draft must be committed by the caller.
pub(crate) struct TripResolver<'a, P: PortDirectory + ?Sized> {
    trips: &'a [Trip],
    ports: &'a P,
    config: &'a EngineConfig,
}

impl<'a, P: PortDirectory + ?Sized> TripResolver<'a, P> {
    pub(crate) fn new(trips: &'a [Trip], ports: &'a P, config: &'a EngineConfig) -> Self {
        Self {
            trips,
            ports,
            config,
        }
    }

    pub(crate) fn resolve(&self, explicit: Option<&TripId>, hint: &TripHint) -> TripResolution {
        if let Some(id) = explicit {
            return match self.trips.iter().find(|t| &t.id == id) {
                Some(t) => TripResolution::Found(t.id.clone()),
                None => TripResolution::Unresolved(UnresolvedReason::UnknownTripId(id.clone())),
            };
        }

        let (Some(ship), Some(departure_date)) = (hint.ship.as_deref(), hint.departure_date)
        else {
            return TripResolution::Unresolved(UnresolvedReason::MissingShipOrDate);
        };

        match self.trips.iter().find(|t| t.matches(ship, departure_date)) {
            Some(t) => {
                debug!(trip_id = %t.id, ship, %departure_date, "matched existing trip");
                TripResolution::Found(t.id.clone())
            }
            None => TripResolution::Created(self.synthesize(ship, departure_date, hint)),
        }
    }

    /// Builds a trip from whatever the document provides, filling the gaps
    /// with defaults.
    pub(crate) fn synthesize(
        &self,
        ship: &str,
        departure_date: chrono::NaiveDate,
        hint: &TripHint,
    ) -> TripDraft {
        let itinerary = hint
            .itinerary
            .clone()
            .unwrap_or_else(|| UNKNOWN_ITINERARY.to_string());
        let nights = hint
            .return_date
            .and_then(|r| nights_between(departure_date, r))
            .or_else(|| nights_from_itinerary(&itinerary))
            .unwrap_or(self.config.default_nights);
        let return_date = hint
            .return_date
            .filter(|r| *r > departure_date)
            .or_else(|| return_date(departure_date, nights))
            .unwrap_or(departure_date);
        let departure_port = hint
            .departure_port
            .clone()
            .or_else(|| self.ports.home_port(ship))
            .unwrap_or_else(|| UNKNOWN_PORT.to_string());

        TripDraft {
            ship: ship.trim().to_string(),
            itinerary,
            departure_date,
            return_date,
            nights,
            departure_port,
            cruise_line: hint
                .cruise_line
                .clone()
                .unwrap_or_else(|| self.config.default_cruise_line.clone()),
            cabin_type: hint.cabin_type.clone(),
            cabin_number: hint.cabin_number.clone(),
            reservation_number: hint.reservation_number.clone(),
            offer_code: None,
            offer_name: None,
        }
    }
}
