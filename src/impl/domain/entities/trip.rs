use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId(pub(crate) String);

/// A cruise sailing, either entered directly, imported from an offer flyer, or
/// synthesized while ingesting a financial document.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: TripId,
    pub ship: String,
    pub itinerary: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub nights: u32,
    pub departure_port: String,
    pub cruise_line: String,
    pub cabin_type: Option<String>,
    pub cabin_number: Option<String>,
    pub reservation_number: Option<String>,
    pub offer_code: Option<String>,
    pub offer_name: Option<String>,
    /// Created as a by-product of ingesting a receipt, statement or ledger
    /// import rather than entered directly.
    pub synthesized: bool,
}

/// Everything about a trip except its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    pub ship: String,
    pub itinerary: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub nights: u32,
    pub departure_port: String,
    pub cruise_line: String,
    pub cabin_type: Option<String>,
    pub cabin_number: Option<String>,
    pub reservation_number: Option<String>,
    pub offer_code: Option<String>,
    pub offer_name: Option<String>,
}

// --

impl TripId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Trip {
    pub(crate) fn from_draft(id: TripId, draft: TripDraft, synthesized: bool) -> Self {
        Self {
            id,
            ship: draft.ship,
            itinerary: draft.itinerary,
            departure_date: draft.departure_date,
            return_date: draft.return_date,
            nights: draft.nights,
            departure_port: draft.departure_port,
            cruise_line: draft.cruise_line,
            cabin_type: draft.cabin_type,
            cabin_number: draft.cabin_number,
            reservation_number: draft.reservation_number,
            offer_code: draft.offer_code,
            offer_name: draft.offer_name,
            synthesized,
        }
    }

    /// Heuristic identity used when reconciling extracted documents: the
    /// stored ship name contains the extracted one (case-insensitive) and the
    /// departure dates are equal.
    pub fn matches(&self, ship: &str, departure_date: NaiveDate) -> bool {
        let needle = ship.trim().to_lowercase();
        !needle.is_empty()
            && self.ship.to_lowercase().contains(&needle)
            && self.departure_date == departure_date
    }

    pub fn is_completed(&self, today: NaiveDate) -> bool {
        self.return_date < today
    }
}
