use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ReadError, "Error reading file.");

// Parsing-related.
define_client_error!(InvalidCsv, "Invalid CSV format.");
define_client_error!(
    InvalidCsvRow,
    "Invalid CSV content on row {row}: {details}.",
    { row: usize, details: &str }
);
define_client_error!(
    InvalidOcrJson,
    "Could not parse extracted {document} data (invalid JSON).",
    { document: &str }
);
define_client_error!(InvalidDate, "Invalid date: '{date}'.", { date: &str });
define_client_error!(InvalidAmount, "Invalid amount: '{value}'.", { value: &str });
define_client_error!(InvalidIsoCurrencyCode, "Invalid ISO currency code: {code}.", { code: &str });
define_client_error!(InvalidConfig, "Invalid engine configuration (invalid TOML).");

// Reconciliation-related.
define_client_error!(
    UnresolvableTrip,
    "Could not determine the trip for {document}. Provide a trip ID or make sure the document contains a ship name and departure date.",
    { document: &str }
);
define_client_error!(UnknownTrip, "Unknown trip: '{trip_id}'.", { trip_id: &str });
define_client_error!(
    TripHasLedgerEntries,
    "Trip '{trip_id}' cannot be deleted while {count} ledger entries reference it.",
    { trip_id: &str, count: usize }
);
define_client_error!(UnknownLedgerEntry, "Unknown ledger entry: {entry_id}.", { entry_id: u64 });
define_client_error!(
    EmptyOfferFlyer,
    "Offer flyer did not contain any sailings."
);

// Loyalty-related.
define_client_error!(
    EmptyTierProgram,
    "Loyalty program '{program}' does not define any tiers.",
    { program: &str }
);

// Store-related.
define_internal_error!(
    StoreLockPoisoned,
    "In-memory store lock was poisoned while {operation}.",
    { operation: &str }
);
