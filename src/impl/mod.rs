// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod ledger_csv_datasource;
        pub(crate) mod ocr_json_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod amount_model;
        pub(crate) mod date_model;
        pub(crate) mod ledger_row_model;
        pub(crate) mod lenient_fields;
        pub(crate) mod offer_flyer_model;
        pub(crate) mod receipt_model;
        pub(crate) mod statement_model;
        pub(crate) mod trip_hint_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod store_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod derived_metrics;
        pub(crate) mod documents;
        pub(crate) mod handlers;
        pub(crate) mod ingestion;
        pub(crate) mod ledger_entry;
        pub(crate) mod loyalty;
        pub(crate) mod trip;
    }
    pub(crate) mod logic {
        pub(crate) mod classifier;
        pub(crate) mod insight_processor;
        pub(crate) mod ledger_builder;
        pub(crate) mod loyalty_processor;
        pub(crate) mod metrics_processor;
        pub(crate) mod normalizers;
        pub(crate) mod trend_processor;
        pub(crate) mod trip_resolver;
        pub(crate) mod utils;
    }
    pub(crate) mod repositories {
        pub(crate) mod store_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod analytics_usecase;
        pub(crate) mod ingest_usecase;
        pub(crate) mod ledger_io_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod report_printer;
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::derived_metrics::*;
        pub use crate::domain::entities::documents::*;
        pub use crate::domain::entities::handlers::*;
        pub use crate::domain::entities::ingestion::*;
        pub use crate::domain::entities::ledger_entry::*;
        pub use crate::domain::entities::loyalty::*;
        pub use crate::domain::entities::trip::*;
    }
}
