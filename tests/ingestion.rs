use chrono::NaiveDate;
use fractic_cruise_ledger::{
    config::EngineConfig,
    entities::{Category, PaymentMethod, RawDocument, Timeframe, TripId, TxnType},
    ext::standard_ports::StandardPortDirectory,
    util::CruiseLedgerUtil,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ledger() -> CruiseLedgerUtil<StandardPortDirectory> {
    CruiseLedgerUtil::new(EngineConfig::default(), StandardPortDirectory::default()).unwrap()
}

const RECEIPT: &str = r#"Here is the extracted receipt:
```json
{
  "shipName": "Navigator of the Seas",
  "sailDate": "2025-03-09",
  "itinerary": "4 Night Ensenada Cruise",
  "cabinType": "Interior",
  "totalPaid": "$1,234.50",
  "casinoDiscount": 200,
  "specialOffers": ["$100 off your cruise fare"],
  "paymentMethod": "Visa credit card"
}
```"#;

const STATEMENT: &str = r#"{
  "shipName": "Navigator",
  "departureDate": "03/09/2025",
  "statementDate": "2025-03-13",
  "folio": "F-2231",
  "lineItems": [
    {"date": "03/10", "description": "Casino Slots", "amount": "$250.00"},
    {"date": "03/11", "description": "Onboard Credit", "amount": -100},
    {"description": "Dinner at Chops", "category": "Dining", "amount": 85.5}
  ]
}"#;

#[tokio::test]
async fn receipt_synthesizes_trip_and_books_totals() {
    let ledger = ledger();
    let outcome = ledger.ingest_receipt(RECEIPT, None).await.unwrap();

    assert!(outcome.trip.created);
    assert_eq!(outcome.entries_appended, 2);
    assert_eq!(outcome.duplicates_skipped, 0);

    let trip = ledger.trip(&outcome.trip.trip_id).unwrap().unwrap();
    assert!(trip.synthesized);
    assert_eq!(trip.nights, 4);
    assert_eq!(trip.return_date, ymd(2025, 3, 13));
    assert_eq!(trip.departure_port, "Los Angeles (San Pedro), CA");
    assert_eq!(trip.itinerary, "4 Night Ensenada Cruise");

    let entries = ledger.entries(Some(&trip.id)).unwrap();
    let booking = entries
        .iter()
        .find(|e| e.description == "Cruise Booking")
        .unwrap();
    assert_eq!(booking.amount, 1234.5);
    assert_eq!(booking.txn_type, TxnType::Charge);
    assert_eq!(booking.payment_method, Some(PaymentMethod::CreditCard));
    let discount = entries
        .iter()
        .find(|e| e.description == "Casino Comp Discount")
        .unwrap();
    assert_eq!(discount.txn_type, TxnType::Credit);
    assert_eq!(discount.category, Category::Casino);

    let receipts = ledger.receipts().unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].discount, 100.0);
}

#[tokio::test]
async fn statement_reuses_matching_trip_and_signs_lines() {
    let ledger = ledger();
    let receipt = ledger.ingest_receipt(RECEIPT, None).await.unwrap();
    let statement = ledger
        .ingest_statement(STATEMENT, None, Some("folio.pdf"))
        .await
        .unwrap();

    assert!(!statement.trip.created);
    assert_eq!(statement.trip.trip_id, receipt.trip.trip_id);
    assert_eq!(statement.entries_appended, 3);
    assert_eq!(ledger.trips().unwrap().len(), 1);

    let entries = ledger.entries(Some(&statement.trip.trip_id)).unwrap();
    let slots = entries.iter().find(|e| e.description == "Casino Slots").unwrap();
    assert_eq!(slots.category, Category::Casino);
    assert_eq!(slots.post_date, Some(ymd(2025, 3, 10)));
    assert_eq!(slots.folio_number.as_deref(), Some("F-2231"));

    let credit = entries.iter().find(|e| e.description == "Onboard Credit").unwrap();
    assert_eq!(credit.txn_type, TxnType::Credit);
    assert_eq!(credit.amount, 100.0);
    assert_eq!(credit.onboard_credit_applied, 100.0);
    assert_eq!(credit.payment_method, Some(PaymentMethod::OnboardCredit));

    let dinner = entries.iter().find(|e| e.description == "Dinner at Chops").unwrap();
    assert_eq!(dinner.category, Category::Dining);
    assert_eq!(dinner.post_date, Some(ymd(2025, 3, 13)));

    let statements = ledger.statements().unwrap();
    assert_eq!(statements[0].file_name.as_deref(), Some("folio.pdf"));
}

#[tokio::test]
async fn statement_without_lines_books_casino_total() {
    let ledger = ledger();
    let outcome = ledger
        .ingest_statement(
            r#"{"ship": "Wonder of the Seas", "departureDate": "2025-04-06",
                "clubRoyaleEntertainmentCharges": "-$1,500.00", "onboardCredit": 50}"#,
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(outcome.entries_appended, 2);

    let entries = ledger.entries(None).unwrap();
    let games = entries
        .iter()
        .find(|e| e.description == "Club Royale Entertainment Games")
        .unwrap();
    assert_eq!(games.amount, 1500.0);
    assert_eq!(games.category, Category::Casino);
    assert!(entries
        .iter()
        .any(|e| e.onboard_credit_applied == 50.0 && e.txn_type == TxnType::Credit));
}

#[tokio::test]
async fn unresolvable_documents_fail_without_side_effects() {
    let ledger = ledger();

    let no_ship = ledger
        .ingest_receipt(r#"{"sailDate": "2025-03-09", "totalPaid": 100}"#, None)
        .await;
    assert!(no_ship.is_err());

    let unknown = ledger
        .ingest_receipt(RECEIPT, Some(&TripId::new("trip-404")))
        .await;
    assert!(unknown.is_err());

    let malformed = ledger.ingest_statement("no json here", None, None).await;
    assert!(malformed.is_err());

    assert!(ledger.trips().unwrap().is_empty());
    assert!(ledger.entries(None).unwrap().is_empty());
    assert!(ledger.receipts().unwrap().is_empty());
}

#[tokio::test]
async fn batch_reports_each_document_in_order() {
    let ledger = ledger();
    let report = ledger
        .ingest_batch(vec![
            RawDocument::Receipt {
                raw: RECEIPT.to_string(),
                trip_id: None,
            },
            RawDocument::Statement {
                raw: "{ not valid".to_string(),
                trip_id: None,
                file_name: Some("broken.pdf".to_string()),
            },
            RawDocument::Statement {
                raw: STATEMENT.to_string(),
                trip_id: None,
                file_name: None,
            },
        ])
        .await;

    assert_eq!(report.items.len(), 3);
    assert_eq!(
        report.items.iter().map(|i| i.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(report.items[1].result.is_err());
    assert_eq!(ledger.entries(None).unwrap().len(), 5);
}

#[tokio::test]
async fn offer_flyer_creates_trips_and_offers() {
    let ledger = ledger();
    let flyer = r#"```json
{"cruises": [
  {"shipName": "Wonder of the Seas", "departureDate": "2025-06-01", "returnDate": "2025-06-08",
   "offerCode": "25JUN103", "offerName": "Summer Slots", "freePlay": "$250", "expires": "2025-05-01"},
  {"shipName": "Harmony of the Seas", "departureDate": "2025-07-06", "nights": 7},
  {"shipName": "Oasis of the Seas"},
  "not a sailing"
]}
```"#;

    let first = ledger
        .ingest_offer_flyer(flyer, Some("25JUN999"), Some("Fallback Offer"))
        .await
        .unwrap();
    assert_eq!(first.created.len(), 2);
    assert_eq!(first.errors.len(), 2);
    assert_eq!(
        first.errors[0],
        "Row 3: Missing required fields (ship, departureDate, returnDate)"
    );
    assert!(first.errors[1].starts_with("Row 4"));
    assert_eq!(first.offers.len(), 1);

    let harmony = ledger.trip(&first.created[1]).unwrap().unwrap();
    assert_eq!(harmony.return_date, ymd(2025, 7, 13));
    assert_eq!(harmony.cabin_type.as_deref(), Some("Interior"));
    assert_eq!(harmony.offer_code.as_deref(), Some("25JUN999"));
    assert!(!harmony.synthesized);

    let offers = ledger.offers().unwrap();
    assert_eq!(offers[0].offer_name, "Summer Slots");
    assert_eq!(offers[0].free_play, 250.0);
    assert_eq!(offers[0].expires, Some(ymd(2025, 5, 1)));

    let second = ledger
        .ingest_offer_flyer(flyer, Some("25JUN999"), Some("Fallback Offer"))
        .await
        .unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.duplicates.len(), 2);
    assert!(second.offers.is_empty());
    assert_eq!(ledger.trips().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_offer_flyer_is_rejected() {
    let ledger = ledger();
    assert!(ledger.ingest_offer_flyer("[]", None, None).await.is_err());
}

#[tokio::test]
async fn offer_flyer_rejects_implausible_sailings_per_row() {
    let ledger = ledger();
    let flyer = r#"[
      {"ship": "Wonder of the Seas", "departureDate": "2025-03-09", "nights": "100000000"},
      {"ship": "Oasis of the Seas", "departureDate": "2025-04-06", "returnDate": "2025-04-01"},
      {"ship": "Harmony of the Seas", "departureDate": "2025-07-06", "nights": 7}
    ]"#;

    let report = ledger.ingest_offer_flyer(flyer, None, None).await.unwrap();
    assert_eq!(report.created.len(), 1);
    assert_eq!(
        report.errors,
        vec![
            "Row 1: Implausible number of nights".to_string(),
            "Row 2: returnDate is not after departureDate".to_string(),
        ]
    );
    assert_eq!(ledger.trips().unwrap().len(), 1);
}

#[tokio::test]
async fn out_of_range_amounts_count_as_zero() {
    let ledger = ledger();
    for sail_date in ["2025-03-09", "2025-04-06"] {
        let receipt = format!(
            r#"{{"shipName": "Navigator of the Seas", "sailDate": "{}",
                "totalPaid": 1e300, "casinoDiscount": "$1e300"}}"#,
            sail_date
        );
        ledger.ingest_receipt(&receipt, None).await.unwrap();
    }
    ledger
        .ingest_receipt(
            r#"{"shipName": "Navigator of the Seas", "sailDate": "2025-05-04", "totalPaid": 250}"#,
            None,
        )
        .await
        .unwrap();

    let metrics = ledger.metrics(Timeframe::All, ymd(2025, 6, 15)).unwrap();
    assert_eq!(metrics.performance.total_spent, 250.0);
    assert!(ledger
        .metrics_report(Timeframe::All, ymd(2025, 6, 15))
        .unwrap()
        .contains("250.00 $"));
}
