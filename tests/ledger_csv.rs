use chrono::NaiveDate;
use fractic_cruise_ledger::{
    config::EngineConfig,
    entities::{Category, PaymentMethod, TxnType},
    ext::standard_ports::StandardPortDirectory,
    util::CruiseLedgerUtil,
};

fn ledger() -> CruiseLedgerUtil<StandardPortDirectory> {
    CruiseLedgerUtil::new(EngineConfig::default(), StandardPortDirectory::default()).unwrap()
}

const IMPORT: &str = "\
ship,departure_date,post_date,description,category,amount,payment_method,verified
Navigator of the Seas,2025-03-09,2025-03-10,Casino marker REF#A-1234,,\"$1,234.56\",SeaPass,yes
Navigator of the Seas,2025-03-09,2025-03-11,Drink package refund,Beverage,(12.00),Visa,
Navigator of the Seas,2025-03-09,,,Dining,40.00,,
,,2025-03-12,Spa treatment,Spa,90.00,,
";

#[tokio::test]
async fn import_resolves_trips_and_reports_bad_rows() {
    let ledger = ledger();
    let report = ledger.import_ledger_csv(IMPORT).await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.trips_created.len(), 1);
    let failed_rows: Vec<usize> = report.row_errors.iter().map(|(row, _)| *row).collect();
    assert_eq!(failed_rows, vec![3, 4]);

    let trip = ledger.trip(&report.trips_created[0]).unwrap().unwrap();
    assert!(trip.synthesized);
    assert_eq!(trip.nights, 7);
    assert_eq!(trip.departure_port, "Los Angeles (San Pedro), CA");

    let entries = ledger.entries(Some(&trip.id)).unwrap();
    let marker = entries
        .iter()
        .find(|e| e.description.starts_with("Casino marker"))
        .unwrap();
    assert_eq!(marker.amount, 1234.56);
    assert_eq!(marker.txn_type, TxnType::Charge);
    assert_eq!(marker.category, Category::Casino);
    assert_eq!(marker.payment_method, Some(PaymentMethod::SeaPass));
    assert_eq!(marker.ref_number.as_deref(), Some("A-1234"));
    assert!(marker.verified);

    let refund = entries
        .iter()
        .find(|e| e.description == "Drink package refund")
        .unwrap();
    assert_eq!(refund.amount, 12.0);
    assert_eq!(refund.txn_type, TxnType::Credit);
    assert_eq!(refund.category, Category::Beverage);
    assert!(!refund.verified);
}

#[tokio::test]
async fn reimport_of_export_skips_duplicates() {
    let ledger = ledger();
    ledger.import_ledger_csv(IMPORT).await.unwrap();
    let exported = ledger.export_ledger_csv(None).await.unwrap();

    let mut lines = exported.lines();
    assert_eq!(
        lines.next(),
        Some(
            "trip_id,ship,departure_date,source_kind,document_id,post_date,description,\
             category,txn_type,amount,onboard_credit,payment_method,currency,verified,ref,folio"
        )
    );
    assert_eq!(lines.count(), 2);
    assert!(exported.contains("1234.56"));

    let again = ledger.import_ledger_csv(&exported).await.unwrap();
    assert_eq!(again.inserted, 0);
    assert_eq!(again.duplicates, 2);
    assert!(again.row_errors.is_empty());
    assert_eq!(ledger.entries(None).unwrap().len(), 2);
}

#[tokio::test]
async fn export_moves_ledger_between_instances() {
    let source = ledger();
    source.import_ledger_csv(IMPORT).await.unwrap();
    let exported = source.export_ledger_csv(None).await.unwrap();

    let target = ledger();
    let report = target.import_ledger_csv(&exported).await.unwrap();
    assert_eq!(report.inserted, 2);
    assert_eq!(report.trips_created.len(), 1);

    let moved = target.entries(None).unwrap();
    let original = source.entries(None).unwrap();
    let key = |e: &fractic_cruise_ledger::entities::LedgerEntry| {
        (e.description.clone(), e.txn_type, e.category, e.verified)
    };
    let mut moved_keys: Vec<_> = moved.iter().map(key).collect();
    let mut original_keys: Vec<_> = original.iter().map(key).collect();
    moved_keys.sort_by(|a, b| a.0.cmp(&b.0));
    original_keys.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(moved_keys, original_keys);
}

#[tokio::test]
async fn import_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    tokio::fs::write(&path, IMPORT).await.unwrap();

    let ledger = ledger();
    let report = ledger.import_ledger_csv_file(&path).await.unwrap();
    assert_eq!(report.inserted, 2);

    let missing = ledger
        .import_ledger_csv_file(dir.path().join("missing.csv"))
        .await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn unrecognized_header_is_rejected() {
    let ledger = ledger();
    assert!(ledger
        .import_ledger_csv("foo,bar\n1,2\n")
        .await
        .is_err());
}

#[tokio::test]
async fn trip_with_entries_cannot_be_deleted() {
    let ledger = ledger();
    let report = ledger.import_ledger_csv(IMPORT).await.unwrap();
    let trip_id = &report.trips_created[0];
    assert!(ledger.delete_trip(trip_id).is_err());
    assert!(ledger.trip(trip_id).unwrap().is_some());

    let entry = ledger.entries(None).unwrap()[1].id;
    let verified = ledger.set_entry_verified(entry, true).unwrap();
    assert!(verified.verified);

    let departure = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    assert_eq!(ledger.trip(trip_id).unwrap().unwrap().departure_date, departure);
}

#[tokio::test]
async fn rejected_rows_create_no_trips() {
    let ledger = ledger();
    let report = ledger
        .import_ledger_csv(
            "ship,departure_date,description,amount,currency\n\
             Oasis of the Seas,2025-05-01,Dinner,40.00,XYZ\n\
             Harmony of the Seas,2025-06-01,,40.00,\n",
        )
        .await
        .unwrap();

    assert_eq!(report.inserted, 0);
    assert!(report.trips_created.is_empty());
    let failed_rows: Vec<usize> = report.row_errors.iter().map(|(row, _)| *row).collect();
    assert_eq!(failed_rows, vec![1, 2]);
    assert!(ledger.trips().unwrap().is_empty());
}
