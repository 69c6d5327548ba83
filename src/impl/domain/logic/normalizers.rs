use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::entities::{LedgerEntry, PaymentMethod};

// Trip length.
// ---

const MAX_PLAUSIBLE_NIGHTS: u32 = 21;

pub(crate) fn is_plausible_nights(nights: u32) -> bool {
    (1..=MAX_PLAUSIBLE_NIGHTS).contains(&nights)
}

/// Reads the sailing length out of an itinerary name, ex. "7 Night Western
/// Caribbean", "4-Night Ensenada", "3NT Bahamas". Only 1 to 21 nights are
/// considered plausible.
pub(crate) fn nights_from_itinerary(itinerary: &str) -> Option<u32> {
    let patterns = [
        r"(\d+)\s*[Nn]ight",
        r"(\d+)\s*-\s*[Nn]ight",
        r"(\d+)\s*[Nn][Tt]\b",
    ];
    patterns.iter().find_map(|p| {
        Regex::new(p)
            .expect("hardcoded regex should be valid")
            .captures(itinerary)
            .and_then(|c| c[1].parse::<u32>().ok())
            .filter(|n| is_plausible_nights(*n))
    })
}

/// `None` past the end of the calendar.
pub(crate) fn return_date(departure: NaiveDate, nights: u32) -> Option<NaiveDate> {
    departure.checked_add_days(Days::new(nights as u64))
}

/// Whole nights between two dates, `None` unless the return is after the
/// departure.
pub(crate) fn nights_between(departure: NaiveDate, return_date: NaiveDate) -> Option<u32> {
    let days = (return_date - departure).num_days();
    (days > 0).then_some(days as u32)
}

// Free-text fields.
// ---

pub(crate) fn normalize_payment_method(raw: &str) -> Option<PaymentMethod> {
    let s = raw.trim().to_lowercase();
    let matches = |p: &str| {
        Regex::new(p)
            .expect("hardcoded regex should be valid")
            .is_match(&s)
    };
    if s.is_empty() {
        None
    } else if matches(r"sea\s?pass|onboard\s?account") {
        Some(PaymentMethod::SeaPass)
    } else if matches(r"on.?board\s?credit|\bobc\b|non-?refundable.*credit") {
        Some(PaymentMethod::OnboardCredit)
    } else if matches(r"visa|master|amex|credit|card|discover") {
        Some(PaymentMethod::CreditCard)
    } else if matches(r"promo|certificate|voucher|next\s?cruise|casino\s?comp") {
        Some(PaymentMethod::Promo)
    } else {
        None
    }
}

/// Reference and folio numbers quoted in a line description, ex.
/// "Casino marker REF#A-1234" or "Folio 99812".
pub(crate) fn extract_ref_or_folio(description: &str) -> (Option<String>, Option<String>) {
    let capture = |p: &str| {
        Regex::new(p)
            .expect("hardcoded regex should be valid")
            .captures(description)
            .map(|c| c[1].to_string())
    };
    (
        capture(r"(?i)\bref\b\s?#?\s?([A-Z0-9\-]+)"),
        capture(r"(?i)\bfolio\b\s?#?\s?([A-Z0-9\-]+)"),
    )
}

pub(crate) fn is_onboard_credit(description: &str) -> bool {
    Regex::new(r"(?i)on.?board\s?credit|\bobc\b")
        .expect("hardcoded regex should be valid")
        .is_match(description)
}

/// Comp detection is a plain substring test, so words such as "compartment"
/// also count.
pub(crate) fn is_comp(description: &str) -> bool {
    let s = description.to_lowercase();
    s.contains("comp") || s.contains("free") || s.contains("complimentary")
}

pub(crate) fn is_free_play(description: &str) -> bool {
    let s = description.to_lowercase();
    s.contains("free play") || s.contains("freeplay")
}

/// Every dollar figure in the text, ex. "$250 free play + $1,000.50 OBC"
/// yields `[250.0, 1000.5]`.
pub(crate) fn dollar_figures(text: &str) -> Vec<f64> {
    Regex::new(r"\$\s?(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)")
        .expect("hardcoded regex should be valid")
        .captures_iter(text)
        .filter_map(|c| c[1].replace(',', "").parse::<f64>().ok())
        .collect()
}

pub(crate) fn dollar_figure(text: &str) -> Option<f64> {
    dollar_figures(text).into_iter().next()
}

// Ledger-wide checks.
// ---

pub(crate) fn detect_mixed_currency<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> bool {
    entries
        .into_iter()
        .map(|e| e.currency)
        .collect::<HashSet<_>>()
        .len()
        > 1
}
