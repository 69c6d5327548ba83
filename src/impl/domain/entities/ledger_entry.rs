use chrono::NaiveDate;
use iso_currency::Currency;

use super::trip::TripId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerEntryId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub(crate) String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Casino,
    Dining,
    Beverage,
    Spa,
    Retail,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxnType {
    Charge,
    Credit,
    Adjustment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    SeaPass,
    OnboardCredit,
    CreditCard,
    Promo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Receipt,
    Statement,
    Import,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub kind: SourceKind,
    pub document_id: DocumentId,
    pub file_name: Option<String>,
}

/// One normalized financial line, always tied to exactly one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub trip_id: TripId,
    pub source: SourceDocument,
    pub post_date: Option<NaiveDate>,
    pub description: String,
    /// Magnitude of the line; direction is carried by `txn_type`.
    pub amount: f64,
    pub txn_type: TxnType,
    pub category: Category,
    pub payment_method: Option<PaymentMethod>,
    pub onboard_credit_applied: f64,
    pub currency: Currency,
    pub verified: bool,
    pub ref_number: Option<String>,
    pub folio_number: Option<String>,
}

/// A ledger line before it is assigned an ID by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntryDraft {
    pub trip_id: TripId,
    pub source: SourceDocument,
    pub post_date: Option<NaiveDate>,
    pub description: String,
    pub amount: f64,
    pub txn_type: TxnType,
    pub category: Category,
    pub payment_method: Option<PaymentMethod>,
    pub onboard_credit_applied: f64,
    pub currency: Currency,
    pub verified: bool,
    pub ref_number: Option<String>,
    pub folio_number: Option<String>,
}

// --

impl LedgerEntryId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LedgerEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Casino,
        Category::Dining,
        Category::Beverage,
        Category::Spa,
        Category::Retail,
        Category::Other,
    ];

    /// Exact (case-insensitive) match on the category name. Loose text should
    /// go through the keyword classifier instead.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Casino => write!(f, "Casino"),
            Category::Dining => write!(f, "Dining"),
            Category::Beverage => write!(f, "Beverage"),
            Category::Spa => write!(f, "Spa"),
            Category::Retail => write!(f, "Retail"),
            Category::Other => write!(f, "Other"),
        }
    }
}

impl TxnType {
    pub fn from_signed_amount(amount: f64) -> Self {
        if amount < 0.0 {
            TxnType::Credit
        } else {
            TxnType::Charge
        }
    }

    pub fn from_name(name: &str) -> Option<TxnType> {
        match name.trim().to_lowercase().as_str() {
            "charge" => Some(TxnType::Charge),
            "credit" => Some(TxnType::Credit),
            "adjustment" => Some(TxnType::Adjustment),
            _ => None,
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnType::Charge => write!(f, "Charge"),
            TxnType::Credit => write!(f, "Credit"),
            TxnType::Adjustment => write!(f, "Adjustment"),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::SeaPass => write!(f, "SeaPass"),
            PaymentMethod::OnboardCredit => write!(f, "OBC"),
            PaymentMethod::CreditCard => write!(f, "Credit Card"),
            PaymentMethod::Promo => write!(f, "Promo"),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Receipt => write!(f, "receipt"),
            SourceKind::Statement => write!(f, "statement"),
            SourceKind::Import => write!(f, "import"),
        }
    }
}

impl SourceKind {
    pub fn from_name(name: &str) -> Option<SourceKind> {
        match name.trim().to_lowercase().as_str() {
            "receipt" => Some(SourceKind::Receipt),
            "statement" => Some(SourceKind::Statement),
            "import" => Some(SourceKind::Import),
            _ => None,
        }
    }
}

impl LedgerEntry {
    pub(crate) fn from_draft(id: LedgerEntryId, draft: LedgerEntryDraft) -> Self {
        Self {
            id,
            trip_id: draft.trip_id,
            source: draft.source,
            post_date: draft.post_date,
            description: draft.description,
            amount: draft.amount,
            txn_type: draft.txn_type,
            category: draft.category,
            payment_method: draft.payment_method,
            onboard_credit_applied: draft.onboard_credit_applied,
            currency: draft.currency,
            verified: draft.verified,
            ref_number: draft.ref_number,
            folio_number: draft.folio_number,
        }
    }
}

impl LedgerEntryDraft {
    pub(crate) fn dedup_key(&self) -> String {
        dedup_key(
            &self.trip_id,
            &self.source.document_id,
            self.post_date,
            &self.description,
            self.amount,
        )
    }
}

/// Only true duplicates collapse; legitimate same-day same-amount lines on a
/// statement differ in description or document.
fn dedup_key(
    trip_id: &TripId,
    document_id: &DocumentId,
    post_date: Option<NaiveDate>,
    description: &str,
    amount: f64,
) -> String {
    format!(
        "{}|{}|{}|{}|{:.2}",
        trip_id,
        document_id,
        post_date.map(|d| d.to_string()).unwrap_or_default(),
        description.trim().to_lowercase(),
        amount
    )
}
