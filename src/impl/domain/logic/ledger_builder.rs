use chrono::NaiveDate;
use iso_currency::Currency;

use crate::{
    domain::logic::{
        classifier::classify,
        normalizers::{
            dollar_figures, extract_ref_or_folio, is_onboard_credit, normalize_payment_method,
        },
    },
    entities::{
        Category, DocumentLineItem, ExtractedReceipt, ExtractedStatement, LedgerEntryDraft,
        PaymentMethod, SourceDocument, TripId, TxnType,
    },
};

pub(crate) const CRUISE_BOOKING: &str = "Cruise Booking";
pub(crate) const CASINO_DISCOUNT: &str = "Casino Comp Discount";
pub(crate) const CASINO_FREE_PLAY: &str = "Casino Free Play";
pub(crate) const CLUB_ROYALE_GAMES: &str = "Club Royale Entertainment Games";
pub(crate) const ONBOARD_CREDIT_APPLIED: &str = "Onboard Credit Applied";

/// Turns an extracted document into ledger drafts for one resolved trip.
pub(crate) struct LedgerBuilder {
    trip_id: TripId,
    source: SourceDocument,
    currency: Currency,
}

impl LedgerBuilder {
    pub(crate) fn new(trip_id: TripId, source: SourceDocument, currency: Currency) -> Self {
        Self {
            trip_id,
            source,
            currency,
        }
    }

    /// One entry per line item. Without line items, the amount paid becomes a
    /// single booking entry, with casino discount and free play as credits.
    pub(crate) fn receipt(&self, receipt: &ExtractedReceipt) -> Vec<LedgerEntryDraft> {
        let payment_method = receipt
            .payment_method
            .as_deref()
            .and_then(normalize_payment_method);
        if !receipt.line_items.is_empty() {
            return receipt
                .line_items
                .iter()
                .map(|item| self.line(item, receipt.booking_date, payment_method, None))
                .collect();
        }

        let date = receipt.booking_date.or(receipt.trip.departure_date);
        [
            (CRUISE_BOOKING, receipt.total_paid, TxnType::Charge, Category::Other),
            (CASINO_DISCOUNT, receipt.casino_discount, TxnType::Credit, Category::Casino),
            (CASINO_FREE_PLAY, receipt.free_play, TxnType::Credit, Category::Casino),
        ]
        .into_iter()
        .filter(|(_, amount, _, _)| *amount != 0.0)
        .map(|(description, amount, txn_type, category)| {
            self.draft(date, description, amount.abs(), txn_type, category, payment_method)
        })
        .collect()
    }

    /// One entry per line item, or a single casino entry for the printed
    /// casino total when there are none. Statement-level onboard credit not
    /// already itemized becomes its own credit entry.
    pub(crate) fn statement(&self, statement: &ExtractedStatement) -> Vec<LedgerEntryDraft> {
        let mut drafts: Vec<LedgerEntryDraft> = statement
            .line_items
            .iter()
            .map(|item| {
                self.line(
                    item,
                    statement.statement_date,
                    Some(PaymentMethod::SeaPass),
                    statement.folio.as_deref(),
                )
            })
            .collect();

        if drafts.is_empty() && statement.casino_total > 0.0 {
            let mut draft = self.draft(
                statement.statement_date,
                CLUB_ROYALE_GAMES,
                statement.casino_total,
                TxnType::Charge,
                Category::Casino,
                Some(PaymentMethod::SeaPass),
            );
            draft.folio_number = statement.folio.clone();
            drafts.push(draft);
        }

        let itemized_credit = drafts.iter().any(|d| d.onboard_credit_applied > 0.0);
        if statement.onboard_credit_applied > 0.0 && !itemized_credit {
            let mut draft = self.draft(
                statement.statement_date,
                ONBOARD_CREDIT_APPLIED,
                statement.onboard_credit_applied,
                TxnType::Credit,
                Category::Other,
                Some(PaymentMethod::OnboardCredit),
            );
            draft.onboard_credit_applied = statement.onboard_credit_applied;
            draft.folio_number = statement.folio.clone();
            drafts.push(draft);
        }
        drafts
    }

    fn line(
        &self,
        item: &DocumentLineItem,
        fallback_date: Option<NaiveDate>,
        payment_method: Option<PaymentMethod>,
        folio: Option<&str>,
    ) -> LedgerEntryDraft {
        let description = match item.description.trim() {
            "" => item.category.clone().unwrap_or_else(|| "Unlabeled line".to_string()),
            d => d.to_string(),
        };
        let amount = item.amount.abs();
        let is_credit_line = is_onboard_credit(&description);
        let (ref_number, folio_number) = extract_ref_or_folio(&description);

        let mut draft = self.draft(
            item.date.or(fallback_date),
            &description,
            amount,
            TxnType::from_signed_amount(item.amount),
            classify(&description, item.category.as_deref()),
            if is_credit_line {
                Some(PaymentMethod::OnboardCredit)
            } else {
                payment_method
            },
        );
        if is_credit_line {
            draft.onboard_credit_applied = amount;
        }
        draft.ref_number = ref_number;
        draft.folio_number = folio_number.or_else(|| folio.map(str::to_string));
        draft
    }

    fn draft(
        &self,
        post_date: Option<NaiveDate>,
        description: &str,
        amount: f64,
        txn_type: TxnType,
        category: Category,
        payment_method: Option<PaymentMethod>,
    ) -> LedgerEntryDraft {
        LedgerEntryDraft {
            trip_id: self.trip_id.clone(),
            source: self.source.clone(),
            post_date,
            description: description.to_string(),
            amount,
            txn_type,
            category,
            payment_method,
            onboard_credit_applied: 0.0,
            currency: self.currency,
            verified: false,
            ref_number: None,
            folio_number: None,
        }
    }
}

/// Sum of dollar figures quoted across a receipt's special offers.
pub(crate) fn offer_discount(special_offers: &[String]) -> f64 {
    special_offers
        .iter()
        .flat_map(|o| dollar_figures(o))
        .sum()
}
