//! Scoring and shortlisting of candidate transactions for a receipt.

use chrono::NaiveDate;

use crate::matcher::models::MatchCandidate;
use crate::repositories::ledger_repository::LedgerRepository;
use crate::store::RecordStore;
use crate::store::models::LedgerRecord;

/// Maximum absolute amount difference, inclusive.
pub const AMOUNT_TOLERANCE: f64 = 1.50;
/// Maximum date difference in days, either direction, inclusive.
pub const DATE_WINDOW_DAYS: i64 = 10;
/// A dollar of amount difference costs ten times a day of date difference.
pub const AMOUNT_WEIGHT: f64 = 10.0;
/// Subtracted when the vendor text overlaps the description. Larger than
/// either penalty at the window edge, so vendor agreement wins borderline
/// cases.
pub const VENDOR_BONUS: f64 = 5.0;
/// Shortlist length.
pub const MAX_CANDIDATES: usize = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns up to [`MAX_CANDIDATES`] ledger rows that could match a receipt,
/// best score first.
///
/// A non-positive amount or unparseable receipt date yields an empty list —
/// that is "nothing to search for", not an error. Rows already matched, or
/// with unparseable dates, are silently skipped. Both window bounds are
/// inclusive: exactly $1.50 or exactly 10 days off still qualifies.
///
/// Pure and side-effect free; confirming a match is the caller's write.
pub fn find_matches(
    records: &[LedgerRecord],
    target_amount: f64,
    target_date: &str,
    vendor: &str,
) -> Vec<MatchCandidate> {
    if target_amount <= 0.0 {
        return Vec::new();
    }
    let Ok(receipt_date) = NaiveDate::parse_from_str(target_date.trim(), DATE_FORMAT) else {
        return Vec::new();
    };

    let vendor_lower = vendor.to_lowercase();
    let vendor_prefix: String = vendor_lower.chars().take(6).collect();

    let mut candidates = Vec::new();
    for record in records {
        if record.matched {
            continue;
        }

        let amount_diff = (record.amount - target_amount).abs();
        if amount_diff > AMOUNT_TOLERANCE {
            continue;
        }

        let Ok(txn_date) = NaiveDate::parse_from_str(&record.date, DATE_FORMAT) else {
            continue;
        };
        let date_diff = (receipt_date - txn_date).num_days().abs();
        if date_diff > DATE_WINDOW_DAYS {
            continue;
        }

        let mut score = amount_diff * AMOUNT_WEIGHT + date_diff as f64;

        if !vendor_lower.is_empty() {
            let description = record.description.to_lowercase();
            let word_hit = vendor_lower
                .split_whitespace()
                .any(|word| word.len() > 3 && description.contains(word));
            if word_hit || description.contains(vendor_prefix.as_str()) {
                score -= VENDOR_BONUS;
            }
        }

        candidates.push(MatchCandidate {
            record: record.clone(),
            score: (score * 100.0).round() / 100.0,
        });
    }

    // sort_by is stable, so equal scores keep input order.
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

/// Store-backed matcher front end for the receipts page.
pub struct MatcherService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> MatcherService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Loads the ledger and shortlists candidates for one receipt.
    ///
    /// A store failure degrades to an empty shortlist — matching is
    /// advisory, not authoritative.
    pub async fn find_matches_for_receipt(
        &self,
        target_amount: f64,
        target_date: &str,
        vendor: &str,
    ) -> Vec<MatchCandidate> {
        let records = match LedgerRepository::new(self.store).load_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "ledger unavailable, returning no candidates");
                return Vec::new();
            }
        };
        find_matches(&records, target_amount, target_date, vendor)
    }
}
