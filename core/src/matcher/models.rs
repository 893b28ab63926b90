//! Data structures for the receipt matcher.

use crate::store::models::LedgerRecord;

/// One scored suggestion linking a receipt to a ledger row.
///
/// Transient: exists only for the duration of one matching call and is never
/// persisted. Lower scores are better.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub record: LedgerRecord,
    /// `|amount_diff| × 10 + |date_diff_days|`, minus the vendor bonus when
    /// the vendor text overlaps the row's description. Rounded to cents.
    pub score: f64,
}
