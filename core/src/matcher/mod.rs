//! Fuzzy receipt-to-transaction matcher.
//!
//! Given a receipt's amount, date, and vendor text, shortlists ledger rows
//! that plausibly correspond to it. Matching is advisory: it never writes,
//! and a storage failure degrades to an empty shortlist.

pub mod models;
pub mod service;

pub use models::MatchCandidate;
pub use service::{MatcherService, find_matches};
