//! Core subsystems of the LedgerDesk operations dashboard.
//!
//! The dashboard pages (expenses, payouts, inventory, health records) are thin
//! form-and-chart layers over a shared spreadsheet. This crate holds the two
//! pieces with real logic behind those pages:
//!
//! - [`auth`] — user registration, email verification, credential checks,
//!   signed session tokens, role-based authorization, and a best-effort
//!   login/logout audit trail.
//! - [`matcher`] — the fuzzy receipt-to-transaction matcher that shortlists
//!   ledger rows by amount/date proximity and vendor-text overlap.
//!
//! Both subsystems talk to storage only through the [`store::RecordStore`]
//! trait; the hosting app decides whether that is the live spreadsheet or the
//! bundled in-memory store.

pub mod auth;
pub mod config;
pub mod errors;
pub mod matcher;
pub mod repositories;
pub mod services;
pub mod store;
pub mod utils;
