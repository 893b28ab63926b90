//! Repository layer over the abstract record store.
//!
//! Each repository owns one table: its name, its column layout, and the
//! mapping between raw rows and the typed records in `store::models`.

pub mod audit_repository;
pub mod ledger_repository;
pub mod user_repository;
