//! Module for external collaborator services.
//!
//! Services here wrap fallible external systems the core talks to but does
//! not own, currently just the SMTP notifier.

pub mod email_service;
