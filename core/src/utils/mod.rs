//! Collection of general utility functions.
//!
//! This module holds small, reusable helpers that do not belong to a specific
//! domain module.

pub mod random;
