//! Authentication module for managing user accounts, sessions, and access
//! control.
//!
//! This module provides the public interface for registration, email
//! verification, sign-in, session-token persistence, and role-based
//! authorization, including the secondary health-area unlock.

pub mod models;
pub mod service;
pub mod token;

pub use models::{Access, AccessLevel, Role, Session};
pub use service::AuthService;
