//! Data structures for authentication-related entities.
//!
//! This module defines the role and access-level enums, the request payloads
//! for registration and sign-in, the in-process session state, and the
//! outcome types the auth service returns to the hosting pages.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Coarse capability tier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// All business pages plus the health area.
    Admin,
    /// Business pages only.
    Business,
    /// Health area only. Default for every user after the first.
    Personal,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Business => "business",
            Role::Personal => "personal",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "business" => Some(Role::Business),
            "personal" => Some(Role::Personal),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access tier a page requires.
///
/// Matrix: admin passes both; business passes only `Business`; personal
/// passes only `Personal`. `Personal` additionally requires the health
/// unlock, admins included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Business,
    Personal,
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AccessLevel::Business => "business",
            AccessLevel::Personal => "personal",
        })
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Your name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Email address is required"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Sign-in request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request-scoped proof of authentication.
///
/// Mirrors the signed token's claims and carries the health-area unlock flag,
/// which is per-session state and never part of the token.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    pub name: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    /// Set once the shared health passphrase has been entered this session.
    pub health_unlocked: bool,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Slides the expiry window forward to now + TTL.
    pub fn touch(&mut self, ttl: Duration) {
        self.touch_at(Utc::now(), ttl);
    }

    pub fn touch_at(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.expires_at = now + ttl;
    }
}

/// Result of an authorization check. Denials carry a user-facing reason;
/// they are expected outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied(DenialReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// Session expiry passed; the user must sign in again.
    SessionExpired,
    /// The user's role does not cover the requested level.
    InsufficientRole(AccessLevel),
    /// The health passphrase has not been entered this session.
    HealthLocked,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::SessionExpired => f.write_str("Session expired. Please sign in again."),
            DenialReason::InsufficientRole(level) => write!(
                f,
                "This section requires a {level} account. Contact an admin to upgrade your access."
            ),
            DenialReason::HealthLocked => {
                f.write_str("Enter the health password to access this section.")
            }
        }
    }
}

/// Successful sign-in: in-process session plus the signed token the caller
/// persists client-side (cookie with expiry matching the session TTL).
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub session: Session,
    pub token: String,
}

/// What to tell a user after a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    /// Verification email dispatched; user should check their inbox.
    EmailSent { email: String },
    /// Registration stored but no email went out; an admin has to flip the
    /// Verified cell manually. Never treated as a failure.
    EmailUnavailable { role: Role, reason: String },
}

impl RegistrationOutcome {
    pub fn message(&self) -> String {
        match self {
            RegistrationOutcome::EmailSent { email } => format!(
                "Account created! A verification email has been sent to {email}. \
                 Click the link in the email to activate your account."
            ),
            RegistrationOutcome::EmailUnavailable { role, reason } => {
                let admin_note = if *role == Role::Admin {
                    " You are the first user and will be admin (access to everything)."
                } else {
                    ""
                };
                format!(
                    "Account created.{admin_note} Email could not be sent ({reason}). \
                     To activate: open the Users sheet and set your Verified column to Yes."
                )
            }
        }
    }
}

/// Result of redeeming a verification token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    /// The account was already verified; redeeming again is a no-op success.
    AlreadyVerified,
}

impl VerificationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            VerificationOutcome::Verified => "Email verified! You can now sign in.",
            VerificationOutcome::AlreadyVerified => {
                "Account already verified. You can sign in."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" business "), Some(Role::Business));
        assert_eq!(Role::parse("PERSONAL"), Some(Role::Personal));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn sliding_expiry_keeps_touched_sessions_alive() {
        let created = Utc::now();
        let ttl = Duration::hours(6);
        let mut session = Session {
            username: "alice".to_string(),
            name: "Alice".to_string(),
            role: Role::Admin,
            expires_at: created + ttl,
            health_unlocked: false,
        };

        // Touched at hour 5: still valid at hour 10.
        session.touch_at(created + Duration::hours(5), ttl);
        assert!(!session.is_expired_at(created + Duration::hours(10)));

        // Never touched again: expired at hour 12.
        assert!(session.is_expired_at(created + Duration::hours(12)));
    }

    #[test]
    fn untouched_session_expires_after_ttl() {
        let created = Utc::now();
        let session = Session {
            username: "alice".to_string(),
            name: "Alice".to_string(),
            role: Role::Personal,
            expires_at: created + Duration::hours(6),
            health_unlocked: false,
        };
        assert!(!session.is_expired_at(created + Duration::hours(5)));
        assert!(session.is_expired_at(created + Duration::hours(7)));
    }
}
