//! Typed records for the tables the core reads and writes.
//!
//! The record store itself only speaks in string row-maps; these structs are
//! the explicit mapping layer at that boundary. Conversion is lenient the way
//! a spreadsheet forces it to be: blank cells, ragged rows, and junk in
//! numeric columns are tolerated rather than fatal.

use crate::auth::models::Role;
use crate::store::Row;

/// Identity record, one per registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Positional index of the row this user was loaded from.
    pub row_id: usize,
    pub username: String,
    /// Display name shown in the sidebar; mutable by the owner.
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub verified: bool,
    /// Single-use email verification token; cleared on redemption.
    pub verify_token: Option<String>,
    /// Sheet-formatted creation timestamp ("%Y-%m-%d %H:%M"). The core never
    /// computes with it, so it stays a display string.
    pub created_at: String,
}

impl User {
    pub const COL_USERNAME: &'static str = "Username";
    pub const COL_NAME: &'static str = "Name";
    pub const COL_EMAIL: &'static str = "Email";
    pub const COL_PASSWORD_HASH: &'static str = "Password Hash";
    pub const COL_ROLE: &'static str = "Role";
    pub const COL_VERIFIED: &'static str = "Verified";
    pub const COL_VERIFY_TOKEN: &'static str = "Verify Token";
    pub const COL_CREATED_AT: &'static str = "Created At";

    /// Maps a stored row back to a `User`. Returns `None` for rows without a
    /// username (blank padding rows are common at the bottom of a sheet).
    pub fn from_row(row_id: usize, row: &Row) -> Option<Self> {
        let username = row.get_or_default(Self::COL_USERNAME).trim().to_string();
        if username.is_empty() {
            return None;
        }

        let token = row.get_or_default(Self::COL_VERIFY_TOKEN).trim().to_string();

        Some(User {
            row_id,
            username,
            name: row.get_or_default(Self::COL_NAME).to_string(),
            email: row.get_or_default(Self::COL_EMAIL).trim().to_string(),
            password_hash: row.get_or_default(Self::COL_PASSWORD_HASH).to_string(),
            // Unknown or blank roles fall back to the non-privileged default.
            role: Role::parse(row.get_or_default(Self::COL_ROLE)).unwrap_or(Role::Personal),
            verified: row.get_or_default(Self::COL_VERIFIED).trim() == "Yes",
            verify_token: if token.is_empty() { None } else { Some(token) },
            created_at: row.get_or_default(Self::COL_CREATED_AT).to_string(),
        })
    }

    pub fn to_row(&self) -> Row {
        Row::new()
            .set(Self::COL_USERNAME, self.username.clone())
            .set(Self::COL_NAME, self.name.clone())
            .set(Self::COL_EMAIL, self.email.clone())
            .set(Self::COL_PASSWORD_HASH, self.password_hash.clone())
            .set(Self::COL_ROLE, self.role.as_str())
            .set(Self::COL_VERIFIED, if self.verified { "Yes" } else { "No" })
            .set(
                Self::COL_VERIFY_TOKEN,
                self.verify_token.clone().unwrap_or_default(),
            )
            .set(Self::COL_CREATED_AT, self.created_at.clone())
    }
}

/// Login/logout actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    Logout,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "Login",
            AuditAction::Logout => "Logout",
        }
    }
}

/// Append-only login activity record. Never mutated or deleted by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub timestamp: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub action: AuditAction,
}

impl AuditEvent {
    pub const COL_TIMESTAMP: &'static str = "Timestamp";
    pub const COL_USERNAME: &'static str = "Username";
    pub const COL_NAME: &'static str = "Name";
    pub const COL_ROLE: &'static str = "Role";
    pub const COL_ACTION: &'static str = "Action";

    pub fn to_row(&self) -> Row {
        Row::new()
            .set(Self::COL_TIMESTAMP, self.timestamp.clone())
            .set(Self::COL_USERNAME, self.username.clone())
            .set(Self::COL_NAME, self.name.clone())
            .set(Self::COL_ROLE, self.role.as_str())
            .set(Self::COL_ACTION, self.action.as_str())
    }

    pub fn from_row(row: &Row) -> Option<Self> {
        let username = row.get_or_default(Self::COL_USERNAME).trim().to_string();
        if username.is_empty() {
            return None;
        }
        let action = match row.get_or_default(Self::COL_ACTION).trim() {
            "Login" => AuditAction::Login,
            "Logout" => AuditAction::Logout,
            _ => return None,
        };
        Some(AuditEvent {
            timestamp: row.get_or_default(Self::COL_TIMESTAMP).to_string(),
            username,
            name: row.get_or_default(Self::COL_NAME).to_string(),
            role: Role::parse(row.get_or_default(Self::COL_ROLE)).unwrap_or(Role::Personal),
            action,
        })
    }
}

/// Ledger transaction row the matcher searches over. Owned by the external
/// store; the core only reads these.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub row_id: usize,
    /// Transaction date as stored ("%Y-%m-%d"). Parsed lazily by the matcher;
    /// rows with unparseable dates are silently skipped there.
    pub date: String,
    pub description: String,
    pub amount: f64,
    /// Set once a receipt has been attached to this row.
    pub matched: bool,
}

impl LedgerRecord {
    pub const COL_DATE: &'static str = "Date";
    pub const COL_DESCRIPTION: &'static str = "Description";
    pub const COL_AMOUNT: &'static str = "Amount";
    pub const COL_MATCHED: &'static str = "Matched";

    pub fn from_row(row_id: usize, row: &Row) -> Option<Self> {
        if row.is_empty() {
            return None;
        }
        Some(LedgerRecord {
            row_id,
            date: row.get_or_default(Self::COL_DATE).trim().to_string(),
            description: row.get_or_default(Self::COL_DESCRIPTION).to_string(),
            amount: parse_amount(row.get_or_default(Self::COL_AMOUNT)),
            matched: row
                .get_or_default(Self::COL_MATCHED)
                .trim()
                .eq_ignore_ascii_case("Y"),
        })
    }
}

/// Parses a sheet currency cell ("$1,234.50") into a float. Junk parses to 0.
pub fn parse_amount(raw: &str) -> f64 {
    raw.replace(['$', ','], "")
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_roundtrips_through_row() {
        let user = User {
            row_id: 0,
            username: "alice".to_string(),
            name: "Alice L".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$12$abc".to_string(),
            role: Role::Admin,
            verified: true,
            verify_token: None,
            created_at: "2026-02-01 09:30".to_string(),
        };
        let restored = User::from_row(0, &user.to_row()).unwrap();
        assert_eq!(restored, user);
    }

    #[test]
    fn blank_row_maps_to_no_user() {
        assert!(User::from_row(3, &Row::new()).is_none());
        assert!(User::from_row(3, &Row::new().set(User::COL_USERNAME, "  ")).is_none());
    }

    #[test]
    fn unknown_role_defaults_to_personal() {
        let row = Row::new()
            .set(User::COL_USERNAME, "bob")
            .set(User::COL_ROLE, "superuser");
        assert_eq!(User::from_row(0, &row).unwrap().role, Role::Personal);
    }

    #[test]
    fn unverified_unless_cell_is_yes() {
        let row = Row::new()
            .set(User::COL_USERNAME, "bob")
            .set(User::COL_VERIFIED, "no");
        assert!(!User::from_row(0, &row).unwrap().verified);
    }

    #[test]
    fn parse_amount_strips_currency_formatting() {
        assert_eq!(parse_amount("$1,234.50"), 1234.50);
        assert_eq!(parse_amount(" 42 "), 42.0);
        assert_eq!(parse_amount("n/a"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
    }

    #[test]
    fn ledger_matched_flag_is_case_insensitive() {
        let row = Row::new()
            .set(LedgerRecord::COL_DATE, "2026-02-10")
            .set(LedgerRecord::COL_MATCHED, "y");
        assert!(LedgerRecord::from_row(0, &row).unwrap().matched);
    }
}
