//! Abstract record store shared by the identity and matcher subsystems.
//!
//! All dashboard state lives in a spreadsheet owned by the hosting app. The
//! core never touches it directly; it sees named tables of ordered key→value
//! rows through the [`RecordStore`] trait. Row identity for updates is the
//! store-assigned positional index, stable only as long as no rows are
//! deleted concurrently.

use anyhow::Result;
use async_trait::async_trait;

pub mod memory;
pub mod models;

/// One row of a table: field name → cell value, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cell setter. Replaces the value if the field is already
    /// present.
    pub fn set(mut self, field: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field.to_string(), value)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Cell value, or the empty string for an absent field. Spreadsheet rows
    /// are routinely ragged, so absent and blank are treated the same.
    pub fn get_or_default(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Persistence contract consumed by the repositories.
///
/// The underlying API is append/update only. No uniqueness or transactional
/// guarantees are provided at this layer; callers that need them must accept
/// check-then-write races.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every row of `table` in sheet order. A missing or empty table yields
    /// an empty list, not an error.
    async fn find_all(&self, table: &str) -> Result<Vec<Row>>;

    /// Appends a row to `table`, creating the table if needed.
    async fn append(&self, table: &str, row: Row) -> Result<()>;

    /// Overwrites one cell of the row at positional index `row_id`.
    async fn update_field(&self, table: &str, row_id: usize, field: &str, value: &str)
    -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_existing_field() {
        let row = Row::new().set("Name", "Alice").set("Name", "Bob");
        assert_eq!(row.get("Name"), Some("Bob"));
    }

    #[test]
    fn get_or_default_on_absent_field() {
        let row = Row::new().set("Name", "Alice");
        assert_eq!(row.get_or_default("Email"), "");
        assert_eq!(row.get("Email"), None);
    }
}
