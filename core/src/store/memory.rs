//! In-memory [`RecordStore`] implementation.
//!
//! Backs the test suite and single-process deployments that have not wired up
//! the spreadsheet. Mirrors the sheet API's semantics: tables are created on
//! first append and rows are addressed positionally.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::store::{RecordStore, Row};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_all(&self, table: &str) -> Result<Vec<Row>> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    async fn append(&self, table: &str, row: Row) -> Result<()> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn update_field(
        &self,
        table: &str,
        row_id: usize,
        field: &str,
        value: &str,
    ) -> Result<()> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let rows = match tables.get_mut(table) {
            Some(rows) => rows,
            None => bail!("no such table: {table}"),
        };
        let row = match rows.get_mut(row_id) {
            Some(row) => row,
            None => bail!("row {row_id} out of range for table {table}"),
        };
        *row = std::mem::take(row).set(field, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_find_all_preserves_order() {
        let store = MemoryStore::new();
        store
            .append("t", Row::new().set("Name", "first"))
            .await
            .unwrap();
        store
            .append("t", Row::new().set("Name", "second"))
            .await
            .unwrap();

        let rows = store.find_all("t").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Name"), Some("first"));
        assert_eq!(rows[1].get("Name"), Some("second"));
    }

    #[tokio::test]
    async fn missing_table_is_empty_not_error() {
        let store = MemoryStore::new();
        assert!(store.find_all("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_field_overwrites_one_cell() {
        let store = MemoryStore::new();
        store
            .append("t", Row::new().set("Verified", "No").set("Name", "A"))
            .await
            .unwrap();
        store.update_field("t", 0, "Verified", "Yes").await.unwrap();

        let rows = store.find_all("t").await.unwrap();
        assert_eq!(rows[0].get("Verified"), Some("Yes"));
        assert_eq!(rows[0].get("Name"), Some("A"));
    }

    #[tokio::test]
    async fn update_field_out_of_range_errors() {
        let store = MemoryStore::new();
        store.append("t", Row::new().set("Name", "A")).await.unwrap();
        assert!(store.update_field("t", 5, "Name", "B").await.is_err());
        assert!(store.update_field("other", 0, "Name", "B").await.is_err());
    }
}
