//! Record-store repository for ledger transactions.
//!
//! The ledger is owned by the bookkeeping pages; the core only reads it to
//! feed the receipt matcher. Confirming a match (flipping the Matched flag,
//! annotating the receipt) is the caller's write, not the matcher's.

use anyhow::Result;

use crate::store::RecordStore;
use crate::store::models::LedgerRecord;

pub const LEDGER_TABLE: &str = "Business Transactions";

pub struct LedgerRepository<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> LedgerRepository<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Every ledger row in sheet order, matched ones included; the matcher
    /// applies its own filtering.
    pub async fn load_all(&self) -> Result<Vec<LedgerRecord>> {
        let rows = self.store.find_all(LEDGER_TABLE).await?;
        Ok(rows
            .iter()
            .enumerate()
            .filter_map(|(row_id, row)| LedgerRecord::from_row(row_id, row))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Row;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn loads_rows_with_sheet_formatting() {
        let store = MemoryStore::new();
        store
            .append(
                LEDGER_TABLE,
                Row::new()
                    .set(LedgerRecord::COL_DATE, "2026-02-10")
                    .set(LedgerRecord::COL_DESCRIPTION, "Staples Canada")
                    .set(LedgerRecord::COL_AMOUNT, "$42.00")
                    .set(LedgerRecord::COL_MATCHED, "N"),
            )
            .await
            .unwrap();

        let records = LedgerRepository::new(&store).load_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 42.00);
        assert_eq!(records[0].description, "Staples Canada");
        assert!(!records[0].matched);
    }

    #[tokio::test]
    async fn empty_table_loads_as_empty_list() {
        let store = MemoryStore::new();
        assert!(
            LedgerRepository::new(&store)
                .load_all()
                .await
                .unwrap()
                .is_empty()
        );
    }
}
