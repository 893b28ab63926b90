//! Record-store repository for the login activity log.

use anyhow::Result;

use crate::store::RecordStore;
use crate::store::models::AuditEvent;

/// Append-only table of login/logout events.
pub const LOGIN_LOG_TABLE: &str = "Login Log";

pub struct AuditRepository<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> AuditRepository<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Appends one event. The log is never mutated or deleted by the core;
    /// callers treat failures as non-fatal.
    pub async fn append_event(&self, event: &AuditEvent) -> Result<()> {
        self.store.append(LOGIN_LOG_TABLE, event.to_row()).await
    }

    /// Every recorded event, oldest first.
    pub async fn load_all(&self) -> Result<Vec<AuditEvent>> {
        let rows = self.store.find_all(LOGIN_LOG_TABLE).await?;
        Ok(rows.iter().filter_map(AuditEvent::from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::store::memory::MemoryStore;
    use crate::store::models::AuditAction;

    #[tokio::test]
    async fn events_append_in_order() {
        let store = MemoryStore::new();
        let repo = AuditRepository::new(&store);

        for (ts, action) in [
            ("2026-02-01 09:00", AuditAction::Login),
            ("2026-02-01 17:30", AuditAction::Logout),
        ] {
            repo.append_event(&AuditEvent {
                timestamp: ts.to_string(),
                username: "alice".to_string(),
                name: "Alice".to_string(),
                role: Role::Admin,
                action,
            })
            .await
            .unwrap();
        }

        let events = repo.load_all().await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, AuditAction::Login);
        assert_eq!(events[1].action, AuditAction::Logout);
        assert_eq!(events[1].timestamp, "2026-02-01 17:30");
    }
}
