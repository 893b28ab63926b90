//! Record-store repository for user management operations.

use anyhow::Result;

use crate::store::models::User;
use crate::store::{RecordStore, Row};

/// Table holding one row per registered user.
pub const USERS_TABLE: &str = "Users";

/// Repository for user persistence.
///
/// Lookups are linear scans over the table; the store has no indexes. The
/// dashboard serves one family's business, so the user table stays tiny.
pub struct UserRepository<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Every user in the table, in registration order. Blank rows are
    /// dropped.
    pub async fn load_all(&self) -> Result<Vec<User>> {
        let rows = self.store.find_all(USERS_TABLE).await?;
        Ok(rows
            .iter()
            .enumerate()
            .filter_map(|(row_id, row)| User::from_row(row_id, row))
            .collect())
    }

    /// Finds a user by username, case-insensitively.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let needle = username.trim().to_lowercase();
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .find(|u| u.username.to_lowercase() == needle))
    }

    /// Finds a user by exact verification token. Empty tokens never match.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<User>> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .find(|u| u.verify_token.as_deref() == Some(token)))
    }

    /// Appends a new user row. Uniqueness is the caller's concern; the store
    /// enforces nothing.
    pub async fn create_user(&self, user: &User) -> Result<()> {
        self.store.append(USERS_TABLE, user.to_row()).await
    }

    /// Marks a user verified and clears the single-use token.
    pub async fn set_verified(&self, row_id: usize) -> Result<()> {
        self.store
            .update_field(USERS_TABLE, row_id, User::COL_VERIFIED, "Yes")
            .await?;
        self.store
            .update_field(USERS_TABLE, row_id, User::COL_VERIFY_TOKEN, "")
            .await
    }

    /// Replaces a user's password hash.
    pub async fn set_password_hash(&self, row_id: usize, hash: &str) -> Result<()> {
        self.store
            .update_field(USERS_TABLE, row_id, User::COL_PASSWORD_HASH, hash)
            .await
    }

    /// Updates a user's display name.
    pub async fn set_name(&self, row_id: usize, name: &str) -> Result<()> {
        self.store
            .update_field(USERS_TABLE, row_id, User::COL_NAME, name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::store::memory::MemoryStore;

    fn sample_user(username: &str, token: Option<&str>) -> User {
        User {
            row_id: 0,
            username: username.to_string(),
            name: "Someone".to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$2b$12$hash".to_string(),
            role: Role::Personal,
            verified: false,
            verify_token: token.map(str::to_string),
            created_at: "2026-02-01 09:30".to_string(),
        }
    }

    #[tokio::test]
    async fn find_by_username_is_case_insensitive() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        repo.create_user(&sample_user("Alice", None)).await.unwrap();

        let found = repo.find_by_username("  aLiCe ").await.unwrap().unwrap();
        assert_eq!(found.username, "Alice");
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_token_requires_exact_match() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        repo.create_user(&sample_user("alice", Some("tok-123")))
            .await
            .unwrap();

        assert!(repo.find_by_token("tok-123").await.unwrap().is_some());
        assert!(repo.find_by_token("TOK-123").await.unwrap().is_none());
        assert!(repo.find_by_token("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_verified_clears_the_token() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        repo.create_user(&sample_user("alice", Some("tok-123")))
            .await
            .unwrap();

        repo.set_verified(0).await.unwrap();

        let user = repo.find_by_username("alice").await.unwrap().unwrap();
        assert!(user.verified);
        assert_eq!(user.verify_token, None);
        assert!(repo.find_by_token("tok-123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn row_ids_follow_registration_order() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        repo.create_user(&sample_user("alice", None)).await.unwrap();
        repo.create_user(&sample_user("bob", None)).await.unwrap();

        let users = repo.load_all().await.unwrap();
        assert_eq!(users[0].row_id, 0);
        assert_eq!(users[1].row_id, 1);
        assert_eq!(users[1].username, "bob");
    }
}
