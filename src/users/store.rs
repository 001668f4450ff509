//! Transactional access to the `users` table.

use async_trait::async_trait;

use super::repo_types::{NewSuperuser, UserFlags};

/// Opens scoped sessions against the user table.
#[async_trait]
pub trait UserStore: Send + Sync {
    type Session: UserSession;

    /// Start a transaction. Connection failures surface here.
    async fn begin(&self) -> anyhow::Result<Self::Session>;
}

/// One open transaction.
///
/// `commit` and `rollback` consume the session. A session dropped without either must
/// leave no writes behind.
#[async_trait]
pub trait UserSession: Send {
    /// Exact-match lookup by email.
    async fn find_by_email(&mut self, email: &str) -> anyhow::Result<Option<UserFlags>>;

    /// Set `is_superuser` and `is_verified`. Returns the number of rows touched.
    async fn promote_to_superuser(&mut self, email: &str) -> anyhow::Result<u64>;

    /// Insert an active, verified superuser.
    async fn insert_superuser(&mut self, user: &NewSuperuser<'_>) -> anyhow::Result<()>;

    async fn commit(self) -> anyhow::Result<()>;

    async fn rollback(self) -> anyhow::Result<()>;
}
