use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::repo_types::{NewSuperuser, UserFlags};
use super::store::{UserSession, UserStore};

const FIND_BY_EMAIL: &str = r#"
SELECT id, is_superuser
FROM users
WHERE email = $1
"#;

const PROMOTE_BY_EMAIL: &str = r#"
UPDATE users
SET is_superuser = TRUE, is_verified = TRUE
WHERE email = $1
"#;

const INSERT_SUPERUSER: &str = r#"
INSERT INTO users (
    id, email, hashed_password, is_active,
    is_superuser, is_verified, first_name, last_name
) VALUES (
    $1, $2, $3, TRUE,
    TRUE, TRUE, $4, $5
)
"#;

/// Postgres-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// A session is one Postgres transaction. sqlx rolls it back on drop.
pub struct PgUserSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UserStore for PgUserStore {
    type Session = PgUserSession;

    async fn begin(&self) -> anyhow::Result<PgUserSession> {
        let tx = self.db.begin().await.context("begin tx")?;
        Ok(PgUserSession { tx })
    }
}

#[async_trait]
impl UserSession for PgUserSession {
    async fn find_by_email(&mut self, email: &str) -> anyhow::Result<Option<UserFlags>> {
        let user = sqlx::query_as::<_, UserFlags>(FIND_BY_EMAIL)
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .context("select user by email")?;
        Ok(user)
    }

    async fn promote_to_superuser(&mut self, email: &str) -> anyhow::Result<u64> {
        let result = sqlx::query(PROMOTE_BY_EMAIL)
            .bind(email)
            .execute(&mut *self.tx)
            .await
            .context("promote user")?;
        Ok(result.rows_affected())
    }

    async fn insert_superuser(&mut self, user: &NewSuperuser<'_>) -> anyhow::Result<()> {
        sqlx::query(INSERT_SUPERUSER)
            .bind(user.id)
            .bind(user.email)
            .bind(&user.hashed_password)
            .bind(user.first_name) // Option<&str> → NULL allowed
            .bind(user.last_name)
            .execute(&mut *self.tx)
            .await
            .context("insert superuser")?;
        Ok(())
    }

    async fn commit(self) -> anyhow::Result<()> {
        self.tx.commit().await.context("commit tx")
    }

    async fn rollback(self) -> anyhow::Result<()> {
        self.tx.rollback().await.context("rollback tx")
    }
}
