//! Provisioning error types.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of `ensure_superuser`. The triggering error is kept as `source()`.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The credential hasher failed on the insert path.
    #[error("password hashing failed")]
    Hash(#[source] BoxError),

    /// Connectivity, query or constraint failure inside the transaction.
    #[error("database operation failed")]
    Database(#[source] BoxError),
}

impl ProvisionError {
    #[inline]
    pub fn database(err: anyhow::Error) -> Self {
        Self::Database(err.into())
    }

    #[inline]
    pub fn hash(err: anyhow::Error) -> Self {
        Self::Hash(err.into())
    }
}
