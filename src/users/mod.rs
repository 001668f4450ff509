mod error;
pub mod repo;
mod repo_types;
pub mod services;
pub mod store;

#[cfg(test)]
pub(crate) mod memory;

pub use error::ProvisionError;
pub use repo::PgUserStore;
pub use repo_types::{Outcome, SuperuserRequest};
pub use services::ensure_superuser;
