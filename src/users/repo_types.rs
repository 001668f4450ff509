use std::fmt;

use sqlx::FromRow;
use uuid::Uuid;

/// The slice of a `users` row needed to decide between promote and insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct UserFlags {
    pub id: Uuid,
    pub is_superuser: bool,
}

/// Row written on the insert path. Flags are fixed by the query.
#[derive(Debug, Clone)]
pub struct NewSuperuser<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub hashed_password: String, // Argon2 PHC string
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

/// Input to `ensure_superuser`.
#[derive(Clone)]
pub struct SuperuserRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl fmt::Debug for SuperuserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperuserRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// What `ensure_superuser` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    AlreadySuperuser { id: Uuid },
    Promoted { id: Uuid },
    Created { id: Uuid },
}

impl Outcome {
    pub fn id(&self) -> Uuid {
        match *self {
            Outcome::AlreadySuperuser { id } | Outcome::Promoted { id } | Outcome::Created { id } => id,
        }
    }

    /// Lines printed to stdout for this outcome.
    pub fn messages(&self, email: &str) -> Vec<String> {
        match self {
            Outcome::AlreadySuperuser { .. } => vec![
                format!("User with email {email} already exists."),
                format!("User {email} is already a superuser."),
            ],
            Outcome::Promoted { .. } => vec![
                format!("User with email {email} already exists."),
                format!("Updated user {email} to superuser status."),
            ],
            Outcome::Created { .. } => vec![format!("Superuser {email} created successfully!")],
        }
    }
}
