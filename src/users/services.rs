use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::error::ProvisionError;
use super::repo_types::{NewSuperuser, Outcome, SuperuserRequest};
use super::store::{UserSession, UserStore};
use crate::auth::CredentialHasher;

/// Make sure `request.email` belongs to an active, verified superuser.
///
/// Creates the user when absent and promotes it when present without the flag. Names are
/// only written on creation. Everything runs in one transaction: on any failure the
/// transaction is rolled back before the error is returned, and a failing rollback is
/// logged without replacing the original error.
#[instrument(skip(store, hasher, request), fields(email = %request.email))]
pub async fn ensure_superuser<S, H>(
    store: &S,
    hasher: &H,
    request: &SuperuserRequest,
) -> Result<Outcome, ProvisionError>
where
    S: UserStore,
    H: CredentialHasher + ?Sized,
{
    let mut session = store.begin().await.map_err(ProvisionError::database)?;

    match apply(&mut session, hasher, request).await {
        Ok(outcome) => {
            session.commit().await.map_err(ProvisionError::database)?;
            info!(user_id = %outcome.id(), outcome = ?outcome, "superuser ensured");
            Ok(outcome)
        }
        Err(e) => {
            if let Err(rollback_err) = session.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            error!(error = %e, "ensure superuser failed");
            Err(e)
        }
    }
}

async fn apply<T, H>(
    session: &mut T,
    hasher: &H,
    request: &SuperuserRequest,
) -> Result<Outcome, ProvisionError>
where
    T: UserSession,
    H: CredentialHasher + ?Sized,
{
    let email = request.email.as_str();
    let existing = session
        .find_by_email(email)
        .await
        .map_err(ProvisionError::database)?;

    match existing {
        Some(user) if user.is_superuser => {
            debug!(user_id = %user.id, "already a superuser");
            Ok(Outcome::AlreadySuperuser { id: user.id })
        }
        Some(user) => {
            let affected = session
                .promote_to_superuser(email)
                .await
                .map_err(ProvisionError::database)?;
            if affected == 0 {
                return Err(ProvisionError::database(anyhow::anyhow!(
                    "user {email} disappeared before promotion"
                )));
            }
            debug!(user_id = %user.id, "promoted to superuser");
            Ok(Outcome::Promoted { id: user.id })
        }
        None => {
            // Only the insert path stores the credential.
            let hashed_password = hasher.hash(&request.password).map_err(ProvisionError::hash)?;
            let user = NewSuperuser {
                id: Uuid::new_v4(),
                email,
                hashed_password,
                first_name: request.first_name.as_deref(),
                last_name: request.last_name.as_deref(),
            };
            session
                .insert_superuser(&user)
                .await
                .map_err(ProvisionError::database)?;
            debug!(user_id = %user.id, "inserted superuser");
            Ok(Outcome::Created { id: user.id })
        }
    }
}
