use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use shared::domain::{SessionIdentity, UserRole, SESSION_USER_KEY};
use shared::protocol::{Credentials, SignupPayload};

use crate::{Navigator, RemoteStore, SessionStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("account creation rejected after failed login: {0}")]
    SignupRejected(#[source] anyhow::Error),
    #[error("failed to persist session identity: {0}")]
    SessionWrite(#[source] anyhow::Error),
    #[error("failed to serialize auth payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of the login → signup pipeline. Exactly one persist-and-navigate
/// dispatch consumes it.
enum AuthStage {
    LoggedIn { token: String },
    SignedUp,
}

/// Authentication flow: one login attempt per form submit, with account
/// creation as the named fallback stage.
pub struct LoginFlow {
    store: Option<Arc<dyn RemoteStore>>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl LoginFlow {
    pub fn new(
        store: Option<Arc<dyn RemoteStore>>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            session,
            navigator,
        }
    }

    /// Runs one authentication attempt for `role`. A rejected login is not
    /// terminal: account creation is always attempted before giving up,
    /// whatever the rejection reason was. Only a rejected signup surfaces.
    pub async fn submit(&self, role: UserRole, credentials: Credentials) -> Result<(), AuthError> {
        let Some(store) = self.store.as_ref() else {
            // Nothing to authenticate against; matches create_account below.
            return Ok(());
        };

        let credentials_json = serde_json::to_string(&credentials)?;
        let stage = match store.login(&credentials_json).await {
            Ok(token) => AuthStage::LoggedIn { token: token.jwt },
            Err(err) => {
                warn!(
                    email = %credentials.email,
                    "login rejected, falling back to account creation: {err:#}"
                );
                self.create_account(role, &credentials).await?;
                AuthStage::SignedUp
            }
        };

        let identity = SessionIdentity {
            role,
            email: credentials.email.clone(),
            token: match stage {
                AuthStage::LoggedIn { token } => Some(token),
                AuthStage::SignedUp => None,
            },
        };
        self.session
            .set_item(SESSION_USER_KEY, &serde_json::to_string(&identity)?)
            .await
            .map_err(AuthError::SessionWrite)?;
        info!(email = %identity.email, role = ?role, "session identity persisted");

        self.navigator.on_navigate(role.landing_route());
        Ok(())
    }

    /// Fallback signup stage. A missing store makes this a no-op; a rejected
    /// signup is reported, not retried.
    pub async fn create_account(
        &self,
        role: UserRole,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(());
        };
        let payload = serde_json::to_string(&SignupPayload {
            role,
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        })?;
        store
            .users()
            .create(&payload)
            .await
            .map_err(AuthError::SignupRejected)?;
        info!(email = %credentials.email, "account created through signup fallback");
        Ok(())
    }
}
