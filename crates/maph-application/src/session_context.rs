//! Session context: login, logout and the current session.

use maph_core::session::{
    AuthGateway, Credentials, KeyValueStore, Session, SessionUser, TOKEN_KEY, USER_KEY,
};
use maph_core::{MaphError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns the authenticated session for the lifetime of the app.
///
/// Login and profile editing are the only writers. Every other component
/// reads a cloned [`Session`] through [`SessionContext::current`] or
/// [`SessionContext::require`].
pub struct SessionContext {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    pub fn new(gateway: Arc<dyn AuthGateway>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            gateway,
            store,
            current: RwLock::new(None),
        }
    }

    /// Authenticates and persists the session.
    ///
    /// Blank fields fail validation before any request is made.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Session> {
        let credentials = Credentials::new(identifier, secret)?;

        let grant = match self.gateway.login(&credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                tracing::warn!("Login failed for {}: {}", credentials.identifier, e);
                return Err(e.into());
            }
        };

        let session = Session::new(grant.user, grant.token);
        self.persist(&session).await?;
        *self.current.write().await = Some(session.clone());

        tracing::info!(
            "Signed in as {} (company {})",
            session.user_id(),
            session.company_id()
        );
        Ok(session)
    }

    /// Drops the in-memory session and clears both store keys.
    pub async fn logout(&self) -> Result<()> {
        let previous = self.current.write().await.take();
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(USER_KEY).await?;

        if let Some(session) = previous {
            tracing::info!("Signed out {}", session.user_id());
        }
        Ok(())
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// The current session, or [`MaphError::NotAuthenticated`].
    pub async fn require(&self) -> Result<Session> {
        self.current().await.ok_or(MaphError::NotAuthenticated)
    }

    /// Rebuilds the session saved by a previous run, if any.
    ///
    /// An unreadable `user` entry is discarded together with the token.
    pub async fn restore(&self) -> Result<Option<Session>> {
        let token = self.store.get(TOKEN_KEY).await?;
        let user = self.store.get(USER_KEY).await?;

        let (Some(token), Some(user)) = (token, user) else {
            tracing::debug!("No stored session");
            return Ok(None);
        };

        let user: SessionUser = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Discarding unreadable stored user: {}", e);
                self.store.remove(TOKEN_KEY).await?;
                self.store.remove(USER_KEY).await?;
                return Ok(None);
            }
        };

        let session = Session::new(user, token);
        *self.current.write().await = Some(session.clone());
        tracing::info!("Restored session for {}", session.user_id());
        Ok(Some(session))
    }

    /// Replaces the signed-in user's profile after a successful edit.
    pub async fn replace_user(&self, user: SessionUser) -> Result<Session> {
        let mut current = self.current.write().await;
        let session = current.as_mut().ok_or(MaphError::NotAuthenticated)?;
        if session.user.user_id != user.user_id {
            return Err(MaphError::invalid_state(format!(
                "profile for {} cannot replace signed-in user {}",
                user.user_id, session.user.user_id
            )));
        }

        self.store.set(USER_KEY, &serde_json::to_string(&user)?).await?;
        session.user = user;
        Ok(session.clone())
    }

    async fn persist(&self, session: &Session) -> Result<()> {
        self.store.set(TOKEN_KEY, &session.token).await?;
        self.store
            .set(USER_KEY, &serde_json::to_string(&session.user)?)
            .await
    }
}
