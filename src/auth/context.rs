//! Explicit authentication state shared by the API client and services.
//!
//! Lifecycle: [`AuthContext::init`] loads whatever the store persisted,
//! [`AuthContext::update`] / [`AuthContext::apply_refresh`] replace tokens, and
//! [`AuthContext::clear`] wipes memory and storage together.

use anyhow::Result;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::{TokenPair, UserSummary};
use crate::store::{StorageKey, TokenStore};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSnapshot {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub session_id: Option<String>,
    pub user: Option<UserSummary>,
}

pub struct AuthContext {
    store: Arc<dyn TokenStore>,
    state: RwLock<AuthSnapshot>,
    access_tx: watch::Sender<Option<String>>,
}

impl AuthContext {
    /// Loads persisted tokens. A corrupt `user` entry is dropped, not fatal.
    pub fn init(store: Arc<dyn TokenStore>) -> Result<Self> {
        let access_token = store.get(StorageKey::AccessToken)?;
        let refresh_token = store.get(StorageKey::RefreshToken)?;
        let session_id = store.get(StorageKey::SessionId)?;
        let user = match store.get(StorageKey::User)? {
            Some(raw) => match serde_json::from_str::<UserSummary>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable persisted user");
                    None
                }
            },
            None => None,
        };

        debug!(
            has_access = access_token.is_some(),
            has_session = session_id.is_some(),
            "auth context initialised"
        );

        let (access_tx, _) = watch::channel(access_token.clone());
        Ok(Self {
            store,
            state: RwLock::new(AuthSnapshot {
                access_token,
                refresh_token,
                session_id,
                user,
            }),
            access_tx,
        })
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn session_id(&self) -> Option<String> {
        self.read().session_id.clone()
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().access_token.is_some()
    }

    /// Notified with the new access token on every update and with `None` on clear.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.access_tx.subscribe()
    }

    /// Login: store the new token pair, session, and user. A failed write
    /// leaves no session behind, in memory or in storage.
    pub fn update(
        &self,
        tokens: TokenPair,
        session_id: Option<String>,
        user: Option<UserSummary>,
    ) -> Result<()> {
        if let Err(e) = self.persist(&tokens, session_id.as_deref(), user.as_ref()) {
            warn!(error = %e, "failed to persist session; clearing it");
            if let Err(clear_error) = self.clear() {
                warn!(error = %clear_error, "failed to clear partially written session");
            }
            return Err(e);
        }

        {
            let mut state = self.write();
            state.access_token = Some(tokens.access.clone());
            state.refresh_token = Some(tokens.refresh);
            state.session_id = session_id;
            state.user = user;
        }
        self.access_tx.send_replace(Some(tokens.access));
        Ok(())
    }

    fn persist(
        &self,
        tokens: &TokenPair,
        session_id: Option<&str>,
        user: Option<&UserSummary>,
    ) -> Result<()> {
        self.store.set(StorageKey::AccessToken, &tokens.access)?;
        self.store.set(StorageKey::RefreshToken, &tokens.refresh)?;
        match session_id {
            Some(id) => self.store.set(StorageKey::SessionId, id)?,
            None => self.store.remove(StorageKey::SessionId)?,
        }
        match user {
            Some(user) => self.store.set(StorageKey::User, &serde_json::to_string(user)?)?,
            None => self.store.remove(StorageKey::User)?,
        }
        Ok(())
    }

    /// Applies a refresh result only if `used_refresh` is still the current
    /// refresh token. Returns `false` when the session changed meanwhile
    /// (logout or a new login), in which case nothing is written.
    pub fn apply_refresh(
        &self,
        used_refresh: &str,
        access: String,
        rotated_refresh: Option<String>,
    ) -> Result<bool> {
        let mut state = self.write();
        if state.refresh_token.as_deref() != Some(used_refresh) {
            debug!("dropping refresh result for a superseded session");
            return Ok(false);
        }

        self.store.set(StorageKey::AccessToken, &access)?;
        if let Some(refresh) = &rotated_refresh {
            self.store.set(StorageKey::RefreshToken, refresh)?;
        }

        state.access_token = Some(access.clone());
        if let Some(refresh) = rotated_refresh {
            state.refresh_token = Some(refresh);
        }
        drop(state);

        self.access_tx.send_replace(Some(access));
        Ok(true)
    }

    /// Logout: memory is always cleared; storage errors are reported after.
    pub fn clear(&self) -> Result<()> {
        *self.write() = AuthSnapshot::default();
        self.access_tx.send_replace(None);
        self.store.clear()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AuthSnapshot> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AuthSnapshot> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
