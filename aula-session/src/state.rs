//! Shared session state machine.
//!
//! ```text
//! Unauthenticated --begin--> Authenticating --establish--> Authenticated
//!        ^                         |                             |
//!        +------- abort -----------+                             |
//!        +------------------------ end --------------------------+
//! ```

use crate::identity::IdentityStore;
use crate::storage::DurableStorage;
use crate::tokens::TokenStore;
use aula_core::{Navigator, Route, SessionIdentity, TokenPair};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No session.
    #[default]
    Unauthenticated,
    /// Credential exchange in progress.
    Authenticating,
    /// Tokens and identity present.
    Authenticated,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The user asked to log out.
    Logout,
    /// The access token could not be renewed.
    Expired,
}

/// Token store, identity store and status, shared by the request pipeline.
pub struct Session {
    tokens: TokenStore,
    identity: IdentityStore,
    status: RwLock<SessionStatus>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    /// Rehydrate a session from durable storage.
    ///
    /// Partial data (tokens without identity or the reverse) resolves to
    /// `Unauthenticated` and is cleared.
    pub fn restore(storage: Arc<dyn DurableStorage>, navigator: Arc<dyn Navigator>) -> Self {
        let tokens = TokenStore::init(storage.clone());
        let identity = IdentityStore::init(storage);

        let status = match (tokens.get(), identity.get()) {
            (Some(_), Some(user)) => {
                info!(user_id = user.id, email = %user.email, "Restored stored session");
                SessionStatus::Authenticated
            }
            (None, None) => {
                debug!("No stored session");
                SessionStatus::Unauthenticated
            }
            _ => {
                warn!("Discarding incomplete stored session");
                tokens.clear();
                identity.clear();
                SessionStatus::Unauthenticated
            }
        };

        Self {
            tokens,
            identity,
            status: RwLock::new(status),
            navigator,
        }
    }

    /// The token store.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The identity store.
    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        *self.status.read()
    }

    /// Identity present AND token pair present.
    pub fn is_authenticated(&self) -> bool {
        self.identity.get().is_some() && self.tokens.get().is_some()
    }

    /// Enter `Authenticating`.
    pub fn begin_authentication(&self) {
        *self.status.write() = SessionStatus::Authenticating;
    }

    /// Store a freshly issued session and navigate home.
    pub fn establish(&self, tokens: TokenPair, identity: SessionIdentity) {
        {
            let mut status = self.status.write();
            self.tokens.set(tokens);
            self.identity.set(identity);
            *status = SessionStatus::Authenticated;
        }
        self.navigator.navigate(Route::Home);
    }

    /// Leave `Authenticating` after a failed login.
    ///
    /// Both stores are cleared in case the failed exchange wrote anything.
    pub fn abort_authentication(&self) {
        let mut status = self.status.write();
        self.tokens.clear();
        self.identity.clear();
        *status = SessionStatus::Unauthenticated;
    }

    /// Replace the cached identity of an active session.
    pub fn update_identity(&self, identity: SessionIdentity) {
        let status = self.status.read();
        if *status == SessionStatus::Authenticated {
            self.identity.set(identity);
        } else {
            debug!(status = ?*status, "Ignoring identity update without a session");
        }
    }

    /// End the session: clear both stores and navigate to login.
    ///
    /// Idempotent. Navigation only happens when there was something to end.
    pub fn end(&self, reason: EndReason) {
        let had_session = {
            let mut status = self.status.write();
            let had_session = *status != SessionStatus::Unauthenticated
                || self.tokens.get().is_some()
                || self.identity.get().is_some();
            self.tokens.clear();
            self.identity.clear();
            *status = SessionStatus::Unauthenticated;
            had_session
        };

        if had_session {
            match reason {
                EndReason::Logout => info!("Logged out"),
                EndReason::Expired => warn!("Session expired, forcing logout"),
            }
            self.navigator.navigate(Route::Login);
        } else {
            debug!(?reason, "Session already ended");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status())
            .field("tokens", &self.tokens)
            .field("identity", &self.identity)
            .finish()
    }
}
