//! Access/refresh token store.

use crate::storage::DurableStorage;
use aula_core::TokenPair;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Durable key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Durable key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Holds the current token pair, mirrored to durable storage.
///
/// The in-memory value is authoritative for this process. A failed durable
/// write is logged and the in-memory update still happens.
pub struct TokenStore {
    current: RwLock<Option<TokenPair>>,
    storage: Arc<dyn DurableStorage>,
}

impl TokenStore {
    /// Create a store, rehydrating from durable storage.
    pub fn init(storage: Arc<dyn DurableStorage>) -> Self {
        let current = Self::rehydrate(storage.as_ref());
        debug!(present = current.is_some(), "Token store initialized");
        Self {
            current: RwLock::new(current),
            storage,
        }
    }

    fn rehydrate(storage: &dyn DurableStorage) -> Option<TokenPair> {
        let access = match storage.load(ACCESS_TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored access token");
                return None;
            }
        };
        let refresh = storage.load(REFRESH_TOKEN_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read stored refresh token");
            None
        });
        Some(TokenPair::new(access, refresh.filter(|t| !t.is_empty())))
    }

    /// The current token pair.
    pub fn get(&self) -> Option<TokenPair> {
        self.current.read().clone()
    }

    /// The current access token.
    pub fn access_token(&self) -> Option<String> {
        self.current.read().as_ref().map(|p| p.access_token.clone())
    }

    /// The current refresh token.
    pub fn refresh_token(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .and_then(|p| p.refresh_token.clone())
    }

    /// Replace both tokens.
    pub fn set(&self, pair: TokenPair) {
        let mut current = self.current.write();
        self.persist(ACCESS_TOKEN_KEY, Some(&pair.access_token));
        self.persist(REFRESH_TOKEN_KEY, pair.refresh_token.as_deref());
        *current = Some(pair);
    }

    /// Replace only the access token, keeping the refresh token.
    ///
    /// Returns `false` without writing anything if the store was cleared in
    /// the meantime (a logout won the race).
    pub fn set_access_token(&self, token: impl Into<String>) -> bool {
        let mut current = self.current.write();
        match current.as_mut() {
            Some(pair) => {
                pair.access_token = token.into();
                self.persist(ACCESS_TOKEN_KEY, Some(&pair.access_token));
                true
            }
            None => false,
        }
    }

    /// Remove both tokens from memory and durable storage.
    pub fn clear(&self) {
        let mut current = self.current.write();
        self.persist(ACCESS_TOKEN_KEY, None);
        self.persist(REFRESH_TOKEN_KEY, None);
        *current = None;
    }

    fn persist(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(v) => self.storage.store(key, v),
            None => self.storage.remove(key),
        };
        if let Err(e) = result {
            warn!(key, error = %e, "Failed to persist token");
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("present", &self.current.read().is_some())
            .finish()
    }
}
