//! Cached session identity.

use crate::storage::DurableStorage;
use aula_core::SessionIdentity;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// Durable key holding the serialized identity.
pub const USER_KEY: &str = "user";

/// Holds the last-known principal, mirrored to durable storage as JSON.
pub struct IdentityStore {
    current: RwLock<Option<SessionIdentity>>,
    storage: Arc<dyn DurableStorage>,
}

impl IdentityStore {
    /// Create a store, rehydrating from durable storage.
    ///
    /// Unreadable or malformed stored data counts as absent; the corrupted
    /// entry is removed.
    pub fn init(storage: Arc<dyn DurableStorage>) -> Self {
        let current = match storage.load(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionIdentity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!(error = %e, "Discarding malformed stored identity");
                    if let Err(e) = storage.remove(USER_KEY) {
                        warn!(error = %e, "Failed to remove malformed identity");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored identity");
                None
            }
        };
        Self {
            current: RwLock::new(current),
            storage,
        }
    }

    /// The cached identity.
    pub fn get(&self) -> Option<SessionIdentity> {
        self.current.read().clone()
    }

    /// Replace the cached identity.
    pub fn set(&self, identity: SessionIdentity) {
        let mut current = self.current.write();
        match serde_json::to_string(&identity) {
            Ok(json) => {
                if let Err(e) = self.storage.store(USER_KEY, &json) {
                    warn!(error = %e, "Failed to persist identity");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize identity"),
        }
        *current = Some(identity);
    }

    /// Remove the identity from memory and durable storage.
    pub fn clear(&self) {
        let mut current = self.current.write();
        if let Err(e) = self.storage.remove(USER_KEY) {
            warn!(error = %e, "Failed to remove stored identity");
        }
        *current = None;
    }
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore")
            .field("current", &*self.current.read())
            .finish()
    }
}
