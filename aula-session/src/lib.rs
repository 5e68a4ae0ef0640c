//! # aula-session
//!
//! Session state for the aula API pipeline.
//!
//! - **[`DurableStorage`]**: synchronous key-value persistence that survives
//!   a process restart ([`MemoryStorage`], [`FileStorage`])
//! - **[`TokenStore`]**: the current [`TokenPair`](aula_core::TokenPair)
//! - **[`IdentityStore`]**: the cached [`SessionIdentity`](aula_core::SessionIdentity)
//! - **[`Session`]**: both stores plus the authentication state machine,
//!   shared by the request executor and the session controller
//!
//! Every mutation is written through to durable storage before it returns,
//! so the next read (or a reload) observes it.
//!
//! ## Example
//!
//! ```rust
//! use aula_core::{NoopNavigator, SessionIdentity, TokenPair};
//! use aula_session::{MemoryStorage, Session};
//! use std::sync::Arc;
//!
//! let storage = MemoryStorage::new();
//! let session = Session::restore(Arc::new(storage.clone()), Arc::new(NoopNavigator));
//! assert!(!session.is_authenticated());
//!
//! session.begin_authentication();
//! session.establish(
//!     TokenPair::new("T1", Some("R1".into())),
//!     SessionIdentity::new(7, "a@b.com", None, "ADMIN"),
//! );
//!
//! // A fresh process over the same storage sees the session.
//! let reloaded = Session::restore(Arc::new(storage), Arc::new(NoopNavigator));
//! assert!(reloaded.is_authenticated());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod identity;
pub mod state;
pub mod storage;
pub mod tokens;

pub use identity::{IdentityStore, USER_KEY};
pub use state::{EndReason, Session, SessionStatus};
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError};
pub use tokens::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
