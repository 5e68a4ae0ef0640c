//! # aula - Authenticated API client
//!
//! Every call the aula front end makes to its backend goes through one
//! pipeline. It attaches the bearer token, transparently refreshes an
//! expired access token once, and ends the session when the backend keeps
//! refusing.
//!
//! ## Quick Start
//!
//! ```ignore
//! use aula::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> ApiResult<()> {
//!     aula::telemetry::init();
//!
//!     let aula = Aula::new(ClientConfig::from_env()?)?;
//!     let me = aula.login("a@b.com", "secret").await?;
//!     println!("signed in as {} ({})", me.display_name, me.role);
//!
//!     let groups: Vec<serde_json::Value> = aula.executor().get_list("/api/groups").await?;
//!     println!("{} groups", groups.len());
//!
//!     aula.logout();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`aula_core`] - errors, wire types, configuration and UI hooks
//! - [`aula_session`] - token store, cached identity and durable storage
//! - [`aula_client`] - request executor, refresh coordinator, session controller
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `telemetry` | [`telemetry`] subscriber setup | ✅ |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;

/// Subscriber setup for `tracing` output.
#[cfg(feature = "telemetry")]
#[cfg_attr(docsrs, doc(cfg(feature = "telemetry")))]
pub mod telemetry;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Errors, wire types, configuration and UI hooks.
pub use aula_core as core;

/// Token store, identity and storage backends.
pub use aula_session as session;

/// The request pipeline.
pub use aula_client as pipeline;

// ============================================================================
// Flat Re-exports
// ============================================================================

pub use client::{Aula, AulaBuilder};

pub use aula_core::{
    unwrap_envelope, unwrap_envelope_as, ApiError, ApiResult, ClientConfig, Navigator,
    NoopNavigator, Notifier, Route, SessionIdentity, TokenPair, TracingNotifier,
};

pub use aula_session::{
    DurableStorage, EndReason, FileStorage, MemoryStorage, Session, SessionStatus, StorageError,
};

pub use aula_client::{
    Method, RefreshCoordinator, RequestExecutor, RequestOptions, ReqwestTransport, RetryPhase,
    SessionController, Transport,
};

/// Common imports.
///
/// ```ignore
/// use aula::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Aula, AulaBuilder};

    pub use crate::core::{ApiError, ApiResult, ClientConfig, Navigator, Notifier, Route, SessionIdentity};

    pub use crate::session::{DurableStorage, FileStorage, MemoryStorage, SessionStatus};

    pub use crate::pipeline::{RequestExecutor, RequestOptions, SessionController};
}

/// Returns the current version of aula.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
