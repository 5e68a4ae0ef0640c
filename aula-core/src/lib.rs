//! # aula-core
//!
//! Core types, configuration and error handling for the aula API pipeline.
//!
//! This crate provides the foundational types shared by the session and
//! client crates:
//!
//! - **Errors**: the [`ApiError`] failure taxonomy
//! - **Types**: [`TokenPair`], [`SessionIdentity`] and the auth wire formats
//! - **Config**: [`ClientConfig`] with environment overrides
//! - **Hooks**: [`Notifier`] and [`Navigator`], the UI collaborators
//! - **Envelope**: [`unwrap_envelope`] for paginated `{data: ...}` bodies
//!
//! ## Example
//!
//! ```rust
//! use aula_core::{ApiError, ClientConfig, TokenPair};
//! use std::time::Duration;
//!
//! let config = ClientConfig::new()
//!     .timeout(Duration::from_secs(10))
//!     .login_path("/auth/login");
//! assert_eq!(config.timeout, Duration::from_secs(10));
//!
//! let pair = TokenPair::new("T1", Some("R1".to_string()));
//! assert!(pair.can_refresh());
//!
//! let err = ApiError::request_failed(422, "Invalid group");
//! assert_eq!(err.status(), Some(422));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod envelope;
pub mod errors;
pub mod hooks;
pub mod types;

// Re-exports for convenience
pub use config::ClientConfig;
pub use envelope::{unwrap_envelope, unwrap_envelope_as};
pub use errors::{ApiError, ApiResult, NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};
pub use hooks::{
    Navigator, NoopNavigator, Notifier, RecordingNavigator, RecordingNotifier, Route,
    TracingNotifier,
};
pub use types::{
    Credentials, LoginResponse, ProfileResponse, RefreshRequest, RefreshResponse,
    SessionIdentity, TokenPair,
};
