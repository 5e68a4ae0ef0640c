//! # aula-client
//!
//! The authenticated API request pipeline.
//!
//! Every backend call goes through the [`RequestExecutor`]. It attaches the
//! stored access token, and when the backend answers `401` it asks the
//! [`RefreshCoordinator`] for a new token and re-issues the call once. A
//! second `401`, or a failed refresh, ends the session.
//!
//! ## Core Concepts
//!
//! - **[`RequestExecutor`]**: credential injection, classification, single retry
//! - **[`RefreshCoordinator`]**: single-flight refresh-token exchange
//! - **[`SessionController`]**: login, logout and authentication status
//! - **[`Transport`]**: the HTTP seam, [`ReqwestTransport`] by default
//! - **[`RequestOptions`]**: method, body, headers and `skip_auth`
//!
//! ## Example
//!
//! ```ignore
//! use aula_client::{RequestExecutor, RequestOptions, SessionController};
//!
//! let identity = controller.login("a@b.com", "secret").await?;
//! let groups: serde_json::Value = executor.get("/api/groups").await?;
//! controller.logout();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod controller;
pub mod executor;
pub mod options;
pub mod refresh;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use controller::SessionController;
pub use executor::{RequestExecutor, RetryPhase};
pub use options::RequestOptions;
pub use refresh::RefreshCoordinator;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub use reqwest::Method;
