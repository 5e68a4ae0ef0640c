//! Login and logout orchestration.

use crate::executor::RequestExecutor;
use crate::options::RequestOptions;
use aula_core::{ApiError, ApiResult, Credentials, LoginResponse, ProfileResponse, SessionIdentity};
use aula_session::{EndReason, Session, SessionStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The only component that starts or terminally ends a session.
///
/// The rest of the application should only need [`login`](Self::login),
/// [`logout`](Self::logout) and [`is_authenticated`](Self::is_authenticated).
#[derive(Debug, Clone)]
pub struct SessionController {
    executor: RequestExecutor,
}

impl SessionController {
    /// Create a controller over an executor.
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// The executor this controller drives.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    fn session(&self) -> &Arc<Session> {
        self.executor.session()
    }

    /// Exchange credentials for a session.
    ///
    /// On success both stores are populated and the navigator is sent home.
    /// On failure the session is left unauthenticated and the error is
    /// returned as-is; the user has already been notified.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<SessionIdentity> {
        let session = self.session();
        session.begin_authentication();
        debug!(email, "Logging in");

        let body = match serde_json::to_value(Credentials::new(email, password)) {
            Ok(body) => body,
            Err(e) => {
                session.abort_authentication();
                return Err(e.into());
            }
        };
        let options = RequestOptions::post(body).skip_auth();
        let login_path = self.executor.config().login_path.clone();

        let response = self
            .executor
            .send::<LoginResponse>(&login_path, options)
            .await
            .and_then(|body| body.ok_or_else(|| ApiError::malformed("empty login response")));

        match response {
            Ok(response) => {
                let (tokens, identity) = response.into_session();
                session.establish(tokens, identity.clone());
                info!(user_id = identity.id, role = %identity.role, "Logged in");
                Ok(identity)
            }
            Err(e) => {
                warn!(email, error = %e, "Login failed");
                session.abort_authentication();
                Err(e)
            }
        }
    }

    /// End the session. Safe to call when already signed out.
    pub fn logout(&self) {
        self.session().end(EndReason::Logout);
    }

    /// Identity present and token pair present.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// The signed-in user, if any.
    pub fn identity(&self) -> Option<SessionIdentity> {
        self.session().identity().get()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.session().status()
    }

    /// Re-read the signed-in user from the profile endpoint.
    ///
    /// Returns `Ok(None)` without a request when nobody is signed in.
    pub async fn refresh_profile(&self) -> ApiResult<Option<SessionIdentity>> {
        if !self.is_authenticated() {
            return Ok(None);
        }

        let profile_path = self.executor.config().profile_path.clone();
        let profile: ProfileResponse = self.executor.get(&profile_path).await?;
        let identity = SessionIdentity::from(profile);
        self.session().update_identity(identity.clone());
        Ok(Some(identity))
    }
}
