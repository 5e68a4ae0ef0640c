//! Refresh-token exchange with single-flight coordination.

use crate::options::RequestOptions;
use crate::transport::Transport;
use aula_core::{ApiError, ApiResult, ClientConfig, RefreshRequest, RefreshResponse};
use aula_session::{EndReason, Session};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Exchanges the refresh token for a new access token.
///
/// Concurrent callers serialize on one guard. A caller that gets the guard
/// after someone else already replaced its stale token reuses the new token
/// instead of calling the backend again.
pub struct RefreshCoordinator {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    guard: Mutex<()>,
}

impl RefreshCoordinator {
    /// Create a coordinator.
    pub fn new(
        config: Arc<ClientConfig>,
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            config,
            transport,
            session,
            guard: Mutex::new(()),
        }
    }

    /// Obtain a fresh access token.
    ///
    /// `stale` is the access token the failed request was sent with. Returns
    /// `None` when the session cannot be renewed; in that case the session
    /// has already been ended.
    pub async fn refresh(&self, stale: Option<&str>) -> Option<String> {
        let _singleflight = self.guard.lock().await;

        let Some(pair) = self.session.tokens().get() else {
            debug!("No tokens left to refresh");
            self.session.end(EndReason::Expired);
            return None;
        };

        if stale != Some(pair.access_token.as_str()) {
            debug!("Access token already replaced, reusing it");
            return Some(pair.access_token);
        }

        if !pair.can_refresh() {
            warn!("No refresh token available, ending session");
            self.session.end(EndReason::Expired);
            return None;
        }
        let refresh_token = pair.refresh_token.unwrap_or_default();

        match self.exchange(&refresh_token).await {
            Ok(access_token) => {
                if self.session.tokens().set_access_token(access_token.clone()) {
                    info!("Token refresh successful");
                    Some(access_token)
                } else {
                    debug!("Session ended during refresh, discarding new token");
                    None
                }
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                self.session.end(EndReason::Expired);
                None
            }
        }
    }

    async fn exchange(&self, refresh_token: &str) -> ApiResult<String> {
        let url = self.config.endpoint_url(&self.config.refresh_path)?;
        let body = serde_json::to_value(RefreshRequest { refresh_token })?;
        let request = RequestOptions::post(body).skip_auth().prepare(url, None);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::generic_failure(response.status));
        }

        let parsed: RefreshResponse = serde_json::from_str(&response.body)?;
        parsed
            .into_access_token()
            .ok_or_else(|| ApiError::malformed("refresh response has no accessToken"))
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_path", &self.config.refresh_path)
            .finish()
    }
}
