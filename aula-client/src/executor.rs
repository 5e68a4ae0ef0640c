//! Authenticated request executor.
//!
//! A logical request moves through [`RetryPhase`]s:
//!
//! ```text
//! Initial --401--> AwaitingRefresh --new token--> Retried --401--> AuthExpired
//!                         |
//!                         +--refresh failed--> AuthExpired
//! ```
//!
//! Only `Initial` may start a refresh, so a request is retried at most once.

use crate::options::RequestOptions;
use crate::refresh::RefreshCoordinator;
use crate::transport::{classify, Outcome, Transport};
use aula_core::{unwrap_envelope_as, ApiError, ApiResult, ClientConfig, Notifier};
use aula_session::{EndReason, Session};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a logical request stands in the refresh-and-retry cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPhase {
    /// First attempt with the stored token.
    #[default]
    Initial,
    /// Rejected once; waiting for a new access token.
    AwaitingRefresh,
    /// Re-issued with the refreshed token.
    Retried,
}

impl RetryPhase {
    /// Phase after a `401`, or `None` if the request cannot be retried.
    pub fn on_unauthorized(self) -> Option<Self> {
        match self {
            Self::Initial => Some(Self::AwaitingRefresh),
            Self::AwaitingRefresh | Self::Retried => None,
        }
    }

    /// Phase after the refresh produced a token.
    pub fn on_refreshed(self) -> Self {
        Self::Retried
    }

    /// Whether the request has already been re-issued.
    pub fn is_retry(self) -> bool {
        self == Self::Retried
    }
}

/// Runs every backend call of the application.
///
/// Cheap to clone; clones share the session, transport and refresh guard.
#[derive(Clone)]
pub struct RequestExecutor {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    refresher: Arc<RefreshCoordinator>,
    notifier: Arc<dyn Notifier>,
}

impl RequestExecutor {
    /// Create an executor.
    pub fn new(
        config: Arc<ClientConfig>,
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let refresher = Arc::new(RefreshCoordinator::new(
            config.clone(),
            transport.clone(),
            session.clone(),
        ));
        Self {
            config,
            transport,
            session,
            refresher,
            notifier,
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The shared session.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Execute a request and return the parsed JSON body.
    ///
    /// `Ok(None)` means the backend answered `204` or an empty body.
    pub async fn execute(&self, endpoint: &str, options: RequestOptions) -> ApiResult<Option<Value>> {
        let result = self.run(endpoint, &options).await;
        self.finish(endpoint, result)
    }

    /// Execute a request and deserialize the body into `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<Option<T>> {
        let result = self.run(endpoint, &options).await.and_then(|body| {
            body.map(serde_json::from_value)
                .transpose()
                .map_err(ApiError::from)
        });
        self.finish(endpoint, result)
    }

    /// GET and deserialize a required body.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.required(endpoint, RequestOptions::get()).await
    }

    /// GET a list endpoint, unwrapping `{data: ...}` envelopes.
    pub async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Vec<T>> {
        let result = self
            .run(endpoint, &RequestOptions::get())
            .await
            .and_then(|body| unwrap_envelope_as(body.unwrap_or(Value::Null)));
        self.finish(endpoint, result)
    }

    /// POST a JSON body and deserialize the response.
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match encode(body) {
            Ok(body) => self.required(endpoint, RequestOptions::post(body)).await,
            Err(e) => self.finish(endpoint, Err(e)),
        }
    }

    /// PUT a JSON body and deserialize the response.
    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match encode(body) {
            Ok(body) => self.required(endpoint, RequestOptions::put(body)).await,
            Err(e) => self.finish(endpoint, Err(e)),
        }
    }

    /// PATCH a JSON body and deserialize the response.
    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match encode(body) {
            Ok(body) => self.required(endpoint, RequestOptions::patch(body)).await,
            Err(e) => self.finish(endpoint, Err(e)),
        }
    }

    /// DELETE, ignoring any response body.
    pub async fn delete(&self, endpoint: &str) -> ApiResult<()> {
        self.execute(endpoint, RequestOptions::delete())
            .await
            .map(|_| ())
    }

    async fn required<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let result = self.run(endpoint, &options).await.and_then(|body| {
            let body = body.ok_or_else(|| ApiError::malformed("empty response body"))?;
            Ok(serde_json::from_value(body)?)
        });
        self.finish(endpoint, result)
    }

    /// Report a terminal failure. Called once per logical request.
    fn finish<T>(&self, endpoint: &str, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(e) = &result {
            warn!(endpoint, error = %e, "Request failed");
            self.notifier.error(&e.user_message());
        }
        result
    }

    async fn run(&self, endpoint: &str, options: &RequestOptions) -> ApiResult<Option<Value>> {
        let url = self.config.endpoint_url(endpoint)?;
        let mut phase = RetryPhase::Initial;
        let mut access_token = if options.skip_auth {
            None
        } else {
            self.session.tokens().access_token()
        };

        loop {
            let request = options.prepare(url.clone(), access_token.as_deref());
            let response = self.transport.send(request).await?;
            let status = response.status;

            match classify(response) {
                Outcome::Success(body) => {
                    debug!(endpoint, status, retried = phase.is_retry(), "Request succeeded");
                    return Ok(body);
                }
                Outcome::Failed(e) => return Err(e),
                Outcome::Unauthorized(e) if options.skip_auth => return Err(e),
                Outcome::Unauthorized(_) => {
                    let Some(next) = phase.on_unauthorized() else {
                        warn!(endpoint, "Still unauthorized after refresh");
                        self.session.end(EndReason::Expired);
                        return Err(ApiError::AuthExpired);
                    };
                    phase = next;

                    debug!(endpoint, "Access token rejected, refreshing");
                    match self.refresher.refresh(access_token.as_deref()).await {
                        Some(token) => {
                            access_token = Some(token);
                            phase = phase.on_refreshed();
                        }
                        None => return Err(ApiError::AuthExpired),
                    }
                }
            }
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    Ok(serde_json::to_value(body)?)
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.config.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}
