//! One-stop wiring of the request pipeline.

use aula_client::{RequestExecutor, ReqwestTransport, SessionController, Transport};
use aula_core::{
    ApiResult, ClientConfig, Navigator, NoopNavigator, Notifier, SessionIdentity, TracingNotifier,
};
use aula_session::{DurableStorage, FileStorage, MemoryStorage, Session};
use std::sync::Arc;
use tracing::info;

/// A configured client: one executor and one session controller sharing a
/// single session.
///
/// # Example
///
/// ```ignore
/// use aula::prelude::*;
///
/// let aula = Aula::builder()
///     .config(ClientConfig::from_env()?)
///     .navigator(router.clone())
///     .build()?;
///
/// aula.login("a@b.com", "secret").await?;
/// let groups: Vec<Group> = aula.executor().get_list("/api/groups").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Aula {
    executor: RequestExecutor,
    controller: SessionController,
}

impl Aula {
    /// Start building a client.
    pub fn builder() -> AulaBuilder {
        AulaBuilder::default()
    }

    /// Client with default wiring over `config`.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Self::builder().config(config).build()
    }

    /// The request executor every backend call should use.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// The login and logout surface.
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// See [`SessionController::login`].
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<SessionIdentity> {
        self.controller.login(email, password).await
    }

    /// See [`SessionController::logout`].
    pub fn logout(&self) {
        self.controller.logout();
    }

    /// See [`SessionController::is_authenticated`].
    pub fn is_authenticated(&self) -> bool {
        self.controller.is_authenticated()
    }
}

/// Builder for [`Aula`].
///
/// Unset collaborators default to:
/// - storage: [`FileStorage`] under `config.storage_dir`, else [`MemoryStorage`]
/// - transport: [`ReqwestTransport`]
/// - notifier: [`TracingNotifier`]
/// - navigator: [`NoopNavigator`]
#[derive(Default)]
pub struct AulaBuilder {
    config: Option<ClientConfig>,
    storage: Option<Arc<dyn DurableStorage>>,
    transport: Option<Arc<dyn Transport>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl AulaBuilder {
    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the durable storage backend.
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn DurableStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the HTTP transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the error notifier.
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the navigator.
    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Wire everything and rehydrate any stored session.
    pub fn build(self) -> ApiResult<Aula> {
        let config = self.config.unwrap_or_default();

        let storage: Arc<dyn DurableStorage> = match (self.storage, &config.storage_dir) {
            (Some(storage), _) => storage,
            (None, Some(dir)) => Arc::new(FileStorage::open(dir.clone())?),
            (None, None) => Arc::new(MemoryStorage::new()),
        };
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config)?),
        };
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingNotifier));
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(NoopNavigator));

        let session = Arc::new(Session::restore(storage, navigator));
        info!(
            base_url = %config.base_url,
            authenticated = session.is_authenticated(),
            "Client ready"
        );

        let executor = RequestExecutor::new(Arc::new(config), transport, session, notifier);
        let controller = SessionController::new(executor.clone());
        Ok(Aula {
            executor,
            controller,
        })
    }
}

impl std::fmt::Debug for AulaBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AulaBuilder")
            .field("config", &self.config)
            .field("custom_storage", &self.storage.is_some())
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::{ApiError, RecordingNavigator, RecordingNotifier, Route};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "T1",
                "refreshToken": "R1",
                "userId": 7,
                "email": "a@b.com",
                "nombre": "Ana",
                "role": "ADMIN"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/groups"))
            .and(header("Authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 1}, {"id": 2}]
            })))
            .mount(&server)
            .await;
        server
    }

    fn config(server: &MockServer) -> ClientConfig {
        ClientConfig::with_base_url(&server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_login_then_request() {
        let server = backend().await;
        let navigator = Arc::new(RecordingNavigator::new());
        let aula = Aula::builder()
            .config(config(&server))
            .navigator(navigator.clone())
            .build()
            .unwrap();

        assert!(!aula.is_authenticated());
        let identity = aula.login("a@b.com", "x").await.unwrap();
        assert_eq!(identity.display_name, "Ana");
        assert!(aula.is_authenticated());

        let groups: Vec<serde_json::Value> = aula.executor().get_list("/api/groups").await.unwrap();
        assert_eq!(groups.len(), 2);

        aula.logout();
        assert!(!aula.is_authenticated());
        assert_eq!(navigator.routes(), vec![Route::Home, Route::Login]);
    }

    #[tokio::test]
    async fn test_file_storage_survives_rebuild() {
        let server = backend().await;
        let dir = tempfile::tempdir().unwrap();
        let config = config(&server).storage_dir(dir.path());

        let first = Aula::new(config.clone()).unwrap();
        first.login("a@b.com", "x").await.unwrap();

        let second = Aula::new(config).unwrap();
        assert!(second.is_authenticated());
        assert_eq!(
            second.controller().identity().map(|user| user.id),
            Some(7)
        );
    }

    #[tokio::test]
    async fn test_custom_notifier_receives_failures() {
        let server = MockServer::start().await;
        Mock::given(path("/api/rooms"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not Found"})))
            .mount(&server)
            .await;

        let notifier = Arc::new(RecordingNotifier::new());
        let aula = Aula::builder()
            .config(config(&server))
            .storage(Arc::new(MemoryStorage::new()))
            .notifier(notifier.clone())
            .build()
            .unwrap();

        let err = aula.executor().delete("/api/rooms").await.unwrap_err();
        assert_eq!(err, ApiError::request_failed(404, "Not Found"));
        assert_eq!(notifier.messages(), vec!["Not Found"]);
    }

    #[test]
    fn test_default_build() {
        let aula = Aula::builder().build().unwrap();
        assert!(!aula.is_authenticated());
        assert_eq!(
            aula.executor().config().base_url.as_str(),
            "http://localhost:3000/"
        );
    }
}
