//! Shared fixtures for pipeline tests.

use crate::controller::SessionController;
use crate::executor::RequestExecutor;
use crate::refresh::RefreshCoordinator;
use crate::transport::{ReqwestTransport, Transport};
use aula_core::{ClientConfig, RecordingNavigator, RecordingNotifier, SessionIdentity, TokenPair};
use aula_session::{MemoryStorage, Session};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub(crate) struct Harness {
    pub config: Arc<ClientConfig>,
    pub storage: MemoryStorage,
    pub session: Arc<Session>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub transport: Arc<dyn Transport>,
    pub executor: RequestExecutor,
}

impl Harness {
    pub fn new(base_url: &str) -> Self {
        let config = ClientConfig::with_base_url(base_url)
            .unwrap()
            .timeout(Duration::from_secs(5));
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config).unwrap());
        Self::build(Arc::new(config), transport, MemoryStorage::new())
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let config = ClientConfig::with_base_url("http://backend.test").unwrap();
        Self::build(Arc::new(config), transport, MemoryStorage::new())
    }

    fn build(
        config: Arc<ClientConfig>,
        transport: Arc<dyn Transport>,
        storage: MemoryStorage,
    ) -> Self {
        let navigator = Arc::new(RecordingNavigator::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let session = Arc::new(Session::restore(
            Arc::new(storage.clone()),
            navigator.clone(),
        ));
        let executor = RequestExecutor::new(
            config.clone(),
            transport.clone(),
            session.clone(),
            notifier.clone(),
        );
        Self {
            config,
            storage,
            session,
            notifier,
            navigator,
            transport,
            executor,
        }
    }

    pub async fn signed_out(server: &MockServer) -> Self {
        Self::new(&server.uri())
    }

    pub async fn signed_in(server: &MockServer) -> Self {
        Self::with_tokens(server, TokenPair::new("T1", Some("R1".to_string()))).await
    }

    pub async fn with_tokens(server: &MockServer, tokens: TokenPair) -> Self {
        let h = Self::new(&server.uri());
        h.sign_in(tokens);
        h
    }

    /// Backend that refuses connections.
    pub fn unreachable() -> Self {
        Self::new("http://127.0.0.1:1")
    }

    pub fn sign_in(&self, tokens: TokenPair) {
        self.session.begin_authentication();
        self.session.establish(tokens, identity());
    }

    pub fn refresher(&self) -> RefreshCoordinator {
        RefreshCoordinator::new(
            self.config.clone(),
            self.transport.clone(),
            self.session.clone(),
        )
    }

    pub fn controller(&self) -> SessionController {
        SessionController::new(self.executor.clone())
    }

    /// A new pipeline over the same durable storage, as after a reload.
    pub fn restart(&self) -> Self {
        Self::build(
            self.config.clone(),
            self.transport.clone(),
            self.storage.clone(),
        )
    }
}

pub(crate) fn identity() -> SessionIdentity {
    SessionIdentity::new(7, "a@b.com", None, "ADMIN")
}
