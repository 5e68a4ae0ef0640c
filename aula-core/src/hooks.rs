//! UI collaborators driven by the pipeline.
//!
//! The pipeline never renders anything itself. It reports terminal failures
//! to a [`Notifier`] and asks a [`Navigator`] to move between the login and
//! home surfaces.

use parking_lot::Mutex;
use std::fmt;

/// Fire-and-forget sink for user-visible error messages.
pub trait Notifier: Send + Sync {
    /// Show an error message to the user.
    fn error(&self, message: &str);
}

/// Surfaces the session controller navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The login surface.
    Login,
    /// The default authenticated surface.
    Home,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => write!(f, "login"),
            Route::Home => write!(f, "home"),
        }
    }
}

/// Routing layer hook.
pub trait Navigator: Send + Sync {
    /// Navigate to a surface.
    fn navigate(&self, route: Route);
}

/// Notifier that logs through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(notification = %message, "User notification");
    }
}

/// Navigator that ignores navigation requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "Navigation ignored");
    }
}

/// Notifier that records every message, for tests and headless use.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Number of messages received.
    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Navigator that records every route, for tests and headless use.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes visited so far.
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }

    /// The most recent route.
    pub fn last(&self) -> Option<Route> {
        self.routes.lock().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}
