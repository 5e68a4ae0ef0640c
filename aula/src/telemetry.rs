//! Log output for applications embedding the client.
//!
//! Filtering follows `RUST_LOG`; without it everything at `info` and above
//! is printed. The pipeline logs under the `aula_client` and `aula_session`
//! targets, so `RUST_LOG=aula_client=debug` shows every dispatched request.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "info";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install a human-readable subscriber.
///
/// Returns `false` if a global subscriber was already set.
pub fn init() -> bool {
    init_with(DEFAULT_DIRECTIVE)
}

/// Install a human-readable subscriber with a fallback filter directive.
pub fn init_with(default: &str) -> bool {
    fmt().with_env_filter(filter(default)).try_init().is_ok()
}

/// Install a JSON subscriber, one object per line.
pub fn init_json() -> bool {
    fmt()
        .json()
        .with_env_filter(filter(DEFAULT_DIRECTIVE))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        let _ = init();
        assert!(!init());
        assert!(!init_json());
    }

    #[test]
    fn test_invalid_directive_falls_back() {
        // Must not panic.
        let _ = filter("not a [valid directive");
    }
}
