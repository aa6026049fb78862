//! Resolver construction from configuration.

use std::time::Duration;

use crate::config::TubeportConfig;
use crate::error::{Error, Result};

use super::backend::BoxedBackend;
use super::chain::Resolver;
use super::invidious::InvidiousBackend;
use super::local::LocalBackend;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client.
///
/// # Errors
///
/// Returns [`Error::Config`] if the TLS backend cannot be initialized.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))
}

/// Create a resolver with both backends registered.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn create_resolver(config: &TubeportConfig) -> Result<Resolver> {
    let client = http_client(Duration::from_secs(config.request_timeout_secs))?;

    let backends = vec![
        BoxedBackend::new(LocalBackend::new(client.clone())),
        BoxedBackend::new(InvidiousBackend::new(client, config.invidious_instance.clone())),
    ];

    tracing::debug!(
        preference = %config.backend_preference,
        fallback = config.backend_fallback,
        instance = %config.invidious_instance,
        "Created channel resolver"
    );

    Ok(Resolver::new(
        backends,
        config.backend_preference,
        config.backend_fallback,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::BackendKind;

    #[test]
    fn test_create_resolver_honors_config() {
        let config = TubeportConfig {
            backend_preference: BackendKind::Invidious,
            backend_fallback: false,
            ..TubeportConfig::default()
        };
        let resolver = create_resolver(&config).unwrap();
        assert_eq!(resolver.preference(), BackendKind::Invidious);
        let order = resolver.attempt_order();
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].kind(), BackendKind::Invidious);
    }

    #[test]
    fn test_default_config_tries_both() {
        let resolver = create_resolver(&TubeportConfig::default()).unwrap();
        let kinds: Vec<BackendKind> = resolver.attempt_order().iter().map(|b| b.kind()).collect();
        assert_eq!(kinds, vec![BackendKind::Local, BackendKind::Invidious]);
    }
}
