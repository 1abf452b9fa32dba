//! Cross-origin policy.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Origins allowed to talk to the relay
///
/// WebSocket upgrades are accepted only when the request's `Origin` header
/// exactly matches one of the allowed origins. Requests without an `Origin`
/// header are rejected as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// Create a policy from configured origins.
    ///
    /// Trailing slashes are dropped since browsers never send them.
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|origin| origin.as_ref().trim_end_matches('/').to_string())
                .collect(),
        }
    }

    /// Check the declared origin of a request
    pub fn permits(&self, origin: Option<&str>) -> bool {
        origin.is_some_and(|origin| self.allowed.iter().any(|allowed| allowed == origin))
    }

    /// CORS layer for the plain HTTP routes
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Ignoring invalid allowed origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
    }
}
