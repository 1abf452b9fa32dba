//! HTTP endpoint handlers.

/// Liveness check endpoint
pub async fn liveness() -> &'static str {
    "server is running"
}
