//! HTTP middleware: CORS and request tracing

use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::CorsConfig;

/// How long browsers may cache a preflight response.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// CORS layer for the delivery API.
///
/// The method list covers exactly what the routes serve. An empty origin
/// list or a literal `*` entry opens the API to any origin; in that mode
/// the credentials flag is ignored because `tower-http` refuses the
/// wildcard + credentials combination.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(PREFLIGHT_MAX_AGE);

    let wildcard = config.allowed_origins.is_empty()
        || config.allowed_origins.iter().any(|origin| origin == "*");
    if wildcard {
        return base.allow_origin(Any);
    }

    let mut origins: Vec<HeaderValue> = Vec::with_capacity(config.allowed_origins.len());
    for origin in &config.allowed_origins {
        match origin.parse() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!(%origin, "Ignoring unparseable CORS origin"),
        }
    }

    let mut layer = base.allow_origin(AllowOrigin::list(origins));
    if config.allow_credentials {
        layer = layer.allow_credentials(true);
    }
    layer
}

/// Request span + response logging for every route.
pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(tower_http::LatencyUnit::Micros),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(origins: &[&str], credentials: bool) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            allow_credentials: credentials,
        }
    }

    #[test]
    fn test_explicit_origins_with_credentials() {
        cors_layer(&config(&["http://localhost:3000", "https://ops.dts.internal"], true));
    }

    // tower-http panics if credentials are combined with a wildcard
    // origin; the layer must drop the flag instead.
    #[test]
    fn test_wildcard_never_carries_credentials() {
        cors_layer(&config(&[], true));
        cors_layer(&config(&["*"], true));
        cors_layer(&config(&["https://ops.dts.internal", "*"], true));
    }

    #[test]
    fn test_garbage_origin_is_skipped() {
        cors_layer(&config(&["http://localhost:3000", "not a header value\u{7f}"], false));
    }
}
