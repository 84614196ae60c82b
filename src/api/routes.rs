use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

#[cfg(not(test))]
use {
    crate::Error,
    axum::extract::ConnectInfo,
    std::net::{IpAddr, SocketAddr},
    std::sync::Arc,
    tower_governor::{governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorLayer},
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::Settings;
use crate::Result;

/// Interval after which one request of the per-IP quota is restored
pub fn replenish_period(requests_per_second: u64) -> Duration {
    let per_second = u32::try_from(requests_per_second.max(1)).unwrap_or(u32::MAX);
    (Duration::from_secs(1) / per_second).max(Duration::from_nanos(1))
}

/// Create the router with all endpoints
#[cfg_attr(test, allow(unused_variables))]
pub fn create_router(state: AppState, settings: &Settings) -> Result<Router> {
    // Public query routes - read-only, no authentication required
    #[cfg_attr(test, allow(unused_mut))]
    let mut query_routes = Router::new()
        .route("/recommend", get(api_handlers::recommend))
        .route("/recommend/", get(api_handlers::recommend))
        .route("/api/recipe", get(api_handlers::get_recipe))
        .route("/api/recipes/:index", get(api_handlers::get_recipe_at))
        .route("/api/suggested", get(api_handlers::suggested))
        .route("/api/stats", get(api_handlers::get_stats))
        .with_state(state.clone());

    // Apply rate limiting only in non-test builds
    // NOTE: Rate limiting keys on the peer IP and falls back to 127.0.0.1 when
    // it is unavailable. Behind a reverse proxy, switch to a header-based
    // key extractor.
    #[cfg(not(test))]
    {
        #[derive(Clone, Copy, Debug)]
        struct FallbackIpKeyExtractor;

        impl KeyExtractor for FallbackIpKeyExtractor {
            type Key = IpAddr;

            fn extract<B>(
                &self,
                req: &axum::http::Request<B>,
            ) -> std::result::Result<Self::Key, tower_governor::GovernorError> {
                if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
                    return Ok(addr.ip());
                }

                Ok(IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)))
            }
        }

        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(FallbackIpKeyExtractor)
                .period(replenish_period(settings.server.api_rate_limit))
                .burst_size((settings.server.api_rate_limit as u32).saturating_mul(2))
                .finish()
                .ok_or_else(|| Error::Config("Invalid API rate limit settings".to_string()))?,
        );
        let governor_layer = GovernorLayer {
            config: governor_conf,
        };
        query_routes = query_routes.layer(governor_layer);
    }

    let query_routes = query_routes;

    let health_routes = Router::new()
        .route("/health", get(api_handlers::health_check))
        .route("/ready", get(api_handlers::readiness_check))
        .with_state(state);

    let router = Router::new()
        .merge(query_routes)
        .merge(health_routes)
        .layer(RequestBodyLimitLayer::new(
            settings.pagination.max_request_body_size,
        ))
        .layer(
            // CORS - allow all origins for the read-only API
            CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            settings.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
