//! Server-side proxy for the weather provider.
//!
//! Exposes `GET /api/weather?city=<name>` and forwards it to the provider
//! with a credential that never leaves the server.

use std::{net::SocketAddr, sync::Arc, time::Instant};

use anyhow::{Context, anyhow};
use axum::{
    Json, Router,
    body::Body,
    extract::{Query, Request, State, rejection::QueryRejection},
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};
use weather_core::{Config, WeatherProvider, WeatherQuery, provider::provider_from_config};

pub const CITY_REQUIRED: &str = "City is required";
pub const CITY_NOT_FOUND: &str = "City not found";
pub const SERVER_ERROR: &str = "Server error";

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[derive(Debug, Deserialize)]
pub struct CityParams {
    city: Option<String>,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(Any);

    Router::new()
        .route("/api/weather", get(weather_handler))
        .route("/health", get(health_handler))
        .with_state(Arc::new(state))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
}

pub async fn weather_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CityParams>, QueryRejection>,
) -> Response {
    // A query string that does not parse (e.g. `city` given twice) has no usable city.
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!(error = %rejection, "rejected query string");
            return error_response(StatusCode::BAD_REQUEST, CITY_REQUIRED);
        }
    };

    let city = params.city.as_deref().map(str::trim).unwrap_or_default();
    if city.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, CITY_REQUIRED);
    }

    let reply = match state.provider.fetch_raw(&WeatherQuery::City(city.to_string())).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(city, error = %e, "provider request failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
        }
    };

    if !reply.is_success() {
        // Every provider-side failure (bad key, rate limit, 5xx) reads as "not found".
        warn!(city, status = reply.status, "provider returned non-success status");
        let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
        return error_response(status, CITY_NOT_FOUND);
    }

    if let Err(e) = serde_json::from_str::<serde_json::Value>(&reply.body) {
        error!(city, error = %e, "provider returned a body that is not JSON");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
    }

    (StatusCode::OK, [(CONTENT_TYPE, "application/json")], reply.body).into_response()
}

pub async fn health_handler() -> &'static str {
    "ok"
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );

    response
}

/// Bind to the configured address and serve until Ctrl-C/SIGTERM.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;

    let socket_addr: SocketAddr = config
        .listen()
        .parse()
        .map_err(|e| anyhow!("invalid listen address '{}': {}", config.listen(), e))?;

    let listener = TcpListener::bind(socket_addr)
        .await
        .with_context(|| format!("error binding to {socket_addr}"))?;

    info!("weather proxy listening on http://{}", socket_addr);
    info!("  provider: {}", provider.base_url());

    let app = app(AppState::new(Arc::new(provider)));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("proxy server failed")?;

    info!("weather proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
