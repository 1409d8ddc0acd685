use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::http::header::HeaderName;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{extract::State, middleware, Router};
use redis::Client as RedisClient;
use serde_json::json;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

use shared::rate_limit::{get_rate_limit_key, RateLimitCheck, RateLimitType};

use crate::handlers::{
    acknowledge_spin_handler, get_shared_configuration_handler, record_spin_handler,
    save_configuration_handler, share_configuration_handler, upsert_session_handler,
};
use crate::services::session_service::prune_stale_sessions;

mod error;
mod handlers;
mod logging;
mod models;
mod services;

#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    redis: RedisClient,
}

/// Sessions with no shared configuration are dropped after this many idle days.
const SESSION_RETENTION_DAYS: i64 = 30;

struct RateLimitError;

impl axum::response::IntoResponse for RateLimitError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({ "error": "Too many requests, please try again later." });
        axum::response::Response::builder()
            .status(StatusCode::TOO_MANY_REQUESTS)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

pub async fn health_check() -> impl IntoResponse {
    Response::builder().status(200).body(Body::from("OK")).unwrap()
}

/// Client address as forwarded by the proxy chain: prefer
/// "cf-connecting-ip", then "x-forwarded-for", then "x-real-ip".
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(cf_ip) = headers.get("cf-connecting-ip") {
        if let Ok(ip_str) = cf_ip.to_str() {
            return Some(ip_str.trim().to_string());
        }
    }
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            return forwarded_str.split(',').next().map(|s| s.trim().to_string());
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(real_ip_str) = real_ip.to_str() {
            return Some(real_ip_str.trim().to_string());
        }
    }
    None
}

// Track which IP addresses have been logged, with timestamps
static LOGGED_IPS: Lazy<Mutex<HashMap<String, u64>>> = Lazy::new(|| Mutex::new(HashMap::new()));

// Time before we log the same IP again (in seconds)
const IP_LOG_EXPIRY: u64 = 3600;

// saturating_sub keeps a backwards clock step from underflowing.
fn visit_log_due(last_logged: Option<u64>, now: u64) -> bool {
    match last_logged {
        Some(last) => now.saturating_sub(last) > IP_LOG_EXPIRY,
        None => true,
    }
}

async fn log_visit_middleware(
    request: Request<Body>,
    next: middleware::Next,
) -> Result<Response<Body>, StatusCode> {
    let ip = client_ip(request.headers()).unwrap_or_else(|| "unknown".to_string());

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs();

    let should_log = {
        let mut logged_ips = LOGGED_IPS.lock().unwrap();
        let due = visit_log_due(logged_ips.get(&ip).copied(), now);
        if due {
            logged_ips.insert(ip.clone(), now);
        }
        due
    };

    if should_log {
        info!("👋 Visit from {}", ip);
    }

    Ok(next.run(request).await)
}

async fn ip_rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: middleware::Next,
) -> Result<Response<Body>, axum::response::Response> {
    let ip = client_ip(request.headers()).unwrap_or_else(|| "unknown".to_string());
    let key = get_rate_limit_key(RateLimitType::Api, &ip);

    if let Ok(mut conn) = state.redis.get_async_connection().await {
        let attempts: Option<u32> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .unwrap_or(None);

        let check = RateLimitCheck::new(attempts.unwrap_or(0), RateLimitType::Api);
        if check.is_locked {
            return Err(RateLimitError.into_response());
        }

        let _: () = redis::cmd("SETEX")
            .arg(&key)
            .arg(RateLimitType::Api.get_window().as_secs())
            .arg(attempts.unwrap_or(0) + 1)
            .query_async(&mut conn)
            .await
            .unwrap_or(());
    }

    Ok(next.run(request).await)
}

// Serves the built SPA for any non-API path so deep links like /shared/:slug
// resolve to the client-side router.
async fn serve_frontend_index(
) -> Result<(StatusCode, [(HeaderName, &'static str); 1], Vec<u8>), (StatusCode, &'static str)> {
    let candidates = ["frontend/dist/index.html", "../frontend/dist/index.html"];
    for path in candidates {
        if let Ok(data) = tokio::fs::read(path).await {
            return Ok((StatusCode::OK, [(header::CONTENT_TYPE, "text/html")], data));
        }
    }
    error!("index.html not found in any of {:?}", candidates);
    Err((StatusCode::NOT_FOUND, "Not Found"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::setup();
    dotenvy::from_path(".env").ok();

    let state = AppState {
        pool: PgPool::connect_with(
            std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set")
                .parse::<sqlx::postgres::PgConnectOptions>()?
                .to_owned(),
        )
        .await
        .expect("Failed to create pool"),
        redis: RedisClient::open(
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
        )
        .expect("Failed to connect to Redis"),
    };

    sqlx::migrate!().run(&state.pool).await?;

    // Hourly maintenance: drop idle sessions nobody ever shared.
    let pool_clone = state.pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            if let Err(e) = prune_stale_sessions(&pool_clone, SESSION_RETENTION_DAYS).await {
                error!("Error pruning stale sessions: {:?}", e);
            }
        }
    });

    let api_routes = Router::new()
        .route("/health_check", get(health_check))
        .route("/sessions", post(upsert_session_handler))
        .route("/configurations", post(save_configuration_handler))
        .route("/configurations/:id/share", post(share_configuration_handler))
        .route("/shared/:slug", get(get_shared_configuration_handler))
        .route("/spins", post(record_spin_handler))
        .route("/spins/:id/acknowledge", post(acknowledge_spin_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            ip_rate_limit_middleware,
        ))
        .layer(middleware::from_fn(log_visit_middleware));

    let cors = CorsLayer::new()
        .allow_origin(vec![
            "http://127.0.0.1:8080".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(vec![
            HeaderName::from_static("content-type"),
            HeaderName::from_static("x-requested-with"),
        ]);

    let app = Router::new()
        .nest("/api", api_routes)
        .nest_service("/dist", ServeDir::new("frontend/dist"))
        .route("/", get(serve_frontend_index))
        .fallback(serve_frontend_index)
        .layer(cors)
        .with_state(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn client_ip_prefers_cloudflare_header() {
        let map = headers(&[
            ("cf-connecting-ip", " 198.51.100.7 "),
            ("x-forwarded-for", "203.0.113.1, 10.0.0.1"),
        ]);
        assert_eq!(client_ip(&map).as_deref(), Some("198.51.100.7"));
    }

    #[test]
    fn client_ip_takes_first_forwarded_hop() {
        let map = headers(&[("x-forwarded-for", "203.0.113.1, 10.0.0.1")]);
        assert_eq!(client_ip(&map).as_deref(), Some("203.0.113.1"));
    }

    #[test]
    fn client_ip_falls_back_to_real_ip_then_none() {
        let map = headers(&[("x-real-ip", "192.0.2.33")]);
        assert_eq!(client_ip(&map).as_deref(), Some("192.0.2.33"));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn visit_log_throttles_within_expiry() {
        assert!(visit_log_due(None, 1_000));
        assert!(!visit_log_due(Some(1_000), 1_000 + IP_LOG_EXPIRY));
        assert!(visit_log_due(Some(1_000), 1_001 + IP_LOG_EXPIRY));
    }

    #[test]
    fn visit_log_tolerates_clock_going_backwards() {
        assert!(!visit_log_due(Some(2_000), 1_000));
    }
}
