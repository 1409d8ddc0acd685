use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use shared::rate_limit::{get_rate_limit_key, RateLimitCheck, RateLimitType};
use shared::wheel_api::{
    AckResponse, AcknowledgeSpinRequest, RecordSpinRequest, SaveConfigurationRequest,
    ShareConfigurationRequest, ShareConfigurationResponse, SharedConfigurationResponse,
    UpsertSessionRequest,
};

use crate::error::Error;
use crate::services::{configuration_service, session_service, spin_service};
use crate::{client_ip, AppState};

pub async fn upsert_session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpsertSessionRequest>,
) -> Result<Json<Value>, Error> {
    session_service::upsert_session(&state.pool, &request, client_ip(&headers)).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn save_configuration_handler(
    State(state): State<AppState>,
    Json(request): Json<SaveConfigurationRequest>,
) -> Result<Json<Value>, Error> {
    configuration_service::save_configuration(&state.pool, &request).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn share_configuration_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(configuration_id): Path<Uuid>,
    Json(request): Json<ShareConfigurationRequest>,
) -> Result<Json<ShareConfigurationResponse>, Error> {
    check_share_rate_limit(&state, client_ip(&headers)).await?;

    let share_slug = configuration_service::share_configuration(
        &state.pool,
        configuration_id,
        request.team_name.as_deref(),
    )
    .await?;
    Ok(Json(ShareConfigurationResponse { share_slug }))
}

pub async fn get_shared_configuration_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<SharedConfigurationResponse>, Error> {
    let config = configuration_service::get_shared_configuration(&state.pool, &slug).await?;
    Ok(Json(config))
}

pub async fn record_spin_handler(
    State(state): State<AppState>,
    Json(request): Json<RecordSpinRequest>,
) -> Result<Json<Value>, Error> {
    spin_service::record_spin(&state.pool, &request).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn acknowledge_spin_handler(
    State(state): State<AppState>,
    Path(spin_id): Path<Uuid>,
    Json(request): Json<AcknowledgeSpinRequest>,
) -> Result<Json<AckResponse>, Error> {
    let updated = spin_service::acknowledge_spin(&state.pool, spin_id, &request).await?;
    Ok(Json(AckResponse {
        success: true,
        message: (!updated).then(|| "Spin was already acknowledged".to_string()),
    }))
}

/// Share-link creation is far more restricted than the general API window.
/// Redis being unreachable fails open, same as the api-wide middleware.
async fn check_share_rate_limit(state: &AppState, ip: Option<String>) -> Result<(), Error> {
    let ip = ip.unwrap_or_else(|| "unknown".to_string());
    let key = get_rate_limit_key(RateLimitType::Share, &ip);

    if let Ok(mut conn) = state.redis.get_async_connection().await {
        let attempts: Option<u32> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .unwrap_or(None);

        let check = RateLimitCheck::new(attempts.unwrap_or(0), RateLimitType::Share);
        if check.is_locked {
            warn!("share rate limit hit for {}", ip);
            return Err(Error::RateLimited(RateLimitType::Share.get_error_message()));
        }

        let _: () = redis::cmd("SETEX")
            .arg(&key)
            .arg(RateLimitType::Share.get_window().as_secs())
            .arg(attempts.unwrap_or(0) + 1)
            .query_async(&mut conn)
            .await
            .unwrap_or(());
    }
    Ok(())
}
