use sqlx::PgPool;
use tracing::{debug, info};

use shared::validation::validate_team_name;
use shared::wheel_api::UpsertSessionRequest;

use crate::error::Error;

/// Session team names feed the public share page straight from the
/// database, so they get the same screen as the share path.
fn screen_team_name(request: &UpsertSessionRequest) -> Result<(), Error> {
    if let Some(team_name) = request.team_name.as_deref() {
        validate_team_name(team_name)?;
    }
    Ok(())
}

/// Sessions are minted client-side; the first push creates the row and any
/// later push just refreshes `updated_at` and fills in metadata the client
/// learned since (e.g. a team name entered before sharing).
pub async fn upsert_session(
    pool: &PgPool,
    request: &UpsertSessionRequest,
    client_ip: Option<String>,
) -> Result<(), Error> {
    screen_team_name(request)?;

    let input_method = request.input_method.map(|m| m.as_str());
    let device_type = request.device_type.map(|d| d.as_str());

    sqlx::query(
        r#"
        INSERT INTO wheel_sessions (id, team_name, input_method, device_type, client_ip)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE SET
            updated_at = now(),
            team_name = COALESCE(EXCLUDED.team_name, wheel_sessions.team_name),
            input_method = COALESCE(EXCLUDED.input_method, wheel_sessions.input_method),
            device_type = COALESCE(EXCLUDED.device_type, wheel_sessions.device_type)
        "#,
    )
    .bind(request.session_id)
    .bind(&request.team_name)
    .bind(input_method)
    .bind(device_type)
    .bind(client_ip)
    .execute(pool)
    .await?;

    debug!("upserted session {}", request.session_id);
    Ok(())
}

/// Drops sessions that never produced a shared configuration and have been
/// idle past the retention window. Runs from the hourly maintenance loop.
pub async fn prune_stale_sessions(pool: &PgPool, retention_days: i64) -> Result<u64, Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM wheel_sessions s
        WHERE s.updated_at < now() - make_interval(days => $1::int)
          AND NOT EXISTS (
              SELECT 1 FROM wheel_configurations c
              WHERE c.session_id = s.id AND c.share_slug IS NOT NULL
          )
        "#,
    )
    .bind(retention_days)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        info!("pruned {} stale sessions", result.rows_affected());
    }
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::constants::MAX_TEAM_NAME_LENGTH;
    use uuid::Uuid;

    fn request(team_name: Option<&str>) -> UpsertSessionRequest {
        UpsertSessionRequest {
            session_id: Uuid::new_v4(),
            team_name: team_name.map(str::to_string),
            input_method: None,
            device_type: None,
        }
    }

    #[test]
    fn team_name_is_screened_before_storage() {
        assert!(screen_team_name(&request(None)).is_ok());
        assert!(screen_team_name(&request(Some("Design Standup"))).is_ok());
        assert!(screen_team_name(&request(Some("   "))).is_err());
        assert!(screen_team_name(&request(Some("fuck this team"))).is_err());

        let overlong = "x".repeat(MAX_TEAM_NAME_LENGTH + 1);
        assert!(screen_team_name(&request(Some(&overlong))).is_err());
    }
}
