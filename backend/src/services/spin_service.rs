use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use shared::validation::validate_power;
use shared::wheel_api::{AcknowledgeSpinRequest, RecordSpinRequest};

use crate::error::Error;
use crate::models::SpinRecord;

pub async fn record_spin(pool: &PgPool, request: &RecordSpinRequest) -> Result<(), Error> {
    validate_power(request.power)?;
    if request.winner_label.trim().is_empty() {
        return Err(Error::Validation("blank_winner_label".to_string()));
    }

    let created_at = OffsetDateTime::from_unix_timestamp((request.timestamp_ms / 1000) as i64)
        .unwrap_or_else(|_| OffsetDateTime::now_utc());

    sqlx::query(
        r#"
        INSERT INTO wheel_spins
            (id, session_id, configuration_id, winner_label, is_respin, power, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(request.spin_id)
    .bind(request.session_id)
    .bind(request.configuration_id)
    .bind(&request.winner_label)
    .bind(request.is_respin)
    .bind(request.power)
    .bind(created_at)
    .execute(pool)
    .await?;

    if request.is_respin {
        info!("🎡 spin {} landed on the respin segment", request.spin_id);
    } else {
        info!(
            "🎡 spin {} resolved winner \"{}\" at power {:.2}",
            request.spin_id, request.winner_label, request.power
        );
    }
    Ok(())
}

/// Stamps the acknowledgment; idempotent, the first ack wins.
pub async fn acknowledge_spin(
    pool: &PgPool,
    spin_id: Uuid,
    request: &AcknowledgeSpinRequest,
) -> Result<bool, Error> {
    let acknowledged_at =
        OffsetDateTime::from_unix_timestamp((request.timestamp_ms / 1000) as i64)
            .unwrap_or_else(|_| OffsetDateTime::now_utc());

    let result = sqlx::query(
        r#"
        UPDATE wheel_spins
        SET acknowledged_at = $1, acknowledged_method = $2
        WHERE id = $3 AND acknowledged_at IS NULL
        "#,
    )
    .bind(acknowledged_at)
    .bind(request.method.as_str())
    .bind(spin_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        // Distinguish "already acknowledged" from "no such spin".
        let existing: Option<SpinRecord> = sqlx::query_as(
            r#"
            SELECT id, session_id, configuration_id, winner_label, is_respin, power,
                   created_at, acknowledged_at, acknowledged_method
            FROM wheel_spins WHERE id = $1
            "#,
        )
        .bind(spin_id)
        .fetch_optional(pool)
        .await?;
        return match existing {
            Some(_) => Ok(false),
            None => Err(Error::NotFound),
        };
    }
    Ok(true)
}
