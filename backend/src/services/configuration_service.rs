use rand::rngs::OsRng;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use shared::slug::{generate_slug, validate_slug};
use shared::validation::{validate_segment_labels, validate_team_name};
use shared::wheel_api::{SaveConfigurationRequest, SharedConfigurationResponse};

use crate::error::Error;
use crate::models::{ConfigurationRecord, SharedConfigurationRow};

/// Slug collisions are resolved by redrawing the random suffix.
const SLUG_ATTEMPTS: usize = 8;

pub async fn save_configuration(
    pool: &PgPool,
    request: &SaveConfigurationRequest,
) -> Result<(), Error> {
    validate_segment_labels(&request.names)?;
    if request.segment_count != request.names.len() {
        return Err(Error::Validation("segment_count_mismatch".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO wheel_configurations (id, session_id, names, segment_count)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(request.configuration_id)
    .bind(request.session_id)
    .bind(&request.names)
    .bind(request.segment_count as i32)
    .execute(pool)
    .await?;

    debug!(
        "saved configuration {} ({} names) for session {}",
        request.configuration_id,
        request.names.len(),
        request.session_id
    );
    Ok(())
}

/// Attaches a share slug to a configuration, or returns the existing one.
/// The slug is derived from the optional team name plus a random suffix and
/// redrawn on the rare suffix collision.
pub async fn share_configuration(
    pool: &PgPool,
    configuration_id: Uuid,
    team_name: Option<&str>,
) -> Result<String, Error> {
    if let Some(name) = team_name {
        validate_team_name(name)?;
    }

    let existing: ConfigurationRecord = sqlx::query_as(
        r#"
        SELECT id, session_id, names, segment_count, share_slug, created_at
        FROM wheel_configurations WHERE id = $1
        "#,
    )
    .bind(configuration_id)
    .fetch_one(pool)
    .await?;

    if let Some(slug) = existing.share_slug {
        return Ok(slug);
    }

    let mut rng = OsRng;
    for _ in 0..SLUG_ATTEMPTS {
        let slug = generate_slug(team_name, &mut rng);
        let result = sqlx::query(
            r#"
            UPDATE wheel_configurations
            SET share_slug = $1
            WHERE id = $2
              AND share_slug IS NULL
              AND NOT EXISTS (
                  SELECT 1 FROM wheel_configurations WHERE share_slug = $1
              )
            "#,
        )
        .bind(&slug)
        .bind(configuration_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 1 {
            info!("🔗 configuration {} shared as /{}", configuration_id, slug);
            return Ok(slug);
        }
    }

    // Either the suffix collided SLUG_ATTEMPTS times in a row or a
    // concurrent request won the race; re-read to distinguish.
    let (slug,): (Option<String>,) =
        sqlx::query_as("SELECT share_slug FROM wheel_configurations WHERE id = $1")
            .bind(configuration_id)
            .fetch_one(pool)
            .await?;
    slug.ok_or(Error::Database)
}

pub async fn get_shared_configuration(
    pool: &PgPool,
    slug: &str,
) -> Result<SharedConfigurationResponse, Error> {
    validate_slug(slug)?;

    let row: SharedConfigurationRow = sqlx::query_as(
        r#"
        SELECT c.id, c.names, c.segment_count, s.team_name
        FROM wheel_configurations c
        JOIN wheel_sessions s ON s.id = c.session_id
        WHERE c.share_slug = $1
        "#,
    )
    .bind(slug)
    .fetch_one(pool)
    .await?;

    Ok(SharedConfigurationResponse {
        configuration_id: row.id,
        names: row.names,
        segment_count: row.segment_count as usize,
        team_name: row.team_name,
    })
}
