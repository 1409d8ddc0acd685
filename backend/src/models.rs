use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct ConfigurationRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub names: Vec<String>,
    pub segment_count: i32,
    pub share_slug: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct SpinRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub configuration_id: Option<Uuid>,
    pub winner_label: String,
    pub is_respin: bool,
    pub power: f64,
    pub created_at: OffsetDateTime,
    pub acknowledged_at: Option<OffsetDateTime>,
    pub acknowledged_method: Option<String>,
}

/// Shared-link lookup row: configuration joined with its session's team name.
#[derive(Debug, sqlx::FromRow)]
pub struct SharedConfigurationRow {
    pub id: Uuid,
    pub names: Vec<String>,
    pub segment_count: i32,
    pub team_name: Option<String>,
}
