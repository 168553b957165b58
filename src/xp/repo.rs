use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct XpEvent {
    pub id: i64,
    pub user_id: i64,
    pub date_epoch_day: i32,
    pub kind: String,
    pub points: i32,
    pub note: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserAchievement {
    pub id: i64,
    pub user_id: i64,
    pub code: String,
    pub created_at: OffsetDateTime,
}

/// Record an XP event. Idempotent on (user, day, type, note): a re-sent
/// event returns the existing row unchanged.
pub async fn record_event(
    db: &PgPool,
    user_id: i64,
    date_epoch_day: i32,
    kind: &str,
    points: i32,
    note: &str,
) -> sqlx::Result<XpEvent> {
    let inserted = sqlx::query_as::<_, XpEvent>(
        r#"
        INSERT INTO xp_events (user_id, date_epoch_day, type, points, note, created_at)
        VALUES ($1, $2, $3, $4, $5, now())
        ON CONFLICT (user_id, date_epoch_day, type, note) DO NOTHING
        RETURNING id, user_id, date_epoch_day, type AS kind, points, note, created_at
        "#,
    )
    .bind(user_id)
    .bind(date_epoch_day)
    .bind(kind)
    .bind(points)
    .bind(note)
    .fetch_optional(db)
    .await?;

    if let Some(event) = inserted {
        return Ok(event);
    }

    sqlx::query_as::<_, XpEvent>(
        r#"
        SELECT id, user_id, date_epoch_day, type AS kind, points, note, created_at
        FROM xp_events
        WHERE user_id = $1 AND date_epoch_day = $2 AND type = $3 AND note = $4
        "#,
    )
    .bind(user_id)
    .bind(date_epoch_day)
    .bind(kind)
    .bind(note)
    .fetch_one(db)
    .await
}

pub async fn total_points(db: &PgPool, user_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(points), 0) FROM xp_events WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(db)
    .await
}

pub async fn unlock_achievement(
    db: &PgPool,
    user_id: i64,
    code: &str,
) -> sqlx::Result<UserAchievement> {
    let inserted = sqlx::query_as::<_, UserAchievement>(
        r#"
        INSERT INTO user_achievements (user_id, code, created_at)
        VALUES ($1, $2, now())
        ON CONFLICT (user_id, code) DO NOTHING
        RETURNING id, user_id, code, created_at
        "#,
    )
    .bind(user_id)
    .bind(code)
    .fetch_optional(db)
    .await?;

    if let Some(a) = inserted {
        return Ok(a);
    }

    sqlx::query_as::<_, UserAchievement>(
        "SELECT id, user_id, code, created_at FROM user_achievements WHERE user_id = $1 AND code = $2",
    )
    .bind(user_id)
    .bind(code)
    .fetch_one(db)
    .await
}

pub async fn list_achievements(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<UserAchievement>> {
    sqlx::query_as::<_, UserAchievement>(
        r#"
        SELECT id, user_id, code, created_at
        FROM user_achievements
        WHERE user_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
