use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct StepEntry {
    pub id: i64,
    pub user_id: i64,
    pub date_epoch_day: i32,
    pub steps: i32,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct WaterEntry {
    pub id: i64,
    pub user_id: i64,
    pub date_epoch_day: i32,
    pub amount_ml: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct WeightEntry {
    pub id: i64,
    pub user_id: i64,
    pub date_epoch_day: i32,
    pub weight_kg: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One row per user per day; offline clients re-send totals, so the upsert
/// overwrites rather than accumulates.
pub async fn upsert_steps(
    db: &PgPool,
    user_id: i64,
    date_epoch_day: i32,
    steps: i32,
) -> sqlx::Result<StepEntry> {
    sqlx::query_as::<_, StepEntry>(
        r#"
        INSERT INTO step_entries (user_id, date_epoch_day, steps, updated_at)
        VALUES ($1, $2, $3, now())
        ON CONFLICT (user_id, date_epoch_day)
        DO UPDATE SET steps = EXCLUDED.steps, updated_at = now()
        RETURNING id, user_id, date_epoch_day, steps, updated_at
        "#,
    )
    .bind(user_id)
    .bind(date_epoch_day)
    .bind(steps)
    .fetch_one(db)
    .await
}

pub async fn list_steps(
    db: &PgPool,
    user_id: i64,
    from: i32,
    to: i32,
) -> sqlx::Result<Vec<StepEntry>> {
    sqlx::query_as::<_, StepEntry>(
        r#"
        SELECT id, user_id, date_epoch_day, steps, updated_at
        FROM step_entries
        WHERE user_id = $1 AND date_epoch_day BETWEEN $2 AND $3
        ORDER BY date_epoch_day
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
}

pub async fn delete_steps(db: &PgPool, user_id: i64, date_epoch_day: i32) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM step_entries WHERE user_id = $1 AND date_epoch_day = $2")
        .bind(user_id)
        .bind(date_epoch_day)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn add_water(
    db: &PgPool,
    user_id: i64,
    date_epoch_day: i32,
    amount_ml: i32,
) -> sqlx::Result<WaterEntry> {
    sqlx::query_as::<_, WaterEntry>(
        r#"
        INSERT INTO water_entries (user_id, date_epoch_day, amount_ml, created_at)
        VALUES ($1, $2, $3, now())
        RETURNING id, user_id, date_epoch_day, amount_ml, created_at
        "#,
    )
    .bind(user_id)
    .bind(date_epoch_day)
    .bind(amount_ml)
    .fetch_one(db)
    .await
}

pub async fn list_water_for_day(
    db: &PgPool,
    user_id: i64,
    date_epoch_day: i32,
) -> sqlx::Result<Vec<WaterEntry>> {
    sqlx::query_as::<_, WaterEntry>(
        r#"
        SELECT id, user_id, date_epoch_day, amount_ml, created_at
        FROM water_entries
        WHERE user_id = $1 AND date_epoch_day = $2
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .bind(date_epoch_day)
    .fetch_all(db)
    .await
}

pub async fn delete_water_for_day(
    db: &PgPool,
    user_id: i64,
    date_epoch_day: i32,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM water_entries WHERE user_id = $1 AND date_epoch_day = $2")
        .bind(user_id)
        .bind(date_epoch_day)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn upsert_weight(
    db: &PgPool,
    user_id: i64,
    date_epoch_day: i32,
    weight_kg: f64,
) -> sqlx::Result<WeightEntry> {
    sqlx::query_as::<_, WeightEntry>(
        r#"
        INSERT INTO weight_entries (user_id, date_epoch_day, weight_kg, created_at, updated_at)
        VALUES ($1, $2, $3, now(), now())
        ON CONFLICT (user_id, date_epoch_day)
        DO UPDATE SET weight_kg = EXCLUDED.weight_kg, updated_at = now()
        RETURNING id, user_id, date_epoch_day, weight_kg, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(date_epoch_day)
    .bind(weight_kg)
    .fetch_one(db)
    .await
}

pub async fn list_weight(
    db: &PgPool,
    user_id: i64,
    from: i32,
    to: i32,
) -> sqlx::Result<Vec<WeightEntry>> {
    sqlx::query_as::<_, WeightEntry>(
        r#"
        SELECT id, user_id, date_epoch_day, weight_kg, created_at, updated_at
        FROM weight_entries
        WHERE user_id = $1 AND date_epoch_day BETWEEN $2 AND $3
        ORDER BY date_epoch_day
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
}

pub async fn delete_weight(db: &PgPool, user_id: i64, date_epoch_day: i32) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM weight_entries WHERE user_id = $1 AND date_epoch_day = $2")
        .bind(user_id)
        .bind(date_epoch_day)
        .execute(db)
        .await?;
    Ok(())
}
