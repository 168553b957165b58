use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: i32,
    pub sex: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserSettings {
    pub id: i64,
    pub user_id: i64,
    pub calorie_mode: String,
    pub step_goal: i32,
    pub calorie_goal_override: Option<i32>,
    pub reminders_enabled: bool,
    pub updated_at: OffsetDateTime,
}

impl Profile {
    pub async fn find_by_user(db: &PgPool, user_id: i64) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, height_cm, weight_kg, age, sex, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn upsert(
        db: &PgPool,
        user_id: i64,
        height_cm: f64,
        weight_kg: f64,
        age: i32,
        sex: &str,
    ) -> sqlx::Result<Profile> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, height_cm, weight_kg, age, sex, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, now(), now())
            ON CONFLICT (user_id)
            DO UPDATE SET height_cm = EXCLUDED.height_cm,
                          weight_kg = EXCLUDED.weight_kg,
                          age = EXCLUDED.age,
                          sex = EXCLUDED.sex,
                          updated_at = now()
            RETURNING id, user_id, height_cm, weight_kg, age, sex, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(height_cm)
        .bind(weight_kg)
        .bind(age)
        .bind(sex)
        .fetch_one(db)
        .await
    }
}

impl UserSettings {
    pub async fn find_by_user(db: &PgPool, user_id: i64) -> sqlx::Result<Option<UserSettings>> {
        sqlx::query_as::<_, UserSettings>(
            r#"
            SELECT id, user_id, calorie_mode, step_goal, calorie_goal_override,
                   reminders_enabled, updated_at
            FROM user_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn upsert(
        db: &PgPool,
        user_id: i64,
        calorie_mode: &str,
        step_goal: i32,
        calorie_goal_override: Option<i32>,
        reminders_enabled: bool,
    ) -> sqlx::Result<UserSettings> {
        sqlx::query_as::<_, UserSettings>(
            r#"
            INSERT INTO user_settings
                (user_id, calorie_mode, step_goal, calorie_goal_override, reminders_enabled, updated_at)
            VALUES ($1, $2, $3, $4, $5, now())
            ON CONFLICT (user_id)
            DO UPDATE SET calorie_mode = EXCLUDED.calorie_mode,
                          step_goal = EXCLUDED.step_goal,
                          calorie_goal_override = EXCLUDED.calorie_goal_override,
                          reminders_enabled = EXCLUDED.reminders_enabled,
                          updated_at = now()
            RETURNING id, user_id, calorie_mode, step_goal, calorie_goal_override,
                      reminders_enabled, updated_at
            "#,
        )
        .bind(user_id)
        .bind(calorie_mode)
        .bind(step_goal)
        .bind(calorie_goal_override)
        .bind(reminders_enabled)
        .fetch_one(db)
        .await
    }
}
