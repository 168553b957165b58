use sqlx::{FromRow, PgPool};
use thiserror::Error;
use time::OffsetDateTime;

/// Application user row.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Console identity, a separate space from application users.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("login already exists")]
    LoginTaken,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl User {
    pub async fn find_by_login(db: &PgPool, login: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user. A unique-constraint race on `login` surfaces as
    /// `LoginTaken`, same as the pre-check, so registration stays atomic.
    pub async fn create(
        db: &PgPool,
        login: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password_hash)
            VALUES ($1, $2)
            RETURNING id, login, password_hash, created_at
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .fetch_one(db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CreateUserError::LoginTaken)
            }
            Err(e) => Err(CreateUserError::Db(e)),
        }
    }
}

impl AdminUser {
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<AdminUser>> {
        sqlx::query_as::<_, AdminUser>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM admin_users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Insert the first and only admin. Returns `None` once the table has
    /// any row. The insert itself carries the emptiness guard, and the
    /// advisory lock serializes concurrent bootstrap attempts; a plain
    /// `WHERE NOT EXISTS` is not enough under READ COMMITTED, where two
    /// inserts can both see an empty table.
    pub async fn create_first(
        db: &PgPool,
        username: &str,
        password_hash: &str,
    ) -> sqlx::Result<Option<AdminUser>> {
        let mut tx = db.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext('admin_users_bootstrap'))")
            .execute(&mut *tx)
            .await?;

        let admin = sqlx::query_as::<_, AdminUser>(
            r#"
            INSERT INTO admin_users (username, password_hash)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM admin_users)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(admin)
    }
}
