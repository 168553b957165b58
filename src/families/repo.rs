use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct Family {
    pub id: i64,
    pub name: String,
    pub admin_user_id: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct FamilyMember {
    pub id: i64,
    pub family_id: i64,
    pub user_id: i64,
    pub joined_at: OffsetDateTime,
}

/// Member row joined with the owning user's login, so handlers never walk
/// object graphs to render a member list.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithLogin {
    pub user_id: i64,
    pub login: String,
    pub joined_at: OffsetDateTime,
}

impl Family {
    pub async fn find_by_name(db: &PgPool, name: &str) -> sqlx::Result<Option<Family>> {
        sqlx::query_as::<_, Family>(
            "SELECT id, name, admin_user_id, created_at FROM families WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<Family>> {
        sqlx::query_as::<_, Family>(
            "SELECT id, name, admin_user_id, created_at FROM families WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_admin(db: &PgPool, admin_user_id: i64) -> sqlx::Result<Option<Family>> {
        sqlx::query_as::<_, Family>(
            "SELECT id, name, admin_user_id, created_at FROM families WHERE admin_user_id = $1",
        )
        .bind(admin_user_id)
        .fetch_optional(db)
        .await
    }

    /// Create the family and its first member (the admin) in one
    /// transaction.
    pub async fn create_with_admin(
        db: &PgPool,
        name: &str,
        admin_user_id: i64,
    ) -> sqlx::Result<Family> {
        let mut tx = db.begin().await?;
        let family = sqlx::query_as::<_, Family>(
            r#"
            INSERT INTO families (name, admin_user_id, created_at)
            VALUES ($1, $2, now())
            RETURNING id, name, admin_user_id, created_at
            "#,
        )
        .bind(name)
        .bind(admin_user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO family_members (family_id, user_id, joined_at) VALUES ($1, $2, now())")
            .bind(family.id)
            .bind(admin_user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(family)
    }

    pub async fn delete(db: &PgPool, family_id: i64) -> sqlx::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM family_members WHERE family_id = $1")
            .bind(family_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM families WHERE id = $1")
            .bind(family_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await
    }
}

impl FamilyMember {
    pub async fn find_by_user(db: &PgPool, user_id: i64) -> sqlx::Result<Option<FamilyMember>> {
        sqlx::query_as::<_, FamilyMember>(
            "SELECT id, family_id, user_id, joined_at FROM family_members WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn add(db: &PgPool, family_id: i64, user_id: i64) -> sqlx::Result<FamilyMember> {
        sqlx::query_as::<_, FamilyMember>(
            r#"
            INSERT INTO family_members (family_id, user_id, joined_at)
            VALUES ($1, $2, now())
            RETURNING id, family_id, user_id, joined_at
            "#,
        )
        .bind(family_id)
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    /// Remove a member, handing the admin role to a successor in the same
    /// transaction when one is named. The family is never left pointing at
    /// a departed admin partway through.
    pub async fn leave_with_handover(
        db: &PgPool,
        family_id: i64,
        leaver_id: i64,
        new_admin_id: Option<i64>,
    ) -> sqlx::Result<()> {
        let mut tx = db.begin().await?;
        if let Some(admin_id) = new_admin_id {
            sqlx::query("UPDATE families SET admin_user_id = $1 WHERE id = $2")
                .bind(admin_id)
                .bind(family_id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM family_members WHERE family_id = $1 AND user_id = $2")
            .bind(family_id)
            .bind(leaver_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await
    }

    pub async fn list_with_logins(
        db: &PgPool,
        family_id: i64,
    ) -> sqlx::Result<Vec<MemberWithLogin>> {
        sqlx::query_as::<_, MemberWithLogin>(
            r#"
            SELECT m.user_id, u.login, m.joined_at
            FROM family_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.family_id = $1
            ORDER BY m.joined_at
            "#,
        )
        .bind(family_id)
        .fetch_all(db)
        .await
    }
}
