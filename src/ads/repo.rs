use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct AdUnit {
    pub id: i64,
    pub network: String,
    pub placement: String,
    pub ad_unit_id: String,
    pub enabled: bool,
    pub android_min_version: Option<i32>,
    pub android_max_version: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl AdUnit {
    pub fn matches_version(&self, app_version: i32) -> bool {
        if let Some(min) = self.android_min_version {
            if app_version < min {
                return false;
            }
        }
        if let Some(max) = self.android_max_version {
            if app_version > max {
                return false;
            }
        }
        true
    }

    pub async fn list_enabled(db: &PgPool, network: &str) -> sqlx::Result<Vec<AdUnit>> {
        sqlx::query_as::<_, AdUnit>(
            r#"
            SELECT id, network, placement, ad_unit_id, enabled,
                   android_min_version, android_max_version, created_at, updated_at
            FROM ad_units
            WHERE network = $1 AND enabled = true
            "#,
        )
        .bind(network)
        .fetch_all(db)
        .await
    }

    /// Returns true when a new row was created, false on update.
    pub async fn upsert(
        db: &PgPool,
        network: &str,
        placement: &str,
        ad_unit_id: &str,
        enabled: bool,
        android_min_version: Option<i32>,
        android_max_version: Option<i32>,
    ) -> sqlx::Result<bool> {
        let created = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO ad_units
                (network, placement, ad_unit_id, enabled,
                 android_min_version, android_max_version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, now(), now())
            ON CONFLICT (network, placement)
            DO UPDATE SET ad_unit_id = EXCLUDED.ad_unit_id,
                          enabled = EXCLUDED.enabled,
                          android_min_version = EXCLUDED.android_min_version,
                          android_max_version = EXCLUDED.android_max_version,
                          updated_at = now()
            RETURNING (xmax = 0)
            "#,
        )
        .bind(network)
        .bind(placement)
        .bind(ad_unit_id)
        .bind(enabled)
        .bind(android_min_version)
        .bind(android_max_version)
        .fetch_one(db)
        .await?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(min: Option<i32>, max: Option<i32>) -> AdUnit {
        AdUnit {
            id: 1,
            network: "yandex".into(),
            placement: "banner_home".into(),
            ad_unit_id: "R-M-123".into(),
            enabled: true,
            android_min_version: min,
            android_max_version: max,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn version_window_filters_both_sides() {
        assert!(unit(None, None).matches_version(1));
        assert!(unit(Some(5), None).matches_version(5));
        assert!(!unit(Some(5), None).matches_version(4));
        assert!(unit(None, Some(10)).matches_version(10));
        assert!(!unit(None, Some(10)).matches_version(11));
        assert!(unit(Some(3), Some(7)).matches_version(5));
    }
}
