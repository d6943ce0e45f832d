//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use alumni_core::entities::Profile;
use alumni_core::traits::{ProfileChanges, ProfileRepository, RepoResult};

use crate::models::ProfileModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Profile>> {
        let result = sqlx::query_as::<_, ProfileModel>(
            r"
            SELECT name, department, degree, about, profile_pic, updated_at
            FROM profiles
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Profile::from))
    }

    #[instrument(skip(self, changes), fields(name = %changes.name))]
    async fn upsert(&self, changes: &ProfileChanges) -> RepoResult<Profile> {
        // A NULL picture keeps whatever was stored before
        let row = sqlx::query_as::<_, ProfileModel>(
            r"
            INSERT INTO profiles (name, department, degree, about, profile_pic, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (name) DO UPDATE
            SET department  = EXCLUDED.department,
                degree      = EXCLUDED.degree,
                about       = EXCLUDED.about,
                profile_pic = COALESCE(EXCLUDED.profile_pic, profiles.profile_pic),
                updated_at  = NOW()
            RETURNING name, department, degree, about, profile_pic, updated_at
            ",
        )
        .bind(&changes.name)
        .bind(&changes.department)
        .bind(&changes.degree)
        .bind(&changes.about)
        .bind(&changes.profile_pic)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }
}
