use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::{JobDirectory, StoreError, StoreResult};
use crate::models::job::JobSummary;

/// Read-only view over the `jobs` table owned by the job catalogue.
#[derive(Clone)]
pub struct PgJobDirectory {
    pool: PgPool,
}

impl PgJobDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobDirectory for PgJobDirectory {
    #[instrument(skip(self))]
    async fn get(&self, job_id: Uuid) -> StoreResult<Option<JobSummary>> {
        sqlx::query_as::<_, JobSummary>(
            r#"
            SELECT id, title, posted_by AS poster_id, is_active, application_deadline
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn increment_application_count(&self, job_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET applications_count = COALESCE(applications_count, 0) + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("job {}", job_id)));
        }
        Ok(())
    }
}
