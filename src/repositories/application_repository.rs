use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::{ApplicationStore, StoreError, StoreResult};
use crate::models::application::{Application, ApplicationRow, ApplicationStatus, NewApplication};
use crate::models::page::{Page, PageRequest};

const COLUMNS: &str = "id, applicant_id, job_id, cover_letter, resume_url, status, applied_at, \
     reviewed_at, interview_scheduled_at, notes, rejection_reason, created_at, updated_at, version";

#[derive(Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn page_where(
        &self,
        filter: &str,
        bind: Filter,
        page: PageRequest,
    ) -> StoreResult<Page<Application>> {
        let list_sql = format!(
            "SELECT {COLUMNS} FROM job_applications WHERE {filter} \
             ORDER BY applied_at DESC, id DESC LIMIT $2 OFFSET $3"
        );
        let count_sql = format!("SELECT COUNT(*) FROM job_applications WHERE {filter}");

        let list = sqlx::query_as::<_, ApplicationRow>(&list_sql);
        let count = sqlx::query_scalar::<_, i64>(&count_sql);
        let (list, count) = match bind {
            Filter::Id(id) => (list.bind(id), count.bind(id)),
            Filter::Status(status) => (list.bind(status.as_str()), count.bind(status.as_str())),
        };

        let rows = list
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed)?;
        let total = count.fetch_one(&self.pool).await.map_err(query_failed)?;

        let items = rows
            .into_iter()
            .map(Application::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Query)?;
        Ok(Page::new(items, total, page))
    }
}

enum Filter {
    Id(Uuid),
    Status(ApplicationStatus),
}

fn query_failed(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        other => StoreError::Query(other.to_string()),
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    #[instrument(skip(self))]
    async fn get(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {COLUMNS} FROM job_applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Application::try_from)
            .transpose()
            .map_err(StoreError::Query)
    }

    #[instrument(skip(self))]
    async fn exists_for_applicant_and_job(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM job_applications WHERE applicant_id = $1 AND job_id = $2)",
        )
        .bind(applicant_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(query_failed)
    }

    #[instrument(skip(self, application), fields(applicant_id = %application.applicant_id, job_id = %application.job_id))]
    async fn insert(&self, application: NewApplication) -> StoreResult<Application> {
        // The unique (applicant_id, job_id) index decides racing inserts.
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO job_applications (applicant_id, job_id, cover_letter, resume_url, status, applied_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (applicant_id, job_id) DO NOTHING
            RETURNING {COLUMNS}
            "#
        ))
        .bind(application.applicant_id)
        .bind(application.job_id)
        .bind(&application.cover_letter)
        .bind(&application.resume_url)
        .bind(ApplicationStatus::Pending.as_str())
        .bind(application.applied_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        let row = row.ok_or(StoreError::Duplicate)?;
        Application::try_from(row).map_err(StoreError::Query)
    }

    #[instrument(skip(self, application), fields(application_id = %application.id, version = application.version))]
    async fn update(&self, application: &Application) -> StoreResult<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            UPDATE job_applications
            SET
                status = $3,
                reviewed_at = $4,
                interview_scheduled_at = $5,
                notes = $6,
                rejection_reason = $7,
                updated_at = NOW(),
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(application.id)
        .bind(application.version)
        .bind(application.status.as_str())
        .bind(application.reviewed_at)
        .bind(application.interview_scheduled_at)
        .bind(&application.notes)
        .bind(&application.rejection_reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        match row {
            Some(row) => Application::try_from(row).map_err(StoreError::Query),
            None => {
                let exists = self.get(application.id).await?.is_some();
                if exists {
                    Err(StoreError::Conflict(format!(
                        "application {} was modified concurrently",
                        application.id
                    )))
                } else {
                    Err(StoreError::NotFound(format!(
                        "application {}",
                        application.id
                    )))
                }
            }
        }
    }

    async fn list_by_applicant(
        &self,
        applicant_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<Page<Application>> {
        self.page_where("applicant_id = $1", Filter::Id(applicant_id), page)
            .await
    }

    async fn list_by_job(
        &self,
        job_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<Page<Application>> {
        self.page_where("job_id = $1", Filter::Id(job_id), page).await
    }

    async fn list_by_status(
        &self,
        status: ApplicationStatus,
        page: PageRequest,
    ) -> StoreResult<Page<Application>> {
        self.page_where("status = $1", Filter::Status(status), page)
            .await
    }

    async fn count_by_applicant(&self, applicant_id: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_applications WHERE applicant_id = $1")
            .bind(applicant_id)
            .fetch_one(&self.pool)
            .await
            .map_err(query_failed)
    }

    async fn count_by_job(&self, job_id: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await
            .map_err(query_failed)
    }
}
