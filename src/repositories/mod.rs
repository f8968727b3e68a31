//! Persistence contracts consumed by the application lifecycle, plus their
//! PostgreSQL implementations.

pub mod application_repository;
pub mod job_directory;
pub mod notification_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::job::JobSummary;
use crate::models::notification::{Notification, NotificationDraft};
use crate::models::page::{Page, PageRequest};

pub use application_repository::PgApplicationStore;
pub use job_directory::PgJobDirectory;
pub use notification_repository::PgNotificationStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("an application already exists for this applicant and job")]
    Duplicate,
    #[error("concurrent update: {0}")]
    Conflict(String),
    #[error("query failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Application>>;

    async fn exists_for_applicant_and_job(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> StoreResult<bool>;

    /// Inserts a new application. Must reject a second row for the same
    /// (applicant, job) pair with [`StoreError::Duplicate`] atomically.
    async fn insert(&self, application: NewApplication) -> StoreResult<Application>;

    /// Writes back a mutated application if its `version` still matches the
    /// stored one, returning the row with the bumped version. `applied_at` is
    /// never written.
    async fn update(&self, application: &Application) -> StoreResult<Application>;

    async fn list_by_applicant(
        &self,
        applicant_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<Page<Application>>;

    async fn list_by_job(&self, job_id: Uuid, page: PageRequest)
        -> StoreResult<Page<Application>>;

    async fn list_by_status(
        &self,
        status: ApplicationStatus,
        page: PageRequest,
    ) -> StoreResult<Page<Application>>;

    async fn count_by_applicant(&self, applicant_id: Uuid) -> StoreResult<i64>;

    async fn count_by_job(&self, job_id: Uuid) -> StoreResult<i64>;
}

#[async_trait]
pub trait JobDirectory: Send + Sync {
    async fn get(&self, job_id: Uuid) -> StoreResult<Option<JobSummary>>;

    async fn increment_application_count(&self, job_id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, draft: NotificationDraft) -> StoreResult<Notification>;
}

/// Read side of the notification inbox.
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Notification>>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<Page<Notification>>;

    async fn list_unread(&self, user_id: Uuid) -> StoreResult<Vec<Notification>>;

    async fn count_unread(&self, user_id: Uuid) -> StoreResult<i64>;

    async fn mark_read(&self, id: Uuid) -> StoreResult<Notification>;

    async fn mark_all_read(&self, user_id: Uuid) -> StoreResult<u64>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn delete_all(&self, user_id: Uuid) -> StoreResult<u64>;
}
