use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::page::{Page, PageRequest, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyPayload {
    pub job_id: Uuid,
    #[validate(length(max = 10000))]
    pub cover_letter: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusPayload {
    pub status: ApplicationStatus,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleInterviewPayload {
    #[validate(length(min = 1))]
    pub interview_time: String,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(
            query.page.unwrap_or(0),
            query.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub interview_scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            applicant_id: value.applicant_id,
            job_id: value.job_id,
            cover_letter: value.cover_letter,
            resume_url: value.resume_url,
            status: value.status,
            applied_at: value.applied_at,
            reviewed_at: value.reviewed_at,
            interview_scheduled_at: value.interview_scheduled_at,
            notes: value.notes,
            rejection_reason: value.rejection_reason,
            created_at: value.created_at,
            updated_at: value.updated_at,
            version: value.version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListResponse {
    pub items: Vec<ApplicationResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl From<Page<Application>> for ApplicationListResponse {
    fn from(value: Page<Application>) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasAppliedResponse {
    pub job_id: Uuid,
    pub has_applied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplicationCountResponse {
    pub job_id: Uuid,
    pub total_applications: i64,
}
