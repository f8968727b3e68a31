use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The slice of a job posting the application lifecycle needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub poster_id: Uuid,
    pub is_active: bool,
    pub application_deadline: Option<DateTime<Utc>>,
}

impl JobSummary {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.application_deadline
            .map(|deadline| now > deadline)
            .unwrap_or(false)
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }
}
