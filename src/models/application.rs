use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    InterviewScheduled,
    Interviewed,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Reviewed => "REVIEWED",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::InterviewScheduled => "INTERVIEW_SCHEDULED",
            ApplicationStatus::Interviewed => "INTERVIEWED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Withdrawn => "WITHDRAWN",
        }
    }

    /// Human wording used in applicant notifications, e.g. "interview scheduled".
    pub fn describe(&self) -> String {
        self.as_str().to_lowercase().replace('_', " ")
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    /// The application state machine. Anything not listed here is rejected.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        match self {
            Pending => matches!(
                next,
                Reviewed | Shortlisted | InterviewScheduled | Rejected | Withdrawn
            ),
            Reviewed => matches!(next, Shortlisted | InterviewScheduled | Rejected | Withdrawn),
            Shortlisted => matches!(next, InterviewScheduled | Rejected | Withdrawn),
            InterviewScheduled => matches!(next, Interviewed | Rejected | Withdrawn),
            Interviewed => matches!(next, Accepted | Rejected),
            Accepted | Rejected | Withdrawn => false,
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid application status: {}", s))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
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

impl Application {
    /// Moves the record to `next`, stamping `reviewed_at`. Callers validate the
    /// transition first.
    pub fn apply_status(&mut self, next: ApplicationStatus, at: DateTime<Utc>) {
        self.status = next;
        self.reviewed_at = Some(at);
    }
}

/// Fields supplied by the applicant; the store assigns everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub interview_scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = String;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            applicant_id: row.applicant_id,
            job_id: row.job_id,
            cover_letter: row.cover_letter,
            resume_url: row.resume_url,
            status: row.status.parse()?,
            applied_at: row.applied_at,
            reviewed_at: row.reviewed_at,
            interview_scheduled_at: row.interview_scheduled_at,
            notes: row.notes,
            rejection_reason: row.rejection_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
            version: row.version,
        })
    }
}
