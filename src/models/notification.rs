use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    JobApplication,
    JobMatch,
    InterviewScheduled,
    ApplicationStatusUpdate,
    NewJobPosted,
    SystemNotification,
    Reminder,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::JobApplication => "JOB_APPLICATION",
            NotificationCategory::JobMatch => "JOB_MATCH",
            NotificationCategory::InterviewScheduled => "INTERVIEW_SCHEDULED",
            NotificationCategory::ApplicationStatusUpdate => "APPLICATION_STATUS_UPDATE",
            NotificationCategory::NewJobPosted => "NEW_JOB_POSTED",
            NotificationCategory::SystemNotification => "SYSTEM_NOTIFICATION",
            NotificationCategory::Reminder => "REMINDER",
        }
    }
}

impl FromStr for NotificationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JOB_APPLICATION" => Ok(NotificationCategory::JobApplication),
            "JOB_MATCH" => Ok(NotificationCategory::JobMatch),
            "INTERVIEW_SCHEDULED" => Ok(NotificationCategory::InterviewScheduled),
            "APPLICATION_STATUS_UPDATE" => Ok(NotificationCategory::ApplicationStatusUpdate),
            "NEW_JOB_POSTED" => Ok(NotificationCategory::NewJobPosted),
            "SYSTEM_NOTIFICATION" => Ok(NotificationCategory::SystemNotification),
            "REMINDER" => Ok(NotificationCategory::Reminder),
            _ => Err(format!("Invalid notification category: {}", s)),
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification waiting to be recorded for its recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub recipient_id: Uuid,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub action_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub action_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub category: String,
    pub action_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = String;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            message: row.message,
            category: row.category.parse()?,
            action_url: row.action_url,
            is_read: row.is_read,
            read_at: row.read_at,
            created_at: row.created_at,
        })
    }
}
