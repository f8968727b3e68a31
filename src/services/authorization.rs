use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::job::JobSummary;
use crate::models::user::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read a single application.
    View,
    /// Change status, schedule interviews, list a job's applications.
    Review,
    /// Withdraw an application.
    Withdraw,
    /// Cross-user reads such as listing every application in a status.
    Oversee,
}

/// Who owns the thing being acted on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Subject {
    pub applicant_id: Option<Uuid>,
    pub poster_id: Option<Uuid>,
}

impl Subject {
    pub fn application(application: &Application, job: Option<&JobSummary>) -> Self {
        Self {
            applicant_id: Some(application.applicant_id),
            poster_id: job.map(|j| j.poster_id),
        }
    }

    pub fn job(job: &JobSummary) -> Self {
        Self {
            applicant_id: None,
            poster_id: Some(job.poster_id),
        }
    }
}

pub fn is_allowed(actor: &Actor, subject: &Subject, action: Action) -> bool {
    let is_applicant = subject.applicant_id == Some(actor.id);
    let is_poster = subject.poster_id == Some(actor.id);

    match action {
        Action::View => is_applicant || is_poster || actor.is_admin(),
        Action::Review => is_poster || actor.is_admin(),
        // Administrators cannot withdraw on an applicant's behalf.
        Action::Withdraw => is_applicant,
        Action::Oversee => actor.is_admin(),
    }
}

pub fn authorize(actor: &Actor, subject: &Subject, action: Action) -> Result<()> {
    if is_allowed(actor, subject, action) {
        return Ok(());
    }
    let reason = match action {
        Action::View => "You don't have permission to view this application",
        Action::Review => "You don't have permission to update this application",
        Action::Withdraw => "You don't have permission to withdraw this application",
        Action::Oversee => "Administrator role required",
    };
    tracing::warn!(actor_id = %actor.id, ?action, "Authorization denied");
    Err(Error::Forbidden(reason.to_string()))
}
