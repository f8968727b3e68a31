use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::job::JobSummary;
use crate::models::notification::{NotificationCategory, NotificationDraft};
use crate::models::page::{Page, PageRequest};
use crate::models::user::Actor;
use crate::repositories::{ApplicationStore, JobDirectory};
use crate::services::authorization::{authorize, Action, Subject};
use crate::services::dispatch_service::SideEffectDispatcher;
use crate::utils::time;

/// Application lifecycle: creation, status transitions, interview scheduling
/// and withdrawal, each gated by [`authorize`].
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationStore>,
    jobs: Arc<dyn JobDirectory>,
    dispatcher: SideEffectDispatcher,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ApplicationStats {
    pub total_applications: i64,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        jobs: Arc<dyn JobDirectory>,
        dispatcher: SideEffectDispatcher,
    ) -> Self {
        Self {
            applications,
            jobs,
            dispatcher,
        }
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobSummary>> {
        self.jobs.get(job_id).await.map_err(|e| {
            tracing::error!(error = ?e, %job_id, "Job directory lookup failed");
            Error::DependencyFailure(format!("Job directory unavailable: {}", e))
        })
    }

    async fn require_job(&self, job_id: Uuid) -> Result<JobSummary> {
        self.find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", job_id)))
    }

    async fn require_application(&self, id: Uuid) -> Result<Application> {
        self.applications
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    /// Loads an application and its job, then checks `action` for `actor`.
    async fn load_for(
        &self,
        id: Uuid,
        actor: &Actor,
        action: Action,
    ) -> Result<(Application, JobSummary)> {
        let application = self.require_application(id).await?;
        let job = self.require_job(application.job_id).await?;
        authorize(actor, &Subject::application(&application, Some(&job)), action)?;
        Ok((application, job))
    }

    pub async fn submit(
        &self,
        actor: &Actor,
        job_id: Uuid,
        cover_letter: Option<String>,
        resume_url: Option<String>,
    ) -> Result<Application> {
        let job = self.require_job(job_id).await?;

        let now = time::now();
        if !job.is_open_at(now) {
            return Err(Error::JobClosed);
        }
        if self
            .applications
            .exists_for_applicant_and_job(actor.id, job_id)
            .await?
        {
            return Err(Error::DuplicateApplication);
        }

        let application = self
            .applications
            .insert(NewApplication {
                applicant_id: actor.id,
                job_id,
                cover_letter,
                resume_url,
                applied_at: now,
            })
            .await?;

        tracing::info!(
            application_id = %application.id,
            applicant_id = %actor.id,
            %job_id,
            "Application submitted"
        );

        self.dispatcher.increment_application_count(job_id);
        self.dispatcher.notify(NotificationDraft {
            recipient_id: job.poster_id,
            title: "New Job Application".to_string(),
            message: format!("{} has applied for your job: {}", actor.label(), job.title),
            category: NotificationCategory::JobApplication,
            action_url: format!("/jobs/{}/applications", job.id),
        });

        Ok(application)
    }

    pub async fn change_status(
        &self,
        application_id: Uuid,
        actor: &Actor,
        new_status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application> {
        let (mut application, job) = self
            .load_for(application_id, actor, Action::Review)
            .await?;
        ensure_transition(&application, new_status)?;

        application.apply_status(new_status, time::now());
        if new_status == ApplicationStatus::Rejected {
            application.rejection_reason = notes.clone();
        }
        application.notes = notes;

        let saved = self.applications.update(&application).await?;

        tracing::info!(
            application_id = %saved.id,
            actor_id = %actor.id,
            status = %saved.status,
            "Application status changed"
        );

        self.dispatcher.notify(NotificationDraft {
            recipient_id: saved.applicant_id,
            title: "Application Status Update".to_string(),
            message: format!(
                "Your application for {} has been {}",
                job.title,
                new_status.describe()
            ),
            category: NotificationCategory::ApplicationStatusUpdate,
            action_url: format!("/applications/{}", saved.id),
        });

        Ok(saved)
    }

    pub async fn schedule_interview(
        &self,
        application_id: Uuid,
        actor: &Actor,
        interview_time: &str,
        notes: Option<String>,
    ) -> Result<Application> {
        let interview_at = time::parse_timestamp(interview_time)?;
        self.schedule_interview_at(application_id, actor, interview_at, notes)
            .await
    }

    pub async fn schedule_interview_at(
        &self,
        application_id: Uuid,
        actor: &Actor,
        interview_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Application> {
        let (mut application, job) = self
            .load_for(application_id, actor, Action::Review)
            .await?;
        ensure_transition(&application, ApplicationStatus::InterviewScheduled)?;

        application.apply_status(ApplicationStatus::InterviewScheduled, time::now());
        application.interview_scheduled_at = Some(interview_at);
        application.notes = notes;

        let saved = self.applications.update(&application).await?;

        tracing::info!(
            application_id = %saved.id,
            actor_id = %actor.id,
            interview_at = %time::to_rfc3339(interview_at),
            "Interview scheduled"
        );

        self.dispatcher.notify(NotificationDraft {
            recipient_id: saved.applicant_id,
            title: "Interview Scheduled".to_string(),
            message: format!(
                "An interview has been scheduled for your application: {} on {}",
                job.title,
                interview_at.format("%Y-%m-%d %H:%M UTC")
            ),
            category: NotificationCategory::InterviewScheduled,
            action_url: format!("/applications/{}", saved.id),
        });

        Ok(saved)
    }

    /// Withdrawal is silent: unlike other transitions it notifies nobody.
    pub async fn withdraw(&self, application_id: Uuid, actor: &Actor) -> Result<Application> {
        let mut application = self.require_application(application_id).await?;
        authorize(
            actor,
            &Subject::application(&application, None),
            Action::Withdraw,
        )?;
        ensure_transition(&application, ApplicationStatus::Withdrawn)?;

        application.apply_status(ApplicationStatus::Withdrawn, time::now());
        let saved = self.applications.update(&application).await?;

        tracing::info!(application_id = %saved.id, actor_id = %actor.id, "Application withdrawn");
        Ok(saved)
    }

    pub async fn get(&self, application_id: Uuid, actor: &Actor) -> Result<Application> {
        let application = self.require_application(application_id).await?;
        if actor.id == application.applicant_id || actor.is_admin() {
            return Ok(application);
        }
        let job = self.find_job(application.job_id).await?;
        authorize(
            actor,
            &Subject::application(&application, job.as_ref()),
            Action::View,
        )?;
        Ok(application)
    }

    pub async fn list_by_applicant(
        &self,
        applicant_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        Ok(self.applications.list_by_applicant(applicant_id, page).await?)
    }

    pub async fn list_by_job(&self, job_id: Uuid, page: PageRequest) -> Result<Page<Application>> {
        Ok(self.applications.list_by_job(job_id, page).await?)
    }

    pub async fn list_by_status(
        &self,
        status: ApplicationStatus,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        Ok(self.applications.list_by_status(status, page).await?)
    }

    pub async fn count_by_applicant(&self, applicant_id: Uuid) -> Result<i64> {
        Ok(self.applications.count_by_applicant(applicant_id).await?)
    }

    /// Applications of a job, visible to its poster and administrators.
    pub async fn list_for_job(
        &self,
        actor: &Actor,
        job_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let job = self.require_job(job_id).await?;
        authorize(actor, &Subject::job(&job), Action::Review)?;
        self.list_by_job(job_id, page).await
    }

    pub async fn list_in_status(
        &self,
        actor: &Actor,
        status: ApplicationStatus,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        authorize(actor, &Subject::default(), Action::Oversee)?;
        self.list_by_status(status, page).await
    }

    pub async fn stats(&self, actor: &Actor) -> Result<ApplicationStats> {
        Ok(ApplicationStats {
            total_applications: self.count_by_applicant(actor.id).await?,
        })
    }

    pub async fn count_by_job(&self, actor: &Actor, job_id: Uuid) -> Result<i64> {
        let job = self.require_job(job_id).await?;
        authorize(actor, &Subject::job(&job), Action::Review)?;
        Ok(self.applications.count_by_job(job_id).await?)
    }

    pub async fn has_applied(&self, actor: &Actor, job_id: Uuid) -> Result<bool> {
        Ok(self
            .applications
            .exists_for_applicant_and_job(actor.id, job_id)
            .await?)
    }
}

fn ensure_transition(application: &Application, next: ApplicationStatus) -> Result<()> {
    if application.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            from: application.status,
            to: next,
        })
    }
}
